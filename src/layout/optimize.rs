// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimum-demerits line breaking, in the spirit of the TeX paragraph
//! algorithm: every legal break position is a node, every candidate line
//! an edge weighted by how badly it fills its measure, and the paragraph
//! takes the cheapest path.
//!
//! At every forced break the finished batch is emitted and the consumed
//! runs dropped, so state stays linear in the paragraph while the
//! optimization still spans everything between forced breaks.

use log::debug;

use crate::flow::FlowShape;
use crate::layout::line::{add_line, LineFlags};
use crate::output::TextLayout;
use crate::shape::RunInfo;
use crate::style::{Alignment, LayoutProperties};

/// Tightness classes; adjacent lines of very different tightness read
/// badly and are penalized.
const TIGHT: i32 = 0;
const DECENT: i32 = 1;
const LOOSE: i32 = 2;
const VERY_LOOSE: i32 = 3;

/// DP node: the best known way to end a line at one break position.
#[derive(Clone, Default)]
struct LineNode {
    /// Break position this line starts at.
    from: usize,
    /// Accumulated demerits along the best path; infinite when the
    /// position is not (yet) reachable.
    demerits: f32,
    ascend: i32,
    descend: i32,
    width: i32,
    spaces: usize,
    /// Top of the next line when coming through this node.
    ypos: i32,
    linetype: i32,
    /// The line ends in a soft hyphen.
    hyphen: bool,
    /// Backtrace anchor: the start of the current batch.
    start: bool,
}

/// Measured properties of a candidate line `[s1, s2)`.
struct Candidate {
    ascend: i32,
    descend: i32,
    width: i32,
    spaces: usize,
    space_width: i32,
}

/// Sum up a candidate line. Spaces contribute 9/10 of their advance to the
/// width; the remaining tenth is what justification ideally gives back.
/// A soft hyphen counts only when it terminates the line.
fn measure(runs: &[RunInfo], s1: usize, s2: usize, indent: i32) -> Candidate {
    let mut c = Candidate {
        ascend: 0,
        descend: 0,
        width: indent,
        spaces: 0,
        space_width: 0,
    };
    for (j, run) in runs.iter().enumerate().take(s2).skip(s1) {
        if run.shy && j != s2 - 1 {
            continue;
        }
        c.ascend = c.ascend.max(run.ascender);
        c.descend = c.descend.min(run.descender);
        if run.space {
            c.spaces += 1;
            c.width += run.dx * 9 / 10;
            c.space_width += run.dx;
        } else {
            c.width += run.dx;
        }
    }
    c
}

/// Trim leading and trailing space runs off `[s1, s2)`.
fn trim_spaces(runs: &[RunInfo], mut s1: usize, mut s2: usize) -> (usize, usize) {
    while s1 < s2 && runs[s1].space {
        s1 += 1;
    }
    while s2 > s1 && runs[s2 - 1].space {
        s2 -= 1;
    }
    (s1, s2)
}

pub(crate) fn break_lines(
    mut runs: Vec<RunInfo>,
    shape: &dyn FlowShape,
    props: &LayoutProperties,
    ystart: i32,
) -> TextLayout {
    let mut layout = TextLayout::default();

    let mut nodes: Vec<LineNode> = vec![LineNode::default(); runs.len() + 1];
    nodes[0].ypos = ystart;
    nodes[0].start = true;

    let mut i = 1usize;
    while i <= runs.len() {
        nodes[i] = LineNode {
            demerits: f32::INFINITY,
            ..Default::default()
        };

        if runs[i - 1].linebreak.allows_break() {
            // Try every start position, nearest first; once a candidate
            // line overflows, farther starts only make it wider.
            for start in (1..=i).rev() {
                if nodes[start - 1].demerits.is_infinite() {
                    continue;
                }

                let indent = if start == 1 && props.align != Alignment::Center {
                    props.indent
                } else {
                    0
                };
                let (s1, s2) = trim_spaces(&runs, start - 1, i);
                let c = measure(&runs, s1, s2, indent);

                let top = nodes[start - 1].ypos;
                let bottom = top + c.ascend - c.descend;
                let left = shape.left(top, bottom);
                let right = shape.right(top, bottom);

                if left + c.width > right && start < i {
                    break;
                }
                // A single over-wide segment stays admissible; otherwise a
                // forced break behind it could never be reached.

                let fillin = (right - left - c.width) as f32;
                let optimal_fillin = (c.space_width - c.width) as f32;
                let badness = 100.0 * ((fillin - optimal_fillin).abs() / optimal_fillin).powi(3);

                let linetype = if badness >= 100.0 {
                    VERY_LOOSE
                } else if badness >= 13.0 {
                    if fillin > optimal_fillin {
                        LOOSE
                    } else {
                        TIGHT
                    }
                } else {
                    DECENT
                };

                let ends_in_hyphen = s2 > s1 && runs[s2 - 1].shy;

                let mut demerits = (10.0 + badness) * (10.0 + badness);
                if ends_in_hyphen && nodes[start - 1].hyphen {
                    demerits += 10000.0;
                }
                if (linetype - nodes[start - 1].linetype).abs() > 1 {
                    demerits += 10000.0;
                }
                if linetype != nodes[start - 1].linetype {
                    demerits += 5000.0;
                }

                // A forced line is taken no matter how it fills; only a
                // stranded short tail is still discouraged.
                if runs[i - 1].linebreak.is_mandatory() || i == runs.len() {
                    demerits = if c.width > (right - left) / 3 {
                        0.0
                    } else {
                        100000.0
                    };
                }

                demerits += nodes[start - 1].demerits;

                if demerits < nodes[i].demerits {
                    nodes[i] = LineNode {
                        from: start - 1,
                        demerits,
                        ascend: c.ascend,
                        descend: c.descend,
                        width: c.width,
                        spaces: c.spaces,
                        ypos: nodes[start - 1].ypos + c.ascend - c.descend,
                        linetype,
                        hyphen: ends_in_hyphen,
                        start: false,
                    };
                }
            }
        }

        if runs[i - 1].linebreak.is_mandatory() || i == runs.len() {
            emit_batch(&mut runs, &nodes, i, &mut layout, shape, props);

            let final_ypos = if nodes[i].demerits.is_finite() {
                nodes[i].ypos
            } else {
                nodes[0].ypos
            };
            runs.drain(..i);
            nodes[0].ypos = final_ypos;
            i = 0;
        }

        i += 1;
    }

    debug!("optimizing breaker finished at y = {}", nodes[0].ypos);
    layout.height = nodes[0].ypos;
    layout.left = shape.left2(ystart, nodes[0].ypos);
    layout.right = shape.right2(ystart, nodes[0].ypos);
    layout.cover_commands();
    layout
}

/// Back-trace the best path from node `end` to the batch start and emit
/// every line on it, first line first.
fn emit_batch(
    runs: &mut [RunInfo],
    nodes: &[LineNode],
    end: usize,
    layout: &mut TextLayout,
    shape: &dyn FlowShape,
    props: &LayoutProperties,
) {
    let mut breaks = Vec::new();
    let mut at = end;
    while !nodes[at].start {
        breaks.push(at);
        at = nodes[at].from;
    }
    breaks.push(at);

    for bi in (1..breaks.len()).rev() {
        let from_node = breaks[bi];
        let end_node = breaks[bi - 1];
        let line = &nodes[end_node];
        let (s1, s2) = trim_spaces(runs, from_node, end_node);

        let top = nodes[from_node].ypos;
        let bottom = top + line.ascend - line.descend;
        let baseline = top + line.ascend;
        add_line(
            runs,
            s1,
            s2,
            layout,
            baseline,
            line.width,
            shape.left(top, bottom),
            shape.right(top, bottom),
            LineFlags {
                first: bi == breaks.len() - 1,
                last: bi == 1,
                small_space: true,
            },
            line.spaces,
            props,
        );
        if bi == breaks.len() - 1 {
            layout.first_baseline = baseline;
        }
    }
}
