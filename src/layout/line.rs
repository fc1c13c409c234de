// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Emission of one finished line: bidi reordering, alignment, absolute
//! positioning, link merging and layered painting order.

use crate::output::{DrawCommand, TextLayout};
use crate::shape::RunInfo;
use crate::style::{Alignment, LayoutProperties};

#[derive(Clone, Copy, Default)]
pub(crate) struct LineFlags {
    /// First line of the paragraph; receives the indent.
    pub(crate) first: bool,
    /// Last line before a forced break; never stretched.
    pub(crate) last: bool,
    /// Spaces advance by 9/10 of their width (optimizing breaker), the
    /// remainder being given back through justification.
    pub(crate) small_space: bool,
}

/// The visual left-to-right order of the runs in `range`.
///
/// Starting from logical order, every maximal stretch of runs above each
/// embedding level is reversed, from the highest level down; this is the
/// standard reordering over resolved levels.
pub(crate) fn visual_order(runs: &[RunInfo], start: usize, end: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (start..end).collect();
    let max_level = order.iter().map(|&i| runs[i].level).max().unwrap_or(0);
    for level in (0..max_level).rev() {
        let mut j = 0;
        while j < order.len() {
            if runs[order[j]].level > level {
                let mut k = j + 1;
                while k < order.len() && runs[order[k]].level > level {
                    k += 1;
                }
                order[j..k].reverse();
                j = k;
            }
            j += 1;
        }
    }
    order
}

/// Place the runs `[start, end)` as one line and emit them into `layout`.
///
/// `ypos` is the line's baseline; `left`/`right` are the flow-shape limits
/// for the line's band; `cur_width` is the measured width including any
/// first-line indent; `num_space` the number of stretchable space runs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn add_line(
    runs: &mut [RunInfo],
    start: usize,
    end: usize,
    layout: &mut TextLayout,
    ypos: i32,
    cur_width: i32,
    left: i32,
    right: i32,
    flags: LineFlags,
    num_space: usize,
    props: &LayoutProperties,
) {
    let order = visual_order(runs, start, end);

    let space_left = right - left - cur_width;

    // Where the pen starts and how much every space stretches.
    let mut xpos;
    let mut spaceadder = 0f64;
    match props.align {
        Alignment::Left => {
            xpos = left;
            if flags.first {
                xpos += props.indent;
            }
        }
        Alignment::Right => {
            xpos = left + space_left;
        }
        Alignment::Center => {
            xpos = left + space_left / 2;
        }
        Alignment::JustifyLeft => {
            xpos = left;
            if num_space > 0 && !flags.last {
                spaceadder = f64::from(space_left) / num_space as f64;
            }
            if flags.first {
                xpos += props.indent;
            }
        }
        Alignment::JustifyRight => {
            if num_space > 0 && !flags.last {
                xpos = left;
                spaceadder = f64::from(space_left) / num_space as f64;
            } else {
                xpos = left + space_left;
            }
        }
    }

    // Walk the visual order, translating every run to its final position.
    // Space runs keep only their underline rectangles visible, widened so
    // justification does not punch holes into underlines; their link boxes
    // widen the same way.
    let mut pen = xpos;
    let mut spaces_seen = 0usize;
    for &ri in &order {
        if runs[ri].shy && ri != end - 1 {
            continue;
        }
        let shift = pen + (spaceadder * spaces_seen as f64) as i32;
        if !runs[ri].space {
            for (_, cmd) in runs[ri].cmds.iter_mut() {
                cmd.translate(shift, ypos);
            }
        } else {
            for (_, cmd) in runs[ri].cmds.iter_mut() {
                if let DrawCommand::Rect { w, .. } = cmd {
                    *w += spaceadder as i32;
                    cmd.translate(shift, ypos);
                }
            }
            if let Some(link) = runs[ri].links.first_mut() {
                if let Some(area) = link.areas.first_mut() {
                    area.w += spaceadder as i32;
                }
            }
        }
        layout.merge_links(&runs[ri].links, shift, ypos);
        if runs[ri].space {
            spaces_seen += 1;
            pen += if flags.small_space {
                9 * runs[ri].dx / 10
            } else {
                runs[ri].dx
            };
        } else {
            pen += runs[ri].dx;
        }
    }

    // Paint layer by layer from the back: the highest layer first, the
    // foreground (layer 0) last.
    let mut max_layer = 0usize;
    for &ri in &order {
        for (layer, _) in &runs[ri].cmds {
            max_layer = max_layer.max(layer + 1);
        }
    }
    for pass in 0..max_layer {
        let target = max_layer - pass - 1;
        for ri in start..end {
            if runs[ri].shy && ri != end - 1 {
                continue;
            }
            for (layer, cmd) in &runs[ri].cmds {
                if *layer != target {
                    continue;
                }
                if runs[ri].space && !matches!(cmd, DrawCommand::Rect { .. }) {
                    continue;
                }
                layout.add_command(cmd.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BreakClass;

    fn run_with_level(level: u8) -> RunInfo {
        RunInfo {
            cmds: Vec::new(),
            dx: 100,
            dy: 0,
            level,
            linebreak: BreakClass::NoBreak,
            font: None,
            space: false,
            shy: false,
            ascender: 0,
            descender: 0,
            links: Vec::new(),
        }
    }

    fn order_of(levels: &[u8]) -> Vec<usize> {
        let runs: Vec<RunInfo> = levels.iter().map(|&l| run_with_level(l)).collect();
        visual_order(&runs, 0, runs.len())
    }

    #[test]
    fn uniform_ltr_keeps_logical_order() {
        assert_eq!(order_of(&[0, 0, 0]), vec![0, 1, 2]);
    }

    #[test]
    fn uniform_rtl_reverses() {
        assert_eq!(order_of(&[1, 1, 1]), vec![2, 1, 0]);
    }

    #[test]
    fn embedded_rtl_stretch_reverses_in_place() {
        assert_eq!(order_of(&[0, 1, 1, 0]), vec![0, 2, 1, 3]);
    }

    #[test]
    fn nested_levels_reverse_per_level() {
        // LTR inside RTL inside LTR base.
        assert_eq!(order_of(&[1, 2, 1]), vec![2, 1, 0]);
        assert_eq!(order_of(&[1, 2, 2, 1]), vec![3, 1, 2, 0]);
    }
}
