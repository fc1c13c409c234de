// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking: fill each line as far as it goes, then start the
//! next one.

use log::debug;

use crate::flow::FlowShape;
use crate::layout::line::{add_line, LineFlags};
use crate::output::TextLayout;
use crate::shape::RunInfo;
use crate::style::{Alignment, LayoutProperties};

pub(crate) fn break_lines(
    mut runs: Vec<RunInfo>,
    shape: &dyn FlowShape,
    props: &LayoutProperties,
    ystart: i32,
) -> TextLayout {
    let mut layout = TextLayout::default();
    let mut runstart = 0usize;
    let mut ypos = ystart;
    let mut firstline = true;

    while runstart < runs.len() {
        // Spaces never start a line.
        while runstart < runs.len() && runs[runstart].space {
            runstart += 1;
        }

        let mut cur_ascend = 0i32;
        let mut cur_descend = 0i32;
        let mut cur_width = 0i32;
        let mut spos = runstart;
        let mut num_space = 0usize;
        let mut forcebreak = false;

        if firstline && props.align != Alignment::Center {
            cur_width = props.indent;
        }

        // Grow the line one break segment at a time: accumulate runs up to
        // the next legal break position, check that the line still fits,
        // and revert to the previous segment end when it does not.
        while spos < runs.len() {
            let mut new_ascend = cur_ascend;
            let mut new_descend = cur_descend;
            let mut new_width = cur_width;
            let mut newspos = spos;
            let mut new_space = num_space;

            while newspos < runs.len() {
                let run = &runs[newspos];
                new_ascend = new_ascend.max(run.ascender);
                new_descend = new_descend.min(run.descender);
                new_width += run.dx;
                if run.space {
                    new_space += 1;
                }
                // Breaks are legal after a non-space run that carries one,
                // or after the space run following it (breaks land after
                // spaces, but trailing spaces are not measured).
                let after_space = newspos + 1 < runs.len()
                    && runs[newspos + 1].space
                    && runs[newspos + 1].linebreak.allows_break();
                let after_run = !run.space && run.linebreak.allows_break();
                if after_space || after_run {
                    break;
                }
                newspos += 1;
            }
            let newspos = (newspos + 1).min(runs.len());

            let band = ypos + new_ascend - new_descend;
            if spos > runstart
                && shape.left(ypos, band) + new_width > shape.right(ypos, band)
            {
                // The segment would overrun; keep the line as it was. An
                // empty line accepts the segment anyway, otherwise a run
                // wider than the shape would never be placed.
                break;
            }

            // A soft hyphen that is no longer the line end will not be
            // drawn, so its width leaves the measurement.
            if spos > runstart && runs[spos - 1].shy {
                new_width -= runs[spos - 1].dx;
            }

            cur_ascend = new_ascend;
            cur_descend = new_descend;
            cur_width = new_width;
            spos = newspos;
            num_space = new_space;

            let must_here = runs[spos - 1].linebreak.is_mandatory();
            let must_at_space = spos < runs.len()
                && runs[spos].space
                && runs[spos].linebreak.is_mandatory();
            if must_here || must_at_space {
                forcebreak = true;
                break;
            }
        }

        forcebreak |= spos == runs.len();

        let band = ypos + cur_ascend - cur_descend;
        add_line(
            &mut runs,
            runstart,
            spos,
            &mut layout,
            ypos + cur_ascend,
            cur_width,
            shape.left(ypos, band),
            shape.right(ypos, band),
            LineFlags {
                first: firstline,
                last: forcebreak,
                small_space: false,
            },
            num_space,
            props,
        );
        if firstline {
            layout.first_baseline = ypos + cur_ascend;
        }
        ypos = ypos + cur_ascend - cur_descend;

        runstart = spos;
        firstline = false;
    }

    debug!("greedy breaker finished at y = {ypos}");
    layout.height = ypos;
    layout.left = shape.left2(ystart, ypos);
    layout.right = shape.right2(ystart, ypos);
    layout.cover_commands();
    layout
}
