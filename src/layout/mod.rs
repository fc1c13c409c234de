// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paragraph layout pipeline.
//!
//! One call lays out one paragraph: resolve embedding levels, build the
//! working view, classify break positions, mark hyphenation points,
//! segment and shape runs, then pack them into lines greedily or with the
//! optimizing breaker.

pub(crate) mod greedy;
pub(crate) mod line;
pub(crate) mod optimize;

use log::trace;

use crate::analysis::{self, LayoutView};
use crate::bidi;
use crate::error::{LayoutError, Result};
use crate::flow::FlowShape;
use crate::output::TextLayout;
use crate::shape::{create_runs, HarfBuzzShaper, Shaper};
use crate::style::{CodepointAttrs, LayoutProperties};

/// Lay out one paragraph with the default (rustybuzz) shaper.
///
/// `text` and `attrs` must have the same length; `ystart` is where the
/// paragraph's first band begins. The returned layout carries absolute
/// 1/64-px commands in painting order. No partial layout is returned on
/// error.
pub fn layout_paragraph(
    text: &[char],
    attrs: &[CodepointAttrs],
    shape: &dyn FlowShape,
    props: &LayoutProperties,
    ystart: i32,
) -> Result<TextLayout> {
    let mut shaper = HarfBuzzShaper::new(attrs.iter().flat_map(|a| a.fonts.iter()))?;
    layout_paragraph_with(&mut shaper, text, attrs, shape, props, ystart)
}

/// Lay out one paragraph through a caller-provided shaping backend.
pub fn layout_paragraph_with(
    shaper: &mut dyn Shaper,
    text: &[char],
    attrs: &[CodepointAttrs],
    shape: &dyn FlowShape,
    props: &LayoutProperties,
    ystart: i32,
) -> Result<TextLayout> {
    validate(text, attrs, props)?;
    trace!("laying out paragraph of {} codepoints", text.len());

    let levels = bidi::embedding_levels(text, props.direction)?;
    let mut view = LayoutView::new(text, attrs, levels);

    analysis::compute_linebreaks(&mut view)?;
    if props.hyphenate {
        analysis::compute_hyphens(&mut view);
    }

    let runs = create_runs(&view, props, shaper)?;

    let layout = if props.optimize {
        optimize::break_lines(runs, shape, props, ystart)
    } else {
        greedy::break_lines(runs, shape, props, ystart)
    };
    Ok(layout)
}

fn validate(text: &[char], attrs: &[CodepointAttrs], props: &LayoutProperties) -> Result<()> {
    if text.len() != attrs.len() {
        return Err(LayoutError::InvalidInput(format!(
            "{} codepoints but {} attribute records",
            text.len(),
            attrs.len()
        )));
    }
    for (i, attr) in attrs.iter().enumerate() {
        if let Some(link) = attr.link {
            if link >= props.links.len() {
                return Err(LayoutError::InvalidInput(format!(
                    "codepoint {i} references link {link} but only {} links exist",
                    props.links.len()
                )));
            }
        }
        if attr.inlay.is_none() && attr.fonts.is_empty() {
            return Err(LayoutError::InvalidInput(format!(
                "codepoint {i} has neither a font nor an inlay"
            )));
        }
        if !attr
            .lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(LayoutError::InvalidInput(format!(
                "malformed language tag {:?}",
                attr.lang
            )));
        }
    }
    Ok(())
}
