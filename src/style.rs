// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-codepoint attributes and paragraph-level layout properties.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::font::{FontFace, FontList};
use crate::output::DrawCommand;

/// A plain RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A drop shadow attached to a codepoint's glyphs and decorations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shadow {
    /// Horizontal offset in 1/64 px.
    pub dx: i32,
    /// Vertical offset in 1/64 px.
    pub dy: i32,
    pub color: Color,
    /// Blur radius in 1/64 px.
    pub blur: i32,
}

/// An atomic pre-rendered sub-layout inserted into the text flow.
///
/// The command list is positioned relative to the inlay's top-left corner;
/// the engine translates it to the pen position and shifts it up by
/// `ascender - 1` so the inlay sits on the baseline.
pub trait Inlay {
    /// Width in 1/64 px; this is the advance the inlay occupies.
    fn width(&self) -> i32;
    /// Height in 1/64 px.
    fn height(&self) -> i32;
    /// The pre-positioned drawing commands of the inlay.
    fn data(&self) -> &[DrawCommand];
}

/// Attributes of a single codepoint in the input stream.
#[derive(Clone, Default)]
pub struct CodepointAttrs {
    /// Font fallback chain, queried per codepoint. May be empty only for
    /// inlay codepoints.
    pub fonts: FontList,
    /// BCP-47-like language tag, optionally carrying an ISO 15924 script
    /// subtag ("ar-Arab"). Empty disables language-dependent processing.
    pub lang: String,
    pub color: Color,
    /// Baseline shift in 1/64 px, positive raises the glyph.
    pub baseline_shift: i32,
    /// Shadows, drawn behind the glyph; index 0 paints nearest to it.
    pub shadows: SmallVec<[Shadow; 2]>,
    /// When set, the codepoint is replaced by the inlay as one atomic unit.
    pub inlay: Option<Arc<dyn Inlay>>,
    /// Index into [`LayoutProperties::links`].
    pub link: Option<usize>,
    /// Decoration flags, see [`CodepointAttrs::UNDERLINE`].
    pub flags: u8,
}

impl CodepointAttrs {
    /// Draw an underline below the codepoint.
    pub const UNDERLINE: u8 = 1;

    pub fn underlined(&self) -> bool {
        self.flags & Self::UNDERLINE != 0
    }
}

/// Base paragraph direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Horizontal placement of lines within the flow shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
    /// Stretch spaces to fill the line; left-align lines that cannot be
    /// stretched (last line, no spaces).
    JustifyLeft,
    /// Stretch spaces to fill the line; right-align lines that cannot be
    /// stretched.
    JustifyRight,
}

/// Paragraph-level layout configuration.
#[derive(Clone, Default)]
pub struct LayoutProperties {
    pub direction: Direction,
    pub align: Alignment,
    /// First-line indentation in 1/64 px.
    pub indent: i32,
    /// Insert soft hyphens from the per-language pattern dictionaries.
    pub hyphenate: bool,
    /// Use the minimum-demerits line breaker instead of the greedy one.
    pub optimize: bool,
    /// When set, underline metrics come from this face instead of the
    /// underlined codepoint's own font.
    pub underline_font: Option<Arc<dyn FontFace>>,
    /// URL table referenced by [`CodepointAttrs::link`].
    pub links: Vec<String>,
}
