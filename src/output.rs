// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finalized layout output: positioned drawing commands, link rectangles
//! and paragraph metrics. All coordinates are 1/64 px; rasterizers divide
//! by 64 when mapping to device pixels.

use core::fmt;
use std::sync::Arc;

use crate::font::FontFace;
use crate::style::Color;

/// An axis-aligned rectangle in 1/64 px.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// A single positioned drawing command.
#[derive(Clone)]
pub enum DrawCommand {
    /// Paint one glyph with the glyph origin at (x, y).
    Glyph {
        font: Arc<dyn FontFace>,
        glyph: u32,
        x: i32,
        y: i32,
        color: Color,
        /// Blur radius; nonzero only for shadow copies.
        blur: i32,
    },
    /// Fill a rectangle (underlines and their shadows).
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
        blur: i32,
    },
    /// Paint an externally provided image.
    Image {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        handle: String,
    },
}

impl DrawCommand {
    pub(crate) fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            Self::Glyph { x, y, .. } | Self::Rect { x, y, .. } | Self::Image { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
        }
    }

    /// Horizontal extent `(x, x + width)` of the command; glyphs report
    /// their origin only, since advances are not part of the command.
    fn x_extent(&self) -> (i32, i32) {
        match *self {
            Self::Glyph { x, .. } => (x, x),
            Self::Rect { x, w, .. } | Self::Image { x, w, .. } => (x, x + w),
        }
    }
}

// Font handles are compared by identity; everything else by value.
impl PartialEq for DrawCommand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Glyph {
                    font: fa,
                    glyph: ga,
                    x: xa,
                    y: ya,
                    color: ca,
                    blur: ba,
                },
                Self::Glyph {
                    font: fb,
                    glyph: gb,
                    x: xb,
                    y: yb,
                    color: cb,
                    blur: bb,
                },
            ) => Arc::ptr_eq(fa, fb) && ga == gb && xa == xb && ya == yb && ca == cb && ba == bb,
            (
                Self::Rect {
                    x: xa,
                    y: ya,
                    w: wa,
                    h: ha,
                    color: ca,
                    blur: ba,
                },
                Self::Rect {
                    x: xb,
                    y: yb,
                    w: wb,
                    h: hb,
                    color: cb,
                    blur: bb,
                },
            ) => xa == xb && ya == yb && wa == wb && ha == hb && ca == cb && ba == bb,
            (
                Self::Image {
                    x: xa,
                    y: ya,
                    w: wa,
                    h: ha,
                    handle: pa,
                },
                Self::Image {
                    x: xb,
                    y: yb,
                    w: wb,
                    h: hb,
                    handle: pb,
                },
            ) => xa == xb && ya == yb && wa == wb && ha == hb && pa == pb,
            _ => false,
        }
    }
}

impl fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glyph {
                glyph,
                x,
                y,
                color,
                blur,
                ..
            } => f
                .debug_struct("Glyph")
                .field("glyph", glyph)
                .field("x", x)
                .field("y", y)
                .field("color", color)
                .field("blur", blur)
                .finish_non_exhaustive(),
            Self::Rect {
                x,
                y,
                w,
                h,
                color,
                blur,
            } => f
                .debug_struct("Rect")
                .field("x", x)
                .field("y", y)
                .field("w", w)
                .field("h", h)
                .field("color", color)
                .field("blur", blur)
                .finish(),
            Self::Image { x, y, w, h, handle } => f
                .debug_struct("Image")
                .field("x", x)
                .field("y", y)
                .field("w", w)
                .field("h", h)
                .field("handle", handle)
                .finish(),
        }
    }
}

/// One hyperlink with all the rectangles it covers in the layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkInfo {
    pub url: String,
    pub areas: Vec<Rect>,
}

impl LinkInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            areas: Vec::new(),
        }
    }
}

/// The finalized paragraph layout.
///
/// Commands are in painting order, back to front: on each line the highest
/// shadow layer is emitted first and the foreground last. Link records
/// follow the insertion order of their first appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub commands: Vec<DrawCommand>,
    /// Baseline of the first line, absolute.
    pub first_baseline: i32,
    /// Bottom of the last line, absolute.
    pub height: i32,
    /// Left bounding extent.
    pub left: i32,
    /// Right bounding extent.
    pub right: i32,
    pub links: Vec<LinkInfo>,
}

impl TextLayout {
    pub(crate) fn add_command(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    /// Merge per-run link rectangles into the layout's link table,
    /// translating each rectangle by (dx, dy). Rectangles of an already
    /// known URL are appended under the existing record.
    pub(crate) fn merge_links(&mut self, links: &[LinkInfo], dx: i32, dy: i32) {
        for link in links {
            let idx = match self.links.iter().position(|l| l.url == link.url) {
                Some(idx) => idx,
                None => {
                    self.links.push(LinkInfo::new(link.url.clone()));
                    self.links.len() - 1
                }
            };
            for area in &link.areas {
                self.links[idx].areas.push(Rect {
                    x: area.x + dx,
                    y: area.y + dy,
                    ..*area
                });
            }
        }
    }

    /// Widen the bounding extents to cover every emitted command, so
    /// overflowing content (oversized-run fallback) stays inside the
    /// reported box.
    pub(crate) fn cover_commands(&mut self) {
        for cmd in &self.commands {
            let (lo, hi) = cmd.x_extent();
            self.left = self.left.min(lo);
            self.right = self.right.max(hi);
        }
    }
}
