// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph-level rich text layout.
//!
//! typeflow turns a paragraph of Unicode codepoints plus a per-codepoint
//! attribute stream (fonts, language, color, shadows, baseline shift,
//! links, inlays, decorations) into a device-independent list of
//! positioned drawing commands, ready for any rasterizer. It handles
//! bidirectional text, automatic and manual hyphenation, non-rectangular
//! flow regions, and both greedy and minimum-demerits line breaking.
//!
//! The engine does not discover fonts, parse documents or touch pixels;
//! callers hand it shared [`FontFace`] handles and receive a
//! [`TextLayout`] of glyph, rectangle and image commands in 1/64-px
//! coordinates.
//!
//! ```no_run
//! use std::sync::Arc;
//! use typeflow::{
//!     layout_paragraph, CodepointAttrs, FontFace, FontList, LayoutProperties, RectShape,
//! };
//!
//! # fn face() -> Arc<dyn FontFace> { unimplemented!() }
//! let text: Vec<char> = "Hello, world".chars().collect();
//! let attrs: Vec<CodepointAttrs> = text
//!     .iter()
//!     .map(|_| CodepointAttrs {
//!         fonts: FontList::single(face()),
//!         ..Default::default()
//!     })
//!     .collect();
//! let shape = RectShape::new(400 * 64);
//! let layout = layout_paragraph(&text, &attrs, &shape, &LayoutProperties::default(), 0)?;
//! # Ok::<(), typeflow::LayoutError>(())
//! ```

mod analysis;
mod bidi;
mod error;
mod flow;
mod font;
mod layout;
mod output;
mod shape;
mod style;

pub use error::{LayoutError, Result};
pub use flow::{FlowShape, IndentShape, RectShape, ShiftShape};
pub use font::{FontFace, FontList};
pub use layout::{layout_paragraph, layout_paragraph_with};
pub use output::{DrawCommand, LinkInfo, Rect, TextLayout};
pub use shape::{HarfBuzzShaper, ShapeRequest, ShapedGlyph, Shaper};
pub use style::{Alignment, CodepointAttrs, Color, Direction, Inlay, LayoutProperties, Shadow};
