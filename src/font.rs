// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font handles consumed by the engine.
//!
//! Font discovery, caching and rasterization live with the caller; the
//! engine only needs metrics, a coverage query and access to the raw face
//! data so a shaper face can be built from it. Handles are shared
//! (`Arc`) and retained by the caller across paragraphs.

use std::sync::Arc;

use smallvec::SmallVec;

/// A sized font face.
///
/// All metrics are in 1/64 px, matching the engine's coordinate space.
/// Descender and underline position follow the usual font convention of
/// being negative below the baseline.
pub trait FontFace {
    fn ascender(&self) -> i32;
    fn descender(&self) -> i32;
    fn underline_position(&self) -> i32;
    fn underline_thickness(&self) -> i32;
    /// Whether the face maps the codepoint to a real glyph.
    fn contains_glyph(&self, codepoint: char) -> bool;
    /// Nominal size in pixels; used to scale shaper output from font units.
    fn pixel_size(&self) -> f32;
    /// The raw font file backing this face.
    fn data(&self) -> &[u8];
    /// Index of the face within a font collection.
    fn face_index(&self) -> u32 {
        0
    }
}

/// Identity of a shared face handle, used to key per-paragraph shaper state.
pub(crate) fn face_id(face: &Arc<dyn FontFace>) -> usize {
    Arc::as_ptr(face) as *const () as usize
}

pub(crate) fn same_face(a: &Option<Arc<dyn FontFace>>, b: &Option<Arc<dyn FontFace>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// An ordered font fallback chain.
#[derive(Clone, Default)]
pub struct FontList(SmallVec<[Arc<dyn FontFace>; 2]>);

impl FontList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(face: Arc<dyn FontFace>) -> Self {
        let mut list = Self::default();
        list.push(face);
        list
    }

    pub fn push(&mut self, face: Arc<dyn FontFace>) {
        self.0.push(face);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FontFace>> {
        self.0.iter()
    }

    /// The first face in the chain containing the codepoint, or the first
    /// face overall when none does (tofu rendering beats no rendering).
    pub fn get(&self, codepoint: char) -> Option<Arc<dyn FontFace>> {
        self.0
            .iter()
            .find(|f| f.contains_glyph(codepoint))
            .or_else(|| self.0.first())
            .cloned()
    }
}

impl From<Arc<dyn FontFace>> for FontList {
    fn from(face: Arc<dyn FontFace>) -> Self {
        Self::single(face)
    }
}
