// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flow shapes: per-vertical-band horizontal margins that lines are fit
//! into. A rectangular column is the trivial instance; decorators compose
//! to cut out indents or shift the band, e.g. to flow around a float.

/// Horizontal limits of the flow region for a vertical band.
///
/// `top`/`bottom` describe a half-open vertical interval in 1/64 px.
/// Implementations must be pure functions of the band; the engine may
/// query any band any number of times.
pub trait FlowShape {
    /// Left limit of the band.
    fn left(&self, top: i32, bottom: i32) -> i32;
    /// Right limit of the band.
    fn right(&self, top: i32, bottom: i32) -> i32;
    /// Extremal left limit over the whole band, for bounding boxes.
    fn left2(&self, top: i32, bottom: i32) -> i32 {
        self.left(top, bottom)
    }
    /// Extremal right limit over the whole band, for bounding boxes.
    fn right2(&self, top: i32, bottom: i32) -> i32 {
        self.right(top, bottom)
    }
}

/// A plain rectangular column, unbounded vertically.
#[derive(Clone, Copy, Debug)]
pub struct RectShape {
    x: i32,
    width: i32,
}

impl RectShape {
    /// A column of the given width starting at x = 0.
    pub fn new(width: i32) -> Self {
        Self { x: 0, width }
    }

    /// A column of the given width starting at `x`.
    pub fn at(x: i32, width: i32) -> Self {
        Self { x, width }
    }
}

impl FlowShape for RectShape {
    fn left(&self, _top: i32, _bottom: i32) -> i32 {
        self.x
    }

    fn right(&self, _top: i32, _bottom: i32) -> i32 {
        self.x + self.width
    }
}

/// Insets an inner shape from the left and right.
pub struct IndentShape<'a> {
    inner: &'a dyn FlowShape,
    left: i32,
    right: i32,
}

impl<'a> IndentShape<'a> {
    pub fn new(inner: &'a dyn FlowShape, left: i32, right: i32) -> Self {
        Self { inner, left, right }
    }
}

impl FlowShape for IndentShape<'_> {
    fn left(&self, top: i32, bottom: i32) -> i32 {
        self.inner.left(top, bottom) + self.left
    }

    fn right(&self, top: i32, bottom: i32) -> i32 {
        self.inner.right(top, bottom) - self.right
    }

    fn left2(&self, top: i32, bottom: i32) -> i32 {
        self.inner.left2(top, bottom) + self.left
    }

    fn right2(&self, top: i32, bottom: i32) -> i32 {
        self.inner.right2(top, bottom) - self.right
    }
}

/// Queries an inner shape with a vertical offset applied to the band.
pub struct ShiftShape<'a> {
    inner: &'a dyn FlowShape,
    shift: i32,
}

impl<'a> ShiftShape<'a> {
    pub fn new(inner: &'a dyn FlowShape, shift: i32) -> Self {
        Self { inner, shift }
    }
}

impl FlowShape for ShiftShape<'_> {
    fn left(&self, top: i32, bottom: i32) -> i32 {
        self.inner.left(top + self.shift, bottom + self.shift)
    }

    fn right(&self, top: i32, bottom: i32) -> i32 {
        self.inner.right(top + self.shift, bottom + self.shift)
    }

    fn left2(&self, top: i32, bottom: i32) -> i32 {
        self.inner.left2(top + self.shift, bottom + self.shift)
    }

    fn right2(&self, top: i32, bottom: i32) -> i32 {
        self.inner.right2(top + self.shift, bottom + self.shift)
    }
}
