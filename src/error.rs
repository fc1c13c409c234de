// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error surface of the layout engine.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, LayoutError>;

/// Errors that abort a paragraph layout.
///
/// A failed call returns no partial layout; retrying with the same inputs
/// will fail the same way. Degraded modes (a missing hyphenation dictionary,
/// the U+2010 to U+002D hyphen fallback) are not errors and are applied
/// silently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A resolver or working buffer could not be allocated.
    #[error("out of resources: {0}")]
    OutOfResources(&'static str),

    /// The shaper produced a vertical advance; only horizontal scripts are
    /// supported.
    #[error("unsupported script: {0}")]
    UnsupportedScript(&'static str),

    /// The caller violated an input contract or an internal consistency
    /// check failed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
