// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional embedding levels.

use unicode_bidi::{BidiInfo, Level};

use crate::error::{LayoutError, Result};
use crate::style::Direction;

/// Resolve one embedding level per codepoint under the given base
/// direction. Levels are computed over the original stream, embedding
/// controls included; even levels read left-to-right, odd right-to-left.
pub(crate) fn embedding_levels(text: &[char], direction: Direction) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let base = match direction {
        Direction::Ltr => Level::ltr(),
        Direction::Rtl => Level::rtl(),
    };
    let paragraph: String = text.iter().collect();
    let info = BidiInfo::new(&paragraph, Some(base));

    let mut levels = Vec::with_capacity(text.len());
    for (offset, _) in paragraph.char_indices() {
        levels.push(info.levels[offset].number());
    }
    if levels.len() != text.len() {
        return Err(LayoutError::InvalidInput(
            "bidi resolver produced a level count mismatch".into(),
        ));
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ltr_is_level_zero() {
        let text: Vec<char> = "hello".chars().collect();
        let levels = embedding_levels(&text, Direction::Ltr).unwrap();
        assert_eq!(levels, vec![0; 5]);
    }

    #[test]
    fn hebrew_under_ltr_base_is_level_one() {
        let text: Vec<char> = "שלום".chars().collect();
        let levels = embedding_levels(&text, Direction::Ltr).unwrap();
        assert_eq!(levels, vec![1; 4]);
    }

    #[test]
    fn latin_under_rtl_base_is_level_two() {
        let text: Vec<char> = "abc".chars().collect();
        let levels = embedding_levels(&text, Direction::Rtl).unwrap();
        assert_eq!(levels, vec![2; 3]);
    }

    #[test]
    fn mixed_text_switches_levels() {
        let text: Vec<char> = "abcדהfg".chars().collect();
        let levels = embedding_levels(&text, Direction::Ltr).unwrap();
        assert_eq!(&levels[..3], &[0, 0, 0]);
        assert_eq!(&levels[3..5], &[1, 1]);
        assert_eq!(&levels[5..], &[0, 0]);
    }
}
