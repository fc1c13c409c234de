// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The working view over one paragraph: the cleaned codepoint stream with
//! its back-map into the caller's attribute slice, plus the per-position
//! line-break classes and hyphenation marks computed over it.

use std::collections::{HashMap, HashSet};

use unicode_linebreak::BreakOpportunity;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::style::CodepointAttrs;

pub(crate) const SOFT_HYPHEN: char = '\u{00AD}';

/// Line-break opportunity after a codepoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BreakClass {
    /// Breaking after this codepoint is not allowed.
    NoBreak,
    /// A line may end after this codepoint.
    AllowBreak,
    /// A line must end after this codepoint.
    MustBreak,
    /// The position sits inside a grapheme; never break.
    InsideChar,
}

impl BreakClass {
    pub(crate) fn allows_break(self) -> bool {
        matches!(self, Self::AllowBreak | Self::MustBreak)
    }

    pub(crate) fn is_mandatory(self) -> bool {
        matches!(self, Self::MustBreak)
    }
}

fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{202A}' | '\u{202B}' | '\u{202C}')
}

/// The cleaned stream and everything computed per position of it.
///
/// Embedding controls are stripped from the working text; `idx` maps each
/// retained position back to its original index so attributes and levels
/// stay addressable through one indirection.
pub(crate) struct LayoutView<'a> {
    text: Vec<char>,
    idx: Vec<usize>,
    attrs: &'a [CodepointAttrs],
    levels: Vec<u8>,
    breaks: Vec<BreakClass>,
    hyphens: Vec<bool>,
}

impl<'a> LayoutView<'a> {
    pub(crate) fn new(text: &[char], attrs: &'a [CodepointAttrs], levels: Vec<u8>) -> Self {
        let mut cleaned = Vec::with_capacity(text.len());
        let mut idx = Vec::with_capacity(text.len());
        for (i, &c) in text.iter().enumerate() {
            if !is_bidi_control(c) {
                cleaned.push(c);
                idx.push(i);
            }
        }
        let len = cleaned.len();
        Self {
            text: cleaned,
            idx,
            attrs,
            levels,
            breaks: vec![BreakClass::NoBreak; len],
            hyphens: vec![false; len],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.text
    }

    pub(crate) fn txt(&self, i: usize) -> char {
        self.text[i]
    }

    pub(crate) fn att(&self, i: usize) -> &CodepointAttrs {
        &self.attrs[self.idx[i]]
    }

    pub(crate) fn emb(&self, i: usize) -> u8 {
        self.levels[self.idx[i]]
    }

    pub(crate) fn brk(&self, i: usize) -> BreakClass {
        self.breaks[i]
    }

    fn set_brk(&mut self, i: usize, class: BreakClass) {
        self.breaks[i] = class;
    }

    /// Whether a soft hyphen is to be inserted before position `i`.
    pub(crate) fn hyphen(&self, i: usize) -> bool {
        i < self.hyphens.len() && self.hyphens[i]
    }

    fn set_hyphen(&mut self, i: usize) {
        if i < self.hyphens.len() {
            self.hyphens[i] = true;
        }
    }

    #[cfg(test)]
    pub(crate) fn backmap(&self) -> &[usize] {
        &self.idx
    }
}

/// Compute the break class after every position of the view.
///
/// Classes are computed per maximal same-language prefix. Line-break
/// algorithms force a break at the end of their input, so every run that
/// is followed by more text is classified together with one look-ahead
/// codepoint and only the first n outputs are kept; the wrongly forced
/// break lands on the look-ahead position and is overwritten by the next
/// run's classification.
pub(crate) fn compute_linebreaks(view: &mut LayoutView<'_>) -> Result<()> {
    let len = view.len();
    let mut runstart = 0;
    while runstart < len {
        let mut runpos = runstart + 1;
        while runpos < len && view.att(runstart).lang == view.att(runpos).lang {
            runpos += 1;
        }
        let take = runpos - runstart;
        let end = if runpos < len { runpos + 1 } else { runpos };
        classify_segment(view, runstart, end, take);
        runstart = runpos;
    }
    Ok(())
}

fn classify_segment(view: &mut LayoutView<'_>, start: usize, end: usize, take: usize) {
    let segment: String = view.chars()[start..end].iter().collect();
    let byte_of: Vec<usize> = segment.char_indices().map(|(b, _)| b).collect();
    let ord_of: HashMap<usize, usize> = byte_of.iter().enumerate().map(|(o, &b)| (b, o)).collect();

    let mut classes = vec![BreakClass::NoBreak; end - start];

    // Positions inside a grapheme cluster can never be broken, not even in
    // an emergency.
    let grapheme_starts: HashSet<usize> = segment.grapheme_indices(true).map(|(b, _)| b).collect();
    for (k, class) in classes.iter_mut().enumerate() {
        if k + 1 < byte_of.len() && !grapheme_starts.contains(&byte_of[k + 1]) {
            *class = BreakClass::InsideChar;
        }
    }

    for (offset, opportunity) in unicode_linebreak::linebreaks(&segment) {
        // The iterator reports the byte index of the codepoint following
        // the break; the class belongs to the codepoint before it.
        let ord = if offset == segment.len() {
            byte_of.len()
        } else {
            match ord_of.get(&offset) {
                Some(&ord) => ord,
                None => continue,
            }
        };
        if ord == 0 {
            continue;
        }
        classes[ord - 1] = match opportunity {
            BreakOpportunity::Allowed => BreakClass::AllowBreak,
            BreakOpportunity::Mandatory => BreakClass::MustBreak,
        };
    }

    for (k, &class) in classes.iter().take(take).enumerate() {
        view.set_brk(start + k, class);
    }
}

/// Mark soft-hyphen insertion points from the per-language patterns.
///
/// Words are found per contiguous language section (plus one look-ahead
/// codepoint, as for break classes); a word the user already soft-hyphened
/// is left alone. Missing pattern sets are skipped silently.
pub(crate) fn compute_hyphens(view: &mut LayoutView<'_>) {
    let len = view.len();
    let mut sectionstart = 0;
    while sectionstart < len {
        if view.att(sectionstart).lang.is_empty() {
            sectionstart += 1;
            continue;
        }
        let lang = view.att(sectionstart).lang.clone();
        let mut end = sectionstart + 1;
        while end < len && view.att(end).lang == lang {
            end += 1;
        }
        if let Some(patterns) = hyphen_lang(&lang) {
            mark_section(view, sectionstart, end, patterns);
        }
        sectionstart = end;
    }
}

/// The hypher pattern set for the primary subtag, if it ships one.
fn hyphen_lang(tag: &str) -> Option<hypher::Lang> {
    let primary = tag.split('-').next()?;
    let code: [u8; 2] = primary.as_bytes().try_into().ok()?;
    hypher::Lang::from_iso(code)
}

fn mark_section(view: &mut LayoutView<'_>, start: usize, end: usize, lang: hypher::Lang) {
    let scan_end = (end + 1).min(view.len());
    let section: String = view.chars()[start..scan_end].iter().collect();

    let mut word_start = 0usize; // in codepoints from `start`
    for (_, word) in section.split_word_bound_indices() {
        let word_chars = word.chars().count();
        if word.contains(SOFT_HYPHEN) || !word.chars().any(char::is_alphabetic) {
            word_start += word_chars;
            continue;
        }
        let mut bytes = 0;
        let mut chars = 0;
        for syllable in hypher::hyphenate(word, lang) {
            bytes += syllable.len();
            chars += syllable.chars().count();
            if bytes == word.len() {
                continue;
            }
            view.set_hyphen(start + word_start + chars);
        }
        word_start += word_chars;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::CodepointAttrs;

    fn attrs(text: &[char], lang: &str) -> Vec<CodepointAttrs> {
        text.iter()
            .map(|_| CodepointAttrs {
                lang: lang.into(),
                ..Default::default()
            })
            .collect()
    }

    fn view_of<'a>(text: &[char], attrs: &'a [CodepointAttrs]) -> LayoutView<'a> {
        let levels = vec![0; text.len()];
        LayoutView::new(text, attrs, levels)
    }

    #[test]
    fn controls_are_stripped_with_backmap() {
        let text: Vec<char> = "a\u{202A}b\u{202C}c".chars().collect();
        let a = attrs(&text, "");
        let view = view_of(&text, &a);
        assert_eq!(view.len(), 3);
        assert_eq!(view.chars(), &['a', 'b', 'c']);
        assert_eq!(view.backmap(), &[0, 2, 4]);
    }

    #[test]
    fn space_allows_break_and_end_is_mandatory() {
        let text: Vec<char> = "ab cd".chars().collect();
        let a = attrs(&text, "");
        let mut view = view_of(&text, &a);
        compute_linebreaks(&mut view).unwrap();
        assert_eq!(view.brk(0), BreakClass::NoBreak);
        assert_eq!(view.brk(1), BreakClass::NoBreak);
        assert_eq!(view.brk(2), BreakClass::AllowBreak);
        assert_eq!(view.brk(3), BreakClass::NoBreak);
        assert_eq!(view.brk(4), BreakClass::MustBreak);
    }

    #[test]
    fn newline_forces_break() {
        let text: Vec<char> = "a\nb".chars().collect();
        let a = attrs(&text, "");
        let mut view = view_of(&text, &a);
        compute_linebreaks(&mut view).unwrap();
        assert_eq!(view.brk(1), BreakClass::MustBreak);
        assert_eq!(view.brk(2), BreakClass::MustBreak);
    }

    #[test]
    fn soft_hyphen_allows_break() {
        let text: Vec<char> = "ab\u{00AD}cd".chars().collect();
        let a = attrs(&text, "");
        let mut view = view_of(&text, &a);
        compute_linebreaks(&mut view).unwrap();
        assert_eq!(view.brk(2), BreakClass::AllowBreak);
    }

    #[test]
    fn language_boundary_does_not_force_a_break() {
        let text: Vec<char> = "abcd".chars().collect();
        let mut a = attrs(&text, "en");
        a[2].lang = "de".into();
        a[3].lang = "de".into();
        let mut view = view_of(&text, &a);
        compute_linebreaks(&mut view).unwrap();
        assert_eq!(view.brk(0), BreakClass::NoBreak);
        assert_eq!(view.brk(1), BreakClass::NoBreak);
        assert_eq!(view.brk(2), BreakClass::NoBreak);
        assert_eq!(view.brk(3), BreakClass::MustBreak);
    }

    #[test]
    fn combining_marks_are_inside_a_char() {
        // e + combining acute
        let text: Vec<char> = "xe\u{0301}y".chars().collect();
        let a = attrs(&text, "");
        let mut view = view_of(&text, &a);
        compute_linebreaks(&mut view).unwrap();
        assert_eq!(view.brk(1), BreakClass::InsideChar);
    }

    #[test]
    fn hyphenation_marks_word_internal_points() {
        let text: Vec<char> = "hyphenation".chars().collect();
        let a = attrs(&text, "en");
        let mut view = view_of(&text, &a);
        compute_hyphens(&mut view);
        let marks: Vec<usize> = (0..view.len()).filter(|&i| view.hyphen(i)).collect();
        assert!(!marks.is_empty());
        for &m in &marks {
            assert!(m > 0 && m < view.len());
        }
    }

    #[test]
    fn user_placed_soft_hyphen_disables_patterns() {
        let text: Vec<char> = "hyphen\u{00AD}ation".chars().collect();
        let a = attrs(&text, "en");
        let mut view = view_of(&text, &a);
        compute_hyphens(&mut view);
        let marks: Vec<usize> = (0..view.len()).filter(|&i| view.hyphen(i)).collect();
        assert!(marks.is_empty());
    }

    #[test]
    fn unknown_language_is_skipped() {
        let text: Vec<char> = "hyphenation".chars().collect();
        let a = attrs(&text, "zz");
        let mut view = view_of(&text, &a);
        compute_hyphens(&mut view);
        assert!((0..view.len()).all(|i| !view.hyphen(i)));
    }
}
