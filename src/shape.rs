// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run segmentation and shaping.
//!
//! The paragraph is split into runs, maximal stretches that can go through
//! the shaper in one call: one embedding level, one language, one resolved
//! font, one baseline shift, no break opportunity and no inlay inside.
//! Shaping a run produces its layered drawing commands (shadows behind
//! glyphs behind nothing), its advance, underline rectangles and link
//! boxes, all pen-relative; line assembly later translates them into
//! place.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::analysis::{BreakClass, LayoutView, SOFT_HYPHEN};
use crate::error::{LayoutError, Result};
use crate::font::{face_id, same_face, FontFace};
use crate::output::{DrawCommand, LinkInfo, Rect};
use crate::style::{CodepointAttrs, LayoutProperties};

const HYPHEN: char = '\u{2010}';
const HYPHEN_MINUS: char = '\u{002D}';

/// One shaped glyph, in 1/64 px.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapedGlyph {
    /// Glyph index in the font.
    pub glyph: u32,
    /// Index of the source codepoint in the paragraph view.
    pub cluster: u32,
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// A request to shape one run.
pub struct ShapeRequest<'a> {
    /// The codepoints of the run, in logical order.
    pub chars: &'a [char],
    /// Cluster value of the first codepoint; clusters are consecutive.
    pub cluster_base: u32,
    /// Right-to-left run (odd embedding level). The shaper returns glyphs
    /// in visual order, so an RTL run comes back reversed.
    pub rtl: bool,
    /// ISO 15924 script tag from the language attribute, if present.
    pub script: Option<[u8; 4]>,
    /// Primary language subtag, if present.
    pub language: Option<&'a str>,
}

/// A text shaping backend.
///
/// The engine is written against this seam; [`HarfBuzzShaper`] is the
/// production implementation and test suites substitute deterministic
/// ones.
pub trait Shaper {
    fn shape(&mut self, font: &Arc<dyn FontFace>, request: &ShapeRequest<'_>)
        -> Result<Vec<ShapedGlyph>>;
}

/// The default shaping backend, built on rustybuzz.
///
/// One `rustybuzz::Face` is created per distinct font face used by the
/// paragraph; the map lives for a single layout call and is dropped with
/// the shaper.
pub struct HarfBuzzShaper<'a> {
    faces: HashMap<usize, rustybuzz::Face<'a>>,
}

impl<'a> HarfBuzzShaper<'a> {
    pub fn new<I>(fonts: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Arc<dyn FontFace>>,
    {
        let mut faces = HashMap::new();
        for font in fonts {
            if let Entry::Vacant(slot) = faces.entry(face_id(font)) {
                let face = rustybuzz::Face::from_slice(font.data(), font.face_index())
                    .ok_or_else(|| {
                        LayoutError::InvalidInput("font data is not a readable face".into())
                    })?;
                slot.insert(face);
            }
        }
        Ok(Self { faces })
    }
}

impl Shaper for HarfBuzzShaper<'_> {
    fn shape(
        &mut self,
        font: &Arc<dyn FontFace>,
        request: &ShapeRequest<'_>,
    ) -> Result<Vec<ShapedGlyph>> {
        let face = self.faces.get(&face_id(font)).ok_or_else(|| {
            LayoutError::InvalidInput("font face was not registered for this paragraph".into())
        })?;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        for (i, &c) in request.chars.iter().enumerate() {
            buffer.add(c, request.cluster_base + i as u32);
        }
        buffer.set_direction(if request.rtl {
            rustybuzz::Direction::RightToLeft
        } else {
            rustybuzz::Direction::LeftToRight
        });
        if let Some(tag) = request.script {
            if let Some(script) =
                rustybuzz::Script::from_iso15924_tag(rustybuzz::ttf_parser::Tag::from_bytes(&tag))
            {
                buffer.set_script(script);
            }
        }
        if let Some(lang) = request.language {
            if let Ok(language) = lang.parse::<rustybuzz::Language>() {
                buffer.set_language(language);
            }
        }
        buffer.guess_segment_properties();

        let glyphs = rustybuzz::shape(face, &[], buffer);

        // Shaper output is in font units; bring it into 1/64 px.
        let scale = font.pixel_size() * 64.0 / face.units_per_em() as f32;
        let to_units = |v: i32| (v as f32 * scale).round() as i32;

        Ok(glyphs
            .glyph_infos()
            .iter()
            .zip(glyphs.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph: info.glyph_id,
                cluster: info.cluster,
                x_advance: to_units(pos.x_advance),
                y_advance: to_units(pos.y_advance),
                x_offset: to_units(pos.x_offset),
                y_offset: to_units(pos.y_offset),
            })
            .collect())
    }
}

/// A shaped run, ready for line assembly.
pub(crate) struct RunInfo {
    /// Drawing commands with their layer; larger layers paint earlier
    /// (further behind), so shadows sit behind their glyph.
    pub(crate) cmds: Vec<(usize, DrawCommand)>,
    /// Advance of the run.
    pub(crate) dx: i32,
    pub(crate) dy: i32,
    /// Embedding level; uniform across the run.
    pub(crate) level: u8,
    /// Break class after this run.
    pub(crate) linebreak: BreakClass,
    pub(crate) font: Option<Arc<dyn FontFace>>,
    /// All codepoints are spaces or newlines; dropped from rendering at
    /// line termini except for underline rectangles.
    pub(crate) space: bool,
    /// Soft-hyphen pseudo-run; its glyph shows only at a line end.
    pub(crate) shy: bool,
    pub(crate) ascender: i32,
    pub(crate) descender: i32,
    pub(crate) links: Vec<LinkInfo>,
}

/// Split the view into runs and shape each one.
pub(crate) fn create_runs(
    view: &LayoutView<'_>,
    props: &LayoutProperties,
    shaper: &mut dyn Shaper,
) -> Result<Vec<RunInfo>> {
    trace!("segmenting {} codepoints", view.len());
    let mut runs = Vec::new();
    let mut runstart = 0;
    while runstart < view.len() {
        let font = view.att(runstart).fonts.get(view.txt(runstart));
        let mut spos = runstart + 1;
        // The run keeps growing while nothing forces a seam between the
        // previous codepoint and the next one.
        while spos < view.len()
            && view.emb(runstart) == view.emb(spos)
            && view.att(runstart).lang == view.att(spos).lang
            && same_face(&font, &view.att(spos).fonts.get(view.txt(spos)))
            && view.att(runstart).baseline_shift == view.att(spos).baseline_shift
            && view.att(spos).inlay.is_none()
            && view.att(spos - 1).inlay.is_none()
            && !view.brk(spos - 1).allows_break()
            && view.txt(spos) != ' '
            && view.txt(spos - 1) != ' '
            && view.txt(spos) != '\n'
            && view.txt(spos - 1) != '\n'
            && view.txt(spos) != SOFT_HYPHEN
            && !view.hyphen(spos)
        {
            spos += 1;
        }

        runs.push(create_run(view, runstart, spos, props, font.clone(), shaper)?);

        // A hyphenator mark carries no codepoint of its own; synthesize the
        // soft-hyphen run the mark stands for.
        if view.hyphen(spos) {
            runs.push(soft_hyphen_run(view, runstart, props, font, shaper)?);
        }

        runstart = spos;
    }
    debug!("segmented into {} runs", runs.len());
    Ok(runs)
}

fn create_run(
    view: &LayoutView<'_>,
    runstart: usize,
    spos: usize,
    props: &LayoutProperties,
    font: Option<Arc<dyn FontFace>>,
    shaper: &mut dyn Shaper,
) -> Result<RunInfo> {
    let shy = view.txt(runstart) == SOFT_HYPHEN;
    // A soft hyphen always ends up in a run of its own; the break class
    // after it separates it from what follows.
    debug_assert!(!shy || spos - runstart == 1);
    shape_piece(view, runstart, spos, view.brk(spos - 1), shy, props, font, shaper)
}

fn soft_hyphen_run(
    view: &LayoutView<'_>,
    at: usize,
    props: &LayoutProperties,
    font: Option<Arc<dyn FontFace>>,
    shaper: &mut dyn Shaper,
) -> Result<RunInfo> {
    shape_piece(view, at, at + 1, BreakClass::AllowBreak, true, props, font, shaper)
}

#[allow(clippy::too_many_arguments)]
fn shape_piece(
    view: &LayoutView<'_>,
    runstart: usize,
    spos: usize,
    linebreak: BreakClass,
    shy: bool,
    props: &LayoutProperties,
    font: Option<Arc<dyn FontFace>>,
    shaper: &mut dyn Shaper,
) -> Result<RunInfo> {
    let attr = view.att(runstart);
    let level = view.emb(runstart);
    let rtl = level & 1 == 1;
    let baseline_shift = attr.baseline_shift;

    let mut run = RunInfo {
        cmds: Vec::new(),
        dx: 0,
        dy: 0,
        level,
        linebreak,
        font: font.clone(),
        space: view.chars()[runstart..spos]
            .iter()
            .all(|&c| c == ' ' || c == '\n'),
        shy,
        ascender: 0,
        descender: 0,
        links: Vec::new(),
    };

    // An inlay replaces the codepoint wholesale: its command list is
    // copied to the pen, lifted so it sits on the baseline rather than
    // hanging below it.
    if let Some(inlay) = attr.inlay.clone() {
        run.ascender = inlay.height() + baseline_shift;
        run.descender = inlay.height() - run.ascender;
        let lift = -(run.ascender - 1);
        let pen = run.dx;
        for cmd in inlay.data() {
            let mut cmd = cmd.clone();
            cmd.translate(pen, lift);
            run.cmds.push((0, cmd));
        }
        add_underline(&mut run, pen, inlay.width(), props, attr);
        run.dx += inlay.width();
        return Ok(run);
    }

    let face = font.ok_or_else(|| {
        LayoutError::InvalidInput("codepoint without inlay has no usable font".into())
    })?;
    run.ascender = face.ascender() + baseline_shift;
    run.descender = face.descender() + baseline_shift;

    let (language, script) = lang_parts(&attr.lang);
    let hyphen_buf: [char; 1];
    let chars: &[char] = if shy {
        // Not every font has a real hyphen; hyphen-minus is the fallback
        // everything carries.
        hyphen_buf = [if face.contains_glyph(HYPHEN) {
            HYPHEN
        } else {
            HYPHEN_MINUS
        }];
        &hyphen_buf
    } else {
        &view.chars()[runstart..spos]
    };

    let request = ShapeRequest {
        chars,
        cluster_base: runstart as u32,
        rtl,
        script,
        language,
    };
    let mut glyphs = shaper.shape(&face, &request)?;

    // First pass, in shaper output order: turn the shaper's pen-relative
    // offsets into absolute positions within the run, accumulate the
    // advance, and grow a link box over every contiguous stretch sharing a
    // link id.
    let mut cur_link: Option<usize> = None;
    let mut link_rect = Rect::default();
    let mut link_start = 0;
    for glyph in glyphs.iter_mut() {
        if glyph.y_advance != 0 {
            return Err(LayoutError::UnsupportedScript(
                "glyph has a vertical advance; only horizontal scripts are supported",
            ));
        }
        let a = view.att(glyph.cluster as usize);
        if a.link != cur_link {
            link_start = run.dx;
        }
        glyph.x_offset += run.dx;
        run.dx += glyph.x_advance;
        if let Some(id) = a.link {
            if let Some(open) = cur_link {
                if open != id {
                    run.links.push(LinkInfo {
                        url: props.links[open].clone(),
                        areas: vec![link_rect],
                    });
                    cur_link = None;
                }
            }
            if cur_link.is_none() {
                link_rect = Rect {
                    x: link_start,
                    y: -run.ascender,
                    w: run.dx - link_start,
                    h: run.ascender - run.descender,
                };
                cur_link = Some(id);
            } else {
                link_rect.w = run.dx - link_start;
            }
        }
    }
    if let Some(open) = cur_link {
        run.links.push(LinkInfo {
            url: props.links[open].clone(),
            areas: vec![link_rect],
        });
    }

    // Second pass emits commands. The shaper already put RTL glyphs into
    // visual order, so walking the array backwards restores logical order
    // for them; positions are absolute either way.
    let count = glyphs.len();
    for visual in 0..count {
        let j = if rtl { count - 1 - visual } else { visual };
        let glyph = &glyphs[j];
        let a = view.att(glyph.cluster as usize);
        let gx = glyph.x_offset;
        let gy = run.dy - glyph.y_offset - baseline_shift;

        let shadows = a.shadows.len();
        for (i, shadow) in a.shadows.iter().enumerate() {
            run.cmds.push((
                shadows - i,
                DrawCommand::Glyph {
                    font: face.clone(),
                    glyph: glyph.glyph,
                    x: gx + shadow.dx,
                    y: gy + shadow.dy,
                    color: shadow.color,
                    blur: shadow.blur,
                },
            ));
        }
        run.cmds.push((
            0,
            DrawCommand::Glyph {
                font: face.clone(),
                glyph: glyph.glyph,
                x: gx,
                y: gy,
                color: a.color,
                blur: 0,
            },
        ));
        // The extra 64 units let neighboring underlines overlap instead of
        // leaving pixel gaps.
        add_underline(&mut run, gx, glyph.x_advance + 64, props, a);
    }

    Ok(run)
}

/// Append underline commands covering `gw` units starting at `gx`.
fn add_underline(
    run: &mut RunInfo,
    gx: i32,
    gw: i32,
    props: &LayoutProperties,
    attr: &CodepointAttrs,
) {
    if !attr.underlined() {
        return;
    }
    let face = match props.underline_font.as_ref().or(run.font.as_ref()) {
        Some(face) => face,
        None => return,
    };
    let gy = -(face.underline_position() + face.underline_thickness() / 2);
    // Floor of one pixel; some fonts report a zero thickness.
    let gh = face.underline_thickness().max(64);

    let shadows = attr.shadows.len();
    for (i, shadow) in attr.shadows.iter().enumerate() {
        run.cmds.push((
            shadows - i,
            DrawCommand::Rect {
                x: gx + shadow.dx,
                y: gy + shadow.dy,
                w: gw,
                h: gh,
                color: shadow.color,
                blur: shadow.blur,
            },
        ));
    }
    run.cmds.push((
        0,
        DrawCommand::Rect {
            x: gx,
            y: gy,
            w: gw,
            h: gh,
            color: attr.color,
            blur: 0,
        },
    ));
}

/// Split a language tag into the primary subtag and an ISO 15924 script
/// tag when one follows it ("ar-Arab").
fn lang_parts(tag: &str) -> (Option<&str>, Option<[u8; 4]>) {
    let mut parts = tag.split('-');
    let primary = parts.next().filter(|p| !p.is_empty());
    let script = parts.next().and_then(|p| {
        let bytes = p.as_bytes();
        if bytes.len() == 4 && bytes.iter().all(u8::is_ascii_alphabetic) {
            Some([bytes[0], bytes[1], bytes[2], bytes[3]])
        } else {
            None
        }
    });
    (primary, script)
}
