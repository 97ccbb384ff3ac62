// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaped text frames and collection of the glyphs they reference.

use foldhash::fast::FixedState;
use indexmap::IndexSet;

use crate::font::{Font, FontGlyphPair, Glyph};

/// Set of unique font-glyph pairs.
///
/// Iteration follows insertion order, which makes packing reproducible for the same input.
pub type FontGlyphPairSet = IndexSet<FontGlyphPair, FixedState>;

/// A glyph positioned within a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphPosition {
    /// The glyph.
    pub glyph: Glyph,
    /// Offset of the glyph origin from the run origin.
    pub position: [f32; 2],
}

impl GlyphPosition {
    /// Creates a new glyph position.
    pub const fn new(glyph: Glyph, position: [f32; 2]) -> Self {
        Self { glyph, position }
    }
}

/// A sequence of glyphs that share a font.
#[derive(Clone, Debug)]
pub struct TextRun {
    font: Font,
    glyph_positions: Vec<GlyphPosition>,
}

impl TextRun {
    /// Creates an empty run for the given font.
    pub fn new(font: Font) -> Self {
        Self {
            font,
            glyph_positions: Vec::new(),
        }
    }

    /// Appends a positioned glyph.
    pub fn push(&mut self, glyph: Glyph, position: [f32; 2]) {
        self.glyph_positions
            .push(GlyphPosition::new(glyph, position));
    }

    /// The font every glyph of this run is rendered with.
    #[inline]
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// The positioned glyphs, in shaping order.
    #[inline]
    pub fn glyph_positions(&self) -> &[GlyphPosition] {
        &self.glyph_positions
    }

    /// Number of glyphs in the run.
    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyph_positions.len()
    }
}

/// Already shaped text, as a list of runs.
#[derive(Clone, Debug, Default)]
pub struct TextFrame {
    runs: Vec<TextRun>,
}

impl TextFrame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a run. Empty runs are kept, they just contribute no glyph.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// The runs of this frame.
    #[inline]
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Whether the frame contains no glyph at all.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.glyph_positions.is_empty())
    }
}

impl FromIterator<TextRun> for TextFrame {
    fn from_iter<T: IntoIterator<Item = TextRun>>(iter: T) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

/// Drains `frames` and collects every font-glyph pair they reference, once.
///
/// The frame sequence is consumed exactly once.
pub fn collect_unique_font_glyph_pairs<'a>(
    frames: impl IntoIterator<Item = &'a TextFrame>,
) -> FontGlyphPairSet {
    let mut set = FontGlyphPairSet::default();
    for frame in frames {
        for run in frame.runs() {
            let font = *run.font();
            for glyph_position in run.glyph_positions() {
                set.insert(FontGlyphPair::new(font, glyph_position.glyph));
            }
        }
    }
    set
}
