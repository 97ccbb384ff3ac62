// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builders for fonts, glyphs and frames.

use glyph_atlas::{
    Font, FontGlyphPair, FontId, FontMetrics, Glyph, GlyphBounds, TextFrame, TextRun,
};

pub(crate) fn font(id: u64) -> Font {
    Font::new(FontId(id), FontMetrics::new(16.0))
}

/// A glyph whose bounds are `width` by `height` units, with the origin on the baseline.
pub(crate) fn glyph(index: u16, width: f32, height: f32) -> Glyph {
    Glyph::new(index, GlyphBounds::from_ltwh(0.0, -height, width, height))
}

/// A frame with a single run of `glyphs`, given as `(index, width, height)`.
pub(crate) fn frame(font: Font, glyphs: &[(u16, f32, f32)]) -> TextFrame {
    let mut run = TextRun::new(font);
    let mut x = 0.0;
    for &(index, width, height) in glyphs {
        run.push(glyph(index, width, height), [x, 0.0]);
        x += width;
    }
    [run].into_iter().collect()
}

/// A frame of `count` square glyphs of `side` units, indexed from `first`.
pub(crate) fn square_glyphs(font: Font, first: u16, count: u16, side: f32) -> TextFrame {
    let glyphs: Vec<_> = (first..first + count).map(|index| (index, side, side)).collect();
    frame(font, &glyphs)
}

pub(crate) fn pair(font: Font, index: u16, width: f32, height: f32) -> FontGlyphPair {
    FontGlyphPair::new(font, glyph(index, width, height))
}
