// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fonts, glyphs and the font-glyph pairs used as atlas keys.

use core::hash::{Hash, Hasher};

use crate::geometry::{GlyphBounds, ISize};

/// Opaque identifier of a typeface known to the glyph rasterizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u64);

/// Rendering metrics of a font instance.
#[derive(Copy, Clone, Debug)]
pub struct FontMetrics {
    /// Point size the typeface is rendered at.
    pub point_size: f32,
    /// Render scale applied on top of the point size (e.g. the device pixel ratio).
    pub scale: f32,
    /// Horizontal scale of the typeface.
    pub scale_x: f32,
    /// Horizontal skew, used for synthetic italics.
    pub skew_x: f32,
    /// Whether glyphs should be synthetically emboldened.
    pub embolden: bool,
}

impl FontMetrics {
    /// Metrics for the given point size with no extra scale, skew or emboldening.
    pub const fn new(point_size: f32) -> Self {
        Self {
            point_size,
            scale: 1.0,
            scale_x: 1.0,
            skew_x: 0.0,
            embolden: false,
        }
    }

    /// Returns these metrics with the given render scale.
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new(12.0)
    }
}

// Float fields compare by bit pattern so that equal metrics always hash equally.
impl PartialEq for FontMetrics {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.point_size.to_bits() == other.point_size.to_bits()
            && self.scale.to_bits() == other.scale.to_bits()
            && self.scale_x.to_bits() == other.scale_x.to_bits()
            && self.skew_x.to_bits() == other.skew_x.to_bits()
            && self.embolden == other.embolden
    }
}

impl Eq for FontMetrics {}

impl Hash for FontMetrics {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.point_size.to_bits().hash(state);
        self.scale.to_bits().hash(state);
        self.scale_x.to_bits().hash(state);
        self.skew_x.to_bits().hash(state);
        self.embolden.hash(state);
    }
}

/// A typeface rendered with a specific set of metrics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    /// The typeface.
    pub id: FontId,
    /// How the typeface is rendered.
    pub metrics: FontMetrics,
}

impl Font {
    /// Creates a new font.
    pub const fn new(id: FontId, metrics: FontMetrics) -> Self {
        Self { id, metrics }
    }
}

/// How a glyph is represented in its font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GlyphType {
    /// The glyph is described by an outline.
    #[default]
    Path,
    /// The glyph is an embedded bitmap.
    Bitmap,
}

/// A glyph of a font.
///
/// Two glyphs are equal when their index and type match. The bounds are derived from the
/// font and only carried along for sizing.
#[derive(Copy, Clone, Debug)]
pub struct Glyph {
    /// Glyph index within the font. This is *not* a Unicode code point.
    pub index: u16,
    /// How the glyph is represented.
    pub glyph_type: GlyphType,
    /// Bounds of the glyph in unscaled units, relative to the glyph origin.
    pub bounds: GlyphBounds,
}

impl Glyph {
    /// Creates an outline glyph.
    pub const fn new(index: u16, bounds: GlyphBounds) -> Self {
        Self {
            index,
            glyph_type: GlyphType::Path,
            bounds,
        }
    }

    /// Creates an embedded bitmap glyph, such as a color emoji.
    pub const fn bitmap(index: u16, bounds: GlyphBounds) -> Self {
        Self {
            index,
            glyph_type: GlyphType::Bitmap,
            bounds,
        }
    }
}

impl PartialEq for Glyph {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.glyph_type == other.glyph_type
    }
}

impl Eq for Glyph {}

// Hash only the identifying fields, NOT bounds
impl Hash for Glyph {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.glyph_type.hash(state);
    }
}

/// A glyph under a particular font: the key of every atlas entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontGlyphPair {
    /// The font the glyph is rendered with.
    pub font: Font,
    /// The glyph.
    pub glyph: Glyph,
}

impl FontGlyphPair {
    /// Pairs a glyph with its font.
    pub const fn new(font: Font, glyph: Glyph) -> Self {
        Self { font, glyph }
    }

    /// Size in pixels the glyph occupies in an atlas, excluding padding.
    #[inline]
    pub fn pixel_size(&self) -> ISize {
        self.glyph.bounds.scaled_pixel_size(self.font.metrics.scale)
    }
}
