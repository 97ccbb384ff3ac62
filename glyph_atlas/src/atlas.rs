// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The glyph atlas: where every glyph lives in the atlas texture.

use core::fmt::{Debug, Formatter};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::device::{PixelFormat, Texture};
use crate::font::FontGlyphPair;
use crate::geometry::IRect;

/// The kind of pixels stored in an atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GlyphAtlasType {
    /// Glyph coverage, one byte per pixel.
    #[default]
    AlphaBitmap,
    /// Signed distance to the glyph edge, one byte per pixel.
    SignedDistanceField,
    /// Premultiplied color glyphs, four bytes per pixel.
    ColorBitmap,
}

impl GlyphAtlasType {
    /// Pixel format of atlases of this type.
    #[inline]
    pub const fn pixel_format(self) -> PixelFormat {
        match self {
            Self::AlphaBitmap | Self::SignedDistanceField => PixelFormat::A8UNormInt,
            Self::ColorBitmap => PixelFormat::R8G8B8A8UNormInt,
        }
    }

    /// Whether glyphs are drawn in color.
    #[inline]
    pub const fn has_color(self) -> bool {
        matches!(self, Self::ColorBitmap)
    }

    /// Whether the bitmap is converted to a signed distance field once drawn.
    #[inline]
    pub const fn is_signed_distance_field(self) -> bool {
        matches!(self, Self::SignedDistanceField)
    }
}

/// How an existing atlas can serve a new set of glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReuseDecision {
    /// No glyph was requested; the atlas is returned as is.
    Unchanged,
    /// Every requested glyph is already present.
    CacheHit,
    /// The listed glyphs are missing and may be appended to the atlas.
    Append(Vec<FontGlyphPair>),
    /// A new atlas has to be built.
    Rebuild,
}

/// Placement of every glyph inside an atlas texture.
///
/// Glyph rectangles never move once recorded: an atlas only ever gains glyphs, and a
/// rebuild produces a new atlas instead of rearranging this one.
pub struct GlyphAtlas {
    atlas_type: GlyphAtlasType,
    positions: HashMap<FontGlyphPair, IRect>,
    texture: Option<Arc<dyn Texture>>,
}

impl GlyphAtlas {
    /// Creates an empty atlas.
    pub fn new(atlas_type: GlyphAtlasType) -> Self {
        Self {
            atlas_type,
            positions: HashMap::new(),
            texture: None,
        }
    }

    /// The type of this atlas.
    #[inline]
    pub fn atlas_type(&self) -> GlyphAtlasType {
        self.atlas_type
    }

    /// The texture the atlas was published to, if any.
    #[inline]
    pub fn texture(&self) -> Option<&Arc<dyn Texture>> {
        self.texture.as_ref()
    }

    pub(crate) fn set_texture(&mut self, texture: Arc<dyn Texture>) {
        self.texture = Some(texture);
    }

    /// Records where a glyph was placed.
    ///
    /// A glyph that is already present keeps its original rectangle.
    pub(crate) fn add_typeface_glyph_position(&mut self, pair: FontGlyphPair, rect: IRect) {
        self.positions.entry(pair).or_insert(rect);
    }

    /// Rectangle of `pair` inside the atlas, excluding padding.
    #[inline]
    pub fn find_font_glyph_bounds(&self, pair: &FontGlyphPair) -> Option<IRect> {
        self.positions.get(pair).copied()
    }

    /// Number of glyphs in the atlas.
    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the atlas holds no glyph.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calls `visit` for every glyph until it returns `false`.
    ///
    /// Returns the number of glyphs visited.
    pub fn iterate_glyphs(&self, mut visit: impl FnMut(&FontGlyphPair, IRect) -> bool) -> usize {
        let mut count = 0;
        for (pair, &rect) in &self.positions {
            count += 1;
            if !visit(pair, rect) {
                break;
            }
        }
        count
    }

    /// Decides how this atlas can serve `required` glyphs for an atlas of `atlas_type`.
    ///
    /// Signed distance field atlases never take the append path: the distance transform runs
    /// over the whole bitmap, so new glyphs always trigger a rebuild.
    pub fn reuse_decision<'a>(
        &self,
        required: impl IntoIterator<Item = &'a FontGlyphPair>,
        atlas_type: GlyphAtlasType,
    ) -> ReuseDecision {
        let mut required = required.into_iter().peekable();
        if required.peek().is_none() {
            return ReuseDecision::Unchanged;
        }

        let missing: Vec<FontGlyphPair> = required
            .filter(|pair| !self.positions.contains_key(*pair))
            .copied()
            .collect();

        if self.atlas_type != atlas_type {
            return ReuseDecision::Rebuild;
        }
        if missing.is_empty() {
            ReuseDecision::CacheHit
        } else if atlas_type.is_signed_distance_field() {
            ReuseDecision::Rebuild
        } else {
            ReuseDecision::Append(missing)
        }
    }
}

impl Debug for GlyphAtlas {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphAtlas")
            .field("atlas_type", &self.atlas_type)
            .field("glyph_count", &self.positions.len())
            .field("texture", &self.texture)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Font, FontId, FontMetrics, Glyph};
    use crate::geometry::GlyphBounds;

    fn pair(index: u16) -> FontGlyphPair {
        FontGlyphPair::new(
            Font::new(FontId(7), FontMetrics::new(14.0)),
            Glyph::new(index, GlyphBounds::from_ltwh(0.0, 0.0, 6.0, 9.0)),
        )
    }

    fn atlas_with(atlas_type: GlyphAtlasType, indices: &[u16]) -> GlyphAtlas {
        let mut atlas = GlyphAtlas::new(atlas_type);
        for (i, &index) in indices.iter().enumerate() {
            let x = u32::try_from(i).unwrap() * 16;
            atlas.add_typeface_glyph_position(pair(index), IRect::from_xywh(x, 0, 6, 9));
        }
        atlas
    }

    #[test]
    fn empty_request_is_unchanged() {
        let atlas = atlas_with(GlyphAtlasType::ColorBitmap, &[1]);
        let decision = atlas.reuse_decision(&[], GlyphAtlasType::AlphaBitmap);
        assert_eq!(decision, ReuseDecision::Unchanged);
    }

    #[test]
    fn all_present_is_cache_hit() {
        let atlas = atlas_with(GlyphAtlasType::AlphaBitmap, &[1, 2, 3]);
        let decision = atlas.reuse_decision(&[pair(3), pair(1)], GlyphAtlasType::AlphaBitmap);
        assert_eq!(decision, ReuseDecision::CacheHit);
    }

    #[test]
    fn missing_glyphs_are_appended_in_request_order() {
        let atlas = atlas_with(GlyphAtlasType::AlphaBitmap, &[1]);
        let required = [pair(4), pair(1), pair(2)];
        let decision = atlas.reuse_decision(&required, GlyphAtlasType::AlphaBitmap);
        assert_eq!(decision, ReuseDecision::Append(vec![pair(4), pair(2)]));
    }

    #[test]
    fn type_mismatch_rebuilds() {
        let atlas = atlas_with(GlyphAtlasType::AlphaBitmap, &[1]);
        let decision = atlas.reuse_decision(&[pair(1)], GlyphAtlasType::ColorBitmap);
        assert_eq!(decision, ReuseDecision::Rebuild);
    }

    #[test]
    fn sdf_misses_rebuild() {
        let atlas = atlas_with(GlyphAtlasType::SignedDistanceField, &[1]);
        assert_eq!(
            atlas.reuse_decision(&[pair(1)], GlyphAtlasType::SignedDistanceField),
            ReuseDecision::CacheHit
        );
        assert_eq!(
            atlas.reuse_decision(&[pair(1), pair(2)], GlyphAtlasType::SignedDistanceField),
            ReuseDecision::Rebuild
        );
    }

    #[test]
    fn positions_are_stable() {
        let mut atlas = atlas_with(GlyphAtlasType::AlphaBitmap, &[1]);
        let before = atlas.find_font_glyph_bounds(&pair(1)).unwrap();
        atlas.add_typeface_glyph_position(pair(1), IRect::from_xywh(100, 100, 6, 9));
        assert_eq!(atlas.find_font_glyph_bounds(&pair(1)), Some(before));
        assert_eq!(atlas.glyph_count(), 1);
    }

    #[test]
    fn iteration_stops_early() {
        let atlas = atlas_with(GlyphAtlasType::AlphaBitmap, &[1, 2, 3, 4]);
        assert_eq!(atlas.iterate_glyphs(|_, _| true), 4);
        assert_eq!(atlas.iterate_glyphs(|_, _| false), 1);
    }
}
