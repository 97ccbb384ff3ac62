// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The atlas construction entry point.

use std::sync::Arc;

use crate::atlas::{GlyphAtlas, GlyphAtlasType, ReuseDecision};
use crate::config::AtlasConfig;
use crate::context::GlyphAtlasContext;
use crate::device::{Allocator, Capabilities, compute_minimum_alignment};
use crate::error::{AtlasError, AtlasErrorKind};
use crate::font::FontGlyphPair;
use crate::frame::{FontGlyphPairSet, TextFrame, collect_unique_font_glyph_pairs};
use crate::geometry::IRect;
use crate::raster::{
    GlyphRasterizer, create_atlas_bitmap, erase_atlas_glyphs, update_atlas_bitmap,
};
use crate::sdf::convert_bitmap_to_signed_distance_field;
use crate::sizing::{glyph_rect, optimum_atlas_size, padded_size};
use crate::upload::{update_glyph_texture_atlas, upload_glyph_texture_atlas};

/// Builds glyph atlases for a device.
pub struct TextRenderContext<R> {
    allocator: Option<Arc<dyn Allocator>>,
    rasterizer: R,
    config: AtlasConfig,
}

impl<R: GlyphRasterizer> TextRenderContext<R> {
    /// Creates a render context with the default [`AtlasConfig`].
    ///
    /// A context without allocator is invalid and fails every construction.
    pub fn new(allocator: Option<Arc<dyn Allocator>>, rasterizer: R) -> Self {
        Self::with_config(allocator, rasterizer, AtlasConfig::default())
    }

    /// Creates a render context with an explicit configuration.
    pub fn with_config(
        allocator: Option<Arc<dyn Allocator>>,
        rasterizer: R,
        config: AtlasConfig,
    ) -> Self {
        Self {
            allocator,
            rasterizer,
            config,
        }
    }

    /// Whether atlases can be built with this context.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.allocator.is_some()
    }

    /// The configuration atlases are built with.
    #[inline]
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// The glyph rasterizer.
    #[inline]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// The glyph rasterizer, for changing its state.
    #[inline]
    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    /// Returns an atlas of `atlas_type` holding every glyph referenced by `frames`.
    ///
    /// The latest atlas of `context` is returned as is when no glyph is requested, or when it
    /// already holds every requested glyph. Missing glyphs are drawn into it when they fit.
    /// Otherwise a new atlas sized for the requested glyphs replaces it.
    ///
    /// On failure `context` keeps its previous atlas, and only its failure counter changes.
    pub fn create_glyph_atlas<'c, 'f>(
        &mut self,
        atlas_type: GlyphAtlasType,
        context: &'c mut GlyphAtlasContext,
        capabilities: Capabilities,
        frames: impl IntoIterator<Item = &'f TextFrame>,
    ) -> Result<&'c GlyphAtlas, AtlasError> {
        match self.update_context(atlas_type, context, capabilities, frames) {
            Ok(()) => Ok(context.glyph_atlas()),
            Err(err) => {
                log::warn!("failed to build glyph atlas: {err}");
                context.record_failure();
                Err(err)
            }
        }
    }

    fn update_context<'f>(
        &mut self,
        atlas_type: GlyphAtlasType,
        context: &mut GlyphAtlasContext,
        capabilities: Capabilities,
        frames: impl IntoIterator<Item = &'f TextFrame>,
    ) -> Result<(), AtlasError> {
        let Some(allocator) = self.allocator.clone() else {
            return Err(AtlasErrorKind::InvalidContext.into());
        };

        let pairs = collect_unique_font_glyph_pairs(frames);

        match context.glyph_atlas().reuse_decision(&pairs, atlas_type) {
            ReuseDecision::Unchanged => {
                log::trace!("no glyphs requested, keeping the current atlas");
                context.record_unchanged();
                Ok(())
            }
            ReuseDecision::CacheHit => {
                log::trace!("all {} glyphs are already in the atlas", pairs.len());
                context.record_cache_hit();
                Ok(())
            }
            ReuseDecision::Append(missing) => {
                if self.try_append(atlas_type, context, capabilities, &missing)? {
                    Ok(())
                } else {
                    self.rebuild(atlas_type, context, &*allocator, capabilities, &pairs)
                }
            }
            ReuseDecision::Rebuild => {
                self.rebuild(atlas_type, context, &*allocator, capabilities, &pairs)
            }
        }
    }

    /// Draws `missing` into the current atlas.
    ///
    /// Returns `Ok(false)`, with nothing changed, if the glyphs do not all fit.
    fn try_append(
        &mut self,
        atlas_type: GlyphAtlasType,
        context: &mut GlyphAtlasContext,
        capabilities: Capabilities,
        missing: &[FontGlyphPair],
    ) -> Result<bool, AtlasError> {
        let config = self.config;
        let Some((atlas, rect_packer, bitmap)) = context.append_target() else {
            return Ok(false);
        };

        let sizes: Vec<_> = missing.iter().map(FontGlyphPair::pixel_size).collect();
        let padded = sizes.iter().map(|&size| padded_size(size, &config));
        let Some(placements) = rect_packer.add_rects(padded) else {
            log::debug!(
                "{} new glyphs do not fit in the current atlas, rebuilding",
                missing.len()
            );
            return Ok(false);
        };

        let glyphs: Vec<(FontGlyphPair, IRect)> = missing
            .iter()
            .zip(&sizes)
            .zip(&placements)
            .map(|((&pair, &size), placement)| {
                (pair, glyph_rect(placement.origin, size, &config))
            })
            .collect();

        let drawn = update_atlas_bitmap(
            bitmap,
            atlas_type,
            &glyphs,
            &config,
            &mut self.rasterizer,
        )
        .and_then(|()| match atlas.texture() {
            Some(texture) if !capabilities.supports_shared_device_buffer_texture_memory => {
                update_glyph_texture_atlas(bitmap, &**texture)
            }
            _ => Ok(()),
        });
        if let Err(err) = drawn {
            erase_atlas_glyphs(bitmap, &glyphs, &config);
            rect_packer.remove_rects(placements);
            return Err(err);
        }

        log::debug!("appended {} glyphs to the current atlas", glyphs.len());
        context.commit_append(&glyphs);
        Ok(true)
    }

    /// Builds a new atlas for `pairs` and makes it the current one.
    fn rebuild(
        &mut self,
        atlas_type: GlyphAtlasType,
        context: &mut GlyphAtlasContext,
        allocator: &dyn Allocator,
        capabilities: Capabilities,
        pairs: &FontGlyphPairSet,
    ) -> Result<(), AtlasError> {
        let config = &self.config;
        let format = atlas_type.pixel_format();
        let minimum_alignment = compute_minimum_alignment(allocator, capabilities, format);

        let capacity_exceeded = AtlasErrorKind::CapacityExceeded {
            max_size: config.max_atlas_size,
        };
        let layout = optimum_atlas_size(pairs, config, minimum_alignment)
            .ok_or(capacity_exceeded)?;
        let size = layout.size;
        if layout.glyph_positions.len() != pairs.len() {
            let kind = AtlasErrorKind::PlacementCountMismatch {
                expected: pairs.len(),
                actual: layout.glyph_positions.len(),
            };
            return Err(kind.at_size(size));
        }

        let mut atlas = GlyphAtlas::new(atlas_type);
        for (&pair, &rect) in pairs.iter().zip(&layout.glyph_positions) {
            atlas.add_typeface_glyph_position(pair, rect);
        }

        let mut bitmap = create_atlas_bitmap(
            &atlas,
            allocator,
            size,
            minimum_alignment,
            &mut self.rasterizer,
        )?;

        if atlas_type.is_signed_distance_field() {
            let row_bytes = bitmap.row_bytes();
            convert_bitmap_to_signed_distance_field(
                bitmap.pixels_mut(),
                size.width as usize,
                size.height as usize,
                row_bytes,
                config.sdf_spread,
            );
        }

        let texture = upload_glyph_texture_atlas(allocator, &bitmap, config)?;
        atlas.set_texture(texture);

        log::debug!(
            "built a {}x{} {atlas_type:?} atlas holding {} glyphs",
            size.width,
            size.height,
            pairs.len()
        );
        context.commit_rebuild(atlas, size, layout.rect_packer, bitmap);
        Ok(())
    }
}

impl<R: core::fmt::Debug> core::fmt::Debug for TextRenderContext<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextRenderContext")
            .field("allocator", &self.allocator)
            .field("rasterizer", &self.rasterizer)
            .field("config", &self.config)
            .finish()
    }
}
