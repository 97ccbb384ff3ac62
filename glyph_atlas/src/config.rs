// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas construction settings.

/// Settings controlling how glyph atlases are sized, padded and post-processed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasConfig {
    /// Side length every atlas starts from.
    ///
    /// This must stay at or above the minimum row alignment required for linear textures,
    /// which is 256 bytes on some older GPUs. A larger alignment reported by the device
    /// raises the starting size further.
    pub min_atlas_size: u32,
    /// Largest side length an atlas may grow to.
    pub max_atlas_size: u32,
    /// Pixels reserved on every side of each glyph to keep bilinear filtering from
    /// sampling its neighbours.
    pub glyph_padding: u32,
    /// Distance, in pixels, at which the signed distance field saturates.
    pub sdf_spread: f32,
    /// Debug label attached to published atlas textures.
    pub texture_label: &'static str,
}

impl AtlasConfig {
    /// Padding reserved per axis, i.e. on both sides.
    #[inline]
    pub const fn padding_per_axis(&self) -> u32 {
        self.glyph_padding * 2
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            min_atlas_size: 256,
            max_atlas_size: 4096,
            glyph_padding: 2,
            sdf_spread: 13.5,
            texture_label: "GlyphAtlas",
        }
    }
}
