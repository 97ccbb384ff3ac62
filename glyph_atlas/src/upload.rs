// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Publishing atlas bitmaps as GPU textures.

use std::sync::Arc;

use crate::config::AtlasConfig;
use crate::context::AtlasBitmap;
use crate::device::{Allocator, Texture, TextureDescriptor};
use crate::error::{AtlasError, AtlasErrorKind};

/// Creates a texture that reads its pixels from the device buffer backing `bitmap`.
///
/// The texture aliases the buffer linearly, so the bitmap rows must be tightly packed: a row
/// pitch padded for alignment fails with [`AtlasErrorKind::FormatIncompatible`], and the
/// caller has to blit into a new texture instead.
pub fn upload_glyph_texture_atlas(
    allocator: &dyn Allocator,
    bitmap: &AtlasBitmap,
    config: &AtlasConfig,
) -> Result<Arc<dyn Texture>, AtlasError> {
    let size = bitmap.size();
    let descriptor = TextureDescriptor::new(bitmap.format(), size);

    if bitmap.row_bytes() * size.height as usize != descriptor.byte_size_of_base_mip_level() {
        log::warn!(
            "atlas rows are {} bytes apart, a linear texture needs {}",
            bitmap.row_bytes(),
            descriptor.bytes_per_row()
        );
        return Err(AtlasErrorKind::FormatIncompatible.at_size(size));
    }

    let texture = bitmap
        .buffer()
        .as_texture(allocator, &descriptor, descriptor.bytes_per_row())
        .filter(|texture| texture.is_valid())
        .ok_or(AtlasErrorKind::TextureAllocation.at_size(size))?;
    texture.set_label(config.texture_label);
    Ok(texture)
}

/// Re-uploads the whole base mip level of `texture` from `bitmap`.
///
/// Only needed on backends whose textures do not share memory with device buffers.
pub fn update_glyph_texture_atlas(
    bitmap: &AtlasBitmap,
    texture: &dyn Texture,
) -> Result<(), AtlasError> {
    let failed = AtlasErrorKind::TextureUpdate.at_size(bitmap.size());
    let len = texture.descriptor().byte_size_of_base_mip_level();
    let contents = bitmap.pixels().get(..len).ok_or(failed)?;
    if texture.set_contents(contents) {
        Ok(())
    } else {
        Err(failed)
    }
}
