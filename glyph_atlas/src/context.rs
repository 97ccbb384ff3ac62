// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State carried between atlas constructions.

use core::fmt;

use crate::atlas::{GlyphAtlas, GlyphAtlasType};
use crate::device::{Allocator, DeviceBuffer, DeviceBufferDescriptor, PixelFormat, StorageMode};
use crate::font::FontGlyphPair;
use crate::geometry::{IRect, ISize};
use crate::packer::RectPacker;
use crate::raster::{AtlasCanvas, GlyphColor};

/// CPU-side pixels of an atlas.
///
/// The pixels live in a host visible device buffer, so that backends able to alias buffers
/// as textures can publish them without a copy.
pub struct AtlasBitmap {
    buffer: Box<dyn DeviceBuffer>,
    format: PixelFormat,
    size: ISize,
    row_bytes: usize,
}

impl AtlasBitmap {
    /// Allocates a cleared bitmap of `size`.
    ///
    /// Rows are padded to a multiple of `minimum_alignment` bytes when one is given.
    pub fn allocate(
        allocator: &dyn Allocator,
        format: PixelFormat,
        size: ISize,
        minimum_alignment: Option<usize>,
    ) -> Option<Self> {
        if size.is_empty() {
            return None;
        }
        let row_bytes = row_bytes_for(format, size.width, minimum_alignment);
        let byte_size =
            (size.height as usize - 1) * row_bytes + size.width as usize * format.bytes_per_pixel();
        let mut buffer = allocator.create_buffer(&DeviceBufferDescriptor {
            storage_mode: StorageMode::HostVisible,
            size: byte_size,
        })?;
        let contents = buffer.contents_mut();
        if contents.len() < byte_size {
            log::warn!(
                "device buffer holds {} bytes, the atlas bitmap needs {byte_size}",
                contents.len()
            );
            return None;
        }
        contents.fill(0);
        Some(Self {
            buffer,
            format,
            size,
            row_bytes,
        })
    }

    /// Size of the bitmap in pixels.
    #[inline]
    pub fn size(&self) -> ISize {
        self.size
    }

    /// Pixel format of the bitmap.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Distance between the starts of two rows, in bytes.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// The raw pixels, rows [`row_bytes`](Self::row_bytes) apart.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.buffer.contents()
    }

    /// The raw pixels, for writing.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.buffer.contents_mut()
    }

    /// The device buffer holding the pixels.
    #[inline]
    pub fn buffer(&self) -> &dyn DeviceBuffer {
        &*self.buffer
    }

    /// A canvas drawing into this bitmap with the given paint color.
    pub fn canvas(&mut self, color: GlyphColor) -> Option<AtlasCanvas<'_>> {
        let (size, row_bytes, format) = (self.size, self.row_bytes, self.format);
        AtlasCanvas::new(self.buffer.contents_mut(), size, row_bytes, format, color)
    }

    /// Copies the pixels into a tightly packed buffer.
    pub fn to_tight_pixels(&self) -> Vec<u8> {
        let tight = self.size.width as usize * self.format.bytes_per_pixel();
        let pixels = self.pixels();
        (0..self.size.height as usize)
            .flat_map(|y| &pixels[y * self.row_bytes..y * self.row_bytes + tight])
            .copied()
            .collect()
    }
}

impl fmt::Debug for AtlasBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlasBitmap")
            .field("format", &self.format)
            .field("size", &self.size)
            .field("row_bytes", &self.row_bytes)
            .finish_non_exhaustive()
    }
}

/// Row pitch of a bitmap `width` pixels wide.
pub fn row_bytes_for(format: PixelFormat, width: u32, minimum_alignment: Option<usize>) -> usize {
    let tight = width as usize * format.bytes_per_pixel();
    match minimum_alignment {
        Some(alignment) if alignment > 1 => tight.next_multiple_of(alignment),
        _ => tight,
    }
}

/// Counters of construction outcomes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AtlasStats {
    /// Requests fully served by the existing atlas.
    pub cache_hits: u64,
    /// Requests served by appending glyphs to the existing atlas.
    pub appends: u64,
    /// Requests that built a new atlas.
    pub rebuilds: u64,
    /// Requests that failed.
    pub failures: u64,
}

/// What the latest successful construction did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AtlasUpdate {
    /// Nothing was requested, or nothing has been built yet.
    #[default]
    Unchanged,
    /// Every glyph was already present.
    CacheHit,
    /// Glyphs were drawn into the existing atlas.
    Appended {
        /// Number of glyphs added.
        glyphs: usize,
    },
    /// A new atlas was built.
    Rebuilt {
        /// Size of the new atlas.
        size: ISize,
        /// Number of glyphs in the new atlas.
        glyphs: usize,
    },
}

/// Everything carried from one atlas construction to the next.
///
/// A context starts with an empty alpha atlas. It is only ever modified by successful
/// constructions; a failed one leaves the atlas, bitmap and packer untouched.
pub struct GlyphAtlasContext {
    atlas: GlyphAtlas,
    atlas_size: ISize,
    rect_packer: Option<RectPacker>,
    bitmap: Option<AtlasBitmap>,
    stats: AtlasStats,
    last_update: AtlasUpdate,
}

impl GlyphAtlasContext {
    /// Creates a context holding an empty atlas.
    pub fn new() -> Self {
        Self {
            atlas: GlyphAtlas::new(GlyphAtlasType::AlphaBitmap),
            atlas_size: ISize::ZERO,
            rect_packer: None,
            bitmap: None,
            stats: AtlasStats::default(),
            last_update: AtlasUpdate::Unchanged,
        }
    }

    /// The latest atlas.
    #[inline]
    pub fn glyph_atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Size of the latest atlas, or zero if none was built yet.
    #[inline]
    pub fn atlas_size(&self) -> ISize {
        self.atlas_size
    }

    /// The packer holding the placements of the latest atlas.
    #[inline]
    pub fn rect_packer(&self) -> Option<&RectPacker> {
        self.rect_packer.as_ref()
    }

    /// CPU-side pixels of the latest atlas.
    #[inline]
    pub fn bitmap(&self) -> Option<&AtlasBitmap> {
        self.bitmap.as_ref()
    }

    /// Outcome counters.
    #[inline]
    pub fn stats(&self) -> AtlasStats {
        self.stats
    }

    /// What the latest successful construction did.
    #[inline]
    pub fn last_update(&self) -> AtlasUpdate {
        self.last_update
    }

    /// Resets the outcome counters.
    pub fn reset_stats(&mut self) {
        self.stats = AtlasStats::default();
    }

    /// The parts an append writes to, if the latest atlas can take more glyphs.
    pub(crate) fn append_target(
        &mut self,
    ) -> Option<(&GlyphAtlas, &mut RectPacker, &mut AtlasBitmap)> {
        if self.atlas_size.is_empty() || self.atlas.texture().is_none() {
            return None;
        }
        Some((
            &self.atlas,
            self.rect_packer.as_mut()?,
            self.bitmap.as_mut()?,
        ))
    }

    pub(crate) fn record_unchanged(&mut self) {
        self.last_update = AtlasUpdate::Unchanged;
    }

    pub(crate) fn record_cache_hit(&mut self) {
        self.stats.cache_hits += 1;
        self.last_update = AtlasUpdate::CacheHit;
    }

    /// Records the glyphs placed and drawn by an append.
    pub(crate) fn commit_append(&mut self, glyphs: &[(FontGlyphPair, IRect)]) {
        for &(pair, rect) in glyphs {
            self.atlas.add_typeface_glyph_position(pair, rect);
        }
        self.stats.appends += 1;
        self.last_update = AtlasUpdate::Appended {
            glyphs: glyphs.len(),
        };
    }

    /// Replaces the latest atlas with a freshly built one.
    pub(crate) fn commit_rebuild(
        &mut self,
        atlas: GlyphAtlas,
        size: ISize,
        rect_packer: RectPacker,
        bitmap: AtlasBitmap,
    ) {
        let glyphs = atlas.glyph_count();
        self.atlas = atlas;
        self.atlas_size = size;
        self.rect_packer = Some(rect_packer);
        self.bitmap = Some(bitmap);
        self.stats.rebuilds += 1;
        self.last_update = AtlasUpdate::Rebuilt { size, glyphs };
    }

    pub(crate) fn record_failure(&mut self) {
        self.stats.failures += 1;
    }

    /// Writes the CPU-side bitmap of the latest atlas to a PNG file.
    ///
    /// Alpha atlases are written as grayscale images, color atlases as RGBA. Nothing is
    /// written if no atlas has been built yet.
    #[cfg(feature = "png")]
    pub fn save_bitmap_to_png(&self, path: &std::path::Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::BufWriter;

        let Some(bitmap) = &self.bitmap else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no atlas bitmap has been built",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let w = BufWriter::new(file);

        let size = bitmap.size();
        let mut encoder = png::Encoder::new(w, size.width, size.height);
        encoder.set_color(match bitmap.format() {
            PixelFormat::A8UNormInt => png::ColorType::Grayscale,
            PixelFormat::R8G8B8A8UNormInt => png::ColorType::Rgba,
        });
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
        writer
            .write_image_data(&bitmap.to_tight_pixels())
            .map_err(std::io::Error::other)?;

        Ok(())
    }
}

impl Default for GlyphAtlasContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GlyphAtlasContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphAtlasContext")
            .field("atlas", &self.atlas)
            .field("atlas_size", &self.atlas_size)
            .field("rect_packer", &self.rect_packer)
            .field("bitmap", &self.bitmap)
            .field("stats", &self.stats)
            .field("last_update", &self.last_update)
            .finish()
    }
}
