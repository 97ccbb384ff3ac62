// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing glyphs into the atlas bitmap.
//!
//! Outlines are turned into pixels by a [`GlyphRasterizer`] supplied by the caller. This
//! module prepares one [`GlyphDrawRequest`] per glyph and hands the rasterizer an
//! [`AtlasCanvas`] to blend coverage or premultiplied color into.

use bytemuck::{Pod, Zeroable};

use crate::atlas::{GlyphAtlas, GlyphAtlasType};
use crate::config::AtlasConfig;
use crate::context::AtlasBitmap;
use crate::device::{Allocator, PixelFormat};
use crate::error::{AtlasError, AtlasErrorKind};
use crate::font::FontGlyphPair;
use crate::geometry::{IRect, ISize};

/// Paint color glyphs are drawn with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GlyphColor {
    /// Used for color atlases, so that tinting by multiplication works.
    White,
    /// Used for coverage atlases, where only alpha is stored.
    #[default]
    Black,
}

impl GlyphColor {
    /// Color to paint glyphs of an atlas of `atlas_type` with.
    pub const fn for_atlas_type(atlas_type: GlyphAtlasType) -> Self {
        if atlas_type.has_color() {
            Self::White
        } else {
            Self::Black
        }
    }

    const fn channel(self) -> u8 {
        match self {
            Self::White => 0xff,
            Self::Black => 0,
        }
    }
}

/// Everything a rasterizer needs to draw one glyph.
///
/// The canvas is scaled by [`scale`](Self::scale): an outline point `p`, in font units
/// relative to the glyph origin, lands at `(position + origin + p) * scale` in canvas pixels.
/// With that mapping the glyph bounds fill [`location`](Self::location) exactly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphDrawRequest {
    /// The glyph and the font to draw it with.
    pub pair: FontGlyphPair,
    /// Rectangle reserved for the glyph in the atlas, excluding padding.
    pub location: IRect,
    /// Top-left corner of `location`, divided by the scale.
    pub position: [f32; 2],
    /// Offset of the glyph origin from its top-left bound.
    pub origin: [f32; 2],
    /// Scale of the canvas.
    pub scale: f32,
    /// Paint color.
    pub color: GlyphColor,
}

impl GlyphDrawRequest {
    /// Prepares the request for drawing `pair` at `location`.
    pub fn new(pair: FontGlyphPair, location: IRect, color: GlyphColor) -> Self {
        let scale = pair.font.metrics.scale;
        let bounds = pair.glyph.bounds;
        Self {
            pair,
            location,
            position: [location.x as f32 / scale, location.y as f32 / scale],
            origin: [-bounds.left, -bounds.top],
            scale,
            color,
        }
    }

    /// Whether the glyph should be synthetically emboldened.
    #[inline]
    pub fn embolden(&self) -> bool {
        self.pair.font.metrics.embolden
    }
}

/// Draws glyph outlines.
///
/// Glyphs are expected to be drawn antialiased, with slight hinting.
pub trait GlyphRasterizer {
    /// Draws a single glyph into `canvas`.
    fn draw_glyph(&mut self, canvas: &mut AtlasCanvas<'_>, request: &GlyphDrawRequest);
}

/// A premultiplied RGBA8 pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct PremulRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl PremulRgba8 {
    /// Composites `self` over `dst`.
    #[inline]
    fn over(self, dst: Self) -> Self {
        let inv = 255 - self.a;
        Self {
            r: self.r.saturating_add(mul_div_255(dst.r, inv)),
            g: self.g.saturating_add(mul_div_255(dst.g, inv)),
            b: self.b.saturating_add(mul_div_255(dst.b, inv)),
            a: self.a.saturating_add(mul_div_255(dst.a, inv)),
        }
    }
}

#[inline]
fn mul_div_255(a: u8, b: u8) -> u8 {
    let product = u16::from(a) * u16::from(b) + 128;
    ((product + (product >> 8)) >> 8) as u8
}

/// Mutable view of the atlas pixels that glyphs are drawn into.
pub struct AtlasCanvas<'a> {
    pixels: &'a mut [u8],
    size: ISize,
    row_bytes: usize,
    format: PixelFormat,
    color: GlyphColor,
}

impl<'a> AtlasCanvas<'a> {
    /// Wraps `pixels`, whose rows are `row_bytes` apart.
    ///
    /// Returns `None` if `pixels` is too small to hold `size` pixels of `format`.
    pub fn new(
        pixels: &'a mut [u8],
        size: ISize,
        row_bytes: usize,
        format: PixelFormat,
        color: GlyphColor,
    ) -> Option<Self> {
        let tight = size.width as usize * format.bytes_per_pixel();
        if row_bytes < tight {
            return None;
        }
        let required = match size.height {
            0 => 0,
            height => (height as usize - 1) * row_bytes + tight,
        };
        if pixels.len() < required {
            return None;
        }
        Some(Self {
            pixels,
            size,
            row_bytes,
            format,
            color,
        })
    }

    /// Size of the canvas in pixels.
    #[inline]
    pub fn size(&self) -> ISize {
        self.size
    }

    /// Pixel format of the canvas.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Paint color glyphs are drawn with.
    #[inline]
    pub fn color(&self) -> GlyphColor {
        self.color
    }

    fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.row_bytes;
        let len = self.size.width as usize * self.format.bytes_per_pixel();
        &mut self.pixels[start..start + len]
    }

    /// Blends the paint color with `coverage` over the pixel at `(x, y)`.
    ///
    /// Pixels outside the canvas are ignored.
    pub fn blend_coverage(&mut self, x: u32, y: u32, coverage: u8) {
        if x >= self.size.width || y >= self.size.height || coverage == 0 {
            return;
        }
        let channel = mul_div_255(self.color.channel(), coverage);
        let format = self.format;
        let row = self.row_mut(y);
        match format {
            PixelFormat::A8UNormInt => {
                let dst = &mut row[x as usize];
                *dst = coverage.saturating_add(mul_div_255(*dst, 255 - coverage));
            }
            PixelFormat::R8G8B8A8UNormInt => {
                let pixels: &mut [PremulRgba8] = bytemuck::cast_slice_mut(row);
                let src = PremulRgba8 {
                    r: channel,
                    g: channel,
                    b: channel,
                    a: coverage,
                };
                let dst = &mut pixels[x as usize];
                *dst = src.over(*dst);
            }
        }
    }

    /// Composites a premultiplied RGBA pixel over the pixel at `(x, y)`.
    ///
    /// Color channels are clamped to alpha. Coverage canvases only keep the alpha channel.
    /// Pixels outside the canvas are ignored.
    pub fn blend_premul(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        if x >= self.size.width || y >= self.size.height || a == 0 {
            return;
        }
        let format = self.format;
        let row = self.row_mut(y);
        match format {
            PixelFormat::A8UNormInt => {
                let dst = &mut row[x as usize];
                *dst = a.saturating_add(mul_div_255(*dst, 255 - a));
            }
            PixelFormat::R8G8B8A8UNormInt => {
                let pixels: &mut [PremulRgba8] = bytemuck::cast_slice_mut(row);
                let src = PremulRgba8 {
                    r: r.min(a),
                    g: g.min(a),
                    b: b.min(a),
                    a,
                };
                let dst = &mut pixels[x as usize];
                *dst = src.over(*dst);
            }
        }
    }

    /// Blends `coverage` over every pixel of `rect`.
    pub fn fill_rect(&mut self, rect: IRect, coverage: u8) {
        for y in rect.y..rect.bottom().min(self.size.height) {
            for x in rect.x..rect.right().min(self.size.width) {
                self.blend_coverage(x, y, coverage);
            }
        }
    }

    /// Resets every pixel of `rect` to transparent.
    pub fn clear_rect(&mut self, rect: IRect) {
        let bpp = self.format.bytes_per_pixel();
        let x0 = rect.x.min(self.size.width) as usize * bpp;
        let x1 = rect.right().min(self.size.width) as usize * bpp;
        for y in rect.y..rect.bottom().min(self.size.height) {
            self.row_mut(y)[x0..x1].fill(0);
        }
    }
}

impl core::fmt::Debug for AtlasCanvas<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtlasCanvas")
            .field("size", &self.size)
            .field("row_bytes", &self.row_bytes)
            .field("format", &self.format)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Allocates a bitmap of `size` for `atlas` and draws every glyph of the atlas into it.
pub fn create_atlas_bitmap<R: GlyphRasterizer + ?Sized>(
    atlas: &GlyphAtlas,
    allocator: &dyn Allocator,
    size: ISize,
    minimum_alignment: Option<usize>,
    rasterizer: &mut R,
) -> Result<AtlasBitmap, AtlasError> {
    let atlas_type = atlas.atlas_type();
    let format = atlas_type.pixel_format();
    let failed = AtlasErrorKind::BitmapAllocation.at_size(size);
    let mut bitmap = AtlasBitmap::allocate(allocator, format, size, minimum_alignment)
        .ok_or(failed)?;

    let color = GlyphColor::for_atlas_type(atlas_type);
    let mut canvas = bitmap.canvas(color).ok_or(failed)?;
    atlas.iterate_glyphs(|pair, location| {
        rasterizer.draw_glyph(&mut canvas, &GlyphDrawRequest::new(*pair, location, color));
        true
    });
    Ok(bitmap)
}

/// Clears the padded area of `glyphs`, undoing [`update_atlas_bitmap`].
///
/// Free atlas space is always transparent, so this restores the bitmap exactly.
pub fn erase_atlas_glyphs(
    bitmap: &mut AtlasBitmap,
    glyphs: &[(FontGlyphPair, IRect)],
    config: &AtlasConfig,
) {
    let Some(mut canvas) = bitmap.canvas(GlyphColor::Black) else {
        return;
    };
    for &(_, location) in glyphs {
        canvas.clear_rect(location.inflate(config.glyph_padding));
    }
}

/// Draws `glyphs` into an existing bitmap, leaving every other pixel untouched.
///
/// The padded area around each glyph is cleared before it is drawn.
pub fn update_atlas_bitmap<R: GlyphRasterizer + ?Sized>(
    bitmap: &mut AtlasBitmap,
    atlas_type: GlyphAtlasType,
    glyphs: &[(FontGlyphPair, IRect)],
    config: &AtlasConfig,
    rasterizer: &mut R,
) -> Result<(), AtlasError> {
    let failed = AtlasErrorKind::BitmapAllocation.at_size(bitmap.size());
    let color = GlyphColor::for_atlas_type(atlas_type);
    let mut canvas = bitmap.canvas(color).ok_or(failed)?;
    for &(pair, location) in glyphs {
        canvas.clear_rect(location.inflate(config.glyph_padding));
        rasterizer.draw_glyph(&mut canvas, &GlyphDrawRequest::new(pair, location, color));
    }
    Ok(())
}
