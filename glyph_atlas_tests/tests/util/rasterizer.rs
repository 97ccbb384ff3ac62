// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glyph_atlas::{AtlasCanvas, GlyphDrawRequest, GlyphRasterizer, GlyphType};

/// Paints the whole rectangle of every glyph with full coverage.
#[derive(Debug, Default)]
pub(crate) struct FillRasterizer {
    pub(crate) requests: Vec<GlyphDrawRequest>,
}

impl FillRasterizer {
    pub(crate) fn draw_count(&self) -> usize {
        self.requests.len()
    }
}

impl GlyphRasterizer for FillRasterizer {
    fn draw_glyph(&mut self, canvas: &mut AtlasCanvas<'_>, request: &GlyphDrawRequest) {
        canvas.fill_rect(request.location, 255);
        self.requests.push(*request);
    }
}

/// Paints bitmap glyphs with their own premultiplied color, and outlines with coverage.
#[derive(Debug)]
pub(crate) struct PaintRasterizer {
    pub(crate) bitmap_color: [u8; 4],
}

impl GlyphRasterizer for PaintRasterizer {
    fn draw_glyph(&mut self, canvas: &mut AtlasCanvas<'_>, request: &GlyphDrawRequest) {
        let location = request.location;
        if request.pair.glyph.glyph_type != GlyphType::Bitmap {
            canvas.fill_rect(location, 255);
            return;
        }
        for y in location.y..location.bottom() {
            for x in location.x..location.right() {
                canvas.blend_premul(x, y, self.bitmap_color);
            }
        }
    }
}
