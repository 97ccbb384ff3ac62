// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod device;
mod rasterizer;
pub(crate) mod samples;

pub(crate) use device::{DeviceState, MockAllocator};
pub(crate) use rasterizer::{FillRasterizer, PaintRasterizer};

use std::sync::Arc;

use glyph_atlas::{Allocator, AtlasConfig, GlyphRasterizer, IRect, TextRenderContext};

/// A render context over a fresh mock device, together with the device state.
pub(crate) fn render_context(
    minimum_bytes_per_row: usize,
) -> (TextRenderContext<FillRasterizer>, Arc<DeviceState>) {
    render_context_with(minimum_bytes_per_row, FillRasterizer::default())
}

/// Like [`render_context`], drawing glyphs with `rasterizer`.
pub(crate) fn render_context_with<R: GlyphRasterizer>(
    minimum_bytes_per_row: usize,
    rasterizer: R,
) -> (TextRenderContext<R>, Arc<DeviceState>) {
    let allocator = MockAllocator::new(minimum_bytes_per_row);
    let state = allocator.state();
    let allocator: Arc<dyn Allocator> = Arc::new(allocator);
    let context =
        TextRenderContext::with_config(Some(allocator), rasterizer, AtlasConfig::default());
    (context, state)
}

/// Asserts that no two glyph rectangles, padding included, share a pixel.
pub(crate) fn assert_disjoint(rects: &[IRect], padding: u32) {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(
                !a.inflate(padding).intersects(b.inflate(padding)),
                "{a:?} and {b:?} overlap"
            );
        }
    }
}
