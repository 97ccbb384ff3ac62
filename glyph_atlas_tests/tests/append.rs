// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adding glyphs to an existing atlas.

use std::sync::Arc;

use glyph_atlas::{
    AtlasErrorKind, AtlasUpdate, Capabilities, FontGlyphPair, GlyphAtlasContext, GlyphAtlasType,
    IRect, ISize,
};

use crate::util::samples::{font, frame, square_glyphs};
use crate::util::{assert_disjoint, render_context};

fn placements(context: &GlyphAtlasContext) -> Vec<(FontGlyphPair, IRect)> {
    let mut placements = Vec::new();
    context.glyph_atlas().iterate_glyphs(|pair, rect| {
        placements.push((*pair, rect));
        true
    });
    placements
}

#[test]
fn append_keeps_existing_rectangles() {
    let (mut render, device) = render_context(0);
    let mut context = GlyphAtlasContext::new();
    let capabilities = Capabilities::shared_memory();
    let first = square_glyphs(font(1), 1, 3, 10.0);
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&first],
        )
        .unwrap();
    let before = placements(&context);
    let texture = context.glyph_atlas().texture().unwrap().clone();

    let second = square_glyphs(font(1), 3, 3, 10.0);
    let atlas = render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&first, &second],
        )
        .unwrap();
    assert_eq!(atlas.glyph_count(), 5);
    assert!(Arc::ptr_eq(atlas.texture().unwrap(), &texture));
    for (pair, rect) in &before {
        assert_eq!(atlas.find_font_glyph_bounds(pair), Some(*rect));
    }

    let after = placements(&context);
    let rects: Vec<IRect> = after.iter().map(|&(_, rect)| rect).collect();
    assert_disjoint(&rects, 2);
    for rect in &rects {
        assert!(
            rect.inflate(2).fits_within(context.atlas_size()),
            "{rect:?} escapes the atlas"
        );
    }

    assert_eq!(context.last_update(), AtlasUpdate::Appended { glyphs: 2 });
    assert_eq!(context.atlas_size(), ISize::square(256));
    assert_eq!(context.rect_packer().unwrap().len(), 5);
    assert_eq!(context.stats().appends, 1);
    // Only the new glyphs are drawn.
    assert_eq!(render.rasterizer().draw_count(), 5);
    assert_eq!(device.buffers_created.get(), 1);
    // Shared memory needs no upload.
    assert_eq!(device.uploads.get(), 0);
}

#[test]
fn append_draws_into_existing_bitmap() {
    let (mut render, _device) = render_context(0);
    let mut context = GlyphAtlasContext::new();
    let capabilities = Capabilities::shared_memory();
    let f = font(1);
    let first = frame(f, &[(1, 5.0, 5.0)]);
    let second = frame(f, &[(2, 7.0, 3.0)]);
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&first],
        )
        .unwrap();
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&first, &second],
        )
        .unwrap();

    let bitmap = context.bitmap().unwrap();
    let painted = bitmap.pixels().iter().filter(|&&p| p == 255).count();
    assert_eq!(painted, 5 * 5 + 7 * 3);
}

#[test]
fn append_reuploads_without_shared_memory() {
    let (mut render, device) = render_context(0);
    let mut context = GlyphAtlasContext::new();
    let capabilities = Capabilities::copy_on_upload();
    let first = square_glyphs(font(1), 1, 2, 10.0);
    let second = square_glyphs(font(1), 3, 2, 10.0);
    let third = square_glyphs(font(1), 5, 1, 10.0);

    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&first],
        )
        .unwrap();
    assert_eq!(device.uploads.get(), 0);

    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&second],
        )
        .unwrap();
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&third],
        )
        .unwrap();
    assert_eq!(context.stats().appends, 2);
    assert_eq!(device.uploads.get(), 2);
    assert_eq!(device.textures_created.get(), 1);
    assert_eq!(context.glyph_atlas().glyph_count(), 5);
}

#[test]
fn append_upload_failure_leaves_context_unchanged() {
    let (mut render, device) = render_context(0);
    let mut context = GlyphAtlasContext::new();
    let capabilities = Capabilities::copy_on_upload();
    let first = square_glyphs(font(1), 1, 2, 10.0);
    let second = square_glyphs(font(1), 3, 2, 10.0);
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&first],
        )
        .unwrap();
    let before = placements(&context);
    let pixels = context.bitmap().unwrap().pixels().to_vec();

    device.fail_uploads.set(true);
    let err = render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&second],
        )
        .unwrap_err();
    assert_eq!(err.kind(), AtlasErrorKind::TextureUpdate);
    assert_eq!(err.atlas_size(), Some(ISize::square(256)));
    assert_eq!(context.glyph_atlas().glyph_count(), 2);
    assert_eq!(context.rect_packer().unwrap().len(), 2);
    assert_eq!(context.stats().failures, 1);
    assert_eq!(
        context.last_update(),
        AtlasUpdate::Rebuilt {
            size: ISize::square(256),
            glyphs: 2
        }
    );
    for (pair, rect) in &before {
        let bounds = context.glyph_atlas().find_font_glyph_bounds(pair);
        assert_eq!(bounds, Some(*rect));
    }
    // The glyphs drawn before the upload failed are erased again.
    let changed = context
        .bitmap()
        .unwrap()
        .pixels()
        .iter()
        .zip(&pixels)
        .filter(|(now, then)| now != then)
        .count();
    assert_eq!(changed, 0, "a failed append must not change the bitmap");

    device.fail_uploads.set(false);
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&second],
        )
        .unwrap();
    assert_eq!(context.last_update(), AtlasUpdate::Appended { glyphs: 2 });
    assert_eq!(context.glyph_atlas().glyph_count(), 4);
    let rects: Vec<IRect> = placements(&context).iter().map(|&(_, rect)| rect).collect();
    assert_disjoint(&rects, 2);
}

#[test]
fn append_overflow_rebuilds_larger_atlas() {
    let (mut render, device) = render_context(0);
    let mut context = GlyphAtlasContext::new();
    let capabilities = Capabilities::shared_memory();
    let small = square_glyphs(font(1), 1, 3, 10.0);
    let large = square_glyphs(font(1), 100, 1, 300.0);
    render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&small],
        )
        .unwrap();
    let texture = context.glyph_atlas().texture().unwrap().clone();

    let atlas = render
        .create_glyph_atlas(
            GlyphAtlasType::AlphaBitmap,
            &mut context,
            capabilities,
            [&small, &large],
        )
        .unwrap();
    assert_eq!(atlas.glyph_count(), 4);
    assert!(!Arc::ptr_eq(atlas.texture().unwrap(), &texture));
    assert_eq!(context.atlas_size(), ISize::square(512));
    assert_eq!(
        context.last_update(),
        AtlasUpdate::Rebuilt {
            size: ISize::square(512),
            glyphs: 4
        }
    );
    assert_eq!(context.rect_packer().unwrap().len(), 4);
    // Everything is drawn again into the new bitmap.
    assert_eq!(render.rasterizer().draw_count(), 3 + 4);
    assert_eq!(device.buffers_created.get(), 2);
}
