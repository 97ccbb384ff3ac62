// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph Atlas builds and maintains a texture atlas of rasterized glyphs, so that a renderer
//! can draw arbitrary text by sampling a single GPU texture.
//!
//! Each frame, [`TextRenderContext::create_glyph_atlas`] is handed the shaped text frames that
//! are about to be drawn. It:
//! - collects the unique [`FontGlyphPair`]s referenced by the frames,
//! - returns the previous atlas untouched when every pair is already present,
//! - otherwise tries to append the missing glyphs to the existing atlas bitmap,
//! - and falls back to rebuilding an atlas sized for the whole glyph set.
//!
//! Glyph outlines are never rasterized by this crate. Drawing is delegated to a
//! [`GlyphRasterizer`], and GPU resources are obtained through a device [`Allocator`].
//!
//! ## Features
//!
//! - `png`: Enables [`GlyphAtlasContext::save_bitmap_to_png`] for inspecting atlas bitmaps.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;

pub mod atlas;
pub mod context;
pub mod device;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod packer;
pub mod raster;
pub mod render_context;
pub mod sdf;
pub mod sizing;
pub mod upload;

pub use atlas::{GlyphAtlas, GlyphAtlasType, ReuseDecision};
pub use config::AtlasConfig;
pub use context::{AtlasBitmap, AtlasStats, AtlasUpdate, GlyphAtlasContext};
pub use device::{
    Allocator, Capabilities, DeviceBuffer, DeviceBufferDescriptor, PixelFormat, StorageMode,
    Texture, TextureDescriptor,
};
pub use error::{AtlasError, AtlasErrorKind};
pub use font::{Font, FontGlyphPair, FontId, FontMetrics, Glyph, GlyphType};
pub use frame::{FontGlyphPairSet, GlyphPosition, TextFrame, TextRun};
pub use geometry::{GlyphBounds, IRect, ISize};
pub use packer::RectPacker;
pub use raster::{AtlasCanvas, GlyphColor, GlyphDrawRequest, GlyphRasterizer};
pub use render_context::TextRenderContext;
