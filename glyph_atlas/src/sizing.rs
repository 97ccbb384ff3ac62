// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing the size of a freshly built atlas.
//!
//! Sizing starts from the configured minimum and packs the whole glyph set into a trial
//! canvas. When only a few glyphs overflow, a single axis is grown; when most of them do,
//! both axes are. Sizing gives up once either side would exceed the configured maximum.

use crate::config::AtlasConfig;
use crate::font::FontGlyphPair;
use crate::geometry::{IRect, ISize};
use crate::packer::RectPacker;

/// Outcome of a successful sizing pass.
#[derive(Debug)]
pub struct AtlasLayout {
    /// Size of the canvas every glyph fits in.
    pub size: ISize,
    /// Glyph rectangles, excluding padding, in the iteration order of the input pairs.
    pub glyph_positions: Vec<IRect>,
    /// Packer holding every placement, ready to accept further glyphs.
    pub rect_packer: RectPacker,
}

/// Packs `pairs` into `rect_packer`, in iteration order.
///
/// On success every glyph rectangle is written to `glyph_positions` and `0` is returned.
/// Packing stops at the first glyph that does not fit, in which case the number of glyphs
/// left unplaced (that glyph included) is returned.
pub fn pairs_fit_in_atlas_of_size<'a>(
    pairs: impl ExactSizeIterator<Item = &'a FontGlyphPair>,
    config: &AtlasConfig,
    glyph_positions: &mut Vec<IRect>,
    rect_packer: &mut RectPacker,
) -> usize {
    let total = pairs.len();
    glyph_positions.clear();
    glyph_positions.reserve(total);

    for (i, pair) in pairs.enumerate() {
        match place_glyph(pair, config, rect_packer) {
            Some(rect) => glyph_positions.push(rect),
            None => return total - i,
        }
    }
    0
}

/// Places a single glyph, returning its rectangle without padding.
pub(crate) fn place_glyph(
    pair: &FontGlyphPair,
    config: &AtlasConfig,
    rect_packer: &mut RectPacker,
) -> Option<IRect> {
    let glyph_size = pair.pixel_size();
    let padded = padded_size(glyph_size, config);
    let placement = rect_packer.add_rect(padded)?;
    Some(glyph_rect(placement.origin, glyph_size, config))
}

/// Size reserved in the packer for a glyph of `glyph_size`.
#[inline]
pub(crate) fn padded_size(glyph_size: ISize, config: &AtlasConfig) -> ISize {
    let padding = config.padding_per_axis();
    ISize::new(
        glyph_size.width.saturating_add(padding),
        glyph_size.height.saturating_add(padding),
    )
}

/// Glyph rectangle inside a padded placement whose top-left corner is `origin`.
#[inline]
pub(crate) fn glyph_rect(origin: [u32; 2], glyph_size: ISize, config: &AtlasConfig) -> IRect {
    IRect::from_xywh(
        origin[0] + config.glyph_padding,
        origin[1] + config.glyph_padding,
        glyph_size.width,
        glyph_size.height,
    )
}

/// Size the first trial packing starts from.
///
/// Devices with a larger minimum row alignment than the configured minimum size raise it.
pub fn initial_atlas_size(config: &AtlasConfig, minimum_alignment: Option<usize>) -> ISize {
    let alignment = minimum_alignment
        .and_then(|alignment| u32::try_from(alignment).ok())
        .unwrap_or(0);
    ISize::square(config.min_atlas_size.max(alignment))
}

/// Finds the size of an atlas that holds every pair of `pairs`.
///
/// Returns `None` when no size within `config.max_atlas_size` fits the glyphs.
pub fn optimum_atlas_size<'a, I>(
    pairs: I,
    config: &AtlasConfig,
    minimum_alignment: Option<usize>,
) -> Option<AtlasLayout>
where
    I: IntoIterator<Item = &'a FontGlyphPair>,
    I::IntoIter: ExactSizeIterator + Clone,
{
    let pairs = pairs.into_iter();
    let total_pairs = pairs.len();
    let mut glyph_positions = Vec::with_capacity(total_pairs);
    let mut current_size = initial_atlas_size(config, minimum_alignment);

    loop {
        let mut rect_packer = RectPacker::new(current_size)?;
        let remaining = pairs_fit_in_atlas_of_size(
            pairs.clone(),
            config,
            &mut glyph_positions,
            &mut rect_packer,
        );
        if remaining == 0 {
            log::debug!(
                "packed {total_pairs} glyphs into a {}x{} atlas",
                current_size.width,
                current_size.height
            );
            return Some(AtlasLayout {
                size: current_size,
                glyph_positions,
                rect_packer,
            });
        }

        current_size = next_trial_size(current_size, remaining, total_pairs);
        log::trace!(
            "{remaining} of {total_pairs} glyphs did not fit, trying {}x{}",
            current_size.width,
            current_size.height
        );
        if current_size.max_dimension() > config.max_atlas_size {
            return None;
        }
    }
}

/// Size to try after `remaining` of `total` glyphs failed to fit in `current`.
pub fn next_trial_size(current: ISize, remaining: usize, total: usize) -> ISize {
    // Fewer than half of the glyphs overflowed.
    if remaining < total.div_ceil(2) {
        current.grow_one_axis()
    } else {
        current.grow_both_axes()
    }
}
