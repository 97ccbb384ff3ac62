// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of coverage bitmaps to signed distance fields.
//!
//! This uses the "dead reckoning" signed distance transform (Grevera 2004): boundary pixels
//! are seeded with a distance of zero, and two raster passes propagate the nearest boundary
//! point to every other pixel.

use core::f32::consts::SQRT_2;

/// Coverage above this value counts as inside the glyph.
const INSIDE_THRESHOLD: u8 = 0x7f;

/// Per pixel distance to, and location of, the nearest boundary point.
struct DistanceMaps {
    width: usize,
    distance: Vec<f32>,
    nearest: Vec<[usize; 2]>,
}

impl DistanceMaps {
    fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        let max_distance = (width as f32).hypot(height as f32);
        Self {
            width,
            distance: vec![max_distance; len],
            nearest: vec![[0, 0]; len],
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    fn distance(&self, x: usize, y: usize) -> f32 {
        self.distance[self.index(x, y)]
    }

    fn mark_boundary(&mut self, x: usize, y: usize) {
        let i = self.index(x, y);
        self.distance[i] = 0.0;
        self.nearest[i] = [x, y];
    }

    /// Adopts the nearest boundary point of neighbour `(nx, ny)` if reaching it through that
    /// neighbour, `step` away, is shorter.
    #[inline]
    fn relax(&mut self, x: usize, y: usize, nx: usize, ny: usize, step: f32) {
        let i = self.index(x, y);
        let n = self.index(nx, ny);
        if self.distance[n] + step < self.distance[i] {
            let nearest = self.nearest[n];
            self.nearest[i] = nearest;
            self.distance[i] = (x.abs_diff(nearest[0]) as f32).hypot(y.abs_diff(nearest[1]) as f32);
        }
    }
}

/// Stride aware view of a single channel bitmap.
struct Coverage<'a> {
    pixels: &'a [u8],
    row_bytes: usize,
}

impl Coverage<'_> {
    #[inline]
    fn inside(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.row_bytes + x] > INSIDE_THRESHOLD
    }
}

/// Maps a signed distance to a byte, saturating at `spread` pixels on either side.
///
/// The glyph edge maps to 127, fully inside to 255 and fully outside to 0.
#[inline]
pub fn quantize_distance(distance: f32, spread: f32) -> u8 {
    let clamped = distance.clamp(-spread, spread);
    let scaled = clamped / spread;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the value is within 0..=255 after clamping."
    )]
    let quantized = ((scaled + 1.0) / 2.0 * 255.0) as u8;
    quantized
}

/// Replaces the coverage in `pixels` with a signed distance field, in place.
///
/// `pixels` holds one byte per pixel, with rows `row_bytes` apart. Values above 127 are
/// inside the glyph. Distances are positive inside, negative outside, and saturate at
/// `spread` pixels.
pub fn convert_bitmap_to_signed_distance_field(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    row_bytes: usize,
    spread: f32,
) {
    if width == 0 || height == 0 || row_bytes < width {
        return;
    }
    if pixels.len() < (height - 1) * row_bytes + width {
        log::warn!("bitmap is too small for a {width}x{height} distance field");
        return;
    }

    let mut maps = DistanceMaps::new(width, height);
    {
        let coverage = Coverage {
            pixels: &*pixels,
            row_bytes,
        };

        // Pixels whose 4-neighbourhood crosses the edge, on either side of it.
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                let inside = coverage.inside(x, y);
                if coverage.inside(x - 1, y) != inside
                    || coverage.inside(x + 1, y) != inside
                    || coverage.inside(x, y - 1) != inside
                    || coverage.inside(x, y + 1) != inside
                {
                    maps.mark_boundary(x, y);
                }
            }
        }
    }

    // Forward pass.
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            maps.relax(x, y, x - 1, y - 1, SQRT_2);
            maps.relax(x, y, x, y - 1, 1.0);
            maps.relax(x, y, x + 1, y - 1, SQRT_2);
            maps.relax(x, y, x - 1, y, 1.0);
        }
    }

    // Backward pass.
    for y in (1..height.saturating_sub(1)).rev() {
        for x in (1..width.saturating_sub(1)).rev() {
            maps.relax(x, y, x + 1, y, 1.0);
            maps.relax(x, y, x - 1, y + 1, SQRT_2);
            maps.relax(x, y, x, y + 1, 1.0);
            maps.relax(x, y, x + 1, y + 1, SQRT_2);
        }
    }

    for y in 0..height {
        let row = &mut pixels[y * row_bytes..y * row_bytes + width];
        for (x, pixel) in row.iter_mut().enumerate() {
            let distance = maps.distance(x, y);
            let signed = if *pixel > INSIDE_THRESHOLD {
                distance
            } else {
                -distance
            };
            *pixel = quantize_distance(signed, spread);
        }
    }
}
