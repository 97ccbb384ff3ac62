// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer and floating point geometry used by the atlas.

/// Integer size of an atlas canvas, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ISize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ISize {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    #[inline]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Whether either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Largest of both dimensions.
    #[inline]
    pub fn max_dimension(self) -> u32 {
        self.width.max(self.height)
    }

    /// Smallest of both dimensions.
    #[inline]
    pub fn min_dimension(self) -> u32 {
        self.width.min(self.height)
    }

    /// Grows a single axis: the larger dimension is kept as the width and the smaller one
    /// becomes the next power of two strictly above it.
    pub fn grow_one_axis(self) -> Self {
        Self::new(
            self.max_dimension(),
            next_power_of_two_size(self.min_dimension().saturating_add(1)),
        )
    }

    /// Grows both axes to the next power of two strictly above their current value.
    pub fn grow_both_axes(self) -> Self {
        Self::new(
            next_power_of_two_size(self.width.saturating_add(1)),
            next_power_of_two_size(self.height.saturating_add(1)),
        )
    }
}

/// Smallest power of two greater than or equal to `x`.
///
/// Saturates at the largest `u32` power of two instead of overflowing.
#[inline]
pub fn next_power_of_two_size(x: u32) -> u32 {
    x.checked_next_power_of_two().unwrap_or(1 << 31)
}

/// Axis-aligned integer rectangle in atlas pixel space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl IRect {
    /// Creates a rectangle from its origin and size.
    #[inline]
    pub const fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(self) -> ISize {
        ISize::new(self.width, self.height)
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(self) -> u32 {
        self.y + self.height
    }

    /// Whether the rectangle covers no pixel.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grows the rectangle by `amount` on every side, clamping at the origin.
    pub fn inflate(self, amount: u32) -> Self {
        let x = self.x.saturating_sub(amount);
        let y = self.y.saturating_sub(amount);
        Self::from_xywh(x, y, self.right() + amount - x, self.bottom() + amount - y)
    }

    /// Whether both rectangles share at least one pixel.
    pub fn intersects(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the rectangle lies completely inside a canvas of the given size.
    pub fn fits_within(self, size: ISize) -> bool {
        self.right() <= size.width && self.bottom() <= size.height
    }
}

/// Floating point glyph bounds in unscaled font units, relative to the glyph origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphBounds {
    /// Left edge relative to the glyph origin.
    pub left: f32,
    /// Top edge relative to the glyph origin (y grows down).
    pub top: f32,
    /// Width of the bounds.
    pub width: f32,
    /// Height of the bounds.
    pub height: f32,
}

impl GlyphBounds {
    /// Creates bounds from their origin and size.
    #[inline]
    pub const fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Pixel size of the bounds once scaled, rounded up on each axis.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "glyph sizes are clamped to zero and far below u32::MAX"
    )]
    pub fn scaled_pixel_size(self, scale: f32) -> ISize {
        let w = (self.width * scale).ceil().max(0.0);
        let h = (self.height * scale).ceil().max(0.0);
        ISize::new(w as u32, h as u32)
    }
}
