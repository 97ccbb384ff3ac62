// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle packing inside a fixed size canvas.
//!
//! [`RectPacker`] wraps an [`etagere`] shelf allocator. Placements never overlap and stay
//! valid until they are explicitly removed, which lets an atlas keep packing into the same
//! canvas across frames.

use core::fmt;

use etagere::{AllocId, AtlasAllocator, size2};

use crate::geometry::ISize;

/// A rectangle placed by a [`RectPacker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    id: Option<AllocId>,
    /// Top-left corner of the placed rectangle.
    pub origin: [u32; 2],
}

/// Places rectangles without overlap inside a canvas of fixed size.
pub struct RectPacker {
    allocator: AtlasAllocator,
    size: ISize,
    placed: usize,
}

impl RectPacker {
    /// Creates an empty packer for a canvas of `size`.
    ///
    /// Returns `None` if the size is empty or too large to be addressed.
    pub fn new(size: ISize) -> Option<Self> {
        if size.is_empty() {
            return None;
        }
        let width = i32::try_from(size.width).ok()?;
        let height = i32::try_from(size.height).ok()?;
        Some(Self {
            allocator: AtlasAllocator::new(size2(width, height)),
            size,
            placed: 0,
        })
    }

    /// Size of the canvas.
    #[inline]
    pub fn size(&self) -> ISize {
        self.size
    }

    /// Number of rectangles currently placed.
    #[inline]
    pub fn len(&self) -> usize {
        self.placed
    }

    /// Whether nothing has been placed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placed == 0
    }

    /// Places a rectangle of `size`, returning `None` if there is no room left for it.
    ///
    /// Empty rectangles always succeed and occupy no space.
    pub fn add_rect(&mut self, size: ISize) -> Option<Placement> {
        if size.is_empty() {
            self.placed += 1;
            return Some(Placement {
                id: None,
                origin: [0, 0],
            });
        }
        let width = i32::try_from(size.width).ok()?;
        let height = i32::try_from(size.height).ok()?;
        let allocation = self.allocator.allocate(size2(width, height))?;
        let origin = [
            u32::try_from(allocation.rectangle.min.x).ok()?,
            u32::try_from(allocation.rectangle.min.y).ok()?,
        ];
        self.placed += 1;
        Some(Placement {
            id: Some(allocation.id),
            origin,
        })
    }

    /// Places every rectangle of `sizes`, in order, or none of them.
    ///
    /// When a rectangle does not fit, the rectangles placed by this call are removed again
    /// and `None` is returned. Earlier placements are never touched.
    pub fn add_rects(&mut self, sizes: impl IntoIterator<Item = ISize>) -> Option<Vec<Placement>> {
        let sizes = sizes.into_iter();
        let mut placements = Vec::with_capacity(sizes.size_hint().0);
        for size in sizes {
            match self.add_rect(size) {
                Some(placement) => placements.push(placement),
                None => {
                    self.remove_rects(placements);
                    return None;
                }
            }
        }
        Some(placements)
    }

    /// Frees a placement made by this packer.
    pub fn remove_rect(&mut self, placement: Placement) {
        if let Some(id) = placement.id {
            self.allocator.deallocate(id);
        }
        self.placed = self.placed.saturating_sub(1);
    }

    /// Frees a batch of placements made by this packer.
    pub fn remove_rects(&mut self, placements: impl IntoIterator<Item = Placement>) {
        for placement in placements {
            self.remove_rect(placement);
        }
    }
}

impl fmt::Debug for RectPacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RectPacker")
            .field("size", &self.size)
            .field("placed", &self.placed)
            .finish_non_exhaustive()
    }
}
