// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by atlas construction.

use core::fmt;

use crate::geometry::ISize;

/// Kinds of errors that can occur while building a glyph atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum AtlasErrorKind {
    /// The text render context has no usable device allocator.
    InvalidContext,
    /// No atlas size up to the configured maximum can hold the required glyphs.
    CapacityExceeded {
        /// Largest side length that was tried.
        max_size: u32,
    },
    /// The CPU-visible pixel buffer could not be allocated.
    BitmapAllocation,
    /// The GPU texture could not be created from the pixel buffer.
    TextureAllocation,
    /// The pixel buffer layout cannot be aliased linearly by a texture. Callers should fall
    /// back to a blit based upload.
    FormatIncompatible,
    /// Re-uploading an updated bitmap to the existing texture failed.
    TextureUpdate,
    /// The packer placed a different number of glyphs than were requested.
    PlacementCountMismatch {
        /// Number of unique glyphs requested.
        expected: usize,
        /// Number of placements produced.
        actual: usize,
    },
}

impl AtlasErrorKind {
    /// An error of this kind, raised while building an atlas of `size`.
    pub(crate) const fn at_size(self, size: ISize) -> AtlasError {
        AtlasError::new(self).with_atlas_size(size)
    }
}

/// Error returned when a glyph atlas could not be built.
///
/// The atlas context is left exactly as it was before the failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasError {
    kind: AtlasErrorKind,
    atlas_size: Option<ISize>,
}

impl AtlasError {
    pub(crate) const fn new(kind: AtlasErrorKind) -> Self {
        Self {
            kind,
            atlas_size: None,
        }
    }

    pub(crate) const fn with_atlas_size(mut self, size: ISize) -> Self {
        self.atlas_size = Some(size);
        self
    }

    /// Returns the error kind.
    pub const fn kind(self) -> AtlasErrorKind {
        self.kind
    }

    /// Returns the atlas size that was being built when the error occurred, if one had been
    /// chosen.
    pub const fn atlas_size(self) -> Option<ISize> {
        self.atlas_size
    }
}

impl From<AtlasErrorKind> for AtlasError {
    fn from(kind: AtlasErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AtlasErrorKind::InvalidContext => f.write_str("text render context is not valid")?,
            AtlasErrorKind::CapacityExceeded { max_size } => {
                write!(
                    f,
                    "glyphs do not fit in an atlas of at most {max_size}x{max_size}"
                )?;
            }
            AtlasErrorKind::BitmapAllocation => {
                f.write_str("failed to allocate the atlas pixel buffer")?;
            }
            AtlasErrorKind::TextureAllocation => {
                f.write_str("failed to create the atlas texture")?;
            }
            AtlasErrorKind::FormatIncompatible => {
                f.write_str("atlas pixel buffer cannot be aliased by a linear texture")?;
            }
            AtlasErrorKind::TextureUpdate => {
                f.write_str("failed to update the atlas texture contents")?;
            }
            AtlasErrorKind::PlacementCountMismatch { expected, actual } => {
                write!(f, "packed {actual} glyphs but {expected} were requested")?;
            }
        }
        if let Some(size) = self.atlas_size {
            write!(f, " (atlas size {}x{})", size.width, size.height)?;
        }
        Ok(())
    }
}

impl core::error::Error for AtlasError {}
