// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the GPU device the atlas is published to.
//!
//! Nothing in this crate talks to a graphics API directly. A backend implements
//! [`Allocator`], [`DeviceBuffer`] and [`Texture`], and describes what it supports with
//! [`Capabilities`].
//!
//! Textures are handed out as `Arc`s and may be sampled from other threads, so backend types
//! are `Send + Sync`.

use core::fmt::Debug;
use std::sync::Arc;

use crate::geometry::ISize;

/// Pixel formats atlas textures can be created with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit normalized channel holding coverage.
    A8UNormInt,
    /// Four 8-bit normalized channels, premultiplied alpha.
    R8G8B8A8UNormInt,
}

impl PixelFormat {
    /// Size of a single pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::A8UNormInt => 1,
            Self::R8G8B8A8UNormInt => 4,
        }
    }
}

/// Where a device resource lives.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// Memory that both the host and the device can access.
    #[default]
    HostVisible,
    /// Memory only the device can access.
    DevicePrivate,
}

/// Describes a device buffer to allocate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeviceBufferDescriptor {
    /// Where the buffer should live.
    pub storage_mode: StorageMode,
    /// Size of the buffer in bytes.
    pub size: usize,
}

/// Describes a texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Where the texture should live.
    pub storage_mode: StorageMode,
    /// Format of every pixel.
    pub format: PixelFormat,
    /// Size of the base mip level.
    pub size: ISize,
    /// Number of mip levels.
    pub mip_count: u32,
}

impl TextureDescriptor {
    /// Describes a host visible texture with a single mip level.
    pub const fn new(format: PixelFormat, size: ISize) -> Self {
        Self {
            storage_mode: StorageMode::HostVisible,
            format,
            size,
            mip_count: 1,
        }
    }

    /// Bytes of a tightly packed row of the base mip level.
    #[inline]
    pub const fn bytes_per_row(&self) -> usize {
        self.size.width as usize * self.format.bytes_per_pixel()
    }

    /// Bytes of the tightly packed base mip level.
    #[inline]
    pub const fn byte_size_of_base_mip_level(&self) -> usize {
        self.bytes_per_row() * self.size.height as usize
    }
}

/// A texture resident on the device.
pub trait Texture: Debug + Send + Sync {
    /// The descriptor the texture was created with.
    fn descriptor(&self) -> TextureDescriptor;

    /// Whether the texture can be sampled.
    fn is_valid(&self) -> bool;

    /// Attaches a debug label to the texture.
    fn set_label(&self, label: &str);

    /// Replaces the base mip level with `contents`.
    ///
    /// Returns `false` if the upload failed.
    fn set_contents(&self, contents: &[u8]) -> bool;
}

/// A region of device memory that the host can write to.
pub trait DeviceBuffer: Debug + Send + Sync {
    /// The buffer contents.
    fn contents(&self) -> &[u8];

    /// The buffer contents, for writing.
    fn contents_mut(&mut self) -> &mut [u8];

    /// Creates a texture that reads its base mip level from this buffer, with rows
    /// `row_bytes` apart.
    ///
    /// Returns `None` if the device cannot create such a texture.
    fn as_texture(
        &self,
        allocator: &dyn Allocator,
        descriptor: &TextureDescriptor,
        row_bytes: usize,
    ) -> Option<Arc<dyn Texture>>;
}

/// Allocates device resources.
pub trait Allocator: Debug + Send + Sync {
    /// Allocates a buffer, returning `None` when the device is out of memory.
    fn create_buffer(&self, descriptor: &DeviceBufferDescriptor) -> Option<Box<dyn DeviceBuffer>>;

    /// Smallest row pitch, in bytes, the device accepts for linear textures of `format`.
    fn minimum_bytes_per_row(&self, format: PixelFormat) -> usize {
        format.bytes_per_pixel()
    }
}

/// What the device backend supports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Textures created from a device buffer share its memory, so writes to the buffer are
    /// visible in the texture without an explicit upload.
    pub supports_shared_device_buffer_texture_memory: bool,
}

impl Capabilities {
    /// Capabilities of a backend whose textures alias their device buffers.
    pub const fn shared_memory() -> Self {
        Self {
            supports_shared_device_buffer_texture_memory: true,
        }
    }

    /// Capabilities of a backend that needs explicit uploads.
    pub const fn copy_on_upload() -> Self {
        Self {
            supports_shared_device_buffer_texture_memory: false,
        }
    }
}

/// Minimum row alignment the atlas has to honour for `format`.
///
/// Only relevant when textures alias device buffers; returns `None` otherwise.
pub fn compute_minimum_alignment(
    allocator: &dyn Allocator,
    capabilities: Capabilities,
    format: PixelFormat,
) -> Option<usize> {
    if !capabilities.supports_shared_device_buffer_texture_memory {
        return None;
    }
    Some(allocator.minimum_bytes_per_row(format))
}
