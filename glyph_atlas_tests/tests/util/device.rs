// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory device that counts what the atlas asks of it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glyph_atlas::{
    Allocator, DeviceBuffer, DeviceBufferDescriptor, PixelFormat, Texture, TextureDescriptor,
};

#[derive(Debug, Default)]
pub(crate) struct Counter(AtomicUsize);

impl Counter {
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// A failure switch.
#[derive(Debug, Default)]
pub(crate) struct Switch(AtomicBool);

impl Switch {
    pub(crate) fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn set(&self, on: bool) {
        self.0.store(on, Ordering::Relaxed);
    }
}

/// Counters and failure switches shared by every resource of a [`MockAllocator`].
#[derive(Debug, Default)]
pub(crate) struct DeviceState {
    pub(crate) buffers_created: Counter,
    pub(crate) textures_created: Counter,
    pub(crate) uploads: Counter,
    pub(crate) fail_buffers: Switch,
    pub(crate) fail_textures: Switch,
    pub(crate) fail_uploads: Switch,
    pub(crate) last_label: Mutex<String>,
}

impl DeviceState {
    pub(crate) fn last_label(&self) -> String {
        self.last_label.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub(crate) struct MockAllocator {
    minimum_bytes_per_row: usize,
    state: Arc<DeviceState>,
}

impl MockAllocator {
    /// An allocator requiring rows of at least `minimum_bytes_per_row` bytes, or one pixel
    /// when zero.
    pub(crate) fn new(minimum_bytes_per_row: usize) -> Self {
        Self {
            minimum_bytes_per_row,
            state: Arc::default(),
        }
    }

    pub(crate) fn state(&self) -> Arc<DeviceState> {
        self.state.clone()
    }
}

impl Allocator for MockAllocator {
    fn create_buffer(&self, descriptor: &DeviceBufferDescriptor) -> Option<Box<dyn DeviceBuffer>> {
        if self.state.fail_buffers.get() {
            return None;
        }
        self.state.buffers_created.bump();
        Some(Box::new(MockBuffer {
            // Garbage, so that tests notice bitmaps that are not cleared.
            data: vec![0xaa; descriptor.size],
            state: self.state.clone(),
        }))
    }

    fn minimum_bytes_per_row(&self, format: PixelFormat) -> usize {
        self.minimum_bytes_per_row.max(format.bytes_per_pixel())
    }
}

#[derive(Debug)]
struct MockBuffer {
    data: Vec<u8>,
    state: Arc<DeviceState>,
}

impl DeviceBuffer for MockBuffer {
    fn contents(&self) -> &[u8] {
        &self.data
    }

    fn contents_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn as_texture(
        &self,
        _allocator: &dyn Allocator,
        descriptor: &TextureDescriptor,
        row_bytes: usize,
    ) -> Option<Arc<dyn Texture>> {
        if self.state.fail_textures.get() || row_bytes != descriptor.bytes_per_row() {
            return None;
        }
        self.state.textures_created.bump();
        Some(Arc::new(MockTexture {
            descriptor: *descriptor,
            state: self.state.clone(),
        }))
    }
}

#[derive(Debug)]
struct MockTexture {
    descriptor: TextureDescriptor,
    state: Arc<DeviceState>,
}

impl Texture for MockTexture {
    fn descriptor(&self) -> TextureDescriptor {
        self.descriptor
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn set_label(&self, label: &str) {
        *self.state.last_label.lock().unwrap() = label.to_owned();
    }

    fn set_contents(&self, contents: &[u8]) -> bool {
        if self.state.fail_uploads.get() {
            return false;
        }
        assert_eq!(
            contents.len(),
            self.descriptor.byte_size_of_base_mip_level(),
            "uploads must cover the whole base mip level"
        );
        self.state.uploads.bump();
        true
    }
}
