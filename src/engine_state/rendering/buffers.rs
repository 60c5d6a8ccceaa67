//! # Buffer Backends
//!
//! The mesh builder does not talk to a graphics API directly. It hands finished
//! vertex and index bytes to a [`BufferDevice`], which turns them into
//! [`GpuBuffer`] handles owned by the chunk.
//!
//! ## Architecture
//!
//! * `WgpuBufferDevice` creates real `wgpu::Buffer`s through
//!   `DeviceExt::create_buffer_init`
//! * `HostBufferDevice` keeps the bytes in CPU memory and counts live buffers,
//!   which makes disposal observable in tests and in the headless binary
//!
//! Buffers are shared as `Arc<dyn GpuBuffer>`. A chunk drops its handles on
//! disposal; a renderer holding a `DrawItem` snapshot keeps the buffer alive until
//! the frame is done with it.

use std::{
    any::Any,
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use wgpu::util::DeviceExt;

/// A buffer produced by a [`BufferDevice`].
pub trait GpuBuffer: Send + Sync + Debug {
    /// Size of the buffer contents in bytes.
    fn size_bytes(&self) -> u64;

    /// Access to the concrete backend type, e.g. to fetch the `wgpu::Buffer`.
    fn as_any(&self) -> &dyn Any;
}

/// Creates exact-size vertex and index buffers.
pub trait BufferDevice: Send + Sync {
    /// Uploads vertex bytes.
    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer>;

    /// Uploads index bytes.
    fn create_index_buffer(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer>;
}

/// Allocation counters shared by a device and the buffers it created.
#[derive(Debug, Default)]
struct BufferAnalytics {
    /// Buffers created over the device lifetime
    created: AtomicUsize,
    /// Buffers not dropped yet
    live: AtomicUsize,
    /// Bytes held by live buffers
    live_bytes: AtomicU64,
}

/// A buffer stored in CPU memory.
#[derive(Debug)]
pub struct HostBuffer {
    label: String,
    contents: Vec<u8>,
    analytics: Arc<BufferAnalytics>,
}

impl HostBuffer {
    /// Debug label given at creation.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The uploaded bytes.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

impl GpuBuffer for HostBuffer {
    fn size_bytes(&self) -> u64 {
        self.contents.len() as u64
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for HostBuffer {
    fn drop(&mut self) {
        self.analytics.live.fetch_sub(1, Ordering::AcqRel);
        self.analytics
            .live_bytes
            .fetch_sub(self.contents.len() as u64, Ordering::AcqRel);
    }
}

/// Buffer device backed by CPU memory.
#[derive(Debug, Default)]
pub struct HostBufferDevice {
    analytics: Arc<BufferAnalytics>,
}

impl HostBufferDevice {
    /// Creates a device with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers created and not yet dropped.
    pub fn live_buffers(&self) -> usize {
        self.analytics.live.load(Ordering::Acquire)
    }

    /// Bytes held by live buffers.
    pub fn live_bytes(&self) -> u64 {
        self.analytics.live_bytes.load(Ordering::Acquire)
    }

    /// Buffers created since the device was built.
    pub fn created_buffers(&self) -> usize {
        self.analytics.created.load(Ordering::Acquire)
    }

    fn create(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer> {
        self.analytics.created.fetch_add(1, Ordering::AcqRel);
        self.analytics.live.fetch_add(1, Ordering::AcqRel);
        self.analytics
            .live_bytes
            .fetch_add(contents.len() as u64, Ordering::AcqRel);

        Arc::new(HostBuffer {
            label: label.to_owned(),
            contents: contents.to_vec(),
            analytics: self.analytics.clone(),
        })
    }
}

impl BufferDevice for HostBufferDevice {
    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer> {
        self.create(label, contents)
    }

    fn create_index_buffer(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer> {
        self.create(label, contents)
    }
}

/// A `wgpu::Buffer` owned by a chunk.
#[derive(Debug)]
pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
}

impl WgpuBuffer {
    /// The underlying GPU buffer, for binding in a render pass.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl GpuBuffer for WgpuBuffer {
    fn size_bytes(&self) -> u64 {
        self.buffer.size()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for WgpuBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

/// Buffer device that uploads straight to a `wgpu::Device`.
pub struct WgpuBufferDevice {
    device: Arc<wgpu::Device>,
}

impl WgpuBufferDevice {
    /// Wraps an existing device.
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self { device }
    }

    fn create(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> Arc<dyn GpuBuffer> {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            });

        Arc::new(WgpuBuffer { buffer })
    }
}

impl BufferDevice for WgpuBufferDevice {
    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer> {
        self.create(
            label,
            contents,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn create_index_buffer(&self, label: &str, contents: &[u8]) -> Arc<dyn GpuBuffer> {
        self.create(
            label,
            contents,
            wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_device_tracks_live_buffers() {
        let device = HostBufferDevice::new();

        let vertex = device.create_vertex_buffer("vertices", &[1, 2, 3, 4]);
        let index = device.create_index_buffer("indices", &[5, 6]);
        assert_eq!(device.live_buffers(), 2);
        assert_eq!(device.live_bytes(), 6);
        assert_eq!(vertex.size_bytes(), 4);

        let host = vertex.as_any().downcast_ref::<HostBuffer>().unwrap();
        assert_eq!(host.label(), "vertices");
        assert_eq!(host.contents(), &[1, 2, 3, 4]);

        drop(vertex);
        drop(index);
        assert_eq!(device.live_buffers(), 0);
        assert_eq!(device.live_bytes(), 0);
        assert_eq!(device.created_buffers(), 2);
    }
}
