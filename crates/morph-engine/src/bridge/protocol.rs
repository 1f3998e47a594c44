/// Frame buffer layout shared with the JavaScript renderer.
/// Must stay in sync with the renderer's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Batch table: batch_count × 4 floats]
/// [Transforms: total_instances × 16 floats, column-major]
/// [Colors: total_instances × 3 floats]
/// ```
///
/// Batches appear in scene order (groups, then the spiral strip). Each
/// table entry holds the batch's instance count, its transform offset, its
/// color offset, and the dirty bits for this frame. Sections that are not
/// dirty are left as they were, so the renderer only re-uploads what changed.

use crate::api::scene::MorphScene;
use crate::api::types::MorphState;
use crate::renderer::traits::InstanceSink;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_MORPH_STATE: usize = 1;
pub const HEADER_BATCH_COUNT: usize = 2;
pub const HEADER_TOTAL_INSTANCES: usize = 3;
pub const HEADER_PROTOCOL_VERSION: usize = 4;
pub const HEADER_BATCH_TABLE_OFFSET: usize = 5;
pub const HEADER_TRANSFORM_OFFSET: usize = 6;
pub const HEADER_COLOR_OFFSET: usize = 7;

/// The frame counter wraps here so every value stays exact in an f32.
pub const FRAME_COUNTER_WRAP: u64 = 1 << 24;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per batch table entry: count, transform offset, color offset, dirty bits.
pub const BATCH_ENTRY_FLOATS: usize = 4;

/// Floats per instance transform (4x4 matrix).
pub const TRANSFORM_FLOATS: usize = 16;

/// Floats per instance color (RGB).
pub const COLOR_FLOATS: usize = 3;

/// Placement of one batch inside the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchEntry {
    pub instance_count: usize,
    /// Offset (in floats) of this batch's first transform.
    pub transform_offset: usize,
    /// Offset (in floats) of this batch's first color.
    pub color_offset: usize,
}

/// Runtime-computed buffer layout for a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub batches: Vec<BatchEntry>,
    pub total_instances: usize,

    /// Offset (in floats) where the batch table begins.
    pub batch_table_offset: usize,
    /// Offset (in floats) where transform data begins.
    pub transform_data_offset: usize,
    /// Offset (in floats) where color data begins.
    pub color_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from per-batch instance counts.
    pub fn new(batch_sizes: impl IntoIterator<Item = usize>) -> Self {
        let sizes: Vec<usize> = batch_sizes.into_iter().collect();
        let total_instances: usize = sizes.iter().sum();

        let batch_table_offset = HEADER_FLOATS;
        let transform_data_offset = batch_table_offset + sizes.len() * BATCH_ENTRY_FLOATS;
        let color_data_offset = transform_data_offset + total_instances * TRANSFORM_FLOATS;
        let buffer_total_floats = color_data_offset + total_instances * COLOR_FLOATS;

        let mut batches = Vec::with_capacity(sizes.len());
        let mut first = 0;
        for count in sizes {
            batches.push(BatchEntry {
                instance_count: count,
                transform_offset: transform_data_offset + first * TRANSFORM_FLOATS,
                color_offset: color_data_offset + first * COLOR_FLOATS,
            });
            first += count;
        }

        Self {
            batches,
            total_instances,
            batch_table_offset,
            transform_data_offset,
            color_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout for a scene.
    pub fn from_scene(scene: &MorphScene) -> Self {
        Self::new(scene.batch_sizes())
    }

    /// A zeroed buffer of the right size.
    pub fn alloc_buffer(&self) -> Vec<f32> {
        vec![0.0; self.buffer_total_floats]
    }

    /// Pack one frame: header, batch table, and every dirty section.
    /// Consumes the scene's dirty flags. Batches that are not allocated (or
    /// whose size no longer matches the layout) are reported with no dirty bits.
    pub fn write_frame(&self, scene: &mut MorphScene, state: MorphState, frame: u64, buf: &mut [f32]) {
        debug_assert!(buf.len() >= self.buffer_total_floats, "frame buffer too small");

        buf[HEADER_FRAME_COUNTER] = (frame % FRAME_COUNTER_WRAP) as f32;
        buf[HEADER_MORPH_STATE] = state.as_u32() as f32;
        buf[HEADER_BATCH_COUNT] = self.batches.len() as f32;
        buf[HEADER_TOTAL_INSTANCES] = self.total_instances as f32;
        buf[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buf[HEADER_BATCH_TABLE_OFFSET] = self.batch_table_offset as f32;
        buf[HEADER_TRANSFORM_OFFSET] = self.transform_data_offset as f32;
        buf[HEADER_COLOR_OFFSET] = self.color_data_offset as f32;

        for (i, (entry, batch)) in self.batches.iter().zip(scene.batches_mut()).enumerate() {
            let mut bits = 0;
            if batch.is_allocated() && batch.len() == entry.instance_count {
                let dirty = batch.take_dirty();
                if dirty.transforms {
                    let len = entry.instance_count * TRANSFORM_FLOATS;
                    buf[entry.transform_offset..entry.transform_offset + len]
                        .copy_from_slice(batch.transform_floats());
                }
                if dirty.colors {
                    let len = entry.instance_count * COLOR_FLOATS;
                    buf[entry.color_offset..entry.color_offset + len].copy_from_slice(batch.color_floats());
                }
                bits = dirty.bits();
            }

            let row = self.batch_table_offset + i * BATCH_ENTRY_FLOATS;
            buf[row] = entry.instance_count as f32;
            buf[row + 1] = entry.transform_offset as f32;
            buf[row + 2] = entry.color_offset as f32;
            buf[row + 3] = bits as f32;
        }
    }
}
