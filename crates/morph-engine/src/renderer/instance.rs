use glam::Mat4;
use crate::components::color::Color;
use super::traits::InstanceSink;

/// Upload flags consumed by the renderer after each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub transforms: bool,
    pub colors: bool,
}

impl DirtyFlags {
    pub const TRANSFORMS_BIT: u32 = 1;
    pub const COLORS_BIT: u32 = 2;

    /// Bitmask form written into the batch table of the frame buffer.
    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.transforms {
            bits |= Self::TRANSFORMS_BIT;
        }
        if self.colors {
            bits |= Self::COLORS_BIT;
        }
        bits
    }

    pub fn any(self) -> bool {
        self.transforms || self.colors
    }
}

/// In-memory instance batch: transforms and colors for `count` instances.
///
/// Starts unallocated, mirroring a GPU mesh that has not been mounted yet.
/// Matrices are column-major and `Pod`, so the arrays can be handed to the
/// renderer as flat `f32` slices.
#[derive(Debug, Default)]
pub struct InstanceBatch {
    transforms: Vec<Mat4>,
    colors: Vec<Color>,
    allocated: bool,
    dirty: DirtyFlags,
}

impl InstanceBatch {
    /// A batch with no slots yet. Animators skip it until `allocate`.
    pub fn unallocated() -> Self {
        Self::default()
    }

    /// Create an allocated batch of `count` identity/white instances.
    pub fn with_count(count: usize) -> Self {
        let mut batch = Self::unallocated();
        batch.allocate(count);
        batch
    }

    /// Create the instance slots: identity transforms, white colors.
    /// Re-allocating resets every slot.
    pub fn allocate(&mut self, count: usize) {
        self.transforms.clear();
        self.transforms.resize(count, Mat4::IDENTITY);
        self.colors.clear();
        self.colors.resize(count, Color::WHITE);
        self.allocated = true;
        self.dirty = DirtyFlags { transforms: true, colors: true };
    }

    /// Drop the slots (renderer unmounted).
    pub fn release(&mut self) {
        self.transforms = Vec::new();
        self.colors = Vec::new();
        self.allocated = false;
        self.dirty = DirtyFlags::default();
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Hand the pending upload flags to the renderer and clear them.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color_at(&self, index: usize) -> Color {
        self.colors[index]
    }

    /// Transforms as a flat column-major float slice (16 per instance).
    pub fn transform_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// Colors as a flat float slice (3 per instance).
    pub fn color_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

impl InstanceSink for InstanceBatch {
    fn is_allocated(&self) -> bool {
        self.allocated
    }

    fn len(&self) -> usize {
        self.transforms.len()
    }

    fn set_transform(&mut self, index: usize, transform: Mat4) {
        self.transforms[index] = transform;
    }

    fn transform_at(&self, index: usize) -> Mat4 {
        self.transforms[index]
    }

    fn set_color(&mut self, index: usize, color: Color) {
        self.colors[index] = color;
    }

    fn mark_transforms_dirty(&mut self) {
        self.dirty.transforms = true;
    }

    fn mark_colors_dirty(&mut self) {
        self.dirty.colors = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn starts_unallocated() {
        let batch = InstanceBatch::unallocated();
        assert!(!batch.is_allocated());
        assert!(batch.is_empty());
    }

    #[test]
    fn allocate_fills_identity_and_white() {
        let batch = InstanceBatch::with_count(4);
        assert!(batch.is_allocated());
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.transform_at(3), Mat4::IDENTITY);
        assert_eq!(batch.color_at(0), Color::WHITE);
    }

    #[test]
    fn read_back_returns_last_write() {
        let mut batch = InstanceBatch::with_count(2);
        let m = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        batch.set_transform(1, m);
        assert_eq!(batch.transform_at(1), m);
        assert_eq!(batch.transform_at(0), Mat4::IDENTITY);
    }

    #[test]
    fn take_dirty_clears_flags() {
        let mut batch = InstanceBatch::with_count(1);
        batch.take_dirty();
        batch.mark_transforms_dirty();
        let flags = batch.take_dirty();
        assert!(flags.transforms);
        assert!(!flags.colors);
        assert_eq!(flags.bits(), DirtyFlags::TRANSFORMS_BIT);
        assert!(!batch.dirty().any());
    }

    #[test]
    fn flat_views_have_expected_stride() {
        let batch = InstanceBatch::with_count(5);
        assert_eq!(batch.transform_floats().len(), 5 * 16);
        assert_eq!(batch.color_floats().len(), 5 * Color::FLOATS);
        assert_eq!(std::mem::size_of::<Color>(), 12);
    }

    #[test]
    fn release_unmounts() {
        let mut batch = InstanceBatch::with_count(3);
        batch.release();
        assert!(!batch.is_allocated());
        assert_eq!(batch.len(), 0);
    }
}
