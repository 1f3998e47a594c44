//! Contract between the animators and whatever draws the instances.
//!
//! All drawing happens outside this crate (the browser renderer reads the
//! packed frame buffer). The animators only need somewhere to put one 4x4
//! matrix and one RGB color per instance, plus a way to say "this changed".

use glam::Mat4;
use crate::components::color::Color;

/// Per-instance storage for one batched draw (one geometry/material pair).
///
/// Implementations are single-writer: one animator owns a sink for the
/// duration of a frame. Indices are always `< len()`; an out-of-range
/// index is a caller bug and may panic.
pub trait InstanceSink {
    /// False until the renderer has created the instance slots.
    fn is_allocated(&self) -> bool;

    /// Number of instance slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_transform(&mut self, index: usize, transform: Mat4);

    /// Read back the last transform written at `index`.
    fn transform_at(&self, index: usize) -> Mat4;

    fn set_color(&mut self, index: usize, color: Color);

    /// Flag the transform array for upload. Called once per full pass.
    fn mark_transforms_dirty(&mut self);

    /// Flag the color array for upload. Called once per full pass.
    fn mark_colors_dirty(&mut self);
}
