//! Spiral light strip: a fixed helix of small emissive boxes wound around
//! the tree. Positions never move; only scale (visibility) and brightness
//! animate, giving a shimmering string of lights that fades in when the
//! tree forms and out when it scatters.

use std::f32::consts::TAU;
use glam::{Mat4, Quat, Vec3};
use crate::api::error::{require_positive, MorphError, Result};
use crate::api::types::MorphState;
use crate::components::color::Color;
use crate::core::rng::Rng;
use crate::core::smoothing::{blend_factor, lerp};
use crate::renderer::traits::InstanceSink;
use super::layout::LayoutShape;
use super::morph::BatchUpdate;

pub const SPIRAL_COUNT: usize = 450;
pub const SPIRAL_LOOPS: f32 = 9.0;
/// How far the strip sits outside the cone at its widest.
pub const RADIUS_MARGIN: f32 = 0.5;
/// Fraction of the tree height the strip spans, from the apex down.
pub const HEIGHT_FILL: f32 = 0.98;

/// Helix geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralLayout {
    pub count: usize,
    pub height: f32,
    pub max_radius: f32,
    pub loops: f32,
    pub height_fill: f32,
}

impl SpiralLayout {
    /// Helix hugging the tree cone described by `shape`.
    pub fn around(shape: &LayoutShape, count: usize) -> Self {
        Self {
            count,
            height: shape.tree_height,
            max_radius: shape.tree_radius + RADIUS_MARGIN,
            loops: SPIRAL_LOOPS,
            height_fill: HEIGHT_FILL,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(MorphError::EmptyGroup { group: "spiral".to_string() });
        }
        require_positive("spiral_height", self.height)?;
        require_positive("spiral_max_radius", self.max_radius)?;
        require_positive("spiral_loops", self.loops)?;
        require_positive("spiral_height_fill", self.height_fill)
    }

    /// Progress along the strip: 0 at the apex, 1 at the bottom.
    pub fn progress(&self, index: usize) -> f32 {
        if self.count <= 1 {
            0.0
        } else {
            index as f32 / (self.count - 1) as f32
        }
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let t = self.progress(index);
        let y = (0.5 - t * self.height_fill) * self.height;
        let r = t * self.max_radius;
        let angle = t * TAU * self.loops;
        Vec3::new(angle.cos() * r, y, angle.sin() * r)
    }
}

/// Look of the lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralStyle {
    /// Scale of a lit light.
    pub lit_size: f32,
    /// Scale wobble added while lit, times the blink value.
    pub jitter: f32,
    /// Approach rate of the scale, per second.
    pub fade_rate: f32,
    /// Extra brightness at the blink peak: color × (1 + max_boost).
    pub max_boost: f32,
    /// Blink speed range, radians per second.
    pub blink_speed: (f32, f32),
}

impl Default for SpiralStyle {
    fn default() -> Self {
        Self {
            lit_size: 0.08,
            jitter: 0.02,
            fade_rate: 5.0,
            max_boost: 4.0,
            blink_speed: (3.0, 7.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpiralLight {
    pub position: Vec3,
    pub phase: f32,
    pub speed: f32,
    pub color: Color,
}

/// Animated strip of lights bound to one instance batch.
#[derive(Debug, Clone)]
pub struct SpiralStrip {
    lights: Vec<SpiralLight>,
    /// Current scale per light; hidden (0) until the tree forms.
    scales: Vec<f32>,
    style: SpiralStyle,
}

impl SpiralStrip {
    pub fn generate(layout: &SpiralLayout, palette: &[Color], style: SpiralStyle, rng: &mut Rng) -> Result<Self> {
        layout.validate()?;
        if palette.is_empty() {
            return Err(MorphError::EmptyPalette { group: "spiral".to_string() });
        }
        let (lo, hi) = style.blink_speed;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(MorphError::InvalidRange { name: "spiral_blink_speed", min: lo, max: hi });
        }
        require_positive("spiral_fade_rate", style.fade_rate)?;

        let lights = (0..layout.count)
            .map(|i| SpiralLight {
                position: layout.position(i),
                phase: rng.angle(),
                color: palette[rng.next_int(palette.len() as u32) as usize],
                speed: rng.range(lo, hi),
            })
            .collect::<Vec<_>>();
        let scales = vec![0.0; lights.len()];

        Ok(Self { lights, scales, style })
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn lights(&self) -> &[SpiralLight] {
        &self.lights
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn style(&self) -> &SpiralStyle {
        &self.style
    }

    /// Brightness multiplier for a blink value in [-1, 1]: 1 when dark, up to 1 + max_boost.
    pub fn brightness(&self, blink: f32) -> f32 {
        1.0 + blink.max(0.0) * self.style.max_boost
    }

    /// Animate scale and color for every light and write both arrays.
    pub fn tick<S: InstanceSink>(&mut self, state: MorphState, time: f32, dt: f32, sink: &mut S) -> BatchUpdate {
        if !sink.is_allocated() {
            log::trace!("spiral: batch not allocated, skipping frame");
            return BatchUpdate::skipped();
        }
        debug_assert!(sink.len() >= self.lights.len(), "spiral: batch smaller than strip");

        let mut update = BatchUpdate::default();
        let lit = state.is_tree();
        let factor = blend_factor(self.style.fade_rate, dt);

        for (i, light) in self.lights.iter().enumerate() {
            let blink = (time * light.speed + light.phase).sin();
            let target = if lit { self.style.lit_size + blink * self.style.jitter } else { 0.0 };

            let next = lerp(self.scales[i], target, factor);
            if next.is_finite() {
                self.scales[i] = next;
            } else {
                update.rejected += 1;
            }

            let scale = self.scales[i];
            sink.set_transform(
                i,
                Mat4::from_scale_rotation_translation(Vec3::splat(scale), Quat::IDENTITY, light.position),
            );
            sink.set_color(i, light.color.scaled(self.brightness(blink)));
        }

        sink.mark_transforms_dirty();
        sink.mark_colors_dirty();
        update.transforms_written = self.lights.len();
        update.colors_written = self.lights.len();

        if update.rejected > 0 {
            log::debug!("spiral: held {} lights with non-finite scale", update.rejected);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::instance::InstanceBatch;

    const EPS: f32 = 1e-4;

    fn palette() -> [Color; 2] {
        [Color::new(0.0, 0.94, 1.0), Color::new(1.0, 0.0, 0.5)]
    }

    fn strip(count: usize, seed: u64) -> (SpiralStrip, InstanceBatch) {
        let layout = SpiralLayout::around(&LayoutShape::default(), count);
        let s = SpiralStrip::generate(&layout, &palette(), SpiralStyle::default(), &mut Rng::new(seed)).unwrap();
        (s, InstanceBatch::with_count(count))
    }

    #[test]
    fn helix_runs_apex_to_base_and_widens() {
        let layout = SpiralLayout::around(&LayoutShape::default(), SPIRAL_COUNT);
        let top = layout.position(0);
        let bottom = layout.position(SPIRAL_COUNT - 1);
        assert!((top.y - 7.0).abs() < EPS);
        assert!(top.x.abs() < EPS && top.z.abs() < EPS);
        assert!((bottom.y - (0.5 - 0.98) * 14.0).abs() < EPS);
        let bottom_r = Vec3::new(bottom.x, 0.0, bottom.z).length();
        assert!((bottom_r - 5.5).abs() < EPS);

        let mut last_r = -1.0;
        let mut last_y = f32::INFINITY;
        for i in 0..SPIRAL_COUNT {
            let p = layout.position(i);
            let r = Vec3::new(p.x, 0.0, p.z).length();
            assert!(r >= last_r - EPS);
            assert!(p.y < last_y);
            last_r = r;
            last_y = p.y;
        }
    }

    #[test]
    fn single_light_sits_at_apex() {
        let layout = SpiralLayout::around(&LayoutShape::default(), 1);
        assert_eq!(layout.progress(0), 0.0);
        assert!(layout.position(0).is_finite());
    }

    #[test]
    fn hidden_while_scattered() {
        let (mut s, mut batch) = strip(20, 1);
        for frame in 0..10 {
            s.tick(MorphState::Scattered, frame as f32 * 0.1, 0.1, &mut batch);
        }
        assert!(s.scales().iter().all(|&v| v == 0.0));
        assert!(batch.transforms().iter().all(|m| m.x_axis.length() == 0.0));
    }

    #[test]
    fn lights_up_on_tree() {
        let (mut s, mut batch) = strip(50, 2);
        let update = s.tick(MorphState::TreeShape, 1.5, 1000.0, &mut batch);
        assert_eq!(update.transforms_written, 50);
        for (i, &scale) in s.scales().iter().enumerate() {
            assert!(scale >= 0.06 - EPS && scale <= 0.10 + EPS, "scale {}", scale);
            let m = batch.transform_at(i);
            assert!(m.w_axis.truncate().abs_diff_eq(s.lights()[i].position, EPS));
        }
    }

    #[test]
    fn fades_rather_than_pops() {
        let (mut s, mut batch) = strip(10, 3);
        s.tick(MorphState::TreeShape, 0.0, 0.016, &mut batch);
        for &scale in s.scales() {
            assert!(scale > 0.0 && scale < 0.06);
        }
    }

    #[test]
    fn brightness_over_drives_for_bloom() {
        let (mut s, mut batch) = strip(200, 4);
        s.tick(MorphState::TreeShape, 2.0, 0.016, &mut batch);
        let mut hot = 0;
        for (i, light) in s.lights().iter().enumerate() {
            let c = batch.color_at(i);
            let base = light.color;
            let ratio = if base.r > 0.0 { c.r / base.r } else { c.g / base.g };
            assert!(ratio >= 1.0 - EPS && ratio <= 5.0 + EPS);
            if c.r > 1.0 || c.g > 1.0 || c.b > 1.0 {
                hot += 1;
            }
        }
        assert!(hot > 0, "some lights should exceed display range");
        assert_eq!(s.brightness(-1.0), 1.0);
        assert_eq!(s.brightness(1.0), 5.0);
    }

    #[test]
    fn colors_come_from_palette() {
        let (s, _) = strip(100, 5);
        let pal = palette();
        assert!(s.lights().iter().all(|l| pal.contains(&l.color)));
        assert!(s.lights().iter().any(|l| l.color == pal[0]));
        assert!(s.lights().iter().any(|l| l.color == pal[1]));
        assert!(s.lights().iter().all(|l| l.speed >= 3.0 && l.speed <= 7.0));
    }

    #[test]
    fn zero_delta_keeps_transforms() {
        let (mut s, mut batch) = strip(30, 6);
        s.tick(MorphState::TreeShape, 0.5, 0.2, &mut batch);
        let before = batch.transforms().to_vec();
        s.tick(MorphState::TreeShape, 9.0, 0.0, &mut batch);
        assert_eq!(batch.transforms(), before.as_slice());
    }

    #[test]
    fn both_buffers_marked_dirty() {
        let (mut s, mut batch) = strip(5, 7);
        batch.take_dirty();
        s.tick(MorphState::Scattered, 0.0, 0.016, &mut batch);
        let flags = batch.take_dirty();
        assert!(flags.transforms && flags.colors);
    }

    #[test]
    fn skipped_before_mount() {
        let (mut s, _) = strip(5, 8);
        let mut batch = InstanceBatch::unallocated();
        assert!(s.tick(MorphState::TreeShape, 0.0, 1.0, &mut batch).skipped);
        assert!(s.scales().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rejects_bad_configuration() {
        let layout = SpiralLayout::around(&LayoutShape::default(), 0);
        assert!(SpiralStrip::generate(&layout, &palette(), SpiralStyle::default(), &mut Rng::new(1)).is_err());
        let layout = SpiralLayout::around(&LayoutShape::default(), 10);
        assert!(matches!(
            SpiralStrip::generate(&layout, &[], SpiralStyle::default(), &mut Rng::new(1)),
            Err(MorphError::EmptyPalette { .. })
        ));
        let reversed = SpiralStyle { blink_speed: (7.0, 3.0), ..SpiralStyle::default() };
        assert!(matches!(
            SpiralStrip::generate(&layout, &palette(), reversed, &mut Rng::new(1)),
            Err(MorphError::InvalidRange { name: "spiral_blink_speed", min, max }) if min == 7.0 && max == 3.0
        ));
    }
}
