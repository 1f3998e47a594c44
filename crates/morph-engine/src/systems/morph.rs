//! Per-frame particle animator.
//!
//! Every frame each particle eases from its current pose toward the active
//! target (tree or scatter pose plus a procedural hover), spins or settles
//! according to its archetype, and is written to the instance batch.
//! The current pose lives in an arena parallel to the particles, so the
//! animator works with any [`InstanceSink`], including ones that cannot be
//! read back.

use glam::Vec3;
use crate::api::error::{require_positive, MorphError, Result};
use crate::api::types::MorphState;
use crate::components::archetype::ParticleArchetype;
use crate::components::color::Color;
use crate::components::particle::{Particle, ParticlePose};
use crate::core::rng::Rng;
use crate::core::smoothing::{blend_factor, lerp, lerp_euler, lerp_vec3, wrap_angle};
use crate::renderer::traits::InstanceSink;
use super::layout::{generate_layout, LayoutShape};

/// Default approach rate toward the target pose, per second.
pub const TRANSITION_SPEED: f32 = 2.5;
/// Free-spin rate multiplier applied to each particle's speed.
pub const SPIN_RATE: f32 = 0.5;

/// Sinusoidal hover around the base target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    pub amplitude: f32,
    pub frequency: f32,
}

/// Large, slow float while scattered.
pub const SCATTER_HOVER: Hover = Hover { amplitude: 0.5, frequency: 0.5 };
/// Small, quick breathing while tree-shaped.
pub const TREE_HOVER: Hover = Hover { amplitude: 0.1, frequency: 1.0 };

impl Hover {
    pub fn for_state(tree: bool) -> Self {
        if tree { TREE_HOVER } else { SCATTER_HOVER }
    }

    /// Offset for one particle at `time`. Each axis runs at a slightly
    /// different rate so the motion never traces a straight line.
    pub fn offset(&self, phase: f32, speed: f32, time: f32) -> Vec3 {
        let t = time * speed * self.frequency;
        Vec3::new(
            (t + phase).sin(),
            (t * 0.8 + phase).cos(),
            (t * 1.2 + phase).sin(),
        ) * self.amplitude
    }
}

/// What one animator pass did to its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchUpdate {
    /// The batch was not allocated yet; nothing was touched.
    pub skipped: bool,
    pub transforms_written: usize,
    pub colors_written: usize,
    /// Particles whose new pose came out non-finite and were held at their previous pose.
    pub rejected: usize,
}

impl BatchUpdate {
    pub fn skipped() -> Self {
        Self { skipped: true, ..Self::default() }
    }
}

/// One batch of morphing particles sharing a geometry and material.
#[derive(Debug, Clone)]
pub struct MorphGroup {
    name: String,
    archetype: ParticleArchetype,
    particles: Vec<Particle>,
    poses: Vec<ParticlePose>,
    scale_range: (f32, f32),
    transition_speed: f32,
    colors_uploaded: bool,
}

impl MorphGroup {
    /// Wrap pre-generated particles. Poses start at the identity transform.
    pub fn new(
        name: impl Into<String>,
        archetype: ParticleArchetype,
        particles: Vec<Particle>,
        scale_range: (f32, f32),
        transition_speed: f32,
    ) -> Result<Self> {
        let name = name.into();
        if particles.is_empty() {
            return Err(MorphError::EmptyGroup { group: name });
        }
        let (min, max) = scale_range;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(MorphError::InvalidScaleRange { group: name, min, max });
        }
        require_positive("transition_speed", transition_speed)?;

        let poses = vec![ParticlePose::default(); particles.len()];
        Ok(Self {
            name,
            archetype,
            particles,
            poses,
            scale_range,
            transition_speed,
            colors_uploaded: false,
        })
    }

    /// Generate a layout and wrap it in one step.
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        name: impl Into<String>,
        archetype: ParticleArchetype,
        count: usize,
        palette: &[Color],
        shape: &LayoutShape,
        scale_range: (f32, f32),
        transition_speed: f32,
        rng: &mut Rng,
    ) -> Result<Self> {
        let name = name.into();
        let particles = generate_layout(&name, count, palette, archetype, shape, rng)?;
        Self::new(name, archetype, particles, scale_range, transition_speed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> ParticleArchetype {
        self.archetype
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn poses(&self) -> &[ParticlePose] {
        &self.poses
    }

    /// Overwrite the current pose of one particle.
    pub fn set_pose(&mut self, index: usize, pose: ParticlePose) {
        self.poses[index] = pose;
    }

    /// Force colors to be written again on the next frame (after a remount).
    pub fn invalidate_colors(&mut self) {
        self.colors_uploaded = false;
    }

    /// Pulse scale of a particle: fixed by its phase, independent of state.
    pub fn pulse_scale(&self, particle: &Particle) -> f32 {
        let (min, max) = self.scale_range;
        lerp(min, max, (particle.phase.sin() + 1.0) * 0.5)
    }

    /// Rebuild the pose arena from matrices already in `sink`.
    /// For renderers that preserve the last written matrix between frames.
    pub fn recover_poses<S: InstanceSink>(&mut self, sink: &S) {
        if !sink.is_allocated() {
            return;
        }
        for (i, pose) in self.poses.iter_mut().enumerate() {
            let recovered = ParticlePose::from_matrix(&sink.transform_at(i));
            if recovered.is_finite() {
                *pose = recovered;
            }
        }
    }

    /// Advance every particle one frame and write the batch.
    ///
    /// Skips the whole pass if the sink is not allocated yet. Colors are
    /// written on the first pass that finds the sink allocated; transforms
    /// every pass, with the dirty flag raised once at the end.
    pub fn tick<S: InstanceSink>(&mut self, state: MorphState, time: f32, dt: f32, sink: &mut S) -> BatchUpdate {
        if !sink.is_allocated() {
            log::trace!("{}: batch not allocated, skipping frame", self.name);
            return BatchUpdate::skipped();
        }
        debug_assert!(sink.len() >= self.particles.len(), "{}: batch smaller than group", self.name);

        let mut update = BatchUpdate::default();

        if !self.colors_uploaded {
            for (i, p) in self.particles.iter().enumerate() {
                sink.set_color(i, p.color);
            }
            sink.mark_colors_dirty();
            self.colors_uploaded = true;
            update.colors_written = self.particles.len();
        }

        let tree = state.is_tree();
        let locked = self.archetype.locks_in(tree);
        let hover = Hover::for_state(tree);
        let factor = blend_factor(self.transition_speed, dt);

        for i in 0..self.particles.len() {
            let p = &self.particles[i];
            let current = self.poses[i];

            let mut target = p.target_position(tree);
            if !locked {
                target += hover.offset(p.phase, p.speed, time);
            }

            let rotation = if locked {
                lerp_euler(current.rotation, p.tree_rotation, factor)
            } else {
                let spin = dt * p.speed * SPIN_RATE;
                Vec3::new(
                    spin_axis(current.rotation.x, spin),
                    spin_axis(current.rotation.y, spin),
                    current.rotation.z,
                )
            };

            let next = ParticlePose {
                position: lerp_vec3(current.position, target, factor),
                rotation,
            };

            // A bad value stays local to this particle.
            let pose = if next.is_finite() {
                self.poses[i] = next;
                next
            } else {
                update.rejected += 1;
                current
            };

            let scale = self.pulse_scale(p);
            sink.set_transform(i, pose.to_matrix(scale));
        }

        sink.mark_transforms_dirty();
        update.transforms_written = self.particles.len();

        if update.rejected > 0 {
            log::debug!("{}: held {} particles with non-finite poses", self.name, update.rejected);
        }
        update
    }
}

/// Advance one Euler axis, wrapping only once it leaves [-π, π] so a zero
/// increment leaves the angle bit-for-bit unchanged.
#[inline]
fn spin_axis(angle: f32, increment: f32) -> f32 {
    let a = angle + increment;
    if a.abs() > std::f32::consts::PI {
        wrap_angle(a)
    } else {
        a
    }
}
