//! Layout generation: two static target poses per particle.
//!
//! Runs once per group at startup. Shape is deterministic, placement is
//! drawn from the supplied [`Rng`], so a fixed seed reproduces a layout
//! exactly and different seeds give statistically similar ones.

use std::f32::consts::PI;
use glam::Vec3;
use crate::api::error::{require_positive, MorphError, Result};
use crate::components::archetype::{ParticleArchetype, TreeOrientation};
use crate::components::color::Color;
use crate::components::particle::Particle;
use crate::core::rng::Rng;

/// Maximum radial offset (either direction) added to a tree position.
pub const TREE_JITTER: f32 = 0.25;
/// Probability that a particle's color gets a brightness boost.
pub const BRIGHT_CHANCE: f32 = 0.2;
/// Amount added to each channel of a boosted color.
pub const BRIGHT_BOOST: f32 = 0.2;
/// Upward tilt of outward-facing pieces on the tree.
pub const OUTWARD_TILT: f32 = -0.5;

/// Group-level shape constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutShape {
    pub tree_height: f32,
    pub tree_radius: f32,
    pub scatter_radius: f32,
}

impl Default for LayoutShape {
    fn default() -> Self {
        Self {
            tree_height: 14.0,
            tree_radius: 5.0,
            scatter_radius: 15.0,
        }
    }
}

impl LayoutShape {
    pub fn validate(&self) -> Result<()> {
        require_positive("tree_height", self.tree_height)?;
        require_positive("tree_radius", self.tree_radius)?;
        require_positive("scatter_radius", self.scatter_radius)
    }
}

/// Uniform random point inside a sphere of `radius`.
/// The cube-root radius keeps density even instead of piling up at the center.
pub fn sample_scatter_position(rng: &mut Rng, radius: f32) -> Vec3 {
    let theta = rng.angle();
    let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
    let r = ball_radius(rng.next_f32(), radius);
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Radius for a uniform draw `u` in [0, 1). Maps through (0, 1] so no
/// point lands exactly on the center.
#[inline]
fn ball_radius(u: f32, radius: f32) -> f32 {
    (1.0 - u).cbrt() * radius
}

/// Random point on the tree cone. Returns the position and the angle around
/// the trunk it was placed at (outward-facing pieces need it).
pub fn sample_tree_position(rng: &mut Rng, shape: &LayoutShape) -> (Vec3, f32) {
    // 0 at the base, 1 at the apex
    let y_norm = rng.next_f32();
    let y = (y_norm - 0.5) * shape.tree_height;
    let radius = (1.0 - y_norm) * shape.tree_radius;
    let angle = rng.angle();
    let r = radius + rng.range(-TREE_JITTER, TREE_JITTER);
    (Vec3::new(angle.cos() * r, y, angle.sin() * r), angle)
}

/// Random rotation on the first two axes, as used for scattered poses.
fn random_rotation(rng: &mut Rng) -> Vec3 {
    Vec3::new(rng.next_f32() * PI, rng.next_f32() * PI, 0.0)
}

/// Build `count` particles for one group.
///
/// Fails fast on an empty group, an empty palette or bad shape constants;
/// a misconfigured group must stop the scene from starting.
pub fn generate_layout(
    group: &str,
    count: usize,
    palette: &[Color],
    archetype: ParticleArchetype,
    shape: &LayoutShape,
    rng: &mut Rng,
) -> Result<Vec<Particle>> {
    if count == 0 {
        return Err(MorphError::EmptyGroup { group: group.to_string() });
    }
    if palette.is_empty() {
        return Err(MorphError::EmptyPalette { group: group.to_string() });
    }
    shape.validate()?;

    let orientation = archetype.policy().tree_orientation;
    let mut particles = Vec::with_capacity(count);

    for _ in 0..count {
        let scatter_position = sample_scatter_position(rng, shape.scatter_radius);
        let (tree_position, angle) = sample_tree_position(rng, shape);
        let scatter_rotation = random_rotation(rng);
        let tree_rotation = match orientation {
            TreeOrientation::OutwardUp => Vec3::new(OUTWARD_TILT, -angle, 0.0),
            TreeOrientation::Random => random_rotation(rng),
        };
        let phase = rng.angle();
        let speed = 0.5 + rng.next_f32() * 0.5;

        let mut color = palette[rng.next_int(palette.len() as u32) as usize];
        if rng.chance(BRIGHT_CHANCE) {
            color = color.add_scalar(BRIGHT_BOOST);
        }

        particles.push(Particle {
            scatter_position,
            scatter_rotation,
            tree_position,
            tree_rotation,
            phase,
            speed,
            color,
        });
    }

    Ok(particles)
}
