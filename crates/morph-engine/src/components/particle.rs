use glam::{Mat4, Quat, Vec3};
use super::color::Color;

/// Static layout data for one particle. Generated once, never regenerated.
///
/// Rotations are Euler angles in XYZ order, stored as `Vec3`.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in the scattered cloud.
    pub scatter_position: Vec3,
    pub scatter_rotation: Vec3,
    /// Position on the tree cone.
    pub tree_position: Vec3,
    pub tree_rotation: Vec3,
    /// Desynchronization phase in [0, 2π).
    pub phase: f32,
    /// Animation speed multiplier in [0.5, 1.0].
    pub speed: f32,
    /// Instance color, fixed at creation.
    pub color: Color,
}

impl Particle {
    pub fn target_position(&self, tree: bool) -> Vec3 {
        if tree { self.tree_position } else { self.scatter_position }
    }
}

/// Current rendered pose of a particle.
/// Kept in an arena parallel to the particles instead of being read back
/// from the render buffer every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePose {
    pub position: Vec3,
    /// Euler angles, XYZ order.
    pub rotation: Vec3,
}

impl Default for ParticlePose {
    /// Identity transform: what an untouched instance slot holds.
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl ParticlePose {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }

    /// Compose scale, rotation and translation into an instance matrix.
    pub fn to_matrix(&self, scale: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(scale), euler_to_quat(self.rotation), self.position)
    }

    /// Decompose an instance matrix back into a pose (scale is dropped).
    pub fn from_matrix(m: &Mat4) -> Self {
        let (_, rotation, position) = m.to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(glam::EulerRot::XYZ);
        Self {
            position,
            rotation: Vec3::new(x, y, z),
        }
    }
}

#[inline]
pub fn euler_to_quat(e: Vec3) -> Quat {
    Quat::from_euler(glam::EulerRot::XYZ, e.x, e.y, e.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_is_identity() {
        assert_eq!(ParticlePose::default().to_matrix(1.0), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_round_trip() {
        let pose = ParticlePose {
            position: Vec3::new(1.0, -2.0, 3.5),
            rotation: Vec3::new(-0.5, 1.2, 0.0),
        };
        let m = pose.to_matrix(1.3);
        let back = ParticlePose::from_matrix(&m);
        assert!(back.position.abs_diff_eq(pose.position, 1e-5));
        // Euler angles are not unique; compare the rebuilt matrices instead.
        assert!(back.to_matrix(1.3).abs_diff_eq(m, 1e-4));
    }

    #[test]
    fn target_selects_layout() {
        let p = Particle {
            scatter_position: Vec3::X,
            scatter_rotation: Vec3::ZERO,
            tree_position: Vec3::Y,
            tree_rotation: Vec3::ZERO,
            phase: 0.0,
            speed: 1.0,
            color: Color::WHITE,
        };
        assert_eq!(p.target_position(false), Vec3::X);
        assert_eq!(p.target_position(true), Vec3::Y);
    }
}
