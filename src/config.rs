//! World-wide simulation constants.
//!
//! A [`WorldConfig`] is handed to [`PhysicsWorld::new`](crate::world::PhysicsWorld::new)
//! once and is read-only afterwards.

use nalgebra::Vector3;

/// Default gravitational acceleration (m/s²).
pub const GRAVITY: Vector3<f32> = Vector3::new(0.0, -9.81, 0.0);
/// Default coefficient of restitution.
pub const RESTITUTION: f32 = 0.9;
/// Default linear and angular damping coefficient (per second).
pub const DAMPING: f32 = 0.1;
/// Penetration depth reported for mesh/mesh contacts, which carry no depth information.
pub const MESH_PENETRATION: f32 = 0.005;
/// Distance under which a vertex is considered to lie on a triangle's plane.
pub const COPLANAR_EPSILON: f32 = 1e-3;

/// Read-only parameters shared by every body in a world.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Acceleration applied to every body each step.
    pub gravity: Vector3<f32>,
    /// Bounciness used for every contact, `0.0..=1.0`.
    pub restitution: f32,
    /// Exponential linear damping: `v -= v * linear_damping * dt`.
    pub linear_damping: f32,
    /// Exponential angular damping: `ω -= ω * angular_damping * dt`.
    pub angular_damping: f32,
    /// Fixed penetration depth for mesh contacts.
    pub mesh_penetration: f32,
    /// Coplanarity tolerance of the triangle/triangle test.
    pub coplanar_epsilon: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: RESTITUTION,
            linear_damping: DAMPING,
            angular_damping: DAMPING,
            mesh_penetration: MESH_PENETRATION,
            coplanar_epsilon: COPLANAR_EPSILON,
        }
    }
}

impl WorldConfig {
    /// Builder: set gravity (e.g. `Vector3::zeros()` for free space).
    pub fn with_gravity(mut self, gravity: Vector3<f32>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set restitution (clamped to `0.0..=1.0`).
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Builder: set both damping coefficients (clamped to be non-negative).
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
        self
    }

    /// Builder: set the mesh contact penetration depth.
    pub fn with_mesh_penetration(mut self, depth: f32) -> Self {
        self.mesh_penetration = depth.max(0.0);
        self
    }

    /// Builder: set the triangle coplanarity tolerance.
    pub fn with_coplanar_epsilon(mut self, epsilon: f32) -> Self {
        self.coplanar_epsilon = epsilon.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.gravity, Vector3::new(0.0, -9.81, 0.0));
        assert_eq!(config.restitution, 0.9);
        assert_eq!(config.linear_damping, 0.1);
        assert_eq!(config.angular_damping, 0.1);
        assert_eq!(config.mesh_penetration, 0.005);
    }

    #[test]
    fn test_builder_clamps() {
        let config = WorldConfig::default()
            .with_restitution(1.5)
            .with_damping(-1.0, 0.2)
            .with_gravity(Vector3::zeros());
        assert_eq!(config.restitution, 1.0);
        assert_eq!(config.linear_damping, 0.0);
        assert_eq!(config.angular_damping, 0.2);
        assert_eq!(config.gravity, Vector3::zeros());
    }
}
