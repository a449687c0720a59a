//! Rigid bodies.
//!
//! A [`RigidBody`] owns its pose, velocities, force/torque accumulators and
//! the geometric data derived from its [`ShapeDescriptor`]. The body-space
//! inertia tensor and shape-local triangles are fixed at creation; their world
//! counterparts are derived from the pose by [`derive_world_state`] and
//! refreshed in place at the start of every world step.

use alloc::vec::Vec;
use log::trace;
use nalgebra::{Isometry3, Matrix3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};

// ComplexField provides sqrt() for f32 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

use crate::config::WorldConfig;
use crate::contact::{resolve_container, Contact};
use crate::error::{PhysicsError, Result};
use crate::geometry::{ray_sphere, Ray, RayHit, Triangle};
use crate::shape::{Shape, ShapeDescriptor, ShapeKind};
use crate::world::Container;

/// Body-space data, fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalState {
    pub inertia: Matrix3<f32>,
    pub inv_inertia: Matrix3<f32>,
    /// Shape-local (scaled) triangles.
    pub triangles: Vec<Triangle>,
}

/// World-space data derived from a pose and a [`LocalState`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    /// `R · I · Rᵀ`
    pub inertia: Matrix3<f32>,
    /// `R · I⁻¹ · Rᵀ`
    pub inv_inertia: Matrix3<f32>,
    pub triangles: Vec<Triangle>,
}

/// Derive the world inertia tensors and world triangles for `pose`.
pub fn derive_world_state(pose: &Isometry3<f32>, local: &LocalState) -> WorldState {
    let (inertia, inv_inertia) = rotate_inertia(&pose.rotation, local);
    WorldState {
        inertia,
        inv_inertia,
        triangles: local.triangles.iter().map(|t| t.transformed(pose)).collect(),
    }
}

#[inline]
fn rotate_inertia(rotation: &UnitQuaternion<f32>, local: &LocalState) -> (Matrix3<f32>, Matrix3<f32>) {
    let r = rotation.to_rotation_matrix();
    let r = r.matrix();
    (
        r * local.inertia * r.transpose(),
        r * local.inv_inertia * r.transpose(),
    )
}

/// A rigid body with linear and angular dynamics.
#[derive(Debug, Clone)]
pub struct RigidBody {
    // -- Pose and velocities --
    pub position: Vector3<f32>,
    /// Orientation quaternion. Defaults to identity (no rotation).
    pub orientation: UnitQuaternion<f32>,
    pub velocity: Vector3<f32>,
    /// Angular velocity in world-space (radians per second).
    pub angular_velocity: Vector3<f32>,

    mass: f32,
    inv_mass: f32,

    /// Accumulated forces applied this frame. Cleared after each step.
    force_accumulator: Vector3<f32>,
    /// Accumulated torques applied this frame. Cleared after each step.
    torque_accumulator: Vector3<f32>,

    shape: Shape,
    local: LocalState,
    world: WorldState,
    /// Shape-local vertices tested against the container (box corners, mesh vertices).
    hull: Vec<Vector3<f32>>,
}

impl RigidBody {
    /// Create a body at the origin, at rest, from a shape descriptor and a mass (in kg).
    ///
    /// Fails with [`PhysicsError::InvalidMass`] unless `mass` is positive and finite.
    pub fn new(descriptor: ShapeDescriptor, mass: f32) -> Result<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::InvalidMass(mass));
        }

        let (shape, triangles, hull) = descriptor.into_parts();
        let inertia = shape.inertia_tensor(mass);
        let inv_inertia = inertia.try_inverse().ok_or(PhysicsError::DegenerateShape)?;
        let local = LocalState {
            inertia,
            inv_inertia,
            triangles,
        };
        let world = derive_world_state(&Isometry3::identity(), &local);

        Ok(Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            mass,
            inv_mass: 1.0 / mass,
            force_accumulator: Vector3::zeros(),
            torque_accumulator: Vector3::zeros(),
            shape,
            local,
            world,
            hull,
        })
    }

    /// Builder: set initial position.
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self.refresh_world_state();
        self
    }

    /// Builder: set initial orientation.
    pub fn with_orientation(mut self, orientation: UnitQuaternion<f32>) -> Self {
        self.orientation = orientation;
        self.refresh_world_state();
        self
    }

    /// Builder: set initial velocity.
    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set initial angular velocity (in radians per second).
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f32>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Position and orientation as a single isometry.
    #[inline]
    pub fn pose(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position), self.orientation)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Body-space inertia tensor.
    pub fn inertia_local(&self) -> &Matrix3<f32> {
        &self.local.inertia
    }

    /// World-space inertia tensor as of the last refresh.
    pub fn inertia_world(&self) -> &Matrix3<f32> {
        &self.world.inertia
    }

    /// World-space inverse inertia tensor as of the last refresh.
    #[inline]
    pub fn inv_inertia_world(&self) -> Matrix3<f32> {
        self.world.inv_inertia
    }

    /// World-space triangles as of the last refresh.
    pub fn world_triangles(&self) -> &[Triangle] {
        &self.world.triangles
    }

    /// Accumulated force for the current step.
    pub fn force(&self) -> Vector3<f32> {
        self.force_accumulator
    }

    /// Accumulated torque for the current step.
    pub fn torque(&self) -> Vector3<f32> {
        self.torque_accumulator
    }

    /// Recompute the world inertia tensors and world triangles from the pose.
    ///
    /// The triangle buffer is reused; no allocation happens after creation.
    pub fn refresh_world_state(&mut self) {
        let pose = self.pose();
        self.refresh_inertia();
        for (world, local) in self.world.triangles.iter_mut().zip(&self.local.triangles) {
            *world = local.transformed(&pose);
        }
    }

    fn refresh_inertia(&mut self) {
        let (inertia, inv_inertia) = rotate_inertia(&self.orientation, &self.local);
        self.world.inertia = inertia;
        self.world.inv_inertia = inv_inertia;
    }

    // -- Force injection --

    /// Apply a force (in Newtons) through the center of mass. Accumulates until the next step.
    #[inline]
    pub fn add_force(&mut self, force: Vector3<f32>) {
        self.force_accumulator += force;
    }

    /// Apply a force at a world-space point; also accumulates the torque `(p - c) × f`.
    #[inline]
    pub fn add_force_at_position(&mut self, force: Vector3<f32>, point: Vector3<f32>) {
        self.force_accumulator += force;
        self.torque_accumulator += (point - self.position).cross(&force);
    }

    /// Apply a torque (in N·m). Accumulates until the next step.
    #[inline]
    pub fn add_torque(&mut self, torque: Vector3<f32>) {
        self.torque_accumulator += torque;
    }

    /// Apply an instantaneous impulse: `Δv = impulse / mass`.
    #[inline]
    pub fn add_linear_impulse(&mut self, impulse: Vector3<f32>) {
        self.velocity += impulse * self.inv_mass;
    }

    /// Apply an instantaneous angular impulse: `Δω = I⁻¹_world · impulse`.
    #[inline]
    pub fn add_angular_impulse(&mut self, impulse: Vector3<f32>) {
        self.angular_velocity += self.world.inv_inertia * impulse;
    }

    // -- Diagnostics --

    /// Returns the current speed (magnitude of velocity).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Returns the kinetic energy of this body: `0.5 * m * v^2`.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    /// Linear momentum `m * v`.
    #[inline]
    pub fn momentum(&self) -> Vector3<f32> {
        self.velocity * self.mass
    }

    /// Ray query against this body. Only spheres are hit analytically.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        match self.shape {
            Shape::Sphere { radius } => ray_sphere(ray, &self.position, radius),
            Shape::Box { .. } | Shape::Mesh { .. } => None,
        }
    }

    /// Integrate this body forward by `dt` seconds using semi-implicit Euler.
    ///
    /// Velocity is updated before position; orientation follows
    /// `q' = normalize(q + 0.5 * dt * ω * q)`. Damping is applied last and
    /// both accumulators are cleared.
    pub fn integrate(&mut self, dt: f32, config: &WorldConfig) {
        // --- Linear ---
        let acceleration = self.force_accumulator * self.inv_mass + config.gravity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        // --- Angular ---
        self.refresh_inertia();
        let angular_acceleration = self.world.inv_inertia * self.torque_accumulator;
        self.angular_velocity += angular_acceleration * dt;

        let w = self.angular_velocity * (0.5 * dt);
        let dq = Quaternion::new(0.0, w.x, w.y, w.z);
        let q = self.orientation.into_inner();
        self.orientation = UnitQuaternion::new_normalize(q + dq * q);
        self.refresh_inertia();

        // --- Damping ---
        self.velocity -= self.velocity * (config.linear_damping * dt);
        self.angular_velocity -= self.angular_velocity * (config.angular_damping * dt);

        self.force_accumulator = Vector3::zeros();
        self.torque_accumulator = Vector3::zeros();
    }

    /// Keep the body inside the container.
    ///
    /// Spheres are clamped per axis and their outward velocity component is
    /// reflected (`v = -e * v`). Boxes and meshes go through
    /// [`container_contact`](Self::container_contact) and the container resolver.
    pub fn constrain_to_container(&mut self, container: &Container, restitution: f32) {
        match self.shape {
            Shape::Sphere { radius } => {
                let (min, max) = (container.min(), container.max());
                for i in 0..3 {
                    if self.position[i] - min[i] <= radius {
                        self.position[i] = min[i] + radius;
                        if self.velocity[i] < 0.0 {
                            self.velocity[i] *= -restitution;
                        }
                    } else if max[i] - self.position[i] <= radius {
                        self.position[i] = max[i] - radius;
                        if self.velocity[i] > 0.0 {
                            self.velocity[i] *= -restitution;
                        }
                    }
                }
            }
            Shape::Box { .. } | Shape::Mesh { .. } => {
                if let Some(contact) = self.container_contact(container) {
                    trace!(
                        "container contact: depth {} normal {:?}",
                        contact.penetration,
                        contact.normal
                    );
                    resolve_container(self, &contact, restitution);
                }
            }
        }
    }

    /// Contact between the body's hull and the container walls, if any hull
    /// vertex lies outside.
    ///
    /// Every (vertex, axis) violation contributes its point and the outward
    /// axis normal: the contact point is their average, the normal their
    /// normalized sum and the penetration the shallowest violation.
    pub fn container_contact(&self, container: &Container) -> Option<Contact> {
        let pose = self.pose();
        let (min, max) = (container.min(), container.max());

        let mut point_sum = Vector3::zeros();
        let mut normal_sum = Vector3::zeros();
        let mut count = 0u32;
        let mut shallowest = f32::MAX;

        for vertex in &self.hull {
            let p = pose.transform_point(&Point3::from(*vertex)).coords;
            for i in 0..3 {
                let (depth, sign) = if p[i] < min[i] {
                    (min[i] - p[i], -1.0)
                } else if p[i] > max[i] {
                    (p[i] - max[i], 1.0)
                } else {
                    continue;
                };
                point_sum += p;
                normal_sum[i] += sign;
                count += 1;
                shallowest = shallowest.min(depth);
            }
        }

        if count == 0 {
            return None;
        }
        let normal = normal_sum.try_normalize(1e-6)?;
        let point = point_sum / count as f32;
        Some(Contact {
            normal,
            penetration: shallowest,
            point_a: point,
            point_b: point,
        })
    }
}
