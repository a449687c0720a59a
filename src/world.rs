//! The simulation world.
//!
//! Owns a fixed-capacity set of rigid bodies, the axis-aligned container they
//! live in and the read-only [`WorldConfig`]. Designed for `no_std`: bodies are
//! stored in a `heapless::Vec` and addressed by their insertion index.
//!
//! # Example
//! ```
//! use embedded_rigid3d::primitives;
//! use embedded_rigid3d::shape::ShapeDescriptor;
//! use embedded_rigid3d::world::{Container, PhysicsWorld};
//! use embedded_rigid3d::{RigidBody, WorldConfig};
//! use nalgebra::Vector3;
//!
//! let container = Container::new(Vector3::new(-5.0, 0.0, -5.0), Vector3::new(5.0, 10.0, 5.0)).unwrap();
//! let mut world = PhysicsWorld::<16>::new(container, WorldConfig::default());
//!
//! let ball = primitives::uv_sphere(8, 16, 0.5);
//! let body = RigidBody::new(ShapeDescriptor::sphere(&ball.geometry(), 1.0).unwrap(), 1.0)
//!     .unwrap()
//!     .with_position(Vector3::new(0.0, 5.0, 0.0));
//! let id = world.add_body(body).unwrap();
//!
//! world.step(1.0 / 60.0);
//! assert!(world.body(id).unwrap().position.y < 5.0);
//! ```

use log::{debug, error, warn};
use nalgebra::{Point3, Similarity3, Vector3};

use crate::body::RigidBody;
use crate::collision::{collide, handle_collision};
use crate::config::WorldConfig;
use crate::contact::Contact;
use crate::error::{PhysicsError, Result};
use crate::geometry::{compute_local_bounds, Ray, RayHit};
use crate::mesh::Geometry;

/// Axis-aligned bounds every body is kept inside.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    min: Vector3<f32>,
    max: Vector3<f32>,
}

impl Container {
    /// Fails with [`PhysicsError::InvalidContainer`] unless `min < max` on every axis.
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Result<Self> {
        if !(min.x < max.x && min.y < max.y && min.z < max.z) {
            error!("Container bounds are empty: min {:?} max {:?}", min, max);
            return Err(PhysicsError::InvalidContainer);
        }
        Ok(Self { min, max })
    }

    /// Bounds of a reference mesh placed in the world by `transform`.
    ///
    /// Only the two corners of the local bounds are transformed, so the
    /// container stays axis-aligned.
    pub fn from_mesh(geometry: &Geometry<'_>, transform: &Similarity3<f32>) -> Result<Self> {
        geometry.validate()?;
        let (min, max) = compute_local_bounds(geometry.vertices)?;
        let a = transform.transform_point(&Point3::from(min)).coords;
        let b = transform.transform_point(&Point3::from(max)).coords;
        Self::new(a.inf(&b), a.sup(&b))
    }

    #[inline]
    pub fn min(&self) -> Vector3<f32> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vector3<f32> {
        self.max
    }

    /// Whether `point` lies inside or on the bounds.
    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

/// Identifier of a rigid body within a [`PhysicsWorld`] (its insertion index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The physics simulation world.
///
/// # Type Parameters
/// * `N` - Maximum number of bodies (compile-time capacity).
pub struct PhysicsWorld<const N: usize> {
    bodies: heapless::Vec<RigidBody, N>,
    container: Container,
    config: WorldConfig,
}

impl<const N: usize> PhysicsWorld<N> {
    pub fn new(container: Container, config: WorldConfig) -> Self {
        debug!(
            "physics world: capacity {}, container {:?}..{:?}",
            N, container.min, container.max
        );
        Self {
            bodies: heapless::Vec::new(),
            container,
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Add a body to the world. Bodies are never removed.
    pub fn add_body(&mut self, body: RigidBody) -> Result<BodyId> {
        let id = BodyId(self.bodies.len());
        let kind = body.kind();
        if self.bodies.push(body).is_err() {
            error!("World is full ({} bodies)", N);
            return Err(PhysicsError::CapacityExceeded { capacity: N });
        }
        debug!("added {:?} body {:?}", kind, id);
        Ok(id)
    }

    /// Get an immutable reference to a body by its ID.
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id.0)
    }

    /// Get a mutable reference to a body by its ID.
    ///
    /// Pose changes take effect on the world triangles at the next step.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id.0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Iterate over all bodies mutably.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut RigidBody)> {
        self.bodies.iter_mut().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Contact between two bodies as of their current state, without resolving it.
    pub fn collide(&self, a: BodyId, b: BodyId) -> Option<Contact> {
        if a == b {
            return None;
        }
        collide(self.body(a)?, self.body(b)?, &self.config)
    }

    /// Sum of the linear momenta of all bodies.
    pub fn total_momentum(&self) -> Vector3<f32> {
        self.bodies.iter().map(RigidBody::momentum).sum()
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// 1. Refresh every body's world inertia and triangles from its pose.
    /// 2. Visit every unordered pair once, in insertion order, resolving
    ///    contacts immediately: later pairs see the effect of earlier ones.
    /// 3. Integrate every body, then keep it inside the container.
    ///
    /// A non-positive or non-finite `dt` leaves the world untouched.
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            warn!("Ignoring step with invalid dt {}", dt);
            return;
        }

        for body in self.bodies.iter_mut() {
            body.refresh_world_state();
        }

        let config = &self.config;
        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                handle_collision(a, b, config);
            }
        }

        let container = &self.container;
        for body in self.bodies.iter_mut() {
            body.integrate(dt, config);
            body.constrain_to_container(container, config.restitution);
        }
    }

    /// Advance the simulation using fixed-size substeps for stability.
    ///
    /// Divides `dt` into `substeps` equal intervals.
    pub fn step_fixed(&mut self, dt: f32, substeps: u32) {
        if substeps == 0 {
            return;
        }
        let sub_dt = dt / substeps as f32;
        for _ in 0..substeps {
            self.step(sub_dt);
        }
    }

    /// Nearest body hit by `ray`, if any.
    pub fn raycast(&self, ray: &Ray) -> Option<(BodyId, RayHit)> {
        self.bodies()
            .filter_map(|(id, body)| body.raycast(ray).map(|hit| (id, hit)))
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
    }

    /// Push every body the ray hits with a force of `strength` along the ray,
    /// applied at the hit point. Returns the number of bodies pushed.
    pub fn push_along_ray(&mut self, ray: &Ray, strength: f32) -> usize {
        let force = ray.direction.into_inner() * strength;
        let mut pushed = 0;
        for body in self.bodies.iter_mut() {
            if let Some(hit) = body.raycast(ray) {
                body.add_force_at_position(force, hit.point);
                pushed += 1;
            }
        }
        pushed
    }
}
