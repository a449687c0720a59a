//! Rigid-body dynamics for embedded targets.
//!
//! Spheres, oriented boxes and convex triangle meshes (cones) move inside an
//! axis-aligned container under gravity. Every step the world resolves all
//! overlapping pairs with an impulse-based response (linear and angular),
//! integrates with semi-implicit Euler and reflects bodies that leave the
//! container.
//!
//! Designed for `no_std` environments: the world stores its bodies in a
//! fixed-capacity `heapless::Vec`; per-body triangle buffers use `alloc`.
//!
//! # Example
//! ```
//! use embedded_rigid3d::{primitives, Container, PhysicsWorld, RigidBody, ShapeDescriptor, WorldConfig};
//! use nalgebra::Vector3;
//!
//! let container = Container::new(Vector3::new(-2.0, 0.0, -2.0), Vector3::new(2.0, 4.0, 2.0)).unwrap();
//! let mut world = PhysicsWorld::<8>::new(container, WorldConfig::default());
//!
//! let cube = primitives::cuboid(Vector3::new(0.25, 0.25, 0.25));
//! let crate_box = RigidBody::new(ShapeDescriptor::cuboid(&cube.geometry(), 1.0).unwrap(), 2.0)
//!     .unwrap()
//!     .with_position(Vector3::new(0.0, 3.0, 0.0));
//! let id = world.add_body(crate_box).unwrap();
//!
//! for _ in 0..240 {
//!     world.step(1.0 / 60.0);
//! }
//! // Never leaves the container
//! assert!(world.body(id).unwrap().position.y >= 0.0);
//! ```
#![no_std]

extern crate alloc;

pub mod body;
pub mod collision;
pub mod config;
pub mod contact;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod primitives;
pub mod shape;
pub mod world;

pub use body::RigidBody;
pub use config::WorldConfig;
pub use contact::Contact;
pub use error::{PhysicsError, Result};
pub use mesh::{Geometry, MeshData};
pub use shape::{Shape, ShapeDescriptor, ShapeKind};
pub use world::{BodyId, Container, PhysicsWorld};
