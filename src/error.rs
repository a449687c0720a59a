//! Construction-time errors.
//!
//! Every geometric routine in this crate is total over well-formed input, so
//! the only failures surface while building shapes, bodies, containers and
//! worlds.

use thiserror::Error;

/// Errors raised while constructing physics objects.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// A vertex list was empty; there are no valid fallback bounds.
    #[error("geometry has no vertices")]
    EmptyGeometry,

    /// A face referenced a vertex past the end of the vertex list.
    #[error("face {face} references a vertex outside 0..{vertex_count}")]
    FaceOutOfBounds {
        /// Index of the offending face.
        face: usize,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// Mass must be positive and finite.
    #[error("invalid mass {0}: must be positive and finite")]
    InvalidMass(f32),

    /// Scale must be positive and finite.
    #[error("invalid scale {0}: must be positive and finite")]
    InvalidScale(f32),

    /// The shape's derived extents give a zero or non-finite inertia tensor.
    #[error("degenerate shape: derived inertia tensor is not positive definite")]
    DegenerateShape,

    /// The container's min corner is not strictly below its max corner.
    #[error("invalid container bounds")]
    InvalidContainer,

    /// The world holds as many bodies as its capacity allows.
    #[error("world is full ({capacity} bodies)")]
    CapacityExceeded {
        /// Compile-time body capacity of the world.
        capacity: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PhysicsError>;
