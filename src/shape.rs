//! Shape descriptors.
//!
//! A [`ShapeDescriptor`] is built once per body from shape-source geometry and
//! a uniform scale. It carries the derived dimensions of the shape (radius,
//! half-extents, bounding-sphere radius) plus the shape-local triangles and
//! hull vertices used by the mesh narrow phase and the container check.

use alloc::vec::Vec;
use nalgebra::{Matrix3, Vector3};

#[allow(unused_imports)]
use nalgebra::ComplexField;

use crate::error::{PhysicsError, Result};
use crate::geometry::{compute_local_bounds, Triangle};
use crate::mesh::Geometry;

/// The closed set of collision shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Sphere,
    Box,
    Mesh,
}

/// Collision shape with its derived dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A sphere centered on the body position.
    Sphere { radius: f32 },
    /// An oriented box, defined by half-extents along its local axes.
    Box { half_extents: Vector3<f32> },
    /// An arbitrary convex triangle mesh (a cone in practice).
    ///
    /// `base_radius` and `half_height` describe the cone-shaped mass
    /// distribution used for the inertia tensor, with the axis along local Y.
    Mesh {
        bounding_radius: f32,
        base_radius: f32,
        half_height: f32,
    },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Mesh { .. } => ShapeKind::Mesh,
        }
    }

    /// Radius of a sphere centered on the body that encloses the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Sphere { radius } => *radius,
            Shape::Box { half_extents } => half_extents.norm(),
            Shape::Mesh {
                bounding_radius, ..
            } => *bounding_radius,
        }
    }

    /// Body-space inertia tensor for the given mass.
    ///
    /// - Sphere: `I = (2/5) m r²` on every axis.
    /// - Box with half-extents `h`: `Ixx = (m/12)(4hy² + 4hz²)`, and so on.
    /// - Mesh (cone about Y, radius `r`, half-height `h`):
    ///   `Ixx = Izz = m (3/20 r² + 1/10 h²)`, `Iyy = (3/20) m r²`.
    pub fn inertia_tensor(&self, mass: f32) -> Matrix3<f32> {
        let diagonal = match self {
            Shape::Sphere { radius } => {
                let i = 0.4 * mass * radius * radius;
                Vector3::new(i, i, i)
            }
            Shape::Box { half_extents } => {
                let hx2 = 4.0 * half_extents.x * half_extents.x;
                let hy2 = 4.0 * half_extents.y * half_extents.y;
                let hz2 = 4.0 * half_extents.z * half_extents.z;
                let k = mass / 12.0;
                Vector3::new(k * (hy2 + hz2), k * (hx2 + hz2), k * (hx2 + hy2))
            }
            Shape::Mesh {
                base_radius,
                half_height,
                ..
            } => {
                let r2 = base_radius * base_radius;
                let h2 = half_height * half_height;
                let transverse = mass * (3.0 / 20.0 * r2 + 1.0 / 10.0 * h2);
                Vector3::new(transverse, 3.0 / 20.0 * mass * r2, transverse)
            }
        };
        Matrix3::from_diagonal(&diagonal)
    }
}

/// Per-instance geometric data derived once from a shape source.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    shape: Shape,
    triangles: Vec<Triangle>,
    hull: Vec<Vector3<f32>>,
}

fn check_scale(scale: f32) -> Result<()> {
    if scale > 0.0 && scale.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidScale(scale))
    }
}

impl ShapeDescriptor {
    /// Sphere whose radius is half the scaled X extent of the geometry.
    pub fn sphere(geometry: &Geometry<'_>, scale: f32) -> Result<Self> {
        check_scale(scale)?;
        geometry.validate()?;
        let (min, max) = compute_local_bounds(geometry.vertices)?;
        let radius = scale * (max.x - min.x) * 0.5;
        Self::build(
            Shape::Sphere { radius },
            geometry.scaled_triangles(scale),
            Vec::new(),
        )
    }

    /// Oriented box whose half-extents are half the scaled bounds of the geometry.
    ///
    /// The hull used for the container check is the box's eight corners.
    pub fn cuboid(geometry: &Geometry<'_>, scale: f32) -> Result<Self> {
        check_scale(scale)?;
        geometry.validate()?;
        let (min, max) = compute_local_bounds(geometry.vertices)?;
        let half_extents = (max - min) * (scale * 0.5);
        let hull = box_corners(&half_extents);
        Self::build(
            Shape::Box { half_extents },
            geometry.scaled_triangles(scale),
            hull.to_vec(),
        )
    }

    /// Convex mesh (cone) with a bounding sphere of half the scaled bounds diagonal.
    pub fn mesh(geometry: &Geometry<'_>, scale: f32) -> Result<Self> {
        check_scale(scale)?;
        geometry.validate()?;
        let (min, max) = compute_local_bounds(geometry.vertices)?;
        let extent = (max - min) * scale;
        Self::build(
            Shape::Mesh {
                bounding_radius: extent.norm() * 0.5,
                base_radius: extent.x * 0.5,
                half_height: extent.y * 0.5,
            },
            geometry.scaled_triangles(scale),
            geometry.scaled_vertices(scale),
        )
    }

    fn build(shape: Shape, triangles: Vec<Triangle>, hull: Vec<Vector3<f32>>) -> Result<Self> {
        let unit_inertia = shape.inertia_tensor(1.0);
        let positive = (0..3).all(|i| {
            let v = unit_inertia[(i, i)];
            v > 0.0 && v.is_finite()
        });
        if !positive {
            return Err(PhysicsError::DegenerateShape);
        }
        Ok(Self {
            shape,
            triangles,
            hull,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Shape-local (scaled) triangles.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Shape-local vertices checked against the container (empty for spheres).
    pub fn hull(&self) -> &[Vector3<f32>] {
        &self.hull
    }

    pub(crate) fn into_parts(self) -> (Shape, Vec<Triangle>, Vec<Vector3<f32>>) {
        (self.shape, self.triangles, self.hull)
    }
}

/// The eight corners of a box centered at the origin.
pub fn box_corners(half_extents: &Vector3<f32>) -> [Vector3<f32>; 8] {
    let h = half_extents;
    [
        Vector3::new(-h.x, -h.y, -h.z),
        Vector3::new(h.x, -h.y, -h.z),
        Vector3::new(h.x, h.y, -h.z),
        Vector3::new(-h.x, h.y, -h.z),
        Vector3::new(-h.x, -h.y, h.z),
        Vector3::new(h.x, -h.y, h.z),
        Vector3::new(h.x, h.y, h.z),
        Vector3::new(-h.x, h.y, h.z),
    ]
}
