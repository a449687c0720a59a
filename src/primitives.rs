//! Procedural shape sources.
//!
//! Stand-ins for imported assets: a UV sphere, a cuboid and a cone, all
//! centered on the origin. The cone's axis runs along +Y.

use alloc::vec::Vec;
use core::f32::consts::PI;
use nalgebra::Vector3;

// ComplexField provides sin()/cos() for f32 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

use crate::mesh::MeshData;

/// UV sphere with `rings` latitude bands and `segments` longitude slices.
///
/// Use an even number of rings and segments so the vertex bounds span the full
/// diameter on every axis.
pub fn uv_sphere(rings: usize, segments: usize, radius: f32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut vertices = Vec::with_capacity(2 + (rings - 1) * segments);
    let mut faces = Vec::with_capacity(2 * segments * (rings - 1));

    vertices.push([0.0, radius, 0.0]);
    for ring in 1..rings {
        let phi = PI * ring as f32 / rings as f32;
        let (sin_phi, cos_phi) = (phi.sin(), phi.cos());
        for segment in 0..segments {
            let theta = 2.0 * PI * segment as f32 / segments as f32;
            vertices.push([
                radius * sin_phi * theta.cos(),
                radius * cos_phi,
                radius * sin_phi * theta.sin(),
            ]);
        }
    }
    vertices.push([0.0, -radius, 0.0]);
    let bottom = vertices.len() - 1;

    let ring_start = |ring: usize| 1 + (ring - 1) * segments;

    for i in 0..segments {
        let next = (i + 1) % segments;
        faces.push([0, ring_start(1) + next, ring_start(1) + i]);
    }
    for ring in 1..rings - 1 {
        let upper = ring_start(ring);
        let lower = ring_start(ring + 1);
        for i in 0..segments {
            let next = (i + 1) % segments;
            faces.push([upper + i, upper + next, lower + i]);
            faces.push([upper + next, lower + next, lower + i]);
        }
    }
    let last = ring_start(rings - 1);
    for i in 0..segments {
        let next = (i + 1) % segments;
        faces.push([bottom, last + i, last + next]);
    }

    MeshData { vertices, faces }
}

/// Box with the given half-extents: 8 corner vertices, 12 triangles.
pub fn cuboid(half_extents: Vector3<f32>) -> MeshData {
    let corners = crate::shape::box_corners(&half_extents);
    let vertices = corners.iter().map(|c| [c.x, c.y, c.z]).collect();
    let faces = [
        [0, 2, 1],
        [0, 3, 2], // -Z
        [4, 5, 6],
        [4, 6, 7], // +Z
        [0, 1, 5],
        [0, 5, 4], // -Y
        [3, 7, 6],
        [3, 6, 2], // +Y
        [0, 4, 7],
        [0, 7, 3], // -X
        [1, 2, 6],
        [1, 6, 5], // +X
    ]
    .to_vec();

    MeshData { vertices, faces }
}

/// Cone with apex at `+height/2` on Y and a closed base disc at `-height/2`.
pub fn cone(segments: usize, radius: f32, height: f32) -> MeshData {
    let segments = segments.max(3);
    let half = height * 0.5;

    let mut vertices = Vec::with_capacity(segments + 2);
    vertices.push([0.0, half, 0.0]);
    vertices.push([0.0, -half, 0.0]);
    for i in 0..segments {
        let theta = 2.0 * PI * i as f32 / segments as f32;
        vertices.push([radius * theta.cos(), -half, radius * theta.sin()]);
    }

    let mut faces = Vec::with_capacity(segments * 2);
    for i in 0..segments {
        let next = (i + 1) % segments;
        faces.push([0, next + 2, i + 2]);
        faces.push([1, i + 2, next + 2]);
    }

    MeshData { vertices, faces }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::geometry::compute_local_bounds;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_uv_sphere_counts_and_bounds() {
        let data = uv_sphere(4, 8, 1.0);
        assert_eq!(data.vertices.len(), 2 + 3 * 8);
        assert_eq!(data.faces.len(), 2 * 8 * 3);
        assert!(data.geometry().validate().is_ok());

        let (min, max) = compute_local_bounds(&data.vertices).unwrap();
        assert!(approx_eq(max.x - min.x, 2.0));
        assert!(approx_eq(max.y - min.y, 2.0));
        assert!(approx_eq(max.z - min.z, 2.0));
    }

    #[test]
    fn test_uv_sphere_vertices_on_surface() {
        let data = uv_sphere(6, 12, 0.75);
        for v in &data.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!(approx_eq(r, 0.75));
        }
    }

    #[test]
    fn test_cuboid() {
        let data = cuboid(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(data.vertices.len(), 8);
        assert_eq!(data.faces.len(), 12);
        assert!(data.geometry().validate().is_ok());
        let (min, max) = compute_local_bounds(&data.vertices).unwrap();
        assert_eq!(min, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cone() {
        let data = cone(16, 0.5, 2.0);
        assert_eq!(data.vertices.len(), 18);
        assert_eq!(data.faces.len(), 32);
        assert!(data.geometry().validate().is_ok());
        let (min, max) = compute_local_bounds(&data.vertices).unwrap();
        assert!(approx_eq(min.y, -1.0));
        assert!(approx_eq(max.y, 1.0));
        assert!(approx_eq(max.x - min.x, 1.0));
    }
}
