use alloc::vec::Vec;
use log::error;
use nalgebra::Vector3;

use crate::error::{PhysicsError, Result};
use crate::geometry::Triangle;

/// Borrowed shape-source geometry: a vertex list and triangle faces indexing it.
///
/// This is the form in which collaborators (asset loaders, procedural
/// generators) hand meshes to the engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct Geometry<'a> {
    pub vertices: &'a [[f32; 3]],
    pub faces: &'a [[usize; 3]],
}

impl Geometry<'_> {
    /// Check that the geometry has vertices and that every face index is in range.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            error!("Vertices are empty");
            return Err(PhysicsError::EmptyGeometry);
        }

        for (i, face) in self.faces.iter().enumerate() {
            if face.iter().any(|&v| v >= self.vertices.len()) {
                error!("Face {} vertices are out of bounds", i);
                return Err(PhysicsError::FaceOutOfBounds {
                    face: i,
                    vertex_count: self.vertices.len(),
                });
            }
        }

        Ok(())
    }

    /// Vertices as vectors, multiplied by a uniform `scale`.
    pub fn scaled_vertices(&self, scale: f32) -> Vec<Vector3<f32>> {
        self.vertices
            .iter()
            .map(|v| Vector3::new(v[0], v[1], v[2]) * scale)
            .collect()
    }

    /// Faces resolved into shape-local triangles, multiplied by a uniform `scale`.
    ///
    /// Assumes the geometry was validated.
    pub fn scaled_triangles(&self, scale: f32) -> Vec<Triangle> {
        let vertex = |i: usize| {
            let v = self.vertices[i];
            Vector3::new(v[0], v[1], v[2]) * scale
        };
        self.faces
            .iter()
            .map(|f| Triangle::new(vertex(f[0]), vertex(f[1]), vertex(f[2])))
            .collect()
    }
}

/// Owned vertex/face buffers, as produced by the [`primitives`](crate::primitives) generators.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[usize; 3]>,
}

impl MeshData {
    /// Borrow the buffers as a [`Geometry`].
    pub fn geometry(&self) -> Geometry<'_> {
        Geometry {
            vertices: &self.vertices,
            faces: &self.faces,
        }
    }
}
