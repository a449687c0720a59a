//! Collision dispatch and narrow phase.
//!
//! Shapes form a closed set, so the dispatcher is a single `match` over both
//! bodies' shapes. Each unordered pair of kinds has one implementation; the
//! swapped arm runs it with A and B exchanged and flips the resulting contact.
//!
//! Mesh pairs go through a mandatory bounding-volume prefilter before the
//! triangle scan.

use nalgebra::Vector3;

use crate::body::RigidBody;
use crate::config::WorldConfig;
use crate::contact::{resolve_pair, Contact};
use crate::geometry::{
    sphere_obb_collision, sphere_obb_intersect, sphere_sphere_intersect, triangle_intersection,
};
use crate::shape::Shape;

/// Test two bodies for intersection and build a contact if they overlap.
///
/// Pure: neither body is modified, so repeated calls on unchanged bodies give
/// identical results. The returned normal points from `a` toward `b`.
pub fn collide(a: &RigidBody, b: &RigidBody, config: &WorldConfig) -> Option<Contact> {
    match (*a.shape(), *b.shape()) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            sphere_sphere(&a.position, ra, &b.position, rb)
        }
        (Shape::Sphere { radius }, Shape::Box { half_extents }) => {
            sphere_obb_collision(&a.position, radius, &b.pose(), &half_extents)
        }
        (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) => {
            box_box(a, &ha, b, &hb)
        }
        (Shape::Sphere { radius }, Shape::Mesh { bounding_radius, .. }) => {
            if !sphere_sphere_intersect(&a.position, radius, &b.position, bounding_radius) {
                return None;
            }
            mesh_mesh(a, b, config)
        }
        (Shape::Box { half_extents }, Shape::Mesh { bounding_radius, .. }) => {
            if !sphere_obb_intersect(&b.position, bounding_radius, &a.pose(), &half_extents) {
                return None;
            }
            mesh_mesh(a, b, config)
        }
        (
            Shape::Mesh {
                bounding_radius: ra,
                ..
            },
            Shape::Mesh {
                bounding_radius: rb,
                ..
            },
        ) => {
            if !sphere_sphere_intersect(&a.position, ra, &b.position, rb) {
                return None;
            }
            mesh_mesh(a, b, config)
        }
        (Shape::Box { .. }, Shape::Sphere { .. })
        | (Shape::Mesh { .. }, Shape::Sphere { .. })
        | (Shape::Mesh { .. }, Shape::Box { .. }) => collide(b, a, config).map(|c| c.flipped()),
    }
}

/// Detect and, on contact, resolve the pair in place.
pub fn handle_collision(a: &mut RigidBody, b: &mut RigidBody, config: &WorldConfig) -> Option<Contact> {
    let contact = collide(a, b, config)?;
    resolve_pair(a, b, &contact, config.restitution);
    Some(contact)
}

/// Direction from `from` to `to`, or +Y when the points coincide.
#[inline]
fn direction_or_up(from: &Vector3<f32>, to: &Vector3<f32>) -> Vector3<f32> {
    (to - from).try_normalize(1e-6).unwrap_or_else(Vector3::y)
}

/// Sphere vs sphere contact. Touching spheres do not collide.
pub fn sphere_sphere(
    pos_a: &Vector3<f32>,
    radius_a: f32,
    pos_b: &Vector3<f32>,
    radius_b: f32,
) -> Option<Contact> {
    if !sphere_sphere_intersect(pos_a, radius_a, pos_b, radius_b) {
        return None;
    }
    let normal = direction_or_up(pos_a, pos_b);
    Some(Contact {
        normal,
        penetration: radius_a + radius_b - (pos_b - pos_a).norm(),
        point_a: pos_a + normal * radius_a,
        point_b: pos_b - normal * radius_b,
    })
}

/// Projected radius of a box (given by its world axes and half-extents) on `axis`.
#[inline]
fn project(axes: &[Vector3<f32>; 3], half_extents: &Vector3<f32>, axis: &Vector3<f32>) -> f32 {
    (0..3).map(|i| half_extents[i] * axes[i].dot(axis).abs()).sum()
}

fn world_axes(body: &RigidBody) -> [Vector3<f32>; 3] {
    [
        body.orientation * Vector3::x(),
        body.orientation * Vector3::y(),
        body.orientation * Vector3::z(),
    ]
}

/// Oriented box vs oriented box using the Separating Axis Theorem.
///
/// Tests the 3 + 3 face axes and the 9 edge cross products. Cross products of
/// (nearly) parallel edges are skipped. The axis of least overlap, oriented
/// from A to B, becomes the normal. The contact point lies on the line between
/// the centers, split in proportion to both boxes' extents along that line.
pub fn box_box(
    a: &RigidBody,
    half_a: &Vector3<f32>,
    b: &RigidBody,
    half_b: &Vector3<f32>,
) -> Option<Contact> {
    let axes_a = world_axes(a);
    let axes_b = world_axes(b);
    let d = b.position - a.position;

    let mut min_overlap = f32::MAX;
    let mut best_axis = Vector3::zeros();

    let face_axes = axes_a.iter().chain(axes_b.iter()).copied();
    let edge_axes = axes_a
        .iter()
        .flat_map(|ea| axes_b.iter().map(move |eb| ea.cross(eb)))
        .filter_map(|axis| axis.try_normalize(1e-6));

    for axis in face_axes.chain(edge_axes) {
        let overlap =
            project(&axes_a, half_a, &axis) + project(&axes_b, half_b, &axis) - d.dot(&axis).abs();
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            best_axis = axis;
        }
    }

    let normal = if best_axis.dot(&d) < 0.0 {
        -best_axis
    } else {
        best_axis
    };

    let point = match d.try_normalize(1e-6) {
        Some(line) => {
            let extent_a = project(&axes_a, half_a, &line);
            let extent_b = project(&axes_b, half_b, &line);
            a.position + d * (extent_a / (extent_a + extent_b))
        }
        None => a.position,
    };

    Some(Contact {
        normal,
        penetration: min_overlap,
        point_a: point,
        point_b: point,
    })
}

/// Triangle scan between the world triangles of two bodies.
///
/// The first intersecting pair wins: the contact sits at the midpoint of the
/// overlap segment, the normal joins the body centers and the penetration is
/// the configured mesh constant.
pub fn mesh_mesh(a: &RigidBody, b: &RigidBody, config: &WorldConfig) -> Option<Contact> {
    let segment = a.world_triangles().iter().find_map(|t1| {
        b.world_triangles()
            .iter()
            .find_map(|t2| triangle_intersection(t1, t2, config.coplanar_epsilon))
    })?;

    let point = segment.midpoint();
    Some(Contact {
        normal: direction_or_up(&a.position, &b.position),
        penetration: config.mesh_penetration,
        point_a: point,
        point_b: point,
    })
}
