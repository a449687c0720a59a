//! Geometry kernel.
//!
//! Bounds, closed-form sphere and oriented-box tests, the ray/sphere query and
//! Möller's interval-overlap triangle/triangle test. Everything here is a pure
//! function of its arguments.

use log::trace;
use nalgebra::{Isometry3, Point3, Unit, Vector3};

// ComplexField provides sqrt()/abs() for f32 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

use crate::contact::Contact;
use crate::error::{PhysicsError, Result};

/// A triangle given by its three corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vector3<f32>,
    pub b: Vector3<f32>,
    pub c: Vector3<f32>,
}

impl Triangle {
    pub const fn new(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Self {
        Self { a, b, c }
    }

    /// The triangle with every corner mapped through `pose`.
    #[inline]
    pub fn transformed(&self, pose: &Isometry3<f32>) -> Self {
        let map = |v: &Vector3<f32>| pose.transform_point(&Point3::from(*v)).coords;
        Self::new(map(&self.a), map(&self.b), map(&self.c))
    }

    /// Unit normal `(b - a) × (c - a)`, or `None` for a zero-area triangle.
    pub fn normal(&self) -> Option<Vector3<f32>> {
        (self.b - self.a)
            .cross(&(self.c - self.a))
            .try_normalize(1e-12)
    }

    fn vertices(&self) -> [Vector3<f32>; 3] {
        [self.a, self.b, self.c]
    }
}

/// A line segment, e.g. the overlap of two intersecting triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
}

impl Segment {
    #[inline]
    pub fn midpoint(&self) -> Vector3<f32> {
        (self.start + self.end) * 0.5
    }
}

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Returns `None` when `direction` has (near) zero length.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let direction = Unit::try_new(direction, 1e-12)?;
        Some(Self { origin, direction })
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction.into_inner() * t
    }
}

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray to the hit.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vector3<f32>,
}

/// Componentwise min/max over a vertex list.
///
/// Fails with [`PhysicsError::EmptyGeometry`] on an empty list.
pub fn compute_local_bounds(vertices: &[[f32; 3]]) -> Result<(Vector3<f32>, Vector3<f32>)> {
    let (first, rest) = vertices.split_first().ok_or(PhysicsError::EmptyGeometry)?;
    let first = Vector3::from(*first);
    Ok(rest.iter().fold((first, first), |(min, max), v| {
        let v = Vector3::from(*v);
        (min.inf(&v), max.sup(&v))
    }))
}

/// Sphere/sphere overlap without a square root.
///
/// Uses a strict comparison: touching spheres do not intersect.
#[inline]
pub fn sphere_sphere_intersect(
    pos_a: &Vector3<f32>,
    radius_a: f32,
    pos_b: &Vector3<f32>,
    radius_b: f32,
) -> bool {
    let sum_r = radius_a + radius_b;
    (pos_a - pos_b).norm_squared() < sum_r * sum_r
}

/// Closest point of a box (centered at the origin of its own frame) to `local`.
#[inline]
fn clamp_to_box(local: &Vector3<f32>, half_extents: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        local.x.clamp(-half_extents.x, half_extents.x),
        local.y.clamp(-half_extents.y, half_extents.y),
        local.z.clamp(-half_extents.z, half_extents.z),
    )
}

/// Sphere vs oriented box overlap test.
///
/// The sphere center is moved into the box frame and clamped to the
/// half-extents; the squared distance to that closest point is compared with
/// the squared radius.
pub fn sphere_obb_intersect(
    center: &Vector3<f32>,
    radius: f32,
    box_pose: &Isometry3<f32>,
    half_extents: &Vector3<f32>,
) -> bool {
    let local = box_pose.inverse_transform_point(&Point3::from(*center)).coords;
    let closest = clamp_to_box(&local, half_extents);
    (closest - local).norm_squared() < radius * radius
}

/// Sphere vs oriented box contact.
///
/// The sphere is body A, the box body B: the normal points from the sphere
/// toward the box. `point_a` lies on the sphere surface, `point_b` on the box.
pub fn sphere_obb_collision(
    center: &Vector3<f32>,
    radius: f32,
    box_pose: &Isometry3<f32>,
    half_extents: &Vector3<f32>,
) -> Option<Contact> {
    let local = box_pose.inverse_transform_point(&Point3::from(*center)).coords;
    let closest = clamp_to_box(&local, half_extents);
    let to_box = closest - local;
    let dist_sq = to_box.norm_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let (normal_local, closest, penetration) = if dist > 1e-6 {
        (to_box / dist, closest, radius - dist)
    } else {
        // Center inside the box: push out through the nearest face.
        let mut best_axis = 0;
        let mut best_sign = 1.0;
        let mut min_dist = f32::MAX;
        for i in 0..3 {
            let to_max = half_extents[i] - local[i];
            let to_min = local[i] + half_extents[i];
            if to_max < min_dist {
                min_dist = to_max;
                best_axis = i;
                best_sign = 1.0;
            }
            if to_min < min_dist {
                min_dist = to_min;
                best_axis = i;
                best_sign = -1.0;
            }
        }
        let mut face_normal = Vector3::zeros();
        face_normal[best_axis] = best_sign;
        (-face_normal, local + face_normal * min_dist, radius + min_dist)
    };

    let normal = box_pose.rotation * normal_local;
    Some(Contact {
        normal,
        penetration,
        point_a: center + normal * radius,
        point_b: box_pose.transform_point(&Point3::from(closest)).coords,
    })
}

/// Analytic ray/sphere query.
///
/// Spheres behind the ray origin, or farther from the ray than their radius,
/// are not hit.
pub fn ray_sphere(ray: &Ray, center: &Vector3<f32>, radius: f32) -> Option<RayHit> {
    let along = (center - ray.origin).dot(&ray.direction.into_inner());
    if along < 0.0 {
        return None;
    }

    let dist_sq = (center - ray.point_at(along)).norm_squared();
    let radius_sq = radius * radius;
    if dist_sq > radius_sq {
        return None;
    }

    let distance = along - (radius_sq - dist_sq).sqrt();
    Some(RayHit {
        distance,
        point: ray.point_at(distance),
    })
}

// ---------------------------------------------------------------------------
// Triangle / triangle
// ---------------------------------------------------------------------------

/// Where a triangle sits relative to another triangle's plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneTest {
    /// The plane cuts the triangle; signed vertex distances and the plane normal.
    Crossing {
        distances: [f32; 3],
        normal: Vector3<f32>,
    },
    /// All vertices strictly on one side.
    Separated,
    /// All vertices within epsilon of the plane.
    Coplanar,
}

/// Zero counts as positive, so a vertex touching the plane does not split it.
#[inline]
fn sign(x: f32) -> f32 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Classify triangle `other` against the plane of `tri`.
pub fn test_planes(tri: &Triangle, other: &Triangle, epsilon: f32) -> PlaneTest {
    let Some(normal) = tri.normal() else {
        return PlaneTest::Separated;
    };
    let offset = normal.dot(&tri.a);
    let distances = other.vertices().map(|v| normal.dot(&v) - offset);

    if distances.iter().all(|d| d.abs() < epsilon) {
        return PlaneTest::Coplanar;
    }

    let sign_sum: f32 = distances.iter().map(|&d| sign(d)).sum();
    if sign_sum.abs() == 3.0 {
        return PlaneTest::Separated;
    }

    PlaneTest::Crossing { distances, normal }
}

/// Interval of `tri` on the intersection line, projected on coordinate `axis`,
/// together with the two world-space endpoints. Sorted so `.0 <= .1`.
fn line_interval(
    tri: &Triangle,
    d: [f32; 3],
    axis: usize,
) -> ((f32, f32), (Vector3<f32>, Vector3<f32>)) {
    let [a, b, c] = tri.vertices();
    // Rotate so the vertex alone on its side of the plane sits in the middle.
    let (p0, p1, p2, d) = if sign(d[1]) == sign(d[2]) {
        (c, a, b, [d[2], d[0], d[1]])
    } else if sign(d[0]) == sign(d[1]) {
        (b, c, a, [d[1], d[2], d[0]])
    } else {
        (a, b, c, d)
    };

    let start = p0 + (p1 - p0) * (d[0] / (d[0] - d[1]));
    let end = p2 + (p1 - p2) * (d[2] / (d[2] - d[1]));

    if start[axis] > end[axis] {
        ((end[axis], start[axis]), (end, start))
    } else {
        ((start[axis], end[axis]), (start, end))
    }
}

/// Möller's triangle/triangle intersection test.
///
/// Returns the overlap segment of the two triangles along their planes'
/// intersection line. Coplanar pairs are reported as not intersecting.
pub fn triangle_intersection(t1: &Triangle, t2: &Triangle, epsilon: f32) -> Option<Segment> {
    let (d2, n1) = match test_planes(t1, t2, epsilon) {
        PlaneTest::Crossing { distances, normal } => (distances, normal),
        PlaneTest::Coplanar => {
            trace!("coplanar triangle pair skipped");
            return None;
        }
        PlaneTest::Separated => return None,
    };
    let (d1, n2) = match test_planes(t2, t1, epsilon) {
        PlaneTest::Crossing { distances, normal } => (distances, normal),
        PlaneTest::Coplanar => {
            trace!("coplanar triangle pair skipped");
            return None;
        }
        PlaneTest::Separated => return None,
    };

    let direction = n1.cross(&n2);
    let axis = direction.iamax();

    let ((min1, max1), (start1, end1)) = line_interval(t1, d1, axis);
    let ((min2, max2), (start2, end2)) = line_interval(t2, d2, axis);

    if !(min1 <= max2 && min2 <= max1) {
        return None;
    }

    Some(Segment {
        start: if min1 < min2 { start2 } else { start1 },
        end: if max1 < max2 { end1 } else { end2 },
    })
}
