//! Contact records and impulse-based resolution.
//!
//! Both resolvers first push the bodies out of penetration (shared by inverse
//! mass), then apply a normal impulse computed from the relative velocity of
//! the contact points, including the angular terms of each body's world
//! inertia. There is no friction: tangential velocity is left untouched.

use nalgebra::Vector3;

use crate::body::RigidBody;

/// A detected contact between body A and body B (or a body and the container).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from A toward B.
    pub normal: Vector3<f32>,
    /// Penetration depth (non-negative).
    pub penetration: f32,
    /// World-space contact point on A.
    pub point_a: Vector3<f32>,
    /// World-space contact point on B.
    pub point_b: Vector3<f32>,
}

impl Contact {
    /// The same contact seen from B: normal reversed, points exchanged.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            penetration: self.penetration,
            point_a: self.point_b,
            point_b: self.point_a,
        }
    }
}

/// Inverse effective mass contribution of one body's rotation: `(I⁻¹ (r × n)) × r · n`.
#[inline]
fn angular_term(body: &RigidBody, r: &Vector3<f32>, n: &Vector3<f32>) -> f32 {
    (body.inv_inertia_world() * r.cross(n)).cross(r).dot(n)
}

#[inline]
fn point_velocity(body: &RigidBody, r: &Vector3<f32>) -> Vector3<f32> {
    body.velocity + body.angular_velocity.cross(r)
}

/// Resolve a body/body contact in place.
///
/// The positional correction always applies. The impulse
/// `j = -(1 + e) (v_A - v_B)·n / (1/m_A + 1/m_B + angular)` is applied only
/// while the contact points approach each other: A receives `+j n` and
/// `r_A × j n`, B the negated impulses.
///
/// The unguarded formula would also fire for separating contacts and pull
/// the pair back together; here a non-positive approach skips the impulse.
pub fn resolve_pair(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact, restitution: f32) {
    let n = contact.normal;
    let inv_mass_a = a.inv_mass();
    let inv_mass_b = b.inv_mass();
    let inv_mass_sum = inv_mass_a + inv_mass_b;

    // --- Positional correction ---
    let correction = n * (contact.penetration / inv_mass_sum);
    a.position -= correction * inv_mass_a;
    b.position += correction * inv_mass_b;

    let ra = contact.point_a - a.position;
    let rb = contact.point_b - b.position;

    let approach = (point_velocity(a, &ra) - point_velocity(b, &rb)).dot(&n);
    if approach <= 0.0 {
        return;
    }

    let eff_mass_inv = inv_mass_sum + angular_term(a, &ra, &n) + angular_term(b, &rb, &n);
    if !(eff_mass_inv > 0.0 && eff_mass_inv.is_finite()) {
        return;
    }

    let j = -(1.0 + restitution) * approach / eff_mass_inv;
    let impulse = n * j;

    a.add_linear_impulse(impulse);
    b.add_linear_impulse(-impulse);
    a.add_angular_impulse(ra.cross(&impulse));
    b.add_angular_impulse(-rb.cross(&impulse));
}

/// Resolve a body/container contact in place.
///
/// The container is treated as an immovable body of infinite mass, so the
/// whole positional correction goes to `body`. The normal points out of the
/// container (from the body toward the violated wall). As in
/// [`resolve_pair`], no impulse is applied while the body already moves
/// away from the wall.
pub fn resolve_container(body: &mut RigidBody, contact: &Contact, restitution: f32) {
    let n = contact.normal;
    body.position -= n * contact.penetration;

    let r = contact.point_a - body.position;
    let approach = point_velocity(body, &r).dot(&n);
    if approach <= 0.0 {
        return;
    }

    let eff_mass_inv = body.inv_mass() + angular_term(body, &r, &n);
    if !(eff_mass_inv > 0.0 && eff_mass_inv.is_finite()) {
        return;
    }

    let j = -(1.0 + restitution) * approach / eff_mass_inv;
    let impulse = n * j;
    body.add_linear_impulse(impulse);
    body.add_angular_impulse(r.cross(&impulse));
}
