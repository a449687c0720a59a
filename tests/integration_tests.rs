//! Integration tests for embedded-rigid3d
//! These tests drive whole worlds through many steps

use embedded_rigid3d::geometry::Ray;
use embedded_rigid3d::{
    primitives, BodyId, Container, PhysicsError, PhysicsWorld, RigidBody, ShapeDescriptor, ShapeKind,
    WorldConfig,
};
use nalgebra::{UnitQuaternion, Vector3};

const DT: f32 = 1.0 / 60.0;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

fn sphere(radius: f32, mass: f32) -> RigidBody {
    let data = primitives::uv_sphere(8, 16, radius);
    RigidBody::new(ShapeDescriptor::sphere(&data.geometry(), 1.0).unwrap(), mass).unwrap()
}

fn cube(half: f32, mass: f32) -> RigidBody {
    let data = primitives::cuboid(Vector3::new(half, half, half));
    RigidBody::new(ShapeDescriptor::cuboid(&data.geometry(), 1.0).unwrap(), mass).unwrap()
}

fn cone(mass: f32) -> RigidBody {
    let data = primitives::cone(16, 0.5, 1.0);
    RigidBody::new(ShapeDescriptor::mesh(&data.geometry(), 1.0).unwrap(), mass).unwrap()
}

/// 20 m wide room with the floor at y = 0.
fn room() -> Container {
    Container::new(Vector3::new(-10.0, 0.0, -10.0), Vector3::new(10.0, 20.0, 10.0)).unwrap()
}

fn free_space() -> WorldConfig {
    WorldConfig::default()
        .with_gravity(Vector3::zeros())
        .with_damping(0.0, 0.0)
}

#[test]
fn test_box_settles_on_floor() {
    let config = WorldConfig::default().with_restitution(0.5);
    let mut world = PhysicsWorld::<4>::new(room(), config);
    let id = world
        .add_body(cube(0.5, 1.0).with_position(Vector3::new(0.0, 2.0, 0.0)))
        .unwrap();

    for _ in 0..600 {
        world.step(DT);
        let y = world.body(id).unwrap().position.y;
        assert!(y > 0.49, "box fell through the floor: y = {}", y);
    }

    let body = world.body(id).unwrap();
    assert!(approx_eq(body.position.y, 0.5, 0.01));
    assert!(body.speed() < 0.5);
    assert!(approx_eq(body.orientation.angle(), 0.0, 1e-3));
}

#[test]
fn test_tilted_box_does_not_fall_through_floor() {
    let config = WorldConfig::default().with_restitution(0.5);
    let container = room();
    let mut world = PhysicsWorld::<4>::new(container, config);
    let id = world
        .add_body(
            cube(0.5, 1.0)
                .with_position(Vector3::new(0.0, 2.0, 0.0))
                .with_orientation(UnitQuaternion::from_euler_angles(0.3, 0.0, 0.5)),
        )
        .unwrap();

    for _ in 0..1200 {
        world.step(DT);
        let body = world.body(id).unwrap();
        // Resting face down is the lowest a unit cube's center can sit
        assert!(body.position.y > 0.4, "box fell through the floor: y = {}", body.position.y);
        assert!(body.velocity.iter().all(|v| v.is_finite()));
        assert!(container.contains(&body.position));
    }
}

#[test]
fn test_sphere_reflected_by_container_floor() {
    let config = free_space().with_restitution(0.9);
    let mut world = PhysicsWorld::<4>::new(room(), config);
    let id = world
        .add_body(
            sphere(0.5, 1.0)
                .with_position(Vector3::new(0.0, 0.6, 0.0))
                .with_velocity(Vector3::new(0.0, -10.0, 0.0)),
        )
        .unwrap();

    world.step(DT);

    let body = world.body(id).unwrap();
    assert!(approx_eq(body.position.y, 0.5, 1e-4));
    assert!(approx_eq(body.velocity.y, 9.0, 1e-4));
    assert_eq!(body.velocity.x, 0.0);
}

#[test]
fn test_elastic_head_on_collision_conserves_momentum() {
    let config = free_space().with_restitution(1.0);
    let mut world = PhysicsWorld::<4>::new(room(), config);
    let a = world
        .add_body(
            sphere(0.5, 1.0)
                .with_position(Vector3::new(-2.0, 5.0, 0.0))
                .with_velocity(Vector3::new(2.0, 0.0, 0.0)),
        )
        .unwrap();
    let b = world
        .add_body(sphere(0.5, 1.0).with_position(Vector3::new(0.0, 5.0, 0.0)))
        .unwrap();

    let momentum = world.total_momentum();
    let energy: f32 = world.bodies().map(|(_, body)| body.kinetic_energy()).sum();

    for _ in 0..60 {
        world.step(DT);
        let current = world.total_momentum();
        assert!(approx_eq(current.x, momentum.x, 1e-4));
        assert!(approx_eq(current.y, momentum.y, 1e-4));
    }

    // Equal masses exchange velocities
    assert!(approx_eq(world.body(a).unwrap().velocity.x, 0.0, 1e-3));
    assert!(approx_eq(world.body(b).unwrap().velocity.x, 2.0, 1e-3));
    let after: f32 = world.bodies().map(|(_, body)| body.kinetic_energy()).sum();
    assert!(approx_eq(after, energy, 1e-3));
}

#[test]
fn test_collision_detection_is_idempotent() {
    let mut world = PhysicsWorld::<4>::new(room(), free_space());
    let a = world
        .add_body(cube(1.0, 1.0).with_position(Vector3::new(0.0, 5.0, 0.0)))
        .unwrap();
    let b = world
        .add_body(
            cube(1.0, 1.0)
                .with_position(Vector3::new(1.5, 5.5, 0.2))
                .with_orientation(UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3)),
        )
        .unwrap();

    let first = world.collide(a, b);
    let second = world.collide(a, b);
    assert!(first.is_some());
    assert_eq!(first, second);
    // Detection alone leaves the bodies untouched
    assert_eq!(world.body(a).unwrap().position, Vector3::new(0.0, 5.0, 0.0));
}

#[test]
fn test_sat_unit_cubes() {
    let mut world = PhysicsWorld::<4>::new(room(), free_space());
    let a = world
        .add_body(cube(1.0, 1.0).with_position(Vector3::new(0.0, 5.0, 0.0)))
        .unwrap();
    let b = world
        .add_body(cube(1.0, 1.0).with_position(Vector3::new(1.9, 5.0, 0.0)))
        .unwrap();

    let contact = world.collide(a, b).unwrap();
    assert!(approx_eq(contact.penetration, 0.1, 1e-4));
    assert!(approx_eq(contact.normal.x, 1.0, 1e-4));
    assert!(approx_eq(contact.normal.y, 0.0, 1e-4));

    // Seen from the other side the normal flips
    let reverse = world.collide(b, a).unwrap();
    assert!(approx_eq(reverse.normal.x, -1.0, 1e-4));
}

#[test]
fn test_mixed_scene_stays_in_container() {
    let container = room();
    let mut world = PhysicsWorld::<8>::new(container, WorldConfig::default());
    let ids: Vec<BodyId> = vec![
        world
            .add_body(sphere(0.5, 1.0).with_position(Vector3::new(-0.3, 3.0, 0.0)))
            .unwrap(),
        world
            .add_body(
                cube(0.5, 2.0)
                    .with_position(Vector3::new(0.0, 1.5, 0.1))
                    .with_orientation(UnitQuaternion::from_euler_angles(0.4, 0.1, 0.0)),
            )
            .unwrap(),
        world
            .add_body(cone(1.5).with_position(Vector3::new(0.3, 5.0, -0.1)))
            .unwrap(),
        world
            .add_body(sphere(0.3, 0.5).with_position(Vector3::new(0.2, 7.0, 0.2)))
            .unwrap(),
    ];

    for _ in 0..600 {
        world.step(DT);
    }

    for &id in &ids {
        let body = world.body(id).unwrap();
        assert!(body.position.iter().all(|v| v.is_finite()));
        assert!(body.velocity.iter().all(|v| v.is_finite()));
        assert!(container.contains(&body.position), "{:?} escaped: {:?}", id, body.position);
        assert!(approx_eq(body.orientation.into_inner().norm(), 1.0, 1e-4));
    }
    assert_eq!(world.body(ids[2]).map(|b| b.kind()), Some(ShapeKind::Mesh));
}

#[test]
fn test_invalid_mass_rejected() {
    let data = primitives::uv_sphere(8, 16, 0.5);
    let descriptor = ShapeDescriptor::sphere(&data.geometry(), 1.0).unwrap();
    assert_eq!(
        RigidBody::new(descriptor.clone(), 0.0).err(),
        Some(PhysicsError::InvalidMass(0.0))
    );
    assert_eq!(
        RigidBody::new(descriptor, -2.0).err(),
        Some(PhysicsError::InvalidMass(-2.0))
    );
}

#[test]
fn test_inverse_mass() {
    for mass in [0.25, 1.0, 3.0, 80.0] {
        let body = sphere(0.5, mass);
        assert!(approx_eq(body.inv_mass(), 1.0 / mass, 1e-6));
    }
}

#[test]
fn test_ray_push_moves_hit_body_only() {
    let mut world = PhysicsWorld::<4>::new(room(), free_space());
    let target = world
        .add_body(sphere(0.5, 1.0).with_position(Vector3::new(0.0, 5.0, 0.0)))
        .unwrap();
    let bystander = world
        .add_body(sphere(0.5, 1.0).with_position(Vector3::new(0.0, 5.0, 4.0)))
        .unwrap();

    let ray = Ray::new(Vector3::new(-5.0, 5.0, 0.0), Vector3::new(1.0, 0.0, 0.0)).unwrap();
    let (hit_id, hit) = world.raycast(&ray).unwrap();
    assert_eq!(hit_id, target);
    assert!(approx_eq(hit.distance, 4.5, 1e-4));

    assert_eq!(world.push_along_ray(&ray, 60.0), 1);
    world.step(DT);

    assert!(approx_eq(world.body(target).unwrap().velocity.x, 1.0, 1e-4));
    assert_eq!(world.body(bystander).unwrap().velocity, Vector3::zeros());
}

#[test]
fn test_capacity_is_enforced() {
    let mut world = PhysicsWorld::<1>::new(room(), free_space());
    world.add_body(sphere(0.5, 1.0)).unwrap();
    assert_eq!(
        world.add_body(sphere(0.5, 1.0)).err(),
        Some(PhysicsError::CapacityExceeded { capacity: 1 })
    );
    assert_eq!(world.body_count(), 1);
}
