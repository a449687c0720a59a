//! Container drop demo
//!
//! A sphere, a box and a cone fall into a room built from a cube mesh,
//! bounce off the floor and each other, and settle. Positions are printed
//! twice per simulated second; a ray push kicks the sphere halfway through.

use embedded_rigid3d::geometry::Ray;
use embedded_rigid3d::{primitives, Container, PhysicsWorld, RigidBody, ShapeDescriptor, WorldConfig};
use nalgebra::{Similarity3, UnitQuaternion, Vector3};

const DT: f32 = 1.0 / 60.0;
const SECONDS: usize = 6;

fn main() -> Result<(), embedded_rigid3d::PhysicsError> {
    // Room: unit cube scaled to 10 m, floor at y = 0
    let room = primitives::cuboid(Vector3::new(0.5, 0.5, 0.5));
    let room_pose = Similarity3::new(Vector3::new(0.0, 5.0, 0.0), Vector3::zeros(), 10.0);
    let container = Container::from_mesh(&room.geometry(), &room_pose)?;

    let config = WorldConfig::default().with_restitution(0.6);
    let mut world = PhysicsWorld::<8>::new(container, config);

    let sphere_mesh = primitives::uv_sphere(8, 16, 0.5);
    let cube_mesh = primitives::cuboid(Vector3::new(0.5, 0.5, 0.5));
    let cone_mesh = primitives::cone(16, 0.5, 1.0);

    let ball = world.add_body(
        RigidBody::new(ShapeDescriptor::sphere(&sphere_mesh.geometry(), 1.0)?, 1.0)?
            .with_position(Vector3::new(-1.5, 6.0, 0.0)),
    )?;
    let crate_box = world.add_body(
        RigidBody::new(ShapeDescriptor::cuboid(&cube_mesh.geometry(), 1.0)?, 2.0)?
            .with_position(Vector3::new(0.0, 4.0, 0.0))
            .with_orientation(UnitQuaternion::from_euler_angles(0.3, 0.0, 0.2))
            .with_angular_velocity(Vector3::new(0.0, 1.0, 0.0)),
    )?;
    let cone = world.add_body(
        RigidBody::new(ShapeDescriptor::mesh(&cone_mesh.geometry(), 1.0)?, 1.5)?
            .with_position(Vector3::new(1.5, 5.0, 0.0)),
    )?;

    let steps_per_print = 30;
    for step in 0..SECONDS * 60 {
        if step == SECONDS * 30 {
            if let Some(ray) = Ray::new(Vector3::new(-8.0, 0.5, 0.0), Vector3::new(1.0, 0.0, 0.0)) {
                let pushed = world.push_along_ray(&ray, 400.0);
                println!("-- ray push hit {} bodies", pushed);
            }
        }

        world.step(DT);

        if step % steps_per_print == 0 {
            let t = step as f32 * DT;
            for (name, id) in [("ball", ball), ("box", crate_box), ("cone", cone)] {
                if let Some(body) = world.body(id) {
                    let p = body.position;
                    println!(
                        "t={:5.2}s {:4} pos=({:6.2}, {:6.2}, {:6.2}) speed={:5.2}",
                        t,
                        name,
                        p.x,
                        p.y,
                        p.z,
                        body.speed()
                    );
                }
            }
        }
    }

    println!("total momentum: {:?}", world.total_momentum());
    Ok(())
}
