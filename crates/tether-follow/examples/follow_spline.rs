//! Emits particles next to a curve and keeps them bound to it.
//!
//! Run with `RUST_LOG=debug cargo run -p rhizome-tether-follow --example follow_spline`.

use glam::Vec3;
use rhizome_tether_follow::{FollowConfig, SplineProvider};
use rhizome_tether_particle::{ParticleSystem, PointEmitter};
use rhizome_tether_spline::BezierSpline;

const CONFIG: &str = r#"{
    "follow": { "position": true, "velocity": true, "rotation": true },
    "projection": { "samples": 96, "iterations": 6 }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = FollowConfig::from_json(CONFIG)?;
    let curve = BezierSpline::from_points(&[
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(5.0, 2.0, 0.0),
        Vec3::new(10.0, 0.0, 3.0),
        Vec3::new(15.0, -1.0, 0.0),
    ]);
    let spline = config.apply(&curve);

    let mut system = ParticleSystem::new(256).with_seed(42);
    let emitter = PointEmitter {
        position: Vec3::new(0.5, 1.0, 0.0),
        direction: Vec3::new(1.0, 0.3, 0.0),
        spread: 0.4,
        speed_min: 3.0,
        speed_max: 6.0,
        lifetime_min: 2.0,
        lifetime_max: 4.0,
        ..Default::default()
    };
    let mut follower = config.follower();

    let dt = 1.0 / 60.0;
    for frame in 0..120 {
        system.emit(&emitter, 2);
        system.update(dt);
        let written = follower.late_update(Some(&mut system), Some(&spline));

        if frame % 30 == 0 {
            let furthest = system
                .particles()
                .iter()
                .map(|p| spline.project_to_parameter(p.position))
                .fold(0.0_f32, f32::max);
            println!("frame {frame:3}: {written:3} particles, furthest t = {furthest:.3}");
        }
    }

    Ok(())
}
