//! Benchmarks for spline following.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use rhizome_tether_follow::{synchronize, FollowOptions, SplineFollower};
use rhizome_tether_particle::{ParticleSystem, SphereEmitter};
use rhizome_tether_spline::{CatmullRom, Polyline, SplineProvider};

fn spline() -> CatmullRom<Vec3> {
    CatmullRom::new(
        (0..8)
            .map(|i| {
                let a = i as f32 * 0.8;
                Vec3::new(a * 4.0, a.sin() * 3.0, a.cos() * 2.0)
            })
            .collect(),
    )
}

fn filled_system(count: usize) -> ParticleSystem {
    let mut system = ParticleSystem::new(count).with_seed(3);
    let emitter = SphereEmitter {
        center: Vec3::new(12.0, 0.0, 0.0),
        radius: 10.0,
        volume: true,
        lifetime_min: 100.0,
        lifetime_max: 100.0,
        ..Default::default()
    };
    system.emit(&emitter, count);
    system
}

fn bench_projection(c: &mut Criterion) {
    let curve = spline();
    let line = Polyline::line(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));

    c.bench_function("project_catmull_rom", |b| {
        b.iter(|| curve.project_to_parameter(black_box(Vec3::new(7.0, 2.0, -1.0))))
    });

    c.bench_function("project_line", |b| {
        b.iter(|| line.project_to_parameter(black_box(Vec3::new(7.0, 2.0, -1.0))))
    });
}

fn bench_synchronize(c: &mut Criterion) {
    let curve = spline();

    c.bench_function("synchronize_1k_all", |b| {
        let system = filled_system(1_000);
        let mut particles = system.particles().to_vec();
        b.iter(|| {
            synchronize(&mut particles, &curve, FollowOptions::ALL);
            black_box(&particles);
        })
    });

    c.bench_function("late_update_10k_position", |b| {
        let mut system = filled_system(10_000);
        let mut follower = SplineFollower::new(FollowOptions::position_only());
        b.iter(|| {
            follower.late_update(Some(&mut system), Some(&curve));
            black_box(&system);
        })
    });
}

criterion_group!(benches, bench_projection, bench_synchronize);
criterion_main!(benches);
