//! Benchmarks for rope simulation and geometry.

use criterion::{Criterion, criterion_group, criterion_main};
use nalgebra::Vector3;
use rapier3d::prelude::ColliderBuilder;
use verlet_rope::physics::{NodeShape, PhysicsScene};
use verlet_rope::rope::{RopeConfig, VerletRope};

fn slack_rope(scene: &mut PhysicsScene, node_count: usize, collisions: bool) -> VerletRope {
    let a = scene.new_transform(Vector3::new(0.0, 2.0, 0.0));
    let b = scene.new_transform(Vector3::new(8.0, 2.0, 0.0));
    let config = RopeConfig::builder()
        .point_a(a)
        .point_b(b)
        .node_count(node_count)
        .rope_length(12.0)
        .allow_tearing(false)
        .check_collisions(collisions)
        .node_shape(NodeShape::Sphere { radius: 0.1 })
        .build();
    VerletRope::new(a, config, scene)
}

fn bench_step(c: &mut Criterion) {
    c.bench_function("rope_30_nodes_60_steps", |b| {
        b.iter(|| {
            let mut scene = PhysicsScene::default();
            let mut rope = slack_rope(&mut scene, 30, false);
            for _ in 0..60 {
                rope.step(&mut scene, 1.0 / 60.0);
            }
            rope.positions()
        });
    });
}

fn bench_step_with_floor(c: &mut Criterion) {
    c.bench_function("rope_30_nodes_on_floor_60_steps", |b| {
        b.iter(|| {
            let mut scene = PhysicsScene::default();
            scene.new_collider(
                ColliderBuilder::cuboid(20.0, 0.5, 20.0)
                    .translation(Vector3::new(0.0, -0.5, 0.0))
                    .build(),
            );
            let mut rope = slack_rope(&mut scene, 30, true);
            for _ in 0..60 {
                rope.step(&mut scene, 1.0 / 60.0);
            }
            rope.positions()
        });
    });
}

fn bench_tube_mesh(c: &mut Criterion) {
    let mut scene = PhysicsScene::default();
    let mut rope = slack_rope(&mut scene, 30, false);
    let config = rope.config_mut();
    config.draw_mesh = true;
    config.smoothing_iterations = 2;
    config.rope_sides = 12;

    c.bench_function("tube_mesh_30_nodes_2_smoothing", |b| b.iter(|| rope.render()));
}

criterion_group!(benches, bench_step, bench_step_with_floor, bench_tube_mesh);
criterion_main!(benches);
