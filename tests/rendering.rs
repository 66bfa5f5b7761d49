use nalgebra::Vector3;
use verlet_rope::physics::PhysicsScene;
use verlet_rope::rendering::{GeometrySink, RopeGeometry, RopeVertex};
use verlet_rope::rope::{RopeConfig, VerletRope};
use verlet_rope::world::RopeWorld;

fn straight_rope(scene: &mut PhysicsScene, config: RopeConfig) -> VerletRope {
    let a = scene.new_transform(Vector3::zeros());
    let b = scene.new_transform(Vector3::new(4.0, 0.0, 0.0));
    let mut config = config;
    config.point_a = Some(a);
    config.point_b = Some(b);
    config.check_collisions = false;
    VerletRope::new(a, config, scene)
}

#[derive(Default)]
struct CountingSink {
    line_points: usize,
    vertices: usize,
    indices: usize,
}

impl GeometrySink for CountingSink {
    fn line(&mut self, points: &[Vector3<f32>], _width: f32) {
        self.line_points += points.len();
    }

    fn mesh(&mut self, vertices: &[RopeVertex], indices: &[u32]) {
        self.vertices += vertices.len();
        self.indices += indices.len();
    }
}

#[test]
fn unsmoothed_line_is_the_node_polyline() {
    let mut scene = PhysicsScene::default();
    let rope = straight_rope(
        &mut scene,
        RopeConfig::builder().node_count(5).rope_width(0.3).build(),
    );

    match rope.render() {
        RopeGeometry::Line { points, width } => {
            assert_eq!(points, rope.positions());
            assert_eq!(width, 0.3);
        }
        RopeGeometry::Mesh(_) => panic!("line rendering expected"),
    }
}

#[test]
fn smoothing_keeps_endpoints() {
    let mut scene = PhysicsScene::default();
    let rope = straight_rope(
        &mut scene,
        RopeConfig::builder()
            .node_count(5)
            .smoothing_iterations(2)
            .build(),
    );

    let RopeGeometry::Line { points, .. } = rope.render() else {
        panic!("line rendering expected");
    };
    // 5 -> 8 -> 14
    assert_eq!(points.len(), 14);
    assert_eq!(points[0], rope.nodes()[0].position);
    assert_eq!(points[13], rope.nodes()[4].position);
}

#[test]
fn mesh_has_a_ring_per_smoothed_point() {
    let mut scene = PhysicsScene::default();
    let rope = straight_rope(
        &mut scene,
        RopeConfig::builder()
            .node_count(5)
            .smoothing_iterations(1)
            .draw_mesh(true)
            .rope_sides(6)
            .build(),
    );

    let RopeGeometry::Mesh(mesh) = rope.render() else {
        panic!("mesh rendering expected");
    };
    let points = 8;
    assert_eq!(mesh.vertices.len(), 7 * points);
    assert_eq!(mesh.triangle_count(), 2 * 6 * (points - 1));
}

#[test]
fn out_of_range_sides_are_clamped() {
    let mut scene = PhysicsScene::default();
    let rope = straight_rope(
        &mut scene,
        RopeConfig::builder()
            .node_count(3)
            .draw_mesh(true)
            .rope_sides(1)
            .build(),
    );
    assert_eq!(rope.config().rope_sides, 2);

    let mut sink = CountingSink::default();
    rope.render_into(&mut sink);

    assert_eq!(sink.line_points, 0);
    assert_eq!(sink.vertices, 3 * 3);
    assert_eq!(sink.indices, 3 * 2 * 2 * 2);
}

#[test]
fn world_renders_every_rope() {
    let mut scene = PhysicsScene::default();
    let mut world = RopeWorld::new();
    let first = world.insert(straight_rope(
        &mut scene,
        RopeConfig::builder().node_count(4).build(),
    ));
    world.insert(straight_rope(
        &mut scene,
        RopeConfig::builder().node_count(6).build(),
    ));

    let mut sink = CountingSink::default();
    world.render_all(&mut sink);

    assert_eq!(sink.line_points, 10);
    assert!(world.render(first).is_some());
    assert!(world.remove(first).is_some());
    assert!(world.render(first).is_none());
}
