use crate::physics::{RopeScene, TransformId, TransformProvider};
use crate::rendering::{GeometrySink, RopeGeometry, TubeMeshBuilder, smooth_points};
use crate::rope::attachment::Attachment;
use crate::rope::collision::resolve_collisions;
use crate::rope::config::{MIN_NODE_COUNT, MIN_ROPE_LENGTH, RopeConfig};
use crate::rope::constraints::{AnchorLocks, solve_segments};
use crate::rope::error::RopeError;
use crate::rope::integrator::integrate;
use crate::rope::node::RopeNode;
use crate::rope::tension::{tension_stats, tensions};
use crate::utils::math::VECTOR3_DOWN;
use log::{debug, warn};
use nalgebra::Vector3;

/// A deformable, tearable rope made of Verlet nodes.
///
/// Call [`VerletRope::step`] once per fixed tick and [`VerletRope::render`]
/// whenever geometry is needed.
#[derive(Debug, Clone)]
pub struct VerletRope {
    pub(crate) parent: TransformId,
    pub(crate) config: RopeConfig,
    pub(crate) nodes: Vec<RopeNode>,
    pub(crate) attachments: Vec<Attachment>,
    pub(crate) segment_length: f32,
    pub(crate) collision_radius: f32,
    pub(crate) tear_timer: f32,
    snapshot: Vec<Vector3<f32>>,
}

impl VerletRope {
    /// Creates a rope owned by `parent`, correcting a bad configuration instead of failing.
    ///
    /// Nodes are laid out evenly from point A to point B, or straight down from
    /// point A if there's no point B.
    pub fn new<S: TransformProvider + ?Sized>(
        parent: TransformId,
        mut config: RopeConfig,
        scene: &S,
    ) -> Self {
        for problem in config.sanitize(parent) {
            warn!("{problem}");
        }

        let mut rope = VerletRope {
            parent,
            segment_length: config.segment_length(),
            collision_radius: config.collision_radius(),
            config,
            nodes: Vec::new(),
            attachments: Vec::new(),
            tear_timer: 0.0,
            snapshot: Vec::new(),
        };
        rope.layout_nodes(scene);
        rope
    }

    /// Builds a rope around already simulated nodes, e.g. the far half of a tear.
    pub(crate) fn from_parts(
        parent: TransformId,
        config: RopeConfig,
        nodes: Vec<RopeNode>,
        attachments: Vec<Attachment>,
    ) -> Self {
        VerletRope {
            parent,
            segment_length: config.segment_length(),
            collision_radius: config.collision_radius(),
            config,
            nodes,
            attachments,
            tear_timer: 0.0,
            snapshot: Vec::new(),
        }
    }

    /// Logs the first configuration problem, if any.
    pub fn validate(&self) {
        if let Err(e) = self.try_validate() {
            warn!("{e}");
        }
    }

    pub fn try_validate(&self) -> Result<(), RopeError> {
        self.config.try_validate()
    }

    fn layout_nodes<S: TransformProvider + ?Sized>(&mut self, scene: &S) {
        let start = self.anchor_position(scene, self.config.point_a);
        let end = self.config.point_b.and_then(|b| scene.position(b));

        let count = self.config.node_count;
        self.nodes = (0..count)
            .map(|i| {
                let position = match end {
                    Some(end) => start.lerp(&end, i as f32 / (count - 1) as f32),
                    None => start + VECTOR3_DOWN * self.segment_length * i as f32,
                };
                RopeNode::new(position)
            })
            .collect();
    }

    fn anchor_position<S: TransformProvider + ?Sized>(
        &self,
        scene: &S,
        anchor: Option<TransformId>,
    ) -> Vector3<f32> {
        anchor
            .and_then(|a| scene.position(a))
            .or_else(|| scene.position(self.parent))
            .unwrap_or_else(|| {
                warn!("{}", RopeError::AnchorVanished);
                Vector3::zeros()
            })
    }

    /// Advances the rope by one fixed tick.
    ///
    /// Returns the far half of the rope if it tore during this step. The caller
    /// owns it from then on.
    pub fn step<S: RopeScene + ?Sized>(&mut self, scene: &mut S, dt: f32) -> Option<VerletRope> {
        self.config.node_count = self.config.node_count.max(MIN_NODE_COUNT);
        self.segment_length = self.config.segment_length();
        if self.config.node_count != self.nodes.len() {
            self.redistribute(self.config.node_count);
        }

        self.collision_radius = self.config.collision_radius();
        if let Some(shape) = self.config.node_shape.as_mut() {
            *shape = shape.with_radius(self.collision_radius);
        }

        self.simulate(&*scene, dt);

        if self.config.slide_attachments {
            self.slide_attachments(scene.gravity(), dt);
        }

        self.tear_timer = (self.tear_timer - dt).max(0.0);
        let torn = if self.config.allow_tearing {
            self.check_tear()
        } else {
            None
        };

        self.update_attachments(scene);
        if self.config.pull_bodies {
            self.pull_bodies(scene);
        }

        if self.config.report_tension {
            self.report_tension();
        }

        torn
    }

    fn simulate<S: RopeScene + ?Sized>(&mut self, scene: &S, dt: f32) {
        let acceleration =
            scene.gravity() * self.config.gravity_multiplier + self.config.external_force;
        integrate(&mut self.nodes, acceleration, dt);
        self.pin_external_attachments(scene);

        let locks = self.anchor_locks(scene);
        let free = locks.free_range(self.nodes.len());
        let shape = self.config.node_shape.filter(|_| self.config.collisions_active());

        // Collisions are resolved every iteration, not once per step. Moving them
        // out of the loop changes how the rope settles against geometry.
        for _ in 0..self.config.constraint_iterations {
            solve_segments(&mut self.nodes, &mut self.snapshot, self.segment_length, &locks);

            if let Some(shape) = &shape {
                resolve_collisions(&mut self.nodes, free, shape, scene);
            }
        }
    }

    fn anchor_locks<S: TransformProvider + ?Sized>(&self, scene: &S) -> AnchorLocks {
        let lock = |enabled: bool, anchor: Option<TransformId>| {
            anchor
                .filter(|_| enabled)
                .and_then(|anchor| scene.position(anchor))
        };

        AnchorLocks {
            a: lock(self.config.lock_point_a, self.config.point_a),
            b: lock(self.config.lock_point_b, self.config.point_b),
        }
    }

    fn report_tension(&self) {
        if let Some(stats) = tension_stats(&self.tensions()) {
            debug!(
                "VerletRope: Tension - {:.3} min, {:.3} avg, {:.3} max",
                stats.min, stats.average, stats.max
            );
        }
    }

    /// Smooths the nodes and emits either a polyline or a tube mesh.
    pub fn render(&self) -> RopeGeometry {
        let points = smooth_points(&self.positions(), self.config.smoothing_iterations);

        if self.config.draw_mesh {
            let mesh = TubeMeshBuilder::new(points)
                .with_sides(self.config.rope_sides)
                .with_width(self.config.rope_width)
                .build();
            RopeGeometry::Mesh(mesh)
        } else {
            RopeGeometry::Line {
                points,
                width: self.config.rope_width,
            }
        }
    }

    pub fn render_into<G: GeometrySink + ?Sized>(&self, sink: &mut G) {
        self.render().submit(sink);
    }

    /// Tension at every node, see [`tensions`](crate::rope::tension::tensions).
    pub fn tensions(&self) -> Vec<f32> {
        tensions(&self.nodes, self.segment_length)
    }

    /// Requests a new node count. Applied by redistribution before the next step.
    pub fn set_node_count(&mut self, node_count: usize) {
        self.config.node_count = node_count.max(MIN_NODE_COUNT);
    }

    /// Requests a new rope length. Applied before the next step.
    pub fn set_rope_length(&mut self, rope_length: f32) {
        self.config.rope_length = rope_length.max(MIN_ROPE_LENGTH);
    }

    pub fn parent(&self) -> TransformId {
        self.parent
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    /// Access to the tunables. Anchor and count changes are picked up on the next step.
    pub fn config_mut(&mut self) -> &mut RopeConfig {
        &mut self.config
    }

    pub fn nodes(&self) -> &[RopeNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [RopeNode] {
        &mut self.nodes
    }

    pub fn positions(&self) -> Vec<Vector3<f32>> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    pub fn collision_radius(&self) -> f32 {
        self.collision_radius
    }

    /// Seconds left before this rope may tear again.
    pub fn tear_cooldown(&self) -> f32 {
        self.tear_timer
    }
}
