use crate::physics::scene::*;
use log::trace;
use nalgebra::{Isometry3, Point3, Vector3};
use rapier3d::parry::query;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;
use slotmap::SlotMap;

const EARTH_GRAVITY: f32 = 9.81;

/// A scene transform. When linked to a body, the body's translation is authoritative.
#[derive(Debug, Clone)]
pub struct SceneTransform {
    pub position: Vector3<f32>,
    pub body: Option<RigidBodyHandle>,
}

/// `rapier`-backed scene that ropes query for anchors, colliders and bodies.
///
/// Scene queries go through the [`QueryPipeline`], which is rebuilt whenever
/// colliders are added and after every [`PhysicsScene::step`].
pub struct PhysicsScene {
    pub gravity: Vector3<f32>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: Box<dyn BroadPhase>,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
    pub transforms: SlotMap<TransformId, SceneTransform>,
    pub bodies: SlotMap<BodyId, RigidBodyHandle>,
}

impl Default for PhysicsScene {
    fn default() -> Self {
        PhysicsScene {
            gravity: Vector3::new(0.0, -EARTH_GRAVITY, 0.0),
            rigid_body_set: RigidBodySet::default(),
            collider_set: ColliderSet::default(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::default(),
            island_manager: IslandManager::default(),
            broad_phase: Box::<DefaultBroadPhase>::default(),
            narrow_phase: NarrowPhase::default(),
            impulse_joint_set: ImpulseJointSet::default(),
            multibody_joint_set: MultibodyJointSet::default(),
            ccd_solver: CCDSolver::default(),
            query_pipeline: QueryPipeline::default(),
            transforms: SlotMap::with_key(),
            bodies: SlotMap::with_key(),
        }
    }
}

impl PhysicsScene {
    /// Advances the rigid bodies by one fixed step.
    ///
    /// Rope pulls are added every tick, so the accumulated user forces are
    /// cleared once they have been integrated.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            self.broad_phase.as_mut(),
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(), // no hooks yet
            &(), // no events yet
        );
        self.query_pipeline.update(&self.collider_set);

        for (_, rb) in self.rigid_body_set.iter_mut() {
            rb.reset_forces(false);
        }
    }

    pub fn new_transform(&mut self, position: Vector3<f32>) -> TransformId {
        self.transforms.insert(SceneTransform {
            position,
            body: None,
        })
    }

    pub fn remove_transform(&mut self, id: TransformId) {
        self.transforms.remove(id);
    }

    /// Inserts a body and a transform that follows it.
    pub fn new_body(&mut self, body: RigidBody) -> (BodyId, TransformId) {
        let position = *body.translation();
        let handle = self.rigid_body_set.insert(body);
        let body_id = self.bodies.insert(handle);
        let transform = self.transforms.insert(SceneTransform {
            position,
            body: Some(handle),
        });
        (body_id, transform)
    }

    pub fn new_collider(&mut self, collider: Collider) -> ColliderId {
        let handle = self.collider_set.insert(collider);
        self.query_pipeline.update(&self.collider_set);
        Self::collider_id(handle)
    }

    /// Attaches a collider to a body, giving it mass. Returns `None` if the body is gone.
    pub fn new_body_collider(&mut self, collider: Collider, body: BodyId) -> Option<ColliderId> {
        let parent = *self.bodies.get(body)?;
        let handle = self
            .collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set);
        self.query_pipeline.update(&self.collider_set);
        Some(Self::collider_id(handle))
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.rigid_body_set.get(*self.bodies.get(id)?)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(*self.bodies.get(id)?)
    }

    /// Accumulated user force on a body since the forces were last reset.
    pub fn body_force(&self, id: BodyId) -> Option<Vector3<f32>> {
        self.body(id).map(|rb| rb.user_force())
    }

    pub fn collider_id(handle: ColliderHandle) -> ColliderId {
        let (index, generation) = handle.into_raw_parts();
        ColliderId(((generation as u64) << 32) | index as u64)
    }

    pub fn collider_handle(id: ColliderId) -> ColliderHandle {
        ColliderHandle::from_raw_parts(id.0 as u32, (id.0 >> 32) as u32)
    }

    fn node_pose(position: &Vector3<f32>) -> Isometry3<f32> {
        Isometry3::translation(position.x, position.y, position.z)
    }
}

impl TransformProvider for PhysicsScene {
    fn position(&self, id: TransformId) -> Option<Vector3<f32>> {
        let transform = self.transforms.get(id)?;
        match transform.body {
            Some(handle) => self.rigid_body_set.get(handle).map(|rb| *rb.translation()),
            None => Some(transform.position),
        }
    }

    fn set_position(&mut self, id: TransformId, position: Vector3<f32>) {
        let Some(transform) = self.transforms.get_mut(id) else {
            trace!("Tried to move a transform that no longer exists");
            return;
        };

        transform.position = position;
        if let Some(rb) = transform
            .body
            .and_then(|handle| self.rigid_body_set.get_mut(handle))
        {
            rb.set_translation(position, true);
        }
    }
}

impl CollisionProvider for PhysicsScene {
    fn overlap_sphere(&self, center: &Vector3<f32>, radius: f32) -> Overlaps {
        let ball = Ball::new(radius);
        let pose = Self::node_pose(center);

        let mut overlaps = Overlaps::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &pose,
            &ball,
            QueryFilter::default(),
            |handle| {
                if let Some(collider) = self.collider_set.get(handle) {
                    overlaps.push(ColliderOverlap {
                        collider: Self::collider_id(handle),
                        is_trigger: collider.is_sensor(),
                    });
                }
                true
            },
        );
        overlaps
    }

    fn compute_penetration(
        &self,
        shape: &NodeShape,
        position: &Vector3<f32>,
        collider: ColliderId,
    ) -> Option<Penetration> {
        let collider = self.collider_set.get(Self::collider_handle(collider))?;
        let ball = Ball::new(shape.radius());
        let pose = Self::node_pose(position);

        let contact = query::contact(&pose, &ball, collider.position(), collider.shape(), 0.0)
            .ok()
            .flatten()?;

        (contact.dist < 0.0).then(|| Penetration {
            // normal1 points out of the node toward the collider
            direction: -contact.normal1.into_inner(),
            depth: -contact.dist,
        })
    }
}

impl ForceReceiver for PhysicsScene {
    fn add_force_at_position(&mut self, body: BodyId, force: Vector3<f32>, position: Vector3<f32>) {
        if let Some(rb) = self.body_mut(body) {
            rb.add_force_at_point(force, Point3::from(position), true);
        }
    }
}

impl RopeScene for PhysicsScene {
    fn gravity(&self) -> Vector3<f32> {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collider_ids_round_trip_handles() {
        let mut scene = PhysicsScene::default();
        let id = scene.new_collider(ColliderBuilder::ball(1.0).build());
        let handle = PhysicsScene::collider_handle(id);
        assert!(scene.collider_set.get(handle).is_some());
    }

    #[test]
    fn sensors_are_reported_as_triggers() {
        let mut scene = PhysicsScene::default();
        scene.new_collider(ColliderBuilder::cuboid(1.0, 1.0, 1.0).sensor(true).build());

        let hits = scene.overlap_sphere(&Vector3::zeros(), 0.1);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].is_trigger);
    }

    #[test]
    fn distant_colliders_do_not_overlap() {
        let mut scene = PhysicsScene::default();
        let near = scene.new_collider(ColliderBuilder::ball(0.5).build());
        scene.new_collider(
            ColliderBuilder::ball(0.5)
                .translation(Vector3::new(10.0, 0.0, 0.0))
                .build(),
        );

        let hits = scene.overlap_sphere(&Vector3::new(0.0, 0.55, 0.0), 0.1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].collider, near);
        assert!(!hits[0].is_trigger);
    }

    #[test]
    fn step_integrates_and_clears_forces() {
        let mut scene = PhysicsScene::default();
        scene.gravity = Vector3::zeros();
        let (body, transform) = scene.new_body(RigidBodyBuilder::dynamic().build());
        assert!(scene.new_body_collider(ColliderBuilder::ball(0.5).build(), body).is_some());

        scene.add_force_at_position(body, Vector3::new(10.0, 0.0, 0.0), Vector3::zeros());
        scene.step();

        let Some(position) = scene.position(transform) else {
            panic!("body transform should exist");
        };
        assert!(position.x > 0.0, "{position:?}");
        assert_eq!(scene.body_force(body), Some(Vector3::zeros()));
    }

    #[test]
    fn penetration_pushes_out_of_floor() {
        let mut scene = PhysicsScene::default();
        let floor = scene.new_collider(
            ColliderBuilder::cuboid(10.0, 0.5, 10.0)
                .translation(Vector3::new(0.0, -0.5, 0.0))
                .build(),
        );

        let shape = NodeShape::Sphere { radius: 0.1 };
        let node = Vector3::new(0.0, 0.05, 0.0);
        let Some(pen) = scene.compute_penetration(&shape, &node, floor) else {
            panic!("node should overlap the floor");
        };

        assert!(pen.direction.y > 0.99, "{:?}", pen.direction);
        assert!((pen.depth - 0.05).abs() < 1e-4, "{}", pen.depth);
    }

    #[test]
    fn transforms_follow_their_body() {
        let mut scene = PhysicsScene::default();
        let (_, transform) = scene.new_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector3::new(1.0, 2.0, 3.0))
                .build(),
        );
        assert_eq!(scene.position(transform), Some(Vector3::new(1.0, 2.0, 3.0)));

        scene.set_position(transform, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(scene.position(transform), Some(Vector3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn removed_transforms_are_gone() {
        let mut scene = PhysicsScene::default();
        let id = scene.new_transform(Vector3::x());
        scene.remove_transform(id);

        scene.set_position(id, Vector3::y());
        assert_eq!(scene.position(id), None);
    }
}
