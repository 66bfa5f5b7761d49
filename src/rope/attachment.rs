//! Objects slaved to a fractional point along a rope.

use crate::physics::{ForceReceiver, RopeScene, TransformId, TransformProvider};
use crate::rope::node::RopeNode;
use crate::rope::verlet_rope::VerletRope;
use crate::utils::math::{FloatMathExt, split_fraction};
use nalgebra::Vector3;

/// Who drives an attachment's position.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AttachmentSource {
    /// The attachment's transform drives the rope node it sits on.
    FromAttachment,
    /// Like [`AttachmentSource::FromAttachment`], but the transform follows a rigid body.
    FromAttachmentBody,
    /// The rope writes the attachment's transform.
    #[default]
    FromRope,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub target: Option<TransformId>,
    /// Fractional position along the rope, `0` at point A and `1` at point B.
    pub attach_point: f32,
    pub lock_attach_point: bool,
    pub source: AttachmentSource,
    pub mass: f32,
    /// `0` slides freely, `1` never slides.
    pub friction: f32,
}

impl Attachment {
    pub fn new(target: TransformId, attach_point: f32) -> Self {
        Attachment {
            target: Some(target),
            attach_point: attach_point.clamp(0.0, 1.0),
            lock_attach_point: false,
            source: AttachmentSource::FromRope,
            mass: 0.0,
            friction: 0.0,
        }
    }

    pub fn with_source(mut self, source: AttachmentSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_mass(mut self, mass: f32, friction: f32) -> Self {
        self.mass = mass;
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    pub fn locked(mut self) -> Self {
        self.lock_attach_point = true;
        self
    }

    pub fn nearest_node(&self, node_count: usize) -> usize {
        nearest_node(self.attach_point, node_count)
    }
}

/// Index of the node closest to the fractional `point`.
pub fn nearest_node(point: f32, node_count: usize) -> usize {
    let last = node_count.saturating_sub(1);
    ((last as f32 * point.clamp(0.0, 1.0)).round() as usize).min(last)
}

/// Rope position at the fractional `point`.
///
/// Snaps to the nearest node unless `interpolate` is set, in which case the two
/// surrounding nodes are blended.
pub fn sample(nodes: &[RopeNode], point: f32, interpolate: bool) -> Vector3<f32> {
    if !interpolate || point <= 0.0 || point >= 1.0 || nodes.len() < 2 {
        return nodes[nearest_node(point, nodes.len())].position;
    }

    let (index, fraction) = split_fraction((nodes.len() - 1) as f32 * point);
    let index = index.min(nodes.len() - 2);
    nodes[index]
        .position
        .lerp(&nodes[index + 1].position, fraction)
}

impl VerletRope {
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut Vec<Attachment> {
        &mut self.attachments
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn detach(&mut self, target: TransformId) -> Option<Attachment> {
        let index = self
            .attachments
            .iter()
            .position(|a| a.target == Some(target))?;
        Some(self.attachments.remove(index))
    }

    /// Moves the nodes under externally driven attachments onto their transforms.
    pub(crate) fn pin_external_attachments<S: TransformProvider + ?Sized>(&mut self, scene: &S) {
        let count = self.nodes.len();
        for attachment in &self.attachments {
            if attachment.source == AttachmentSource::FromRope {
                continue;
            }
            let Some(position) = attachment.target.and_then(|t| scene.position(t)) else {
                continue;
            };
            self.nodes[attachment.nearest_node(count)].position = position;
        }
    }

    /// Writes rope positions to every rope-driven attachment.
    pub(crate) fn update_attachments<S: TransformProvider + ?Sized>(&self, scene: &mut S) {
        for attachment in &self.attachments {
            if attachment.source != AttachmentSource::FromRope {
                continue;
            }
            let Some(target) = attachment.target else {
                continue;
            };

            let position = sample(
                &self.nodes,
                attachment.attach_point,
                self.config.lerp_attach_point,
            );
            scene.set_position(target, position);
        }
    }

    /// Lets heavy attachments slide along the rope toward the lower neighbour.
    pub(crate) fn slide_attachments(&mut self, gravity: Vector3<f32>, dt: f32) {
        if !self.config.lerp_attach_point {
            return;
        }

        let rope_force =
            gravity * self.config.gravity_multiplier * dt + self.config.external_force;
        let count = self.nodes.len();
        let last = (count - 1) as f32;

        for attachment in self.attachments.iter_mut() {
            if attachment.target.is_none()
                || attachment.mass == 0.0
                || attachment.friction >= 1.0
                || attachment.lock_attach_point
            {
                continue;
            }

            let index = attachment.nearest_node(count);
            let here = self.nodes[index].position;
            let dot_towards = |other: usize| {
                let direction = (self.nodes[other].position - here)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                rope_force.dot(&direction)
            };

            let prev_dot = if index > 0 { dot_towards(index - 1) } else { -1.0 };
            let next_dot = if index + 1 < count { dot_towards(index + 1) } else { -1.0 };

            // balanced on a tip or resting in a trough
            if prev_dot == next_dot || (prev_dot < 0.0 && next_dot < 0.0) {
                continue;
            }

            let (target_index, target_dot) = if next_dot > prev_dot {
                (index + 1, next_dot)
            } else {
                (index - 1, prev_dot)
            };
            let target_point = target_index as f32 / last;
            let amount = target_dot * (1.0 - attachment.friction) * attachment.mass * dt;

            attachment.attach_point =
                FloatMathExt::lerp(attachment.attach_point, target_point, amount).clamp(0.0, 1.0);
        }
    }

    /// Pulls the anchor bodies along the rope once the end segments are stretched enough.
    pub(crate) fn pull_bodies<S: RopeScene + ?Sized>(&self, scene: &mut S) {
        let count = self.nodes.len();
        let ends = [
            (self.config.point_a_body, self.config.point_a, 0, 1),
            (self.config.point_b_body, self.config.point_b, count - 1, count - 2),
        ];

        for (body, anchor, end, inner) in ends {
            let Some(body) = body else {
                continue;
            };

            let pull = self.nodes[inner].position - self.nodes[end].position;
            let tension = (pull.norm() - self.segment_length).abs();
            if tension <= self.config.tension_threshold {
                continue;
            }
            let Some(direction) = pull.try_normalize(f32::EPSILON) else {
                continue;
            };

            let at = anchor
                .and_then(|a| scene.position(a))
                .unwrap_or(self.nodes[end].position);
            let force = direction * tension * self.config.pull_force;
            ForceReceiver::add_force_at_position(scene, body, force, at);
        }
    }
}
