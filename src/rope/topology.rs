//! Structural changes of a rope: resampling to a new node count and tearing in two.

use crate::rope::attachment::{Attachment, nearest_node};
use crate::rope::node::RopeNode;
use crate::rope::tension::{max_interior_tension, tensions};
use crate::rope::verlet_rope::VerletRope;
use crate::utils::math::{FloatMathExt, split_fraction};
use log::{debug, trace};

/// Resamples `nodes` onto `count` nodes along the same polyline.
///
/// The end nodes are kept verbatim. Interior nodes are interpolated in position
/// and previous position, so the rope keeps its shape and its motion.
pub fn resample(nodes: &[RopeNode], count: usize) -> Vec<RopeNode> {
    let (Some(&first), Some(&last)) = (nodes.first(), nodes.last()) else {
        return Vec::new();
    };
    if count < 2 || nodes.len() < 2 {
        return vec![first; count];
    }

    let old_last = (nodes.len() - 1) as f32;
    let new_last = (count - 1) as f32;

    let mut resampled = Vec::with_capacity(count);
    resampled.push(first);
    for i in 1..count - 1 {
        let (index, fraction) = split_fraction(old_last * i as f32 / new_last);
        let index = index.min(nodes.len() - 2);
        resampled.push(nodes[index].lerp(&nodes[index + 1], fraction));
    }
    resampled.push(last);
    resampled
}

impl VerletRope {
    /// Reshapes the rope onto `count` nodes, keeping both ends in place.
    pub fn redistribute(&mut self, count: usize) {
        if count == self.nodes.len() {
            return;
        }

        trace!(
            "VerletRope: Redistributing {} nodes onto {count}",
            self.nodes.len()
        );
        self.nodes = resample(&self.nodes, count);
        self.config.node_count = self.nodes.len();
        self.segment_length = self.config.segment_length();
    }

    /// Tears the rope at its most stretched interior node if the tension allows it.
    pub(crate) fn check_tear(&mut self) -> Option<VerletRope> {
        if self.tear_timer > 0.0 {
            return None;
        }

        let tensions = tensions(&self.nodes, self.segment_length);
        let (index, tension) = if self.nodes.len() == 2 {
            (1, tensions[0].max(tensions[1]))
        } else {
            max_interior_tension(&tensions)?
        };

        if tension < self.config.tear_tension {
            return None;
        }

        debug!("VerletRope: Tearing at node {index} with tension {tension:.3}");
        self.tear_at(index)
    }

    /// Splits the rope at node `index` and returns the far half.
    ///
    /// This rope keeps nodes `0..=index` and loses its point B. The returned rope
    /// owns nodes `index..` in reverse, so its point A is this rope's former point B.
    /// Both ropes keep the current segment length and start their tear cooldown.
    ///
    /// Attachments past the split move to the returned rope with their point
    /// rescaled to `(p - split) / (1 - split)`. That fraction counts from the tear
    /// end, but the returned rope reads it from its point A, the former point B.
    /// Rope-driven attachments therefore land on the mirrored spot: 0.9 on a rope
    /// torn at 0.5 becomes 0.8 and sits next to the tear.
    ///
    /// A two-node rope first gets a midpoint node and is split there, whatever
    /// `index` is. Returns `None` if `index` is an end node of a longer rope.
    pub fn tear_at(&mut self, index: usize) -> Option<VerletRope> {
        let index = if self.nodes.len() == 2 {
            self.insert_midpoint();
            1
        } else {
            index
        };
        if index == 0 || index + 1 >= self.nodes.len() {
            return None;
        }

        let count = self.nodes.len();
        let split = index as f32 / (count - 1) as f32;

        let mut far_nodes = self.nodes.split_off(index + 1);
        far_nodes.insert(0, self.nodes[index]);
        far_nodes.reverse();

        let far_attachments = self.partition_attachments(index, split, count);

        let mut far_config = self.config.clone();
        far_config.point_a = self.config.point_b.take();
        far_config.lock_point_a = self.config.lock_point_b;
        far_config.point_b = None;
        far_config.lock_point_b = false;
        far_config.point_a_body = self.config.point_b_body.take();
        far_config.point_b_body = None;
        far_config.node_count = far_nodes.len();
        far_config.rope_length = self.segment_length * far_nodes.len() as f32;

        self.config.lock_point_b = false;
        self.config.node_count = self.nodes.len();
        self.config.rope_length = self.segment_length * self.nodes.len() as f32;
        self.tear_timer = self.config.tear_cooldown;

        let mut far = VerletRope::from_parts(self.parent, far_config, far_nodes, far_attachments);
        far.tear_timer = far.config.tear_cooldown;
        Some(far)
    }

    fn insert_midpoint(&mut self) {
        let midpoint = self.nodes[0].lerp(&self.nodes[1], 0.5);
        self.nodes.insert(1, midpoint);
        self.segment_length *= 0.5;
        self.config.node_count = self.nodes.len();
        self.config.rope_length = self.segment_length * self.nodes.len() as f32;
    }

    /// Splits the attachments at the normalized `split` point.
    ///
    /// Attachments at or past `split` are returned for the far rope, everything is
    /// remapped into its new rope's `[0, 1]` range. With `detach_on_break`, an
    /// attachment sitting exactly on the tear node is dropped.
    fn partition_attachments(&mut self, index: usize, split: f32, count: usize) -> Vec<Attachment> {
        let interpolated = self.config.lerp_attach_point;
        let detach = self.config.detach_on_break;

        let mut far = Vec::new();
        let mut kept = Vec::with_capacity(self.attachments.len());

        for mut attachment in self.attachments.drain(..) {
            let point = attachment.attach_point;
            let on_tear = if interpolated {
                point == split
            } else {
                nearest_node(point, count) == index
            };
            if detach && on_tear {
                debug!("VerletRope: Detached attachment at {point:.3} on tear");
                continue;
            }

            if point >= split {
                attachment.attach_point = point.inverse_lerp(split, 1.0);
                far.push(attachment);
            } else {
                attachment.attach_point = point.inverse_lerp(0.0, split);
                kept.push(attachment);
            }
        }

        self.attachments = kept;
        far
    }
}
