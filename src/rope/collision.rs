use crate::physics::{CollisionProvider, NodeShape};
use crate::rope::node::RopeNode;

/// Pushes every free node out of the non-trigger colliders it overlaps.
///
/// Only nodes in `free` are touched, so locked anchors stay put. Each
/// penetration is resolved against the node's already displaced position.
pub fn resolve_collisions<S: CollisionProvider + ?Sized>(
    nodes: &mut [RopeNode],
    free: (usize, usize),
    shape: &NodeShape,
    scene: &S,
) {
    let (start, end) = free;
    let radius = shape.radius();

    for node in nodes[start..end].iter_mut() {
        let overlaps = scene.overlap_sphere(&node.position, radius);

        for overlap in overlaps.iter().filter(|o| !o.is_trigger) {
            if let Some(penetration) =
                scene.compute_penetration(shape, &node.position, overlap.collider)
            {
                node.position += penetration.direction * penetration.depth;
            }
        }
    }
}
