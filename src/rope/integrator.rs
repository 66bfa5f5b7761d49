use crate::rope::node::RopeNode;
use nalgebra::Vector3;

/// Advances every node one Verlet step.
///
/// `acceleration` is `gravity * gravity_multiplier + external_force`. Nodes don't
/// read each other here, so the order doesn't matter.
pub fn integrate(nodes: &mut [RopeNode], acceleration: Vector3<f32>, dt: f32) {
    let step = acceleration * dt;
    for node in nodes.iter_mut() {
        let velocity = node.velocity();
        node.previous_position = node.position;
        node.position += velocity + step;
    }
}
