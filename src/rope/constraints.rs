use crate::rope::node::RopeNode;
use nalgebra::Vector3;

/// World positions the rope ends are locked to for the current step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnchorLocks {
    pub a: Option<Vector3<f32>>,
    pub b: Option<Vector3<f32>>,
}

impl AnchorLocks {
    /// First and one-past-last node index that is free to move.
    pub fn free_range(&self, node_count: usize) -> (usize, usize) {
        let start = usize::from(self.a.is_some());
        let end = node_count - usize::from(self.b.is_some());
        (start, end.max(start))
    }
}

/// One relaxation round pulling every segment toward `segment_length`.
///
/// Distances are read from `snapshot`, a copy taken before the round, so the
/// correction of one segment doesn't bias the next one. Locked anchors are
/// clamped last and win over the segment corrections.
pub fn solve_segments(
    nodes: &mut [RopeNode],
    snapshot: &mut Vec<Vector3<f32>>,
    segment_length: f32,
    locks: &AnchorLocks,
) {
    snapshot.clear();
    snapshot.extend(nodes.iter().map(|n| n.position));

    for (i, pair) in snapshot.windows(2).enumerate() {
        let difference = pair[0] - pair[1];
        let distance = difference.norm();
        let delta = if distance > 0.0 {
            (segment_length - distance) / distance
        } else {
            0.0
        };

        let translation = difference * (delta * 0.5);
        nodes[i].position += translation;
        nodes[i + 1].position -= translation;
    }

    lock_anchors(nodes, locks);
}

pub fn lock_anchors(nodes: &mut [RopeNode], locks: &AnchorLocks) {
    if let (Some(a), Some(first)) = (locks.a, nodes.first_mut()) {
        first.position = a;
    }
    if let (Some(b), Some(last)) = (locks.b, nodes.last_mut()) {
        last.position = b;
    }
}

/// Largest deviation of any segment from `segment_length`.
pub fn max_segment_error(nodes: &[RopeNode], segment_length: f32) -> f32 {
    nodes
        .windows(2)
        .map(|pair| ((pair[0].position - pair[1].position).norm() - segment_length).abs())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(points: &[[f32; 3]]) -> Vec<RopeNode> {
        points
            .iter()
            .map(|p| RopeNode::new(Vector3::new(p[0], p[1], p[2])))
            .collect()
    }

    #[test]
    fn stretched_pair_contracts_symmetrically() {
        let mut nodes = chain(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let mut snapshot = Vec::new();

        solve_segments(&mut nodes, &mut snapshot, 1.0, &AnchorLocks::default());

        assert!((nodes[0].position.x - 0.5).abs() < 1e-6);
        assert!((nodes[1].position.x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn coincident_nodes_are_left_alone() {
        let mut nodes = chain(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        let mut snapshot = Vec::new();

        solve_segments(&mut nodes, &mut snapshot, 1.0, &AnchorLocks::default());

        assert!(nodes.iter().all(|n| n.position.iter().all(|c| c.is_finite())));
        assert_eq!(nodes[0].position, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn locks_override_corrections() {
        let mut nodes = chain(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        let mut snapshot = Vec::new();
        let locks = AnchorLocks {
            a: Some(Vector3::new(-1.0, 0.0, 0.0)),
            b: Some(Vector3::new(4.0, 0.0, 0.0)),
        };

        solve_segments(&mut nodes, &mut snapshot, 1.0, &locks);

        assert_eq!(nodes[0].position, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(nodes[1].position, Vector3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn converges_between_locked_ends() {
        let mut nodes = chain(&[
            [0.0, 0.0, 0.0],
            [0.3, 2.0, 0.0],
            [1.1, -1.5, 0.5],
            [2.9, 0.7, 0.0],
            [3.0, 0.0, 0.0],
        ]);
        let locks = AnchorLocks {
            a: Some(Vector3::new(0.0, 0.0, 0.0)),
            b: Some(Vector3::new(3.0, 0.0, 0.0)),
        };
        let mut snapshot = Vec::new();

        let initial = max_segment_error(&nodes, 1.0);
        for _ in 0..1000 {
            solve_segments(&mut nodes, &mut snapshot, 1.0, &locks);
        }
        let error = max_segment_error(&nodes, 1.0);

        assert!(error < initial);
        assert!(error < 0.05, "max segment error {error}");
    }

    #[test]
    fn free_range_skips_locked_ends() {
        let locks = AnchorLocks {
            a: Some(Vector3::zeros()),
            b: None,
        };
        assert_eq!(locks.free_range(5), (1, 5));
        assert_eq!(AnchorLocks::default().free_range(5), (0, 5));
    }
}
