use crate::rope::node::RopeNode;
use itertools::{Itertools, MinMaxResult};

#[inline]
pub fn segment_tension(a: &RopeNode, b: &RopeNode, segment_length: f32) -> f32 {
    ((a.position - b.position).norm() - segment_length).abs()
}

/// Tension "at" every node: entry `i` is the tension of segment `(i - 1, i)`.
///
/// Node 0 has no segment behind it and repeats the tension of segment `(0, 1)`,
/// so the result always has one entry per node.
pub fn tensions(nodes: &[RopeNode], segment_length: f32) -> Vec<f32> {
    let mut tensions = Vec::with_capacity(nodes.len());
    for (i, pair) in nodes.windows(2).enumerate() {
        let tension = segment_tension(&pair[0], &pair[1], segment_length);
        if i == 0 {
            tensions.push(tension);
        }
        tensions.push(tension);
    }
    tensions
}

/// Node index and tension of the strongest interior tear candidate.
///
/// The rope end nodes can't be split at, so only nodes `1..len - 1` qualify.
/// Ties resolve to the later node. `None` for ropes with fewer than 3 nodes.
pub fn max_interior_tension(tensions: &[f32]) -> Option<(usize, f32)> {
    if tensions.len() < 3 {
        return None;
    }

    let mut max = (1, tensions[1]);
    for (i, &tension) in tensions.iter().enumerate().take(tensions.len() - 1).skip(2) {
        if tension >= max.1 {
            max = (i, tension);
        }
    }
    Some(max)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TensionStats {
    pub min: f32,
    pub average: f32,
    pub max: f32,
}

pub fn tension_stats(tensions: &[f32]) -> Option<TensionStats> {
    let (min, max) = match tensions.iter().copied().minmax_by(f32::total_cmp) {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(t) => (t, t),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let average = tensions.iter().sum::<f32>() / tensions.len() as f32;

    Some(TensionStats { min, average, max })
}
