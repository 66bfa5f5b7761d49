use nalgebra::Vector3;

/// Chaikin corner cutting, `iterations` times.
///
/// Every segment is replaced by its 1/4 and 3/4 points, except that the two end
/// points are kept as they are and no cut is made next to them. Polylines with
/// fewer than three points come back unchanged.
pub fn smooth_points(points: &[Vector3<f32>], iterations: u32) -> Vec<Vector3<f32>> {
    let mut smoothed = points.to_vec();
    if smoothed.len() < 3 {
        return smoothed;
    }

    for _ in 0..iterations {
        smoothed = chaikin_pass(&smoothed);
    }
    smoothed
}

fn chaikin_pass(points: &[Vector3<f32>]) -> Vec<Vector3<f32>> {
    let last_segment = points.len() - 2;
    let mut cut = Vec::with_capacity(points.len() * 2);

    cut.push(points[0]);
    for (j, pair) in points.windows(2).enumerate() {
        if j != 0 {
            cut.push(pair[0].lerp(&pair[1], 0.25));
        }
        if j != last_segment {
            cut.push(pair[0].lerp(&pair[1], 0.75));
        }
    }
    cut.push(points[points.len() - 1]);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(4.0, 4.0, 0.0),
        ]
    }

    #[test]
    fn zero_iterations_is_identity() {
        assert_eq!(smooth_points(&corner(), 0), corner());
    }

    #[test]
    fn two_points_never_change() {
        let line = vec![Vector3::zeros(), Vector3::new(1.0, 2.0, 3.0)];
        assert_eq!(smooth_points(&line, 4), line);
    }

    #[test]
    fn corner_is_cut() {
        let smoothed = smooth_points(&corner(), 1);

        assert_eq!(
            smoothed,
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(3.0, 0.0, 0.0),
                Vector3::new(4.0, 1.0, 0.0),
                Vector3::new(4.0, 4.0, 0.0),
            ]
        );
    }

    #[test]
    fn point_count_grows_per_iteration() {
        let mut points = corner();
        points.push(Vector3::new(0.0, 4.0, 0.0));

        // n -> 2n - 2
        assert_eq!(smooth_points(&points, 1).len(), 6);
        assert_eq!(smooth_points(&points, 2).len(), 10);
    }
}
