//! Ramer-Douglas-Peucker polyline simplification
//!
//! Reduces the point count of a polyline while bounding the perpendicular
//! deviation from the original shape. The distance measure is taken against
//! the infinite line through the two anchor points, not the bounded segment.

use geo::Coord;

/// Perpendicular distance from `point` to the infinite line through `start`
/// and `end`.
///
/// If the two anchors coincide exactly, the line is undefined and the
/// Euclidean distance to `start` is returned instead; the division below can
/// therefore never see a zero denominator.
pub fn point_line_distance(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq == 0.0 {
        return ((point.x - start.x).powi(2) + (point.y - start.y).powi(2)).sqrt();
    }

    ((point.x - start.x) * dy - (point.y - start.y) * dx).abs() / length_sq.sqrt()
}

/// Simplify a polyline with the Ramer-Douglas-Peucker algorithm.
///
/// The first and last points always survive. Sequences of fewer than 3
/// points are returned unchanged. Distance ties between interior points are
/// resolved toward the lowest index so output is reproducible.
pub fn simplify(points: &[Coord<f64>], epsilon: f64) -> Vec<Coord<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    // Find the interior point farthest from the anchor line
    let mut max_distance = 0.0;
    let mut max_index = 0;
    for (i, point) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = point_line_distance(*point, first, last);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    if max_distance > epsilon {
        let mut left = simplify(&points[..=max_index], epsilon);
        let right = simplify(&points[max_index..], epsilon);
        left.pop(); // drop the duplicated split point at the join
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}
