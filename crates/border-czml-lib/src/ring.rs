//! Ring closure and cartographic coordinate conversion

use geo::Coord;

/// Height assigned to every output position, in meters. Ground clamping
/// ignores it, but the positions array still carries three values per point.
const GROUND_HEIGHT: f64 = 0.0;

/// Append the first point to the end of `ring` unless it already equals the
/// last point.
///
/// The comparison is exact: a nearly-closed ring whose endpoints differ by
/// floating-point rounding noise gains one extra point here instead of being
/// snapped shut. Empty and single-point sequences are left unchanged, and
/// closing an already-closed ring is a no-op.
pub fn close_ring(ring: &mut Vec<Coord<f64>>) {
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last())
        && first != last
    {
        ring.push(first);
    }
}

/// Convert degree coordinates to a flat cartographic-radians buffer.
///
/// Each point becomes the 3-tuple (lon·π/180, lat·π/180, 0.0), concatenated
/// in point order.
pub fn to_cartographic_radians(points: &[Coord<f64>]) -> Vec<f64> {
    flatten(
        &points
            .iter()
            .map(|p| Coord {
                x: p.x.to_radians(),
                y: p.y.to_radians(),
            })
            .collect::<Vec<_>>(),
    )
}

/// Flatten 2D points into the 3-values-per-point positions encoding with the
/// fixed ground height.
pub fn flatten(points: &[Coord<f64>]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(points.len() * 3);
    for point in points {
        flat.push(point.x);
        flat.push(point.y);
        flat.push(GROUND_HEIGHT);
    }
    flat
}

/// Recover 2D points from a flat positions buffer, dropping the height value
/// of each 3-tuple. Trailing values that do not form a full 3-tuple are
/// ignored.
pub fn unflatten(positions: &[f64]) -> Vec<Coord<f64>> {
    positions
        .chunks_exact(3)
        .map(|chunk| Coord {
            x: chunk[0],
            y: chunk[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_close_open_ring() {
        let mut ring = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0)];
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut ring = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0)];
        close_ring(&mut ring);
        let closed = ring.clone();
        close_ring(&mut ring);
        assert_eq!(ring, closed);
    }

    #[test]
    fn test_close_short_sequences() {
        let mut empty: Vec<Coord<f64>> = vec![];
        close_ring(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![coord(2.0, 3.0)];
        close_ring(&mut single);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_close_uses_exact_equality() {
        // Endpoints differing by rounding noise are not considered closed.
        let mut ring = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1e-15, 0.0)];
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_cartographic_radians_layout() {
        let flat = to_cartographic_radians(&[coord(180.0, 90.0), coord(-90.0, 45.0)]);
        assert_eq!(flat.len(), 6);
        assert!((flat[0] - std::f64::consts::PI).abs() < 1e-12);
        assert!((flat[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(flat[2], 0.0);
        assert_eq!(flat[5], 0.0);
    }

    #[test]
    fn test_degree_radian_roundtrip() {
        let lon = -0.1278;
        let lat = 51.5074;
        let flat = to_cartographic_radians(&[coord(lon, lat)]);
        assert!((flat[0].to_degrees() - lon).abs() < 1e-9);
        assert!((flat[1].to_degrees() - lat).abs() < 1e-9);
    }

    #[test]
    fn test_flatten_unflatten_roundtrip() {
        let points = vec![coord(0.1, 0.2), coord(0.3, 0.4), coord(0.5, 0.6)];
        assert_eq!(unflatten(&flatten(&points)), points);
    }

    #[test]
    fn test_unflatten_ignores_partial_tuple() {
        let points = unflatten(&[0.1, 0.2, 0.0, 0.3]);
        assert_eq!(points, vec![coord(0.1, 0.2)]);
    }
}
