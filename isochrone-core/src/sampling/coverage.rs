//! Coverage metric for sampled point sets.

use geo::Coord;
use rstar::RTree;

/// Largest distance from any point to its nearest neighbour.
///
/// A lower value means the set covers its hull more evenly. Returns `None`
/// when fewer than two points are supplied. Coincident points contribute a
/// distance of zero.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use isochrone_core::sampling::max_nearest_neighbour_distance;
///
/// let points = [
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 3.0, y: 4.0 },
///     Coord { x: 3.0, y: 5.0 },
/// ];
/// assert_eq!(max_nearest_neighbour_distance(&points), Some(5.0));
/// assert_eq!(max_nearest_neighbour_distance(&points[..1]), None);
/// ```
#[must_use]
pub fn max_nearest_neighbour_distance(points: &[Coord<f64>]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let tree = RTree::bulk_load(points.iter().map(|c| [c.x, c.y]).collect());
    points
        .iter()
        .filter_map(|c| {
            let query = [c.x, c.y];
            // The nearest entry is the query point itself.
            tree.nearest_neighbor_iter(&query)
                .nth(1)
                .map(|[x, y]| (x - c.x).hypot(y - c.y))
        })
        .max_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unit_square_has_unit_spacing() {
        let square = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 0.0, y: 1.0 },
            Coord { x: 1.0, y: 1.0 },
        ];
        let distance = max_nearest_neighbour_distance(&square).expect("metric defined");
        assert!((distance - 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn isolated_point_dominates() {
        let points = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.1, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
        ];
        let distance = max_nearest_neighbour_distance(&points).expect("metric defined");
        assert!((distance - 9.9).abs() < 1e-12);
    }

    #[rstest]
    fn coincident_points_have_zero_spacing() {
        let points = [Coord { x: 2.0, y: 2.0 }; 2];
        assert_eq!(max_nearest_neighbour_distance(&points), Some(0.0));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn undefined_below_two_points(#[case] count: usize) {
        let points = vec![Coord { x: 0.0, y: 0.0 }; count];
        assert_eq!(max_nearest_neighbour_distance(&points), None);
    }
}
