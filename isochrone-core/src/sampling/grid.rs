//! Deterministic lattice covering a bounding region.

use geo::Coord;

use super::error::{GridError, PointSourceError};
use super::region::BoundingRegion;
use super::PointSource;

/// Finite source walking a `points_per_axis × points_per_axis` lattice.
///
/// Both axes are spaced linearly with the region bounds included. Points are
/// ordered with x ascending in the outer loop and y ascending in the inner
/// loop, so the first point is the south-west corner and the last point the
/// north-east corner. Points are derived from the cursor on demand; only the
/// cursor moves.
///
/// # Examples
///
/// ```
/// use isochrone_core::sampling::{BoundingRegion, GridPointSource};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let region = BoundingRegion::new(0.0, 1.0, 2.5, 3.5)?;
/// let points: Vec<_> = GridPointSource::new(region, 3)?.map(|c| (c.x, c.y)).collect();
/// assert_eq!(points.first(), Some(&(0.0, 2.5)));
/// assert_eq!(points.last(), Some(&(1.0, 3.5)));
/// assert_eq!(points.len(), 9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridPointSource {
    region: BoundingRegion,
    per_axis: usize,
    total: usize,
    cursor: usize,
}

impl GridPointSource {
    /// Build the lattice for `region`.
    ///
    /// Returns [`GridError::InvalidDensity`] when `points_per_axis < 2` or
    /// when the lattice size does not fit in `usize`.
    pub fn new(region: BoundingRegion, points_per_axis: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDensity { points_per_axis };
        if points_per_axis < 2 {
            return Err(invalid);
        }
        let per_axis = usize::try_from(points_per_axis).map_err(|_| invalid.clone())?;
        let total = per_axis.checked_mul(per_axis).ok_or(invalid)?;
        Ok(Self {
            region,
            per_axis,
            total,
            cursor: 0,
        })
    }

    /// Build the lattice from a `[west, east, south, north]` slice.
    pub fn from_bounds(bounds: &[f64], points_per_axis: u32) -> Result<Self, GridError> {
        let region = BoundingRegion::from_bounds(bounds)?;
        Self::new(region, points_per_axis)
    }

    /// Total number of lattice points, consumed or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of points not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.cursor)
    }

    /// Lattice point at position `index` in walking order.
    fn point_at(&self, index: usize) -> Option<Coord<f64>> {
        if index >= self.total {
            return None;
        }
        let column = index / self.per_axis;
        let row = index % self.per_axis;
        Some(Coord {
            x: axis_value(self.region.west(), self.region.east(), self.per_axis, column),
            y: axis_value(self.region.south(), self.region.north(), self.per_axis, row),
        })
    }
}

impl PointSource for GridPointSource {
    fn next_point(&mut self) -> Result<Coord<f64>, PointSourceError> {
        let point = self
            .point_at(self.cursor)
            .ok_or(PointSourceError::ExhaustedSource)?;
        self.cursor += 1;
        Ok(point)
    }

    fn has_remaining(&self) -> bool {
        self.cursor < self.total
    }
}

impl Iterator for GridPointSource {
    type Item = Coord<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridPointSource {}

/// Value `index` of `count` evenly spaced values from `start` to `end`, both
/// included.
///
/// The final value is pinned to `end` so rounding never leaves the region.
fn axis_value(start: f64, end: f64, count: usize, index: usize) -> f64 {
    let last = count.saturating_sub(1);
    if index == last {
        return end;
    }
    let step = (end - start) / last as f64;
    start + step * index as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn region() -> BoundingRegion {
        BoundingRegion::new(0.0, 1.0, 2.5, 3.5).expect("valid region")
    }

    fn pairs(source: GridPointSource) -> Vec<(f64, f64)> {
        source.map(|c| (c.x, c.y)).collect()
    }

    #[rstest]
    fn produces_lattice_in_x_major_order(region: BoundingRegion) {
        let source = GridPointSource::new(region, 3).expect("valid grid");
        assert_eq!(
            pairs(source),
            vec![
                (0.0, 2.5),
                (0.0, 3.0),
                (0.0, 3.5),
                (0.5, 2.5),
                (0.5, 3.0),
                (0.5, 3.5),
                (1.0, 2.5),
                (1.0, 3.0),
                (1.0, 3.5),
            ]
        );
    }

    #[rstest]
    fn first_point_is_south_west_corner(region: BoundingRegion) {
        let mut source = GridPointSource::new(region, 3).expect("valid grid");
        let first = source.next_point().expect("first point");
        assert_eq!(first, Coord { x: 0.0, y: 2.5 });
    }

    #[rstest]
    fn corners_are_covered(region: BoundingRegion) {
        let points = pairs(GridPointSource::new(region, 3).expect("valid grid"));
        assert_eq!(points[0], (0.0, 2.5));
        assert_eq!(points[2], (0.0, 3.5));
        assert_eq!(points[6], (1.0, 2.5));
        assert_eq!(points[8], (1.0, 3.5));
    }

    #[rstest]
    fn exhaustion_is_reported(region: BoundingRegion) {
        let mut source = GridPointSource::new(region, 3).expect("valid grid");
        assert!(source.has_remaining());
        for _ in 0..9 {
            source.next_point().expect("lattice point");
        }
        assert!(!source.has_remaining());
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.next_point(), Err(PointSourceError::ExhaustedSource));
        assert_eq!(source.next_point(), Err(PointSourceError::ExhaustedSource));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn rejects_sparse_density(region: BoundingRegion, #[case] points_per_axis: u32) {
        let err = GridPointSource::new(region, points_per_axis).expect_err("too sparse");
        assert_eq!(err, GridError::InvalidDensity { points_per_axis });
    }

    #[rstest]
    fn rejects_three_bounds() {
        let err = GridPointSource::from_bounds(&[0.0, 1.0, 2.5], 3).expect_err("three bounds");
        assert!(matches!(err, GridError::InvalidRegion(_)));
    }

    #[rstest]
    #[case(&[1.0, 0.0, 2.5, 3.5])]
    #[case(&[0.0, 1.0, 3.5, 2.5])]
    fn rejects_inverted_bounds(#[case] bounds: &[f64]) {
        let err = GridPointSource::from_bounds(bounds, 3).expect_err("inverted bounds");
        assert!(matches!(err, GridError::InvalidRegion(_)));
    }

    #[rstest]
    fn identical_parameters_yield_identical_sequences(region: BoundingRegion) {
        let first = pairs(GridPointSource::new(region, 5).expect("valid grid"));
        let second = pairs(GridPointSource::new(region, 5).expect("valid grid"));
        assert_eq!(first, second);
    }

    #[cfg(target_pointer_width = "64")]
    #[rstest]
    fn dense_lattice_is_walked_without_materialising(region: BoundingRegion) {
        let mut source = GridPointSource::new(region, 100_000).expect("valid grid");
        assert_eq!(source.total(), 10_000_000_000);

        let first = source.next_point().expect("first point");
        assert_eq!(first, Coord { x: 0.0, y: 2.5 });
        assert_eq!(source.point_at(99_999), Some(Coord { x: 0.0, y: 3.5 }));
        assert_eq!(source.point_at(10_000_000_000 - 1), Some(Coord { x: 1.0, y: 3.5 }));
        assert_eq!(source.point_at(10_000_000_000), None);
        assert_eq!(source.remaining(), 10_000_000_000 - 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[rstest]
    fn largest_density_is_accepted(region: BoundingRegion) {
        let source = GridPointSource::new(region, u32::MAX).expect("valid grid");
        assert_eq!(source.len(), (u32::MAX as usize) * (u32::MAX as usize));
    }

    #[rstest]
    fn size_hint_tracks_cursor(region: BoundingRegion) {
        let mut source = GridPointSource::new(region, 2).expect("valid grid");
        assert_eq!(source.total(), 4);
        assert_eq!(source.len(), 4);
        source.next_point().expect("lattice point");
        assert_eq!(source.size_hint(), (3, Some(3)));
        assert_eq!(source.total(), 4);
    }
}
