//! Choose the point source for a sampling session.

use geo::Coord;

use super::adaptive::AdaptivePointSource;
use super::error::{PointSourceError, SamplingError};
use super::grid::GridPointSource;
use super::region::BoundingRegion;
use super::PointSource;

/// Which strategy a [`SelectedSource`] wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SourceKind {
    /// The deterministic lattice.
    Grid,
    /// Largest-triangle refinement.
    Adaptive,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Grid => "grid",
            Self::Adaptive => "adaptive",
        })
    }
}

/// The point source chosen for one session.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedSource {
    /// Too few destinations are known; cover the region with a lattice.
    Grid(GridPointSource),
    /// Enough destinations are known to refine their triangulation.
    Adaptive(AdaptivePointSource),
}

impl SelectedSource {
    /// Strategy wrapped by this source.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Grid(_) => SourceKind::Grid,
            Self::Adaptive(_) => SourceKind::Adaptive,
        }
    }
}

impl PointSource for SelectedSource {
    fn next_point(&mut self) -> Result<Coord<f64>, PointSourceError> {
        match self {
            Self::Grid(source) => source.next_point(),
            Self::Adaptive(source) => source.next_point(),
        }
    }

    fn has_remaining(&self) -> bool {
        match self {
            Self::Grid(source) => source.has_remaining(),
            Self::Adaptive(source) => source.has_remaining(),
        }
    }
}

/// Number of known points from which the adaptive source takes over.
///
/// This is the size of the full lattice, `points_per_axis²`.
#[must_use]
pub const fn coverage_threshold(points_per_axis: u32) -> usize {
    (points_per_axis as usize).saturating_mul(points_per_axis as usize)
}

/// Pick the source for a session given the destinations already known.
///
/// Fewer than [`coverage_threshold`] known points select a fresh grid over
/// `region`. Otherwise an adaptive source is seeded with every known point in
/// the given order.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use isochrone_core::sampling::{BoundingRegion, SourceKind, select_point_source};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let region = BoundingRegion::new(0.0, 1.0, 0.0, 1.0)?;
/// let known = [Coord { x: 0.5, y: 0.5 }];
/// assert_eq!(select_point_source(&known, region, 3)?.kind(), SourceKind::Grid);
/// # Ok(())
/// # }
/// ```
pub fn select_point_source(
    known: &[Coord<f64>],
    region: BoundingRegion,
    points_per_axis: u32,
) -> Result<SelectedSource, SamplingError> {
    if known.len() < coverage_threshold(points_per_axis) {
        Ok(SelectedSource::Grid(GridPointSource::new(
            region,
            points_per_axis,
        )?))
    } else {
        Ok(SelectedSource::Adaptive(AdaptivePointSource::new(
            known.to_vec(),
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{GridError, SeedError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn region() -> BoundingRegion {
        BoundingRegion::new(0.0, 1.0, 2.5, 3.5).expect("valid region")
    }

    fn known(count: usize) -> Vec<Coord<f64>> {
        (0..count)
            .map(|i| Coord {
                x: (i % 3) as f64 / 2.0,
                y: 2.5 + (i / 3) as f64 / 2.0,
            })
            .collect()
    }

    #[rstest]
    #[case(0, SourceKind::Grid)]
    #[case(8, SourceKind::Grid)]
    #[case(9, SourceKind::Adaptive)]
    #[case(12, SourceKind::Adaptive)]
    fn threshold_is_square_of_density(
        region: BoundingRegion,
        #[case] count: usize,
        #[case] expected: SourceKind,
    ) {
        let source = select_point_source(&known(count), region, 3).expect("source selected");
        assert_eq!(source.kind(), expected);
    }

    #[rstest]
    fn adaptive_source_is_seeded_with_known_points(region: BoundingRegion) {
        let points = known(9);
        let source = select_point_source(&points, region, 3).expect("source selected");
        let SelectedSource::Adaptive(adaptive) = source else {
            panic!("expected adaptive source");
        };
        assert_eq!(adaptive.points(), points.as_slice());
    }

    #[rstest]
    fn grid_source_ignores_known_points(region: BoundingRegion) {
        let mut source = select_point_source(&known(4), region, 3).expect("source selected");
        assert_eq!(
            source.next_point().expect("lattice point"),
            Coord { x: 0.0, y: 2.5 }
        );
    }

    #[rstest]
    fn invalid_density_surfaces_grid_error(region: BoundingRegion) {
        let err = select_point_source(&[], region, 1).expect_err("density too low");
        assert_eq!(
            err,
            SamplingError::Grid(GridError::InvalidDensity { points_per_axis: 1 })
        );
    }

    #[rstest]
    fn zero_density_seeds_from_too_few_points(region: BoundingRegion) {
        let err = select_point_source(&known(2), region, 0).expect_err("two seeds");
        assert_eq!(
            err,
            SamplingError::Seed(SeedError::InsufficientPoints { found: 2 })
        );
    }

    #[rstest]
    #[case(2, 4)]
    #[case(3, 9)]
    #[case(5, 25)]
    fn coverage_threshold_is_lattice_size(#[case] density: u32, #[case] expected: usize) {
        assert_eq!(coverage_threshold(density), expected);
    }
}
