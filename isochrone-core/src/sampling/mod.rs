//! Choose destination coordinates to probe with the transit provider.
//!
//! Two interchangeable [`PointSource`] implementations live here:
//!
//! - [`GridPointSource`] walks a fixed lattice covering a
//!   [`BoundingRegion`]. It is finite and consumed exactly once.
//! - [`AdaptivePointSource`] triangulates the points seen so far and proposes
//!   the vertex mean of the largest triangle, then folds that point back into
//!   its set.
//!
//! [`select_point_source`] picks one of them for a sampling session from the
//! number of destinations already known for an origin.
//!
//! Sources are synchronous and perform no I/O. They never log; callers decide
//! how to react to [`PointSourceError`].

mod adaptive;
mod coverage;
mod error;
mod grid;
mod policy;
mod region;

pub use adaptive::{AdaptivePointSource, SeedArray};
pub use coverage::max_nearest_neighbour_distance;
pub use error::{GridError, PointSourceError, RegionError, SamplingError, SeedError};
pub use grid::GridPointSource;
pub use policy::{SelectedSource, SourceKind, coverage_threshold, select_point_source};
pub use region::BoundingRegion;

use geo::Coord;

/// Produce candidate destination points one at a time.
///
/// # Examples
///
/// ```
/// use isochrone_core::sampling::{BoundingRegion, GridPointSource, PointSource};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let region = BoundingRegion::new(0.0, 1.0, 2.5, 3.5)?;
/// let mut grid = GridPointSource::new(region, 2)?;
/// let first = grid.next_point()?;
/// assert_eq!((first.x, first.y), (0.0, 2.5));
/// assert!(grid.has_remaining());
/// # Ok(())
/// # }
/// ```
pub trait PointSource {
    /// Return the next point to probe.
    ///
    /// Finite sources return [`PointSourceError::ExhaustedSource`] once every
    /// point has been handed out. Geometric sources return
    /// [`PointSourceError::DegenerateGeometry`] when no new point can be
    /// derived from their current state.
    fn next_point(&mut self) -> Result<Coord<f64>, PointSourceError>;

    /// Report whether the source still has supply left.
    ///
    /// Finite sources return `false` once [`PointSource::next_point`] would
    /// return [`PointSourceError::ExhaustedSource`]. Unbounded sources always
    /// return `true`; a geometric failure is only reported by `next_point`.
    fn has_remaining(&self) -> bool;
}
