//! Error types raised while constructing or draining point sources.

use thiserror::Error;

/// Errors returned by [`crate::sampling::BoundingRegion`] constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// The bounds were malformed.
    ///
    /// Raised when the input does not hold exactly four values, when
    /// `west >= east` or `south >= north`, or when a bound is not finite.
    #[error("invalid bounding region: {reason}")]
    InvalidRegion {
        /// Human readable description of the violated rule.
        reason: String,
    },
}

/// Errors returned by [`crate::sampling::GridPointSource`] constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The bounding region was malformed.
    #[error(transparent)]
    InvalidRegion(#[from] RegionError),
    /// Fewer than two points per axis were requested.
    #[error("points per axis must be at least 2, got {points_per_axis}")]
    InvalidDensity {
        /// The rejected density.
        points_per_axis: u32,
    },
}

/// Errors returned by [`crate::sampling::AdaptivePointSource`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// A triangulation needs at least three points.
    #[error("at least three seed points are required, got {found}")]
    InsufficientPoints {
        /// Number of points supplied.
        found: usize,
    },
    /// The seed set was not a flat list of two-dimensional points.
    #[error("seed points must be a list of [x, y] pairs: {reason}")]
    InvalidDimensionality {
        /// Human readable description of the offending shape.
        reason: String,
    },
    /// A seed coordinate was NaN or infinite.
    #[error("seed point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the offending point in the seed set.
        index: usize,
    },
}

/// Errors returned by [`crate::sampling::PointSource::next_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PointSourceError {
    /// Every point of a finite source has been consumed.
    ///
    /// This is expected. Callers may switch to another strategy.
    #[error("the point source has no points remaining")]
    ExhaustedSource,
    /// No triangle could be formed from the current point set, e.g. because
    /// every point is collinear.
    ///
    /// Retrying with the same set reproduces the failure.
    #[error("the point set does not span a triangle")]
    DegenerateGeometry,
}

/// Errors returned by [`crate::sampling::select_point_source`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// The grid source could not be built.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The adaptive source could not be seeded.
    #[error(transparent)]
    Seed(#[from] SeedError),
}
