//! Refine coverage by splitting the largest Delaunay triangle.

use std::cmp::Ordering;

use geo::{Area, Coord, Triangle};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use super::PointSource;
use super::error::{PointSourceError, SeedError};

/// Untyped nested numeric array used to accept seed sets from JSON.
///
/// A well-formed seed set is a list of `[x, y]` pairs. Anything else is
/// rejected by [`AdaptivePointSource::from_array`].
///
/// # Examples
///
/// ```
/// use isochrone_core::sampling::{AdaptivePointSource, SeedArray};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds: SeedArray = serde_json::from_str("[[0, 0], [0, 1], [1, 1]]")?;
/// let source = AdaptivePointSource::from_array(&seeds)?;
/// assert_eq!(source.points().len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum SeedArray {
    /// A single number.
    Scalar(f64),
    /// A list of nested arrays.
    List(Vec<SeedArray>),
}

impl SeedArray {
    /// Build a two-dimensional array from coordinate pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::List(
            pairs
                .iter()
                .map(|&(x, y)| Self::List(vec![Self::Scalar(x), Self::Scalar(y)]))
                .collect(),
        )
    }

    /// Nesting depth: scalars are 0, lists are one more than their deepest
    /// element. An empty list counts as depth 1.
    fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::List(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
        }
    }
}

/// Unbounded source that proposes the vertex mean of the largest triangle in
/// the Delaunay triangulation of its point set.
///
/// Every generated point is appended to the set, so each call refines the
/// triangulation produced by the previous one. The set starts with at least
/// three points, grows by exactly one per successful step and never reorders.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use isochrone_core::sampling::{AdaptivePointSource, PointSource};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut source = AdaptivePointSource::new(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 0.0, y: 3.0 },
///     Coord { x: 3.0, y: 3.0 },
/// ])?;
/// let next = source.next_point()?;
/// assert!((next.x - 1.0).abs() < 1e-12);
/// assert!((next.y - 2.0).abs() < 1e-12);
/// assert_eq!(source.points().len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptivePointSource {
    points: Vec<Coord<f64>>,
}

impl AdaptivePointSource {
    /// Seed the source with `points`.
    ///
    /// Returns [`SeedError::InsufficientPoints`] for fewer than three points
    /// and [`SeedError::NonFiniteCoordinate`] when a coordinate is NaN or
    /// infinite.
    pub fn new(points: Vec<Coord<f64>>) -> Result<Self, SeedError> {
        if points.len() < 3 {
            return Err(SeedError::InsufficientPoints {
                found: points.len(),
            });
        }
        if let Some(index) = points
            .iter()
            .position(|c| !(c.x.is_finite() && c.y.is_finite()))
        {
            return Err(SeedError::NonFiniteCoordinate { index });
        }
        Ok(Self { points })
    }

    /// Seed the source from an untyped array.
    ///
    /// The array must be two levels deep, hold at least three rows and every
    /// row must have exactly two entries. The checks run in that order.
    pub fn from_array(seeds: &SeedArray) -> Result<Self, SeedError> {
        let depth = seeds.depth();
        let rows = match seeds {
            SeedArray::List(rows) if depth == 2 => rows,
            _ => {
                return Err(SeedError::InvalidDimensionality {
                    reason: format!("expected a two-dimensional array, got depth {depth}"),
                });
            }
        };
        if rows.len() < 3 {
            return Err(SeedError::InsufficientPoints { found: rows.len() });
        }
        let points = rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row {
                SeedArray::List(values) => match values.as_slice() {
                    [SeedArray::Scalar(x), SeedArray::Scalar(y)] => Ok(Coord { x: *x, y: *y }),
                    _ => Err(SeedError::InvalidDimensionality {
                        reason: format!("row {index} has {} values, expected 2", values.len()),
                    }),
                },
                SeedArray::Scalar(_) => Err(SeedError::InvalidDimensionality {
                    reason: format!("row {index} is a scalar"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    /// Current point set: the seeds followed by every generated point.
    #[must_use]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Consume the source and return its point set.
    #[must_use]
    pub fn into_points(self) -> Vec<Coord<f64>> {
        self.points
    }

    fn largest_triangle(&self) -> Result<Triangle<f64>, PointSourceError> {
        let vertices = self
            .points
            .iter()
            .map(|c| Point2::new(c.x, c.y))
            .collect::<Vec<_>>();
        let triangulation = DelaunayTriangulation::<Point2<f64>>::bulk_load(vertices)
            .map_err(|_| PointSourceError::DegenerateGeometry)?;

        triangulation
            .inner_faces()
            .map(|face| {
                let [a, b, c] = face.positions();
                Triangle::new(
                    Coord { x: a.x, y: a.y },
                    Coord { x: b.x, y: b.y },
                    Coord { x: c.x, y: c.y },
                )
            })
            .map(|triangle| (triangle.unsigned_area(), triangle))
            .max_by(|(left_area, left), (right_area, right)| {
                left_area
                    .total_cmp(right_area)
                    .then_with(|| centroid_order(right, left))
            })
            .map(|(_, triangle)| triangle)
            .ok_or(PointSourceError::DegenerateGeometry)
    }
}

impl PointSource for AdaptivePointSource {
    fn next_point(&mut self) -> Result<Coord<f64>, PointSourceError> {
        let triangle = self.largest_triangle()?;
        let point = vertex_mean(&triangle);
        self.points.push(point);
        Ok(point)
    }

    fn has_remaining(&self) -> bool {
        true
    }
}

fn vertex_mean(triangle: &Triangle<f64>) -> Coord<f64> {
    let [a, b, c] = triangle.to_array();
    Coord {
        x: (a.x + b.x + c.x) / 3.0,
        y: (a.y + b.y + c.y) / 3.0,
    }
}

/// Lexicographic `(x, y)` order of triangle centroids.
fn centroid_order(left: &Triangle<f64>, right: &Triangle<f64>) -> Ordering {
    let left = vertex_mean(left);
    let right = vertex_mean(right);
    left.x.total_cmp(&right.x).then(left.y.total_cmp(&right.y))
}
