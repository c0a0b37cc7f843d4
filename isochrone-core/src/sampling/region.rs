//! Axis-aligned sampling regions expressed as west/east/south/north bounds.

use geo::{Coord, Rect};

use super::error::RegionError;

/// Rectangular sampling domain in WGS84 degrees.
///
/// The region is validated on construction so that `west < east` and
/// `south < north`, with every bound finite. It is never mutated afterwards.
///
/// # Examples
///
/// ```
/// use isochrone_core::sampling::BoundingRegion;
///
/// # fn main() -> Result<(), isochrone_core::sampling::RegionError> {
/// let region = BoundingRegion::new(13.2756, 13.4892, 52.4677, 52.5532)?;
/// assert!(region.west() < region.east());
/// assert!(BoundingRegion::new(1.0, 0.0, 0.0, 1.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "[f64; 4]", into = "[f64; 4]")
)]
pub struct BoundingRegion {
    west: f64,
    east: f64,
    south: f64,
    north: f64,
}

impl BoundingRegion {
    /// Central Berlin, the default sampling area.
    pub const BERLIN: Self = Self {
        west: 13.2756,
        east: 13.4892,
        south: 52.4677,
        north: 52.5532,
    };

    /// Validate and construct a region.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self, RegionError> {
        if ![west, east, south, north].iter().all(|bound| bound.is_finite()) {
            return Err(invalid("every bound must be finite"));
        }
        if west >= east {
            return Err(invalid("west must be smaller than east"));
        }
        if south >= north {
            return Err(invalid("south must be smaller than north"));
        }
        Ok(Self {
            west,
            east,
            south,
            north,
        })
    }

    /// Construct a region from a `[west, east, south, north]` slice.
    ///
    /// Slices with any other length are rejected.
    pub fn from_bounds(bounds: &[f64]) -> Result<Self, RegionError> {
        match *bounds {
            [west, east, south, north] => Self::new(west, east, south, north),
            _ => Err(RegionError::InvalidRegion {
                reason: format!("expected 4 bounds, got {}", bounds.len()),
            }),
        }
    }

    /// Western (minimum x) bound.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Eastern (maximum x) bound.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Southern (minimum y) bound.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Northern (maximum y) bound.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// The region as a `geo` rectangle.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }
}

impl Default for BoundingRegion {
    fn default() -> Self {
        Self::BERLIN
    }
}

impl TryFrom<[f64; 4]> for BoundingRegion {
    type Error = RegionError;

    fn try_from(bounds: [f64; 4]) -> Result<Self, Self::Error> {
        Self::from_bounds(&bounds)
    }
}

impl From<BoundingRegion> for [f64; 4] {
    fn from(region: BoundingRegion) -> Self {
        [region.west, region.east, region.south, region.north]
    }
}

fn invalid(reason: &str) -> RegionError {
    RegionError::InvalidRegion {
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_ordered_bounds() {
        let region = BoundingRegion::new(0.0, 1.0, 2.5, 3.5).expect("valid region");
        assert_eq!(<[f64; 4]>::from(region), [0.0, 1.0, 2.5, 3.5]);
    }

    #[rstest]
    #[case(&[0.0, 1.0, 2.5])]
    #[case(&[0.0, 1.0, 2.5, 3.5, 4.0])]
    #[case(&[])]
    fn rejects_wrong_arity(#[case] bounds: &[f64]) {
        let err = BoundingRegion::from_bounds(bounds).expect_err("arity must be 4");
        assert!(matches!(err, RegionError::InvalidRegion { .. }));
    }

    #[rstest]
    #[case(1.0, 0.0, 2.5, 3.5)]
    #[case(0.0, 1.0, 3.5, 2.5)]
    #[case(1.0, 1.0, 2.5, 3.5)]
    #[case(0.0, 1.0, 2.5, 2.5)]
    #[case(f64::NAN, 1.0, 2.5, 3.5)]
    #[case(0.0, f64::INFINITY, 2.5, 3.5)]
    fn rejects_inverted_or_non_finite_bounds(
        #[case] west: f64,
        #[case] east: f64,
        #[case] south: f64,
        #[case] north: f64,
    ) {
        assert!(BoundingRegion::new(west, east, south, north).is_err());
    }

    #[rstest]
    fn converts_to_rect() {
        let rect = BoundingRegion::BERLIN.to_rect();
        assert_eq!(rect.min(), Coord { x: 13.2756, y: 52.4677 });
        assert_eq!(rect.max(), Coord { x: 13.4892, y: 52.5532 });
    }
}
