use geo::Coord;

/// An address and coordinate that has not been stored yet.
///
/// Transit providers return places when resolving free-text queries. The
/// coordinate is WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use isochrone_core::Place;
///
/// let place = Place::new("Alexanderplatz, Berlin", Coord { x: 13.4132, y: 52.5219 });
/// assert_eq!(place.address, "Alexanderplatz, Berlin");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Human readable address.
    pub address: String,
    /// Geospatial position.
    pub coord: Coord<f64>,
}

impl Place {
    /// Construct a place from an address and a coordinate.
    pub fn new(address: impl Into<String>, coord: Coord<f64>) -> Self {
        Self {
            address: address.into(),
            coord,
        }
    }
}

/// A stored location used as a trip origin or destination.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use isochrone_core::Location;
///
/// let location = Location::new(7, "Hermannplatz, Berlin", Coord { x: 13.4245, y: 52.4869 });
/// assert_eq!(location.id, 7);
/// assert_eq!(location.place().address, "Hermannplatz, Berlin");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Identifier assigned by the store.
    pub id: u64,
    /// Human readable address.
    pub address: String,
    /// Geospatial position.
    pub coord: Coord<f64>,
}

impl Location {
    /// Construct a `Location`.
    pub fn new(id: u64, address: impl Into<String>, coord: Coord<f64>) -> Self {
        Self {
            id,
            address: address.into(),
            coord,
        }
    }

    /// The address and coordinate without the store identifier.
    #[must_use]
    pub fn place(&self) -> Place {
        Place::new(self.address.clone(), self.coord)
    }
}
