//! Reverse geocoders turning probe coordinates into addresses.

mod nominatim;

pub use nominatim::{NominatimConfig, NominatimGeocoder, parse_reverse};
