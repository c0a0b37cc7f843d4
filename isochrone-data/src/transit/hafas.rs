//! Response types for `transport.rest` HAFAS endpoints.
//!
//! Only the fields the engine reads are modelled; everything else in the
//! payloads is ignored.
//!
//! See: <https://v6.bvg.transport.rest/api.html>

use chrono::{DateTime, FixedOffset};
use geo::Coord;
use isochrone_core::{JourneyOutcome, Place, TransitError};
use serde::Deserialize;
use std::time::Duration;

/// Marker the service puts in `msg` when no journey exists.
const NO_CONNECTION: &str = "No connection found";

/// Marker the service puts in `msg` when an endpoint is far from any stop.
const NO_STATION_NEARBY: &str = "no stations found close";

/// One entry of a `/locations` response.
#[derive(Debug, Deserialize)]
pub struct HafasLocation {
    /// Street address, present for address results.
    pub address: Option<String>,
    /// Display name, present for stops and POIs.
    pub name: Option<String>,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

impl HafasLocation {
    fn into_place(self) -> Option<Place> {
        let address = self.address.or(self.name)?;
        Some(Place::new(
            address,
            Coord {
                x: self.longitude,
                y: self.latitude,
            },
        ))
    }
}

/// Body of a successful `/journeys` response.
#[derive(Debug, Deserialize)]
pub struct JourneysResponse {
    /// Candidate journeys, best first.
    #[serde(default)]
    pub journeys: Vec<Journey>,
}

/// One journey made of consecutive legs.
#[derive(Debug, Deserialize)]
pub struct Journey {
    /// Legs in travel order.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// One leg of a journey.
#[derive(Debug, Deserialize)]
pub struct Leg {
    /// ISO 8601 arrival time at the end of the leg.
    pub arrival: Option<String>,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human readable failure description.
    pub msg: Option<String>,
}

/// Pick the first usable place from a `/locations` body.
pub fn parse_place(body: &str, query: &str) -> Result<Place, TransitError> {
    let locations: Vec<HafasLocation> =
        serde_json::from_str(body).map_err(|err| TransitError::ParseError {
            message: err.to_string(),
        })?;
    locations
        .into_iter()
        .find_map(HafasLocation::into_place)
        .ok_or_else(|| TransitError::NotFound {
            query: query.to_owned(),
        })
}

/// Interpret a `/journeys` answer relative to the requested departure.
///
/// `status` is the HTTP status code. Error payloads that report a missing
/// connection or a missing nearby station become outcomes, any other
/// non-success status is [`TransitError::HttpError`].
pub fn parse_journey(
    url: &str,
    status: u16,
    body: &str,
    departure: &DateTime<FixedOffset>,
) -> Result<JourneyOutcome, TransitError> {
    if !(200..300).contains(&status) {
        return classify_failure(url, status, body);
    }

    let response: JourneysResponse =
        serde_json::from_str(body).map_err(|err| TransitError::ParseError {
            message: err.to_string(),
        })?;
    let Some(arrival) = response
        .journeys
        .first()
        .and_then(|journey| journey.legs.last())
        .and_then(|leg| leg.arrival.as_deref())
    else {
        return Ok(JourneyOutcome::NoConnection);
    };

    let arrived =
        DateTime::parse_from_rfc3339(arrival).map_err(|_| TransitError::InvalidTime {
            value: arrival.to_owned(),
        })?;
    let minutes = u64::try_from((arrived - *departure).num_minutes()).map_err(|_| {
        TransitError::InvalidTime {
            value: arrival.to_owned(),
        }
    })?;
    Ok(JourneyOutcome::Reachable(Duration::from_secs(minutes * 60)))
}

fn classify_failure(url: &str, status: u16, body: &str) -> Result<JourneyOutcome, TransitError> {
    let msg = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.msg);
    match msg {
        Some(msg) if msg.contains(NO_CONNECTION) => Ok(JourneyOutcome::NoConnection),
        Some(msg) if msg.contains(NO_STATION_NEARBY) => Ok(JourneyOutcome::NoStationNearby),
        Some(msg) => Err(TransitError::HttpError {
            url: url.to_owned(),
            status,
            message: msg,
        }),
        None => Err(TransitError::HttpError {
            url: url.to_owned(),
            status,
            message: body.to_owned(),
        }),
    }
}
