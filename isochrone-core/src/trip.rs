use std::time::Duration;

/// A travel-time observation between two stored locations.
///
/// `duration` is `None` when the provider found no connection or no station
/// near one of the endpoints. Such trips are kept so the destination is not
/// probed again, but they are not usable samples.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use isochrone_core::Trip;
///
/// let trip = Trip::reachable(1, 2, Duration::from_secs(25 * 60));
/// assert!(trip.is_usable());
/// assert!(!Trip::unreachable(1, 3).is_usable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    /// Identifier of the origin location.
    pub origin_id: u64,
    /// Identifier of the destination location.
    pub destination_id: u64,
    /// Door-to-door travel time, if a connection exists.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "duration_secs", with = "optional_secs", default)
    )]
    pub duration: Option<Duration>,
}

impl Trip {
    /// A trip with a known travel time.
    #[must_use]
    pub const fn reachable(origin_id: u64, destination_id: u64, duration: Duration) -> Self {
        Self {
            origin_id,
            destination_id,
            duration: Some(duration),
        }
    }

    /// A trip for which the provider found no connection.
    #[must_use]
    pub const fn unreachable(origin_id: u64, destination_id: u64) -> Self {
        Self {
            origin_id,
            destination_id,
            duration: None,
        }
    }

    /// Whether the trip carries a travel time.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.duration.is_some()
    }
}

#[cfg(feature = "serde")]
pub(crate) mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn zero_duration_is_usable() {
        assert!(Trip::reachable(1, 2, Duration::ZERO).is_usable());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case(Trip::reachable(1, 2, Duration::from_secs(600)), r#"{"origin_id":1,"destination_id":2,"duration_secs":600}"#)]
    #[case(Trip::unreachable(1, 2), r#"{"origin_id":1,"destination_id":2,"duration_secs":null}"#)]
    fn serialises_duration_as_seconds(#[case] trip: Trip, #[case] expected: &str) {
        let json = serde_json::to_string(&trip).expect("serialise trip");
        assert_eq!(json, expected);
    }
}
