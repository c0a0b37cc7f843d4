use std::time::Duration;

use crate::Location;
use crate::sampling::SourceKind;

/// Why a sampling session stopped drawing points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StopReason {
    /// The requested number of usable samples was collected.
    QuotaReached,
    /// The grid handed out every lattice point.
    SourceExhausted,
    /// The known destinations do not span a triangle.
    DegenerateGeometry,
    /// Every probe of a batch failed at the transit or geocoding service.
    TransitUnavailable,
    /// The session sent as many probes as its budget allows.
    ProbeBudgetExhausted,
}

/// One newly probed destination.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// The stored destination.
    pub destination: Location,
    /// Travel time from the origin, if a connection exists.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "duration_secs", with = "crate::trip::optional_secs", default)
    )]
    pub duration: Option<Duration>,
}

impl Sample {
    /// Whether the sample carries a travel time.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.duration.is_some()
    }
}

/// Outcome of [`crate::session::SamplingSession::sample`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleReport {
    /// Strategy that produced the probe points.
    pub source: SourceKind,
    /// Destinations probed in this session, in probe order.
    pub samples: Vec<Sample>,
    /// Number of destinations probed, usable or not.
    pub probed: usize,
    /// Number of samples with a travel time.
    pub accepted: usize,
    /// Why the session stopped.
    pub stop: StopReason,
    /// Largest nearest-neighbour distance over every known destination after
    /// the session, in degrees.
    pub coverage: Option<f64>,
}
