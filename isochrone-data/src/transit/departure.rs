//! Default departure time for journey queries.

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone};
use isochrone_core::TransitError;

/// Hour of day journeys depart at by default.
const DEPARTURE_HOUR: u32 = 12;

/// Noon on the first Monday strictly after `now`, in the same time zone.
///
/// Sampling a fixed weekday and hour keeps travel times comparable across
/// sessions run on different days.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Datelike, Weekday};
/// use isochrone_data::next_departure;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let monday = DateTime::parse_from_rfc3339("2024-06-03T09:30:00+02:00")?;
/// let departure = next_departure(&monday)?;
/// assert_eq!(departure.to_rfc3339(), "2024-06-10T12:00:00+02:00");
/// assert_eq!(departure.weekday(), Weekday::Mon);
/// # Ok(())
/// # }
/// ```
pub fn next_departure<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<DateTime<Tz>, TransitError> {
    let invalid = || TransitError::InvalidTime {
        value: now.naive_local().to_string(),
    };
    let days_ahead = 7 - u64::from(now.weekday().num_days_from_monday());
    let date = now
        .date_naive()
        .checked_add_days(Days::new(days_ahead))
        .ok_or_else(invalid)?;
    let noon = NaiveTime::from_hms_opt(DEPARTURE_HOUR, 0, 0).ok_or_else(invalid)?;
    now.timezone()
        .from_local_datetime(&date.and_time(noon))
        .earliest()
        .ok_or_else(invalid)
}
