use crate::api::geojson::parse_timestamp;
use crate::types::window::iso;
use chrono::{DateTime, Utc};

/// Renders an observation time relative to `now`.
///
/// Under a minute old is "Just now", under an hour is "N min ago", and anything older
/// (or in the future) is the full UTC timestamp. Unparseable input is returned as-is.
///
/// ```
/// use oneobs::format_relative_time;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
/// assert_eq!(format_relative_time("2024-01-01T11:59:30Z", now), "Just now");
/// assert_eq!(format_relative_time("2024-01-01T11:15:00Z", now), "45 min ago");
/// assert_eq!(format_relative_time("2024-01-01T10:00:00Z", now), "2024-01-01T10:00:00.000Z");
/// ```
pub fn format_relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(timestamp) {
        Some(time) => format_relative(time, now),
        None => timestamp.to_string(),
    }
}

pub fn format_relative(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - time;
    if elapsed.num_milliseconds() < 0 {
        return iso(time);
    }
    let secs = elapsed.num_seconds();
    let mins = elapsed.num_minutes();
    if secs < 60 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{} min ago", mins)
    } else {
        iso(time)
    }
}
