//! Departure time and display formatting for times, durations and distances.
//!
//! The planner receives epoch-millisecond timestamps and expects the
//! earliest departure as an RFC 3339 string with an explicit UTC offset.
//! Rendering uses a caller-supplied offset so output is deterministic.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};

/// A local departure date and time chosen by the user.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::DepartureTime;
/// use chrono::{FixedOffset, NaiveDate, NaiveTime};
///
/// let departure = DepartureTime::new(
///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
/// );
/// let cest = FixedOffset::east_opt(2 * 3600).unwrap();
/// assert_eq!(
///     departure.to_offset_string(&cest).unwrap(),
///     "2024-06-01T08:30:00+02:00"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartureTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl DepartureTime {
    /// Create from date and time components. Seconds are dropped.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        Self { date, time }
    }

    /// The current local date and time, truncated to the minute.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        Self::new(now.date(), now.time())
    }

    /// Parse `"YYYY-MM-DD"` and `"HH:MM"` form inputs.
    ///
    /// Returns `None` if either part is missing or malformed, which the
    /// orchestrator treats as "no timestamp set".
    pub fn parse(date: &str, time: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
        Some(Self::new(date, time))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    fn naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Format as `YYYY-MM-DDTHH:MM:SS±HH:MM` in the given time zone.
    ///
    /// Returns `None` for a local time that does not exist in `tz` (a DST
    /// gap). Ambiguous times resolve to the earlier instant.
    pub fn to_offset_string<Tz: TimeZone>(&self, tz: &Tz) -> Option<String> {
        let local = tz.from_local_datetime(&self.naive()).earliest()?;
        let offset: FixedOffset = local.offset().fix();
        Some(
            local
                .with_timezone(&offset)
                .format("%Y-%m-%dT%H:%M:%S%:z")
                .to_string(),
        )
    }

    /// Format in the system's local time zone.
    pub fn to_local_offset_string(&self) -> Option<String> {
        self.to_offset_string(&Local)
    }
}

/// Convert epoch milliseconds to a UTC timestamp.
pub fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Format a timestamp as `HH:MM` in the given offset.
pub fn format_clock(t: DateTime<Utc>, offset: &FixedOffset) -> String {
    t.with_timezone(offset).format("%H:%M").to_string()
}

/// Format a time range as `"HH:MM - HH:MM"`.
pub fn format_time_range(start: DateTime<Utc>, end: DateTime<Utc>, offset: &FixedOffset) -> String {
    format!("{} - {}", format_clock(start, offset), format_clock(end, offset))
}

/// Format a duration as `"1h 5min"`, `"2h"` or `"12min"`.
///
/// Seconds are rounded to the nearest minute; negative durations render as
/// zero.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    let total_minutes = (seconds + 30) / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h {minutes}min")
        } else {
            format!("{hours}h")
        }
    } else {
        format!("{minutes}min")
    }
}

/// Format a distance in metres as `"1.2 km"` or `"350 m"`.
pub fn format_distance(metres: f64) -> String {
    if metres >= 1000.0 {
        format!("{:.1} km", metres / 1000.0)
    } else {
        format!("{} m", metres.round() as i64)
    }
}

/// [`format_distance`] without whitespace, e.g. `"1.2km"`.
pub fn format_distance_compact(metres: f64) -> String {
    format_distance(metres).replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure(date: &str, time: &str) -> DepartureTime {
        DepartureTime::parse(date, time).unwrap()
    }

    #[test]
    fn offset_string_negative_offset() {
        let d = departure("2024-01-15", "23:05");
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(d.to_offset_string(&est).unwrap(), "2024-01-15T23:05:00-05:00");
    }

    #[test]
    fn offset_string_utc() {
        let d = departure("2024-01-15", "07:00");
        assert_eq!(d.to_offset_string(&Utc).unwrap(), "2024-01-15T07:00:00+00:00");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(DepartureTime::parse("", "10:00").is_none());
        assert!(DepartureTime::parse("2024-01-15", "").is_none());
        assert!(DepartureTime::parse("2024-13-01", "10:00").is_none());
        assert!(DepartureTime::parse("2024-01-15", "25:00").is_none());
    }

    #[test]
    fn new_drops_seconds() {
        let d = DepartureTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 15, 42).unwrap(),
        );
        assert_eq!(d.time(), NaiveTime::from_hms_opt(10, 15, 0).unwrap());
    }

    #[test]
    fn clock_and_range() {
        let start = from_epoch_millis(1_717_223_400_000).unwrap(); // 06:30 UTC
        let end = start + Duration::minutes(45);
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_clock(start, &cest), "08:30");
        assert_eq!(format_time_range(start, end, &cest), "08:30 - 09:15");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::seconds(0)), "0min");
        assert_eq!(format_duration(Duration::seconds(89)), "1min");
        assert_eq!(format_duration(Duration::seconds(90)), "2min");
        assert_eq!(format_duration(Duration::minutes(60)), "1h");
        assert_eq!(format_duration(Duration::minutes(65)), "1h 5min");
        assert_eq!(format_duration(Duration::seconds(-30)), "0min");
    }

    #[test]
    fn distances() {
        assert_eq!(format_distance(349.6), "350 m");
        assert_eq!(format_distance(999.0), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(1234.0), "1.2 km");
        assert_eq!(format_distance_compact(1234.0), "1.2km");
        assert_eq!(format_distance_compact(80.0), "80m");
    }
}
