use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

/// A `[start, end]` query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[selected - before, selected + after]`; the map view uses this around the
    /// time picked by the user.
    pub fn around(selected: DateTime<Utc>, before: TimeDelta, after: TimeDelta) -> Self {
        Self::new(selected - before, selected + after)
    }

    /// `[now - lookback, now]`.
    pub fn trailing(now: DateTime<Utc>, lookback: TimeDelta) -> Self {
        Self::new(now - lookback, now)
    }

    pub(crate) fn start_param(&self) -> String {
        iso(self.start)
    }

    pub(crate) fn end_param(&self) -> String {
        iso(self.end)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub(crate) fn iso(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
