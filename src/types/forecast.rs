use crate::types::records::ForecastRecord;
use chrono::{DateTime, Utc};

/// Forecast records for one coordinate, plus the window that was queried.
///
/// A failed query degrades to [`ForecastSeries::empty`], which has no window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    /// Ascending by time.
    pub forecasts: Vec<ForecastRecord>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ForecastSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
    }
}
