//! Station metadata and the per-station results of observation queries.

use crate::types::geo::LatLon;
use crate::types::records::{ObservationRecord, TimedRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Station metadata returned alongside observations when `showTags=true`.
///
/// Keys are whatever the API reports (`name`, `stationCode`, `obsType`, `elevation`, ...).
/// Non-string values are kept as their JSON text so every tag can be displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationTags(pub BTreeMap<String, String>);

impl StationTags {
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn station_code(&self) -> Option<&str> {
        self.get("stationCode")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags other than the name and station code, which are shown separately.
    pub fn extra(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "name" | "stationCode"))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for StationTags {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        StationTags(iter.into_iter().collect())
    }
}

/// One station of a bounding-box query.
#[derive(Debug, Clone, PartialEq)]
pub struct StationFeature {
    pub location: LatLon,
    pub tags: StationTags,
    /// Descending by time.
    pub observations: Vec<ObservationRecord>,
}

impl StationFeature {
    /// The most recent observation record (maximum timestamp), if any.
    pub fn latest_observation(&self) -> Option<&ObservationRecord> {
        self.observations.iter().max_by_key(|record| record.time())
    }
}

/// Result of querying a single station.
///
/// The empty value (`observations: [], tags: {}`) is what failed or short-circuited
/// queries degrade to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationObservations {
    /// Descending by time, as returned by the observations endpoint.
    pub observations: Vec<ObservationRecord>,
    pub tags: StationTags,
    /// Station position, when the response carried geometry.
    pub location: Option<LatLon>,
}

impl StationObservations {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Time of the oldest observation in the series.
    pub fn earliest_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.observations.iter().map(TimedRecord::time).min()
    }
}

/// Placeholder the map popups use for stations without a code.
pub const MISSING_STATION_CODE: &str = "N/A";

/// `false` for empty codes and the `"N/A"` placeholder; such codes are never queried.
pub fn is_queryable_station_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code != MISSING_STATION_CODE
}

/// Which station networks a bounding-box query includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationFilter {
    #[default]
    All,
    /// Only WMO-reporting stations (SYNOP and METAR).
    Wmo,
}

impl StationFilter {
    pub(crate) fn obs_types(&self) -> Option<&'static str> {
        match self {
            StationFilter::All => None,
            StationFilter::Wmo => Some("SYNOP,METAR"),
        }
    }
}
