//! The station detail model: one fetch, any number of parameter-group views.

use crate::display::chart::ChartData;
use crate::display::merge::{merge, MergedSeries};
use crate::display::table::DisplayTable;
use crate::types::forecast::ForecastSeries;
use crate::types::geo::LatLon;
use crate::types::parameter_group::ParameterGroup;
use crate::types::station::StationObservations;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetailError {
    #[error("Station code '{0}' cannot be queried")]
    InvalidStationCode(String),

    #[error("No parameters requested")]
    NoParameters,

    #[error("Unknown parameter group '{0}'")]
    UnknownGroup(String),
}

/// Everything fetched for one station.
///
/// Observations and the forecast cover the parameters of every built-in group, so
/// switching groups is a local re-merge via [`StationDetail::view`].
#[derive(Debug, Clone, PartialEq)]
pub struct StationDetail {
    pub station_code: String,
    pub observations: StationObservations,
    pub forecast: ForecastSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub group: ParameterGroup,
    pub merged: MergedSeries,
    pub table: DisplayTable,
    pub chart: ChartData,
}

impl DetailView {
    /// True when neither observations nor forecasts have data for the group.
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

impl StationDetail {
    pub fn title(&self) -> &str {
        self.observations
            .tags
            .name()
            .unwrap_or(self.station_code.as_str())
    }

    pub fn view(&self, group: &ParameterGroup, now: DateTime<Utc>) -> DetailView {
        let merged = merge(
            &self.observations.observations,
            &self.forecast.forecasts,
            group.selection(),
        );
        DetailView {
            group: group.clone(),
            table: DisplayTable::build(&merged, group, now),
            chart: ChartData::build(&merged),
            merged,
        }
    }

    /// [`StationDetail::view`] for a built-in group looked up by name.
    pub fn view_named(
        &self,
        group: &str,
        now: DateTime<Utc>,
    ) -> Result<DetailView, DetailError> {
        let group = ParameterGroup::by_name(group)
            .ok_or_else(|| DetailError::UnknownGroup(group.to_string()))?;
        Ok(self.view(&group, now))
    }

    /// Label/value rows shown under the detail title.
    ///
    /// A `Location` row comes first when the station reported coordinates, followed by
    /// every tag except the name, which is the title. Empty when there are no
    /// observations.
    pub fn metadata(&self) -> Vec<(String, String)> {
        if self.observations.is_empty() {
            return Vec::new();
        }
        let location = self.observations.location.map(|LatLon(lat, lon)| {
            ("Location".to_string(), format!("{:.4}°N, {:.4}°E", lat, lon))
        });
        let tags = self
            .observations
            .tags
            .0
            .iter()
            .filter(|(key, _)| key.as_str() != "name")
            .map(|(key, value)| (key.clone(), value.clone()));
        location.into_iter().chain(tags).collect()
    }
}
