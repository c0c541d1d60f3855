//! Joins an observation sequence and a forecast sequence on their timestamps.

use crate::types::parameter_group::ParamSelection;
use crate::types::parameters::is_rounded;
use crate::types::records::{
    ForecastRecord, ObservationRecord, ParamValue, ParamValues, TimedRecord,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Values of one timestamp across both sources, restricted to the displayed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub timestamp: String,
    pub time: DateTime<Utc>,
    pub observation_values: ParamValues,
    pub forecast_values: ParamValues,
}

impl DisplayRow {
    pub fn observation(&self, param: &str) -> Option<&ParamValue> {
        self.observation_values.get(param)
    }

    pub fn forecast(&self, param: &str) -> Option<&ParamValue> {
        self.forecast_values.get(param)
    }
}

/// The display model of a station: which columns carry data, and the rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSeries {
    /// Selected observation parameters that have a value somewhere in the series.
    pub observation_columns: Vec<String>,
    /// Selected forecast parameters that have a value somewhere in the series.
    pub forecast_columns: Vec<String>,
    /// Ascending by time.
    pub rows: Vec<DisplayRow>,
}

impl MergedSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_observations(&self) -> bool {
        !self.observation_columns.is_empty()
    }

    pub fn has_forecasts(&self) -> bool {
        !self.forecast_columns.is_empty()
    }
}

/// Merges observations and forecasts into display rows.
///
/// Rows are produced for the union of timestamps, oldest first. A timestamp joins its
/// observation and forecast only when the strings match exactly. Rows without any
/// value for the selected parameters are dropped. Temperatures, wind speeds and
/// radiation are rounded to one decimal.
///
/// The input order does not matter, and merging is a pure function of the inputs.
///
/// ```
/// use oneobs::{merge, ObservationRecord, ForecastRecord, ParameterGroup, TimedRecord};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
/// let obs = ObservationRecord::new(
///     "2024-01-01T00:00:00Z".into(),
///     at(0),
///     [("airTemp".to_string(), 4.26.into())].into_iter().collect(),
/// );
/// let fc = ForecastRecord::new(
///     "2024-01-01T01:00:00Z".into(),
///     at(1),
///     [("airTemp".to_string(), 5.0.into())].into_iter().collect(),
/// );
///
/// let group = ParameterGroup::temperature();
/// let merged = merge(&[obs], &[fc], group.selection());
/// assert_eq!(merged.rows.len(), 2);
/// assert_eq!(merged.rows[0].observation("airTemp").and_then(|v| v.as_f64()), Some(4.3));
/// ```
pub fn merge(
    observations: &[ObservationRecord],
    forecasts: &[ForecastRecord],
    selection: ParamSelection<'_>,
) -> MergedSeries {
    let observation_columns = columns_with_data(selection.observation_params, observations);
    let forecast_columns = columns_with_data(selection.forecast_params, forecasts);

    // (instant, raw key) orders the union chronologically while keeping distinct
    // spellings of the same instant apart; the join itself is on the raw key.
    let mut union: BTreeMap<
        (DateTime<Utc>, &str),
        (Option<&ObservationRecord>, Option<&ForecastRecord>),
    > = BTreeMap::new();
    for record in observations {
        let entry = union
            .entry((record.time(), record.timestamp()))
            .or_default();
        entry.0.get_or_insert(record);
    }
    for record in forecasts {
        let entry = union
            .entry((record.time(), record.timestamp()))
            .or_default();
        entry.1.get_or_insert(record);
    }

    let rows = union
        .into_iter()
        .filter_map(|((time, timestamp), (observation, forecast))| {
            let observation_values = pick(observation, &observation_columns);
            let forecast_values = pick(forecast, &forecast_columns);
            if observation_values.is_empty() && forecast_values.is_empty() {
                return None;
            }
            Some(DisplayRow {
                timestamp: timestamp.to_string(),
                time,
                observation_values,
                forecast_values,
            })
        })
        .collect();

    MergedSeries {
        observation_columns,
        forecast_columns,
        rows,
    }
}

fn columns_with_data<R: TimedRecord>(params: &[String], records: &[R]) -> Vec<String> {
    params
        .iter()
        .filter(|param| records.iter().any(|r| r.get(param).is_some()))
        .cloned()
        .collect()
}

fn pick<R: TimedRecord>(record: Option<&R>, columns: &[String]) -> ParamValues {
    let Some(record) = record else {
        return ParamValues::new();
    };
    columns
        .iter()
        .filter_map(|param| {
            record
                .get(param)
                .map(|value| (param.clone(), display_value(param, value)))
        })
        .collect()
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn display_value(param: &str, value: &ParamValue) -> ParamValue {
    match value {
        ParamValue::Number(n) if is_rounded(param) => ParamValue::Number(round1(*n)),
        other => other.clone(),
    }
}
