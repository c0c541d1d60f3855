//! Line-chart series built from merged rows.

use crate::display::merge::MergedSeries;
use crate::types::parameters::{display_name, display_unit};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub param: String,
    pub label: String,
    /// One point per chart label; `None` leaves a gap.
    pub data: Vec<Option<f64>>,
    /// Forecast series are drawn dashed.
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<DateTime<Utc>>,
    pub datasets: Vec<ChartDataset>,
}

fn series_label(param: &str, kind: &str) -> String {
    match display_unit(param) {
        "" => format!("{} ({})", display_name(param), kind),
        unit => format!("{} ({}) ({})", display_name(param), unit, kind),
    }
}

impl ChartData {
    /// Every observed and forecast column becomes one dataset aligned to the row times.
    /// Text values cannot be plotted and show as gaps.
    pub fn build(merged: &MergedSeries) -> Self {
        let labels = merged.rows.iter().map(|row| row.time).collect();

        let observed = merged.observation_columns.iter().map(|param| ChartDataset {
            param: param.clone(),
            label: series_label(param, "Observed"),
            data: merged
                .rows
                .iter()
                .map(|row| row.observation(param).and_then(|v| v.as_f64()))
                .collect(),
            dashed: false,
        });
        let forecast = merged.forecast_columns.iter().map(|param| ChartDataset {
            param: param.clone(),
            label: series_label(param, "Forecast"),
            data: merged
                .rows
                .iter()
                .map(|row| row.forecast(param).and_then(|v| v.as_f64()))
                .collect(),
            dashed: true,
        });

        ChartData {
            labels,
            datasets: observed.chain(forecast).collect(),
        }
    }
}
