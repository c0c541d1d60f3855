//! Tabular presentation of merged observation/forecast rows.

use crate::display::merge::{DisplayRow, MergedSeries};
use crate::display::time_format::format_relative;
use crate::types::parameter_group::ParameterGroup;
use crate::types::parameters::{display_name, display_unit, is_rounded};
use crate::types::records::ParamValue;
use chrono::{DateTime, Utc};

/// Cell text for a missing value.
pub const MISSING_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub param: String,
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Relative or full UTC time.
    pub time: String,
    pub observation_cells: Vec<String>,
    pub forecast_cells: Vec<String>,
}

/// An observations block and a forecast block side by side, one row per timestamp.
///
/// A block is absent (no headers, no cells) when none of its parameters have data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayTable {
    pub observation_headers: Vec<ColumnHeader>,
    pub forecast_headers: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
}

impl DisplayTable {
    pub fn build(merged: &MergedSeries, group: &ParameterGroup, now: DateTime<Utc>) -> Self {
        let header = |param: &String| ColumnHeader {
            param: param.clone(),
            name: display_name(param).to_string(),
            unit: match group.unit(param) {
                "" => display_unit(param).to_string(),
                unit => unit.to_string(),
            },
        };

        DisplayTable {
            observation_headers: merged.observation_columns.iter().map(header).collect(),
            forecast_headers: merged.forecast_columns.iter().map(header).collect(),
            rows: merged
                .rows
                .iter()
                .map(|row| Self::row(row, merged, now))
                .collect(),
        }
    }

    fn row(row: &DisplayRow, merged: &MergedSeries, now: DateTime<Utc>) -> TableRow {
        TableRow {
            time: format_relative(row.time, now),
            observation_cells: merged
                .observation_columns
                .iter()
                .map(|param| format_cell(param, row.observation(param)))
                .collect(),
            forecast_cells: merged
                .forecast_columns
                .iter()
                .map(|param| format_cell(param, row.forecast(param)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One decimal for rounded parameters, the raw value otherwise, `-` when missing.
pub fn format_cell(param: &str, value: Option<&ParamValue>) -> String {
    match value {
        Some(ParamValue::Number(n)) if is_rounded(param) => format!("{:.1}", n),
        Some(value) => value.to_string(),
        None => MISSING_CELL.to_string(),
    }
}
