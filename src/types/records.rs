//! Time-indexed records produced by normalizing API feature properties.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single measured or forecast value.
///
/// The APIs report most parameters as numbers, but some (e.g. present-weather codes
/// from certain networks) arrive as strings. `null` values are not represented; they are
/// dropped while the record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Prints numbers the way JavaScript would: integral values without a fraction.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parameter name → value for one timestamp.
pub type ParamValues = BTreeMap<String, ParamValue>;

/// Common access to the two record flavours, so normalization and merging can be
/// written once.
pub trait TimedRecord {
    fn new(timestamp: String, time: DateTime<Utc>, values: ParamValues) -> Self;
    /// The timestamp exactly as the API keyed it.
    fn timestamp(&self) -> &str;
    fn time(&self) -> DateTime<Utc>;
    fn values(&self) -> &ParamValues;

    fn get(&self, param: &str) -> Option<&ParamValue> {
        self.values().get(param)
    }
}

/// One observation timestamp of one station, keyed by observation-parameter names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub timestamp: String,
    #[serde(skip)]
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub values: ParamValues,
}

/// One forecast timestamp, keyed by forecast-parameter names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub timestamp: String,
    #[serde(skip)]
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub values: ParamValues,
}

macro_rules! impl_timed_record {
    ($ty:ty) => {
        impl TimedRecord for $ty {
            fn new(timestamp: String, time: DateTime<Utc>, values: ParamValues) -> Self {
                Self {
                    timestamp,
                    time,
                    values,
                }
            }

            fn timestamp(&self) -> &str {
                &self.timestamp
            }

            fn time(&self) -> DateTime<Utc> {
                self.time
            }

            fn values(&self) -> &ParamValues {
                &self.values
            }
        }
    };
}

impl_timed_record!(ObservationRecord);
impl_timed_record!(ForecastRecord);
