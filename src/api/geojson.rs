//! Validated parsing of the GeoJSON feature collections returned by the observations
//! and conditions endpoints, and their normalization into time-ordered records.
//!
//! Feature `properties` are keyed by ISO-8601 timestamps, each mapping parameter names
//! to values. Any key that does not parse as a timestamp (e.g. `tags`) is metadata and
//! is skipped.

use crate::api::error::ParseError;
use crate::types::geo::LatLon;
use crate::types::records::{ParamValue, ParamValues, TimedRecord};
use crate::types::station::{StationFeature, StationTags};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub tags: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

pub fn parse_feature_collection(body: &[u8]) -> Result<FeatureCollection, ParseError> {
    Ok(serde_json::from_slice(body)?)
}

/// Parses `key` as a timestamp, if it is one.
///
/// Besides RFC 3339, accepts ISO-8601 keys without seconds, and keys without an
/// offset, which are read as UTC.
pub fn parse_timestamp(key: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(key) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(key, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = key.strip_suffix('Z').unwrap_or(key);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.and_utc())
}

impl Feature {
    pub fn location(&self) -> Result<LatLon, ParseError> {
        self.geometry
            .as_ref()
            .and_then(|g| LatLon::from_geojson(&g.coordinates))
            .ok_or(ParseError::MissingCoordinates)
    }

    /// Station tags, taken from the feature's `tags` member or, failing that, from a
    /// `tags` entry inside `properties`.
    pub fn tags(&self) -> StationTags {
        let tags = self.tags.as_ref().or_else(|| {
            self.properties
                .as_ref()
                .and_then(|props| props.get("tags"))
                .and_then(Value::as_object)
        });
        tags.map(tags_from_json).unwrap_or_default()
    }

    /// One record per timestamp key, in no particular order.
    pub fn records<R: TimedRecord>(&self) -> Vec<R> {
        match &self.properties {
            Some(props) => normalize_properties(props),
            None => Vec::new(),
        }
    }

    pub fn into_station_feature(self) -> Result<StationFeature, ParseError> {
        let location = self.location()?;
        let mut observations = self.records();
        sort_descending(&mut observations);
        Ok(StationFeature {
            location,
            tags: self.tags(),
            observations,
        })
    }
}

fn tags_from_json(tags: &Map<String, Value>) -> StationTags {
    tags.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Flattens a timestamp-keyed properties object into records.
///
/// Keys that are not timestamps are ignored. `null` values are dropped so that a
/// record only holds defined parameters. A malformed timestamp entry or parameter
/// value is logged and skipped; the rest of the feature is kept.
pub fn normalize_properties<R: TimedRecord>(properties: &Map<String, Value>) -> Vec<R> {
    let mut records = Vec::with_capacity(properties.len());
    for (key, entry) in properties {
        let Some(time) = parse_timestamp(key) else {
            continue;
        };
        let Value::Object(params) = entry else {
            warn!("Skipping timestamp {key}: expected an object of parameters");
            continue;
        };

        let mut values = ParamValues::new();
        for (param, value) in params {
            let value = match value {
                Value::Null => continue,
                Value::Number(n) => match n.as_f64() {
                    Some(f) => ParamValue::Number(f),
                    None => continue,
                },
                Value::String(s) => ParamValue::Text(s.clone()),
                Value::Bool(b) => ParamValue::Text(b.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    warn!("Skipping {param} at {key}: unsupported value {value}");
                    continue;
                }
            };
            values.insert(param.clone(), value);
        }
        records.push(R::new(key.clone(), time, values));
    }
    records
}

/// Newest first. Ties on the instant are broken by the raw key so the order is stable.
pub fn sort_descending<R: TimedRecord>(records: &mut [R]) {
    records.sort_by(|a, b| {
        b.time()
            .cmp(&a.time())
            .then_with(|| b.timestamp().cmp(a.timestamp()))
    });
}

/// Oldest first.
pub fn sort_ascending<R: TimedRecord>(records: &mut [R]) {
    records.sort_by(|a, b| {
        a.time()
            .cmp(&b.time())
            .then_with(|| a.timestamp().cmp(b.timestamp()))
    });
}
