//! Chooses what each station marker on the map shows.

use crate::display::time_format::format_relative_time;
use crate::types::geo::LatLon;
use crate::types::records::{ParamValue, TimedRecord};
use crate::types::station::{StationFeature, MISSING_STATION_CODE};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The quantity the map labels each station with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    Visibility,
    WmoWeatherCode,
    #[default]
    AirTemp,
    SurfaceTemp,
    ShortWaveRadiation,
    PrecipAcc60Min,
    RelativeHumidity,
    /// The station name from its tags.
    Name,
    WindSpeed,
    WindGust,
}

impl DisplayMode {
    /// All modes, in menu order.
    pub const ALL: [DisplayMode; 10] = [
        DisplayMode::Visibility,
        DisplayMode::WmoWeatherCode,
        DisplayMode::AirTemp,
        DisplayMode::SurfaceTemp,
        DisplayMode::ShortWaveRadiation,
        DisplayMode::PrecipAcc60Min,
        DisplayMode::RelativeHumidity,
        DisplayMode::Name,
        DisplayMode::WindSpeed,
        DisplayMode::WindGust,
    ];

    /// The parameter (or tag, for [`DisplayMode::Name`]) this mode reads.
    pub fn key(&self) -> &'static str {
        match self {
            DisplayMode::Visibility => "visibility",
            DisplayMode::WmoWeatherCode => "wmoWeatherCode",
            DisplayMode::AirTemp => "airTemp",
            DisplayMode::SurfaceTemp => "surfaceTemp",
            DisplayMode::ShortWaveRadiation => "shortWaveRadiation",
            DisplayMode::PrecipAcc60Min => "precipAcc60Min",
            DisplayMode::RelativeHumidity => "relativeHumidity",
            DisplayMode::Name => "name",
            DisplayMode::WindSpeed => "windSpeed",
            DisplayMode::WindGust => "windGust",
        }
    }

    /// Parameters tried in order until one has a value.
    pub fn lookup_chain(&self) -> &'static [&'static str] {
        match self {
            DisplayMode::WindSpeed => &["windSpeed", "windSpeed2m"],
            DisplayMode::WindGust => &["windGust", "windGust2m"],
            DisplayMode::ShortWaveRadiation => &["shortWaveRadiation", "globalRadiation60Min"],
            DisplayMode::Visibility => &["visibility"],
            DisplayMode::WmoWeatherCode => &["wmoWeatherCode"],
            DisplayMode::AirTemp => &["airTemp"],
            DisplayMode::SurfaceTemp => &["surfaceTemp"],
            DisplayMode::PrecipAcc60Min => &["precipAcc60Min"],
            DisplayMode::RelativeHumidity => &["relativeHumidity"],
            DisplayMode::Name => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Visibility => "Show Visibility",
            DisplayMode::WmoWeatherCode => "Show Weather Code",
            DisplayMode::AirTemp => "Show Temperature",
            DisplayMode::SurfaceTemp => "Show RST",
            DisplayMode::ShortWaveRadiation => "Show Radiation",
            DisplayMode::PrecipAcc60Min => "Show Precip",
            DisplayMode::RelativeHumidity => "Show Humidity",
            DisplayMode::Name => "Show Names",
            DisplayMode::WindSpeed => "Show Wind Speed",
            DisplayMode::WindGust => "Show Wind Gust",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDisplayMode(pub String);

impl fmt::Display for UnknownDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown display mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownDisplayMode {}

impl FromStr for DisplayMode {
    type Err = UnknownDisplayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayMode::ALL
            .into_iter()
            .find(|mode| mode.key() == s)
            .ok_or_else(|| UnknownDisplayMode(s.to_string()))
    }
}

/// Unit appended to a marker value, by the parameter the value actually came from.
fn marker_unit(param: &str) -> &'static str {
    match param {
        "airTemp" | "surfaceTemp" => "°C",
        "visibility" => "km",
        "precipAcc60Min" => "mm",
        "windSpeed" | "windSpeed2m" | "windGust" | "windGust2m" => "m/s",
        "shortWaveRadiation" => "W/m²",
        "globalRadiation60Min" => "J/cm²",
        _ => "",
    }
}

/// What a station marker displays.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerValue {
    /// A labelled pin.
    Value {
        value: ParamValue,
        /// The parameter the value was read from, after fallbacks.
        source: String,
        unit: &'static str,
    },
    /// A bare dot: the station has no value for the current mode.
    Minimal,
}

impl MarkerValue {
    /// Text for the pin, e.g. `3.2m/s`. `None` for minimal markers.
    pub fn label(&self) -> Option<String> {
        match self {
            MarkerValue::Value { value, unit, .. } => Some(format!("{}{}", value, unit)),
            MarkerValue::Minimal => None,
        }
    }
}

/// Picks the marker value of `feature` for `mode` from its most recent observation.
///
/// ```
/// use oneobs::{select_marker, DisplayMode, LatLon, MarkerValue, ObservationRecord,
///     ParamValue, StationFeature, StationTags, TimedRecord};
///
/// let latest = ObservationRecord::new(
///     "2024-01-01T00:00:00Z".into(),
///     "2024-01-01T00:00:00Z".parse().unwrap(),
///     [("windSpeed2m".to_string(), ParamValue::Number(3.2))].into_iter().collect(),
/// );
/// let station = StationFeature {
///     location: LatLon(52.0, 5.0),
///     tags: StationTags::default(),
///     observations: vec![latest],
/// };
///
/// let marker = select_marker(&station, DisplayMode::WindSpeed);
/// assert_eq!(marker.label().as_deref(), Some("3.2m/s"));
/// ```
pub fn select_marker(feature: &StationFeature, mode: DisplayMode) -> MarkerValue {
    if mode == DisplayMode::Name {
        return match feature.tags.name() {
            Some(name) => MarkerValue::Value {
                value: ParamValue::Text(name.to_string()),
                source: "name".to_string(),
                unit: "",
            },
            None => MarkerValue::Minimal,
        };
    }

    let Some(latest) = feature.latest_observation() else {
        return MarkerValue::Minimal;
    };
    mode.lookup_chain()
        .iter()
        .find_map(|param| {
            latest.get(param).map(|value| MarkerValue::Value {
                value: value.clone(),
                source: param.to_string(),
                unit: marker_unit(param),
            })
        })
        .unwrap_or(MarkerValue::Minimal)
}

/// Popup contents for a station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub title: String,
    pub station_code: String,
    /// Relative time of the latest observation, when there is one.
    pub observed: Option<String>,
    /// Lines like `Temperature: 5°C`, only for values present in the latest record.
    pub latest_values: Vec<String>,
    /// Every tag except the name and station code.
    pub extra_tags: Vec<(String, String)>,
}

const SUMMARY_LINES: &[(&str, &str, &str)] = &[
    ("airTemp", "Temperature", "°C"),
    ("windSpeed", "Wind", " m/s"),
    ("windDirection", "Direction", "°"),
    ("relativeHumidity", "Humidity", "%"),
];

pub fn summarize(feature: &StationFeature, now: DateTime<Utc>) -> StationSummary {
    let latest = feature.latest_observation();
    let latest_values = latest
        .map(|record| {
            SUMMARY_LINES
                .iter()
                .filter_map(|(param, label, unit)| {
                    record
                        .get(param)
                        .map(|value| format!("{}: {}{}", label, value, unit))
                })
                .collect()
        })
        .unwrap_or_default();

    StationSummary {
        title: feature
            .tags
            .name()
            .unwrap_or("Weather Station")
            .to_string(),
        station_code: station_code_or_placeholder(feature),
        observed: latest.map(|record| format_relative_time(record.timestamp(), now)),
        latest_values,
        extra_tags: feature
            .tags
            .extra()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn station_code_or_placeholder(feature: &StationFeature) -> String {
    feature
        .tags
        .station_code()
        .unwrap_or(MISSING_STATION_CODE)
        .to_string()
}

/// Everything the map needs to draw one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMarker {
    pub location: LatLon,
    /// The code to open the detail view with; `"N/A"` when the station has none.
    pub station_code: String,
    pub marker: MarkerValue,
    pub summary: StationSummary,
}

pub fn build_marker(
    feature: &StationFeature,
    mode: DisplayMode,
    now: DateTime<Utc>,
) -> StationMarker {
    StationMarker {
        location: feature.location,
        station_code: station_code_or_placeholder(feature),
        marker: select_marker(feature, mode),
        summary: summarize(feature, now),
    }
}
