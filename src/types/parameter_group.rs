//! Curated bundles of parameters that the detail view shows together.

use std::collections::BTreeMap;
use std::fmt;

/// A named set of observation and forecast parameters with their units.
///
/// Groups are static configuration. Use [`ParameterGroup::all`] for the built-in set,
/// [`ParameterGroup::by_name`] to look one up, or [`ParameterGroup::new`] to define a
/// custom one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    pub name: String,
    /// Parameter names in the observations API vocabulary, in column order.
    pub observation_params: Vec<String>,
    /// Parameter names in the conditions API vocabulary, in column order.
    pub forecast_params: Vec<String>,
    pub units: BTreeMap<String, String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl ParameterGroup {
    pub fn new(
        name: impl Into<String>,
        observation_params: &[&str],
        forecast_params: &[&str],
        units: &[(&str, &str)],
    ) -> Self {
        Self {
            name: name.into(),
            observation_params: owned(observation_params),
            forecast_params: owned(forecast_params),
            units: units
                .iter()
                .map(|(param, unit)| (param.to_string(), unit.to_string()))
                .collect(),
        }
    }

    pub fn general() -> Self {
        Self::new(
            "General",
            &["visibility", "wmoWeatherCode"],
            &["visibility", "wmoWeatherCode"],
            &[("visibility", "km"), ("wmoWeatherCode", "")],
        )
    }

    pub fn temperature() -> Self {
        Self::new(
            "Temperature",
            &["airTemp", "surfaceTemp", "relativeHumidity"],
            &[
                "airTemp",
                "airTempLowerBound",
                "airTempUpperBound",
                "relativeHumidity",
            ],
            &[
                ("airTemp", "°C"),
                ("airTempLowerBound", "°C"),
                ("airTempUpperBound", "°C"),
                ("surfaceTemp", "°C"),
                ("relativeHumidity", "%"),
            ],
        )
    }

    pub fn wind() -> Self {
        Self::new(
            "Wind",
            &[
                "windSpeed",
                "windSpeed2m",
                "windDirection",
                "windGust",
                "windGust2m",
            ],
            &[
                "windSpeed",
                "windSpeedLowerBound",
                "windSpeedUpperBound",
                "windDirection",
                "windSpeed2m",
                "windGust",
                "windGust2m",
            ],
            &[
                ("windSpeed", "m/s"),
                ("windSpeed2m", "m/s"),
                ("windDirection", "°"),
                ("windSpeedLowerBound", "m/s"),
                ("windSpeedUpperBound", "m/s"),
                ("windGust", "m/s"),
                ("windGust2m", "m/s"),
            ],
        )
    }

    pub fn radiation() -> Self {
        Self::new(
            "Radiation",
            &[
                "shortWaveRadiation",
                "globalRadiation60Min",
                "sunshine60Min",
                "cloudCover",
            ],
            &[
                "shortWaveRadiation",
                "globalRadiation",
                "sunshineDuration",
                "totalCloudCover",
            ],
            &[
                ("shortWaveRadiation", "W/m²"),
                ("globalRadiation60Min", "J/cm²"),
                ("globalRadiation", "J/cm²"),
                ("sunshine60Min", "min"),
                ("sunshineDuration", "min"),
                ("cloudCover", "%"),
                ("totalCloudCover", "%"),
            ],
        )
    }

    /// The built-in groups, in menu order.
    pub fn all() -> Vec<ParameterGroup> {
        vec![
            Self::general(),
            Self::temperature(),
            Self::wind(),
            Self::radiation(),
        ]
    }

    /// Case-sensitive lookup among the built-in groups.
    pub fn by_name(name: &str) -> Option<ParameterGroup> {
        Self::all().into_iter().find(|group| group.name == name)
    }

    pub fn unit(&self, param: &str) -> &str {
        self.units.get(param).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.observation_params.is_empty() && self.forecast_params.is_empty()
    }

    pub fn selection(&self) -> ParamSelection<'_> {
        ParamSelection {
            observation_params: &self.observation_params,
            forecast_params: &self.forecast_params,
        }
    }
}

/// The group shown when a station is first opened.
impl Default for ParameterGroup {
    fn default() -> Self {
        Self::temperature()
    }
}

impl fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which parameters are displayed on each side of a merge.
#[derive(Debug, Clone, Copy)]
pub struct ParamSelection<'a> {
    pub observation_params: &'a [String],
    pub forecast_params: &'a [String],
}

/// Union of parameter names across groups, first-seen order, no duplicates.
pub(crate) fn union_params<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut params: Vec<String> = Vec::new();
    for param in lists.into_iter().flatten() {
        if !params.contains(param) {
            params.push(param.clone());
        }
    }
    params
}
