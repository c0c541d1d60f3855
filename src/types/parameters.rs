//! Static parameter vocabulary: observation → forecast name translation, display
//! names, and which parameters are rounded for display.

/// Observation parameter → conditions (forecast) parameter.
///
/// `surfaceTemp` and `precipAcc60Min` have no forecast counterpart and are absent on
/// purpose.
const FORECAST_PARAMETER_MAP: &[(&str, &str)] = &[
    // Temperature
    ("airTemp", "airTemp"),
    ("airTempLowerBound", "airTempLowerBound"),
    ("airTempUpperBound", "airTempUpperBound"),
    ("relativeHumidity", "relativeHumidity"),
    // Wind
    ("windSpeed", "windSpeed"),
    ("windSpeed2m", "windSpeed2m"),
    ("windSpeedLowerBound", "windSpeedLowerBound"),
    ("windSpeedUpperBound", "windSpeedUpperBound"),
    ("windDirection", "windDirection"),
    ("windGust", "windGust"),
    ("windGust2m", "windGust2m"),
    // Radiation
    ("shortWaveRadiation", "shortWaveRadiation"),
    ("globalRadiation60Min", "globalRadiation"),
    ("sunshine60Min", "sunshineDuration"),
    ("cloudCover", "totalCloudCover"),
    // General
    ("visibility", "visibility"),
    ("wmoWeatherCode", "wmoWeatherCode"),
];

/// Parameters shown with one decimal place, in either vocabulary.
const ROUNDED_PARAMETERS: &[&str] = &[
    "airTemp",
    "surfaceTemp",
    "windSpeed",
    "shortWaveRadiation",
    "globalRadiation60Min",
    "globalRadiation",
];

/// Human readable parameter names and units.
const DISPLAY_NAMES: &[(&str, &str, &str)] = &[
    ("visibility", "Visibility", "km"),
    ("wmoWeatherCode", "WMO Weather Code", ""),
    ("airTemp", "Air Temperature", "°C"),
    ("airTempLowerBound", "Air Temperature Lower Bound", "°C"),
    ("airTempUpperBound", "Air Temperature Upper Bound", "°C"),
    ("surfaceTemp", "Surface Temperature", "°C"),
    ("relativeHumidity", "Relative Humidity", "%"),
    ("windSpeed", "Wind Speed", "m/s"),
    ("windSpeed2m", "Wind Speed at 2m", "m/s"),
    ("windGust", "Wind Gust", "m/s"),
    ("windGust2m", "Wind Gust at 2m", "m/s"),
    ("windSpeedLowerBound", "Wind Speed Lower Bound", "m/s"),
    ("windSpeedUpperBound", "Wind Speed Upper Bound", "m/s"),
    ("windDirection", "Wind Direction", "°"),
    ("shortWaveRadiation", "Short Wave Radiation", "W/m²"),
    ("globalRadiation60Min", "Global Radiation", "J/cm²"),
    ("globalRadiation", "Global Radiation", "J/cm²"),
    ("sunshine60Min", "Sunshine Duration", "min"),
    ("sunshineDuration", "Sunshine Duration", "min"),
    ("cloudCover", "Cloud Cover", "%"),
    ("totalCloudCover", "Total Cloud Cover", "%"),
    ("precipAcc60Min", "Precipitation", "mm"),
];

/// Parameters requested for every station in a bounding-box (map) query.
pub const MAP_PARAMETERS: &[&str] = &[
    "airTemp",
    "windSpeed",
    "windSpeed2m",
    "windDirection",
    "relativeHumidity",
    "surfaceTemp",
    "shortWaveRadiation",
    "globalRadiation60Min",
    "precipAcc60Min",
    "visibility",
    "wmoWeatherCode",
    "windGust",
    "windGust2m",
];

/// Translates an observation parameter name to the conditions API vocabulary.
///
/// ```
/// use oneobs::forecast_parameter;
///
/// assert_eq!(forecast_parameter("globalRadiation60Min"), Some("globalRadiation"));
/// assert_eq!(forecast_parameter("surfaceTemp"), None);
/// ```
pub fn forecast_parameter(observation_param: &str) -> Option<&'static str> {
    FORECAST_PARAMETER_MAP
        .iter()
        .find(|(obs, _)| *obs == observation_param)
        .map(|(_, forecast)| *forecast)
}

/// Translates a list of observation parameters, dropping unmapped names and duplicates.
/// First-seen order is kept.
pub fn translate_to_forecast<S: AsRef<str>>(observation_params: &[S]) -> Vec<&'static str> {
    let mut translated: Vec<&'static str> = Vec::with_capacity(observation_params.len());
    for forecast in observation_params
        .iter()
        .filter_map(|p| forecast_parameter(p.as_ref()))
    {
        if !translated.contains(&forecast) {
            translated.push(forecast);
        }
    }
    translated
}

pub fn is_rounded(param: &str) -> bool {
    ROUNDED_PARAMETERS.contains(&param)
}

/// Display name for a parameter; falls back to the raw name.
pub fn display_name(param: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(p, _, _)| *p == param)
        .map(|(_, name, _)| *name)
        .unwrap_or(param)
}

/// Unit for a parameter, or an empty string when unknown or unitless.
pub fn display_unit(param: &str) -> &'static str {
    DISPLAY_NAMES
        .iter()
        .find(|(p, _, _)| *p == param)
        .map(|(_, _, unit)| *unit)
        .unwrap_or("")
}
