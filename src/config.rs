//! Endpoint, credential and time-window configuration.

use crate::auth::token_provider::DEFAULT_TOKEN_LIFETIME;
use bon::Builder;
use chrono::TimeDelta;
use std::env;
use thiserror::Error;

pub const DEFAULT_AUTH_URL: &str = "https://api.auth.dtn.com/v1/tokens/authorize";
pub const DEFAULT_OBSERVATIONS_URL: &str = "https://obs.api.dtn.com/v2/observations";
pub const DEFAULT_CONDITIONS_URL: &str = "https://weather.api.dtn.com/v2/conditions";

/// How far back the station detail view looks for observations.
pub const DETAIL_LOOKBACK: TimeDelta = TimeDelta::hours(12);
/// Forecast window start when the caller gives none.
pub const FORECAST_LOOKBACK: TimeDelta = TimeDelta::hours(12);
pub const FORECAST_HORIZON: TimeDelta = TimeDelta::hours(24);
/// Map window: `[selected - 90 min, selected + 60 s]`.
pub const MAP_LOOKBACK: TimeDelta = TimeDelta::minutes(90);
pub const MAP_LOOKAHEAD: TimeDelta = TimeDelta::seconds(60);

pub const CLIENT_ID_VAR: &str = "DTN_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "DTN_CLIENT_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Everything [`crate::OneObs`] needs to talk to the DTN APIs.
///
/// Only the client credentials are required; every other field has a default.
///
/// ```
/// use oneobs::DashConfig;
/// use chrono::TimeDelta;
///
/// let config = DashConfig::builder()
///     .client_id("my-id")
///     .client_secret("my-secret")
///     .detail_lookback(TimeDelta::hours(24))
///     .build();
/// assert_eq!(config.observations_url, "https://obs.api.dtn.com/v2/observations");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DashConfig {
    #[builder(into)]
    pub client_id: String,
    #[builder(into)]
    pub client_secret: String,

    #[builder(into, default = DEFAULT_AUTH_URL.to_string())]
    pub auth_url: String,
    #[builder(into, default = DEFAULT_OBSERVATIONS_URL.to_string())]
    pub observations_url: String,
    #[builder(into, default = DEFAULT_CONDITIONS_URL.to_string())]
    pub conditions_url: String,

    #[builder(default = DEFAULT_TOKEN_LIFETIME)]
    pub token_lifetime: TimeDelta,
    #[builder(default = DETAIL_LOOKBACK)]
    pub detail_lookback: TimeDelta,
    #[builder(default = FORECAST_LOOKBACK)]
    pub forecast_lookback: TimeDelta,
    #[builder(default = FORECAST_HORIZON)]
    pub forecast_horizon: TimeDelta,
    #[builder(default = MAP_LOOKBACK)]
    pub map_lookback: TimeDelta,
    #[builder(default = MAP_LOOKAHEAD)]
    pub map_lookahead: TimeDelta,
    /// Aggregation interval for bounding-box queries.
    #[builder(into, default = "1h".to_string())]
    pub map_interval: String,
}

impl DashConfig {
    /// Reads credentials from `DTN_CLIENT_ID` / `DTN_CLIENT_SECRET`. The endpoint URLs may
    /// be overridden with `DTN_AUTH_URL`, `DTN_OBSERVATIONS_URL` and `DTN_CONDITIONS_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id =
            env::var(CLIENT_ID_VAR).map_err(|_| ConfigError::MissingVar(CLIENT_ID_VAR))?;
        let client_secret =
            env::var(CLIENT_SECRET_VAR).map_err(|_| ConfigError::MissingVar(CLIENT_SECRET_VAR))?;

        Ok(Self::builder()
            .client_id(client_id)
            .client_secret(client_secret)
            .maybe_auth_url(env::var("DTN_AUTH_URL").ok())
            .maybe_observations_url(env::var("DTN_OBSERVATIONS_URL").ok())
            .maybe_conditions_url(env::var("DTN_CONDITIONS_URL").ok())
            .build())
    }
}
