//! Provides the `ForecastClient` for the DTN conditions (forecast) API.

use crate::api::error::ApiError;
use crate::api::geojson::sort_ascending;
use crate::api::request::{get_feature_collection, Query};
use crate::auth::token_provider::TokenProvider;
use crate::clock::Clock;
use crate::types::audience::Audience;
use crate::types::forecast::ForecastSeries;
use crate::types::geo::LatLon;
use crate::types::parameters::translate_to_forecast;
use crate::types::window::TimeWindow;
use chrono::{DateTime, TimeDelta, Utc};
use log::{info, warn};
use reqwest::Client;
use std::sync::Arc;

/// Fetches forecast conditions for a coordinate.
///
/// Callers pass parameter names in the *observations* vocabulary; they are translated
/// to conditions names (`globalRadiation60Min` → `globalRadiation`, ...) and names with
/// no forecast counterpart are dropped. The returned records are keyed by the
/// conditions names.
///
/// The query window starts at the caller's `start_time` (usually the earliest
/// observation shown), or `now - lookback` when none is given, and always ends at
/// `now + horizon`.
pub struct ForecastClient {
    http: Client,
    url: String,
    tokens: Arc<TokenProvider>,
    clock: Arc<dyn Clock>,
    lookback: TimeDelta,
    horizon: TimeDelta,
}

impl ForecastClient {
    pub fn new(
        http: Client,
        url: &str,
        tokens: Arc<TokenProvider>,
        clock: Arc<dyn Clock>,
        lookback: TimeDelta,
        horizon: TimeDelta,
    ) -> Self {
        Self {
            http,
            url: url.to_string(),
            tokens,
            clock,
            lookback,
            horizon,
        }
    }

    pub fn window(&self, start_time: Option<DateTime<Utc>>) -> TimeWindow {
        let now = self.clock.now();
        TimeWindow::new(start_time.unwrap_or(now - self.lookback), now + self.horizon)
    }

    /// Fetches forecast records; failures are logged and give [`ForecastSeries::empty`].
    ///
    /// ```no_run
    /// # use oneobs::{OneObs, DashConfig, LatLon};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dash = OneObs::new(DashConfig::from_env()?)?;
    /// let series = dash
    ///     .forecasts()
    ///     .fetch_forecast(LatLon(51.47, -0.45), None, &["airTemp".to_string()])
    ///     .await;
    /// for record in &series.forecasts {
    ///     println!("{} {:?}", record.timestamp, record.values.get("airTemp"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_forecast(
        &self,
        location: LatLon,
        start_time: Option<DateTime<Utc>>,
        observation_parameters: &[String],
    ) -> ForecastSeries {
        match self
            .try_fetch_forecast(location, start_time, observation_parameters)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!("Forecast for {:?} unavailable: {}", location, e);
                ForecastSeries::empty()
            }
        }
    }

    pub async fn try_fetch_forecast(
        &self,
        location: LatLon,
        start_time: Option<DateTime<Utc>>,
        observation_parameters: &[String],
    ) -> Result<ForecastSeries, ApiError> {
        let parameters = translate_to_forecast(observation_parameters);
        if parameters.is_empty() {
            info!("No forecastable parameters requested, skipping conditions query");
            return Ok(ForecastSeries::empty());
        }

        let window = self.window(start_time);
        let token = self.tokens.token(Audience::Conditions).await?;
        let query = Self::query(location, &window, &parameters);
        let collection = get_feature_collection(&self.http, &self.url, &query, &token).await?;

        let mut forecasts = match collection.features.first() {
            Some(feature) => feature.records(),
            None => Vec::new(),
        };
        sort_ascending(&mut forecasts);

        Ok(ForecastSeries {
            forecasts,
            start_time: Some(window.start),
            end_time: Some(window.end),
        })
    }

    fn query(location: LatLon, window: &TimeWindow, parameters: &[&'static str]) -> Query {
        let mut query: Query = vec![
            ("lat", location.latitude().to_string()),
            ("lon", location.longitude().to_string()),
            ("startTime", window.start_param()),
            ("endTime", window.end_param()),
        ];
        query.extend(parameters.iter().map(|p| ("parameters", p.to_string())));
        query
    }
}
