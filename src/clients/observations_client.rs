//! Provides the `ObservationsClient` for the DTN observations API.
//!
//! Two query shapes are supported: every station inside a bounding box (the map view)
//! and the history of a single station (the detail view). Both have a fallible `try_`
//! variant and a degrading variant that logs failures and returns an empty result, so
//! the caller always has something to render.

use crate::api::error::ApiError;
use crate::api::geojson::sort_descending;
use crate::api::request::{get_feature_collection, Query};
use crate::auth::token_provider::TokenProvider;
use crate::types::audience::Audience;
use crate::types::geo::BoundingBox;
use crate::types::station::{
    is_queryable_station_code, StationFeature, StationFilter, StationObservations,
};
use crate::types::window::TimeWindow;
use bon::bon;
use log::{info, warn};
use reqwest::Client;
use std::sync::Arc;

pub struct ObservationsClient {
    http: Client,
    url: String,
    interval: String,
    tokens: Arc<TokenProvider>,
}

#[bon]
impl ObservationsClient {
    /// Creates a client for the observations endpoint at `url`.
    ///
    /// `interval` is the aggregation interval sent with bounding-box queries (e.g. `1h`).
    pub fn new(http: Client, url: &str, interval: &str, tokens: Arc<TokenProvider>) -> Self {
        Self {
            http,
            url: url.to_string(),
            interval: interval.to_string(),
            tokens,
        }
    }

    /// Fetches all stations inside `bounds`, with their observations in `window`.
    ///
    /// Never fails: any error is logged and an empty list returned.
    ///
    /// # Optional Builder Methods
    ///
    /// * `.station_filter(StationFilter)`: restrict to WMO stations. Defaults to
    ///   [`StationFilter::All`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use oneobs::{BoundingBox, OneObs, DashConfig, TimeWindow, StationFilter};
    /// # use chrono::{TimeDelta, Utc};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dash = OneObs::new(DashConfig::from_env()?)?;
    /// let parameters = vec!["airTemp".to_string(), "windSpeed".to_string()];
    /// let stations = dash
    ///     .observations()
    ///     .fetch_by_bounding_box()
    ///     .bounds(BoundingBox::new(51.0, 52.0, -1.0, 1.0))
    ///     .window(TimeWindow::trailing(Utc::now(), TimeDelta::minutes(90)))
    ///     .parameters(&parameters)
    ///     .station_filter(StationFilter::Wmo)
    ///     .call()
    ///     .await;
    /// println!("{} stations in view", stations.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_by_bounding_box(
        &self,
        bounds: BoundingBox,
        window: TimeWindow,
        parameters: &[String],
        station_filter: Option<StationFilter>,
    ) -> Vec<StationFeature> {
        let station_filter = station_filter.unwrap_or_default();
        match self
            .try_fetch_by_bounding_box(bounds, window, parameters, station_filter)
            .await
        {
            Ok(stations) => stations,
            Err(e) => {
                warn!("Bounding box query failed, showing no stations: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_by_bounding_box(
        &self,
        bounds: BoundingBox,
        window: TimeWindow,
        parameters: &[String],
        station_filter: StationFilter,
    ) -> Result<Vec<StationFeature>, ApiError> {
        let token = self.tokens.token(Audience::Observations).await?;
        let query = self.bounding_box_query(&bounds, &window, parameters, station_filter);
        let collection = get_feature_collection(&self.http, &self.url, &query, &token).await?;

        let mut stations = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            // One bad feature never hides the rest of the viewport
            match feature.into_station_feature() {
                Ok(station) => stations.push(station),
                Err(e) => warn!("Skipping station: {}", e),
            }
        }
        info!("Bounding box query returned {} stations", stations.len());
        Ok(stations)
    }

    /// Fetches the observations and tags of one station.
    ///
    /// Codes that are empty or `"N/A"` return the empty result without any request.
    /// Every failure degrades to the empty result as well.
    pub async fn fetch_by_station_code(
        &self,
        code: &str,
        parameters: &[String],
        window: TimeWindow,
    ) -> StationObservations {
        if !is_queryable_station_code(code) {
            info!("Not querying placeholder station code '{}'", code);
            return StationObservations::empty();
        }
        match self.try_fetch_by_station_code(code, parameters, window).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Observations for station {} unavailable: {}", code, e);
                StationObservations::empty()
            }
        }
    }

    pub async fn try_fetch_by_station_code(
        &self,
        code: &str,
        parameters: &[String],
        window: TimeWindow,
    ) -> Result<StationObservations, ApiError> {
        if !is_queryable_station_code(code) {
            return Ok(StationObservations::empty());
        }
        let token = self.tokens.token(Audience::Observations).await?;
        let query = Self::station_query(code.trim(), parameters, &window);
        let collection = get_feature_collection(&self.http, &self.url, &query, &token).await?;

        let Some(feature) = collection.features.into_iter().next() else {
            info!("No features for station {}", code);
            return Ok(StationObservations::empty());
        };

        let mut observations = feature.records();
        sort_descending(&mut observations);

        Ok(StationObservations {
            observations,
            tags: feature.tags(),
            location: feature.location().ok(),
        })
    }

    fn bounding_box_query(
        &self,
        bounds: &BoundingBox,
        window: &TimeWindow,
        parameters: &[String],
        station_filter: StationFilter,
    ) -> Query {
        let mut query: Query = vec![
            ("by", "boundingBox".to_string()),
            ("minLat", bounds.min_lat.to_string()),
            ("maxLat", bounds.max_lat.to_string()),
            ("minLon", bounds.min_lon.to_string()),
            ("maxLon", bounds.max_lon.to_string()),
            ("startTime", window.start_param()),
            ("endTime", window.end_param()),
            ("showTags", "true".to_string()),
            ("showLatest", "true".to_string()),
            ("interval", self.interval.clone()),
            ("parameters", parameters.join(",")),
        ];
        if let Some(obs_types) = station_filter.obs_types() {
            query.push(("obsTypes", obs_types.to_string()));
        }
        query
    }

    fn station_query(code: &str, parameters: &[String], window: &TimeWindow) -> Query {
        vec![
            ("stationCode", code.to_string()),
            ("parameters", parameters.join(",")),
            ("startTime", window.start_param()),
            ("endTime", window.end_param()),
            ("showTags", "true".to_string()),
        ]
    }
}
