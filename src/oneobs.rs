//! The main entry point: a map of stations around a selected time, and the detail view
//! of a single station.

use crate::auth::endpoint::{HttpTokenEndpoint, TokenEndpoint};
use crate::auth::token_provider::TokenProvider;
use crate::clients::forecast_client::ForecastClient;
use crate::clients::observations_client::ObservationsClient;
use crate::clock::{Clock, SystemClock};
use crate::config::DashConfig;
use crate::detail::{DetailError, StationDetail};
use crate::display::marker::{build_marker, DisplayMode, StationMarker};
use crate::error::OneObsError;
use crate::sequence::RequestSequencer;
use crate::types::forecast::ForecastSeries;
use crate::types::geo::BoundingBox;
use crate::types::parameter_group::{union_params, ParameterGroup};
use crate::types::parameters::MAP_PARAMETERS;
use crate::types::station::{is_queryable_station_code, StationFilter};
use crate::types::window::TimeWindow;
use bon::Builder;
use chrono::{DateTime, Utc};
use log::info;
use reqwest::Client;
use std::sync::Arc;

/// What the map currently shows.
#[derive(Debug, Clone, Builder)]
pub struct MapQuery {
    pub bounds: BoundingBox,
    /// Defaults to the clock's "now".
    pub selected_time: Option<DateTime<Utc>>,
    #[builder(default)]
    pub station_filter: StationFilter,
    #[builder(default)]
    pub display_mode: DisplayMode,
}

/// Outcome of a viewport refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportUpdate {
    Current(Vec<StationMarker>),
    /// A newer refresh was started while this one was in flight; its result was dropped.
    Superseded,
}

/// Client for the DTN station dashboard.
///
/// Owns one token cache shared by the observations and forecast clients, so each
/// audience is authorized at most once per token lifetime.
///
/// # Examples
///
/// ```no_run
/// # use oneobs::{BoundingBox, DashConfig, DisplayMode, MapQuery, OneObs, ViewportUpdate};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dash = OneObs::new(DashConfig::from_env()?)?;
/// let query = MapQuery::builder()
///     .bounds(BoundingBox::new(51.0, 52.0, -1.0, 1.0))
///     .display_mode(DisplayMode::WindSpeed)
///     .build();
/// if let ViewportUpdate::Current(markers) = dash.stations_in_view(query).await {
///     for marker in markers {
///         println!("{} {:?}", marker.station_code, marker.marker.label());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct OneObs {
    config: DashConfig,
    clock: Arc<dyn Clock>,
    tokens: Arc<TokenProvider>,
    observations: ObservationsClient,
    forecasts: ForecastClient,
    viewport: RequestSequencer,
    detail: RequestSequencer,
}

impl OneObs {
    /// Creates a client that authorizes against `config.auth_url` and uses the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`OneObsError::HttpClient`] if the HTTP client cannot be initialised.
    pub fn new(config: DashConfig) -> Result<Self, OneObsError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`OneObs::new`], with an explicit clock for token expiry and query windows.
    pub fn with_clock(config: DashConfig, clock: Arc<dyn Clock>) -> Result<Self, OneObsError> {
        let http = Self::http_client()?;
        let endpoint = HttpTokenEndpoint::new(
            http.clone(),
            &config.auth_url,
            &config.client_id,
            &config.client_secret,
        );
        Ok(Self::assemble(config, http, Arc::new(endpoint), clock))
    }

    /// Uses `endpoint` instead of the DTN auth service to obtain tokens.
    pub fn with_token_endpoint(
        config: DashConfig,
        endpoint: Arc<dyn TokenEndpoint>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, OneObsError> {
        let http = Self::http_client()?;
        Ok(Self::assemble(config, http, endpoint, clock))
    }

    fn http_client() -> Result<Client, OneObsError> {
        Client::builder()
            .gzip(true)
            .build()
            .map_err(OneObsError::HttpClient)
    }

    fn assemble(
        config: DashConfig,
        http: Client,
        endpoint: Arc<dyn TokenEndpoint>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenProvider::with_lifetime(
            endpoint,
            clock.clone(),
            config.token_lifetime,
        ));
        let observations = ObservationsClient::new(
            http.clone(),
            &config.observations_url,
            &config.map_interval,
            tokens.clone(),
        );
        let forecasts = ForecastClient::new(
            http,
            &config.conditions_url,
            tokens.clone(),
            clock.clone(),
            config.forecast_lookback,
            config.forecast_horizon,
        );
        Self {
            config,
            clock,
            tokens,
            observations,
            forecasts,
            viewport: RequestSequencer::new(),
            detail: RequestSequencer::new(),
        }
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn observations(&self) -> &ObservationsClient {
        &self.observations
    }

    pub fn forecasts(&self) -> &ForecastClient {
        &self.forecasts
    }

    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Loads the stations inside `query.bounds` and builds one marker per station.
    ///
    /// Observations are requested for `[selected - map_lookback, selected + map_lookahead]`.
    /// When another call starts before this one finishes, this one returns
    /// [`ViewportUpdate::Superseded`] so an older response never replaces a newer one.
    pub async fn stations_in_view(&self, query: MapQuery) -> ViewportUpdate {
        let ticket = self.viewport.begin();
        let now = self.clock.now();
        let selected = query.selected_time.unwrap_or(now);
        let window = TimeWindow::around(
            selected,
            self.config.map_lookback,
            self.config.map_lookahead,
        );
        let parameters: Vec<String> = MAP_PARAMETERS.iter().map(|p| p.to_string()).collect();

        let stations = self
            .observations
            .fetch_by_bounding_box()
            .bounds(query.bounds)
            .window(window)
            .parameters(&parameters)
            .station_filter(query.station_filter)
            .call()
            .await;

        if !self.viewport.is_current(ticket) {
            info!("Dropping superseded viewport response ({} stations)", stations.len());
            return ViewportUpdate::Superseded;
        }

        ViewportUpdate::Current(
            stations
                .iter()
                .map(|station| build_marker(station, query.display_mode, now))
                .collect(),
        )
    }

    /// Fetches the observations and forecast shown in a station's detail view.
    ///
    /// Observations cover the trailing `detail_lookback` and the parameters of every
    /// built-in group. The forecast is requested afterwards, from the earliest
    /// observation onward, and only when the station reported a location and at least
    /// one observation. Network and API failures give empty series rather than errors.
    ///
    /// # Errors
    ///
    /// * [`DetailError::InvalidStationCode`] for an empty or `"N/A"` code. No request is made.
    /// * [`DetailError::NoParameters`] when `group` has no parameters.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use oneobs::{DashConfig, OneObs, ParameterGroup};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dash = OneObs::new(DashConfig::from_env()?)?;
    /// let detail = dash.station_detail("EGLL", &ParameterGroup::temperature()).await?;
    /// let view = detail.view(&ParameterGroup::wind(), dash.now());
    /// println!("{}: {} rows", detail.title(), view.table.rows.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn station_detail(
        &self,
        code: &str,
        group: &ParameterGroup,
    ) -> Result<StationDetail, DetailError> {
        if !is_queryable_station_code(code) {
            return Err(DetailError::InvalidStationCode(code.to_string()));
        }
        if group.is_empty() {
            return Err(DetailError::NoParameters);
        }

        let groups = ParameterGroup::all();
        let observation_params = union_params(
            std::iter::once(group.observation_params.as_slice())
                .chain(groups.iter().map(|g| g.observation_params.as_slice())),
        );
        let window = TimeWindow::trailing(self.clock.now(), self.config.detail_lookback);

        let observations = self
            .observations
            .fetch_by_station_code(code, &observation_params, window)
            .await;

        let forecast = match observations.location {
            Some(location) if !observations.is_empty() => {
                let requested = union_params(
                    std::iter::once(group.observation_params.as_slice())
                        .chain(std::iter::once(group.forecast_params.as_slice()))
                        .chain(groups.iter().map(|g| g.observation_params.as_slice()))
                        .chain(groups.iter().map(|g| g.forecast_params.as_slice())),
                );
                self.forecasts
                    .fetch_forecast(location, observations.earliest_time(), &requested)
                    .await
            }
            _ => {
                info!("Station {} has no located observations, skipping forecast", code);
                ForecastSeries::empty()
            }
        };

        Ok(StationDetail {
            station_code: code.trim().to_string(),
            observations,
            forecast,
        })
    }

    /// [`OneObs::station_detail`] for callers that may open several stations in quick
    /// succession. Gives `Ok(None)` when another call started before this one finished.
    pub async fn station_detail_if_current(
        &self,
        code: &str,
        group: &ParameterGroup,
    ) -> Result<Option<StationDetail>, DetailError> {
        let ticket = self.detail.begin();
        let detail = self.station_detail(code, group).await?;
        if !self.detail.is_current(ticket) {
            info!("Dropping superseded detail response for station {}", code);
            return Ok(None);
        }
        Ok(Some(detail))
    }
}
