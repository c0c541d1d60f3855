mod api;
mod auth;
mod clients;
mod clock;
mod config;
mod detail;
mod display;
mod error;
mod oneobs;
mod sequence;
mod types;

pub use error::OneObsError;
pub use oneobs::*;

pub use clients::forecast_client::*;
pub use clients::observations_client::*;

pub use auth::endpoint::{HttpTokenEndpoint, TokenEndpoint};
pub use auth::token_provider::{Token, TokenProvider, DEFAULT_TOKEN_LIFETIME};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::*;
pub use detail::*;
pub use sequence::{RequestSequencer, Ticket};

pub use display::chart::*;
pub use display::marker::*;
pub use display::merge::*;
pub use display::table::*;
pub use display::time_format::*;

pub use types::audience::Audience;
pub use types::forecast::ForecastSeries;
pub use types::geo::{BoundingBox, LatLon};
pub use types::parameter_group::{ParamSelection, ParameterGroup};
pub use types::parameters::{
    display_name, display_unit, forecast_parameter, is_rounded, translate_to_forecast,
    MAP_PARAMETERS,
};
pub use types::records::*;
pub use types::station::*;
pub use types::window::TimeWindow;

pub use api::error::{ApiError, ParseError};
pub use auth::error::AuthError;
