use crate::api::error::ApiError;
use crate::auth::error::AuthError;
use crate::config::ConfigError;
use crate::detail::DetailError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OneObsError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Detail(#[from] DetailError),

    #[error("Failed to initialise the HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
