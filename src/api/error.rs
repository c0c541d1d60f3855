use crate::auth::error::AuthError;
use thiserror::Error;

/// The response body did not have the shape we expect.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response is not a GeoJSON feature collection")]
    Json(#[from] serde_json::Error),

    #[error("Feature geometry has fewer than two coordinates")]
    MissingCoordinates,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse response from {url}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}
