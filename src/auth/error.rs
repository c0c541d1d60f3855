use crate::types::audience::Audience;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token request for {audience} failed: {url}")]
    NetworkRequest {
        url: String,
        audience: Audience,
        #[source]
        source: reqwest::Error,
    },

    #[error("Token request for {audience} to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        audience: Audience,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Token response for {audience} could not be decoded")]
    MalformedResponse {
        audience: Audience,
        #[source]
        source: reqwest::Error,
    },

    // Body was JSON but `data.access_token` was absent or empty
    #[error("Token response for {0} has no data.access_token")]
    MissingAccessToken(Audience),
}
