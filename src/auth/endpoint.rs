//! The client-credentials exchange against the DTN auth endpoint.

use crate::auth::error::AuthError;
use crate::types::audience::Audience;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

/// Something that can mint a fresh bearer token for an audience.
///
/// [`HttpTokenEndpoint`] is the real implementation; tests substitute fakes to count
/// requests or simulate failures.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn authorize(&self, audience: Audience) -> Result<String, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    access_token: Option<String>,
}

/// Posts `grant_type=client_credentials` forms to the auth URL.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    http: Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpTokenEndpoint {
    pub fn new(http: Client, auth_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            http,
            auth_url: auth_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn authorize(&self, audience: Audience) -> Result<String, AuthError> {
        info!("Requesting {} token from {}", audience, self.auth_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("audience", audience.identifier()),
        ];

        let response = self
            .http
            .post(&self.auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::NetworkRequest {
                url: self.auth_url.clone(),
                audience,
                source: e,
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Token request for {} rejected: {:?}", audience, e);
                return Err(match e.status() {
                    Some(status) => AuthError::HttpStatus {
                        url: self.auth_url.clone(),
                        audience,
                        status,
                        source: e,
                    },
                    None => AuthError::NetworkRequest {
                        url: self.auth_url.clone(),
                        audience,
                        source: e,
                    },
                });
            }
        };

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse { audience, source: e })?;

        body.data
            .and_then(|data| data.access_token)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingAccessToken(audience))
    }
}
