use crate::api::error::ApiError;
use crate::api::geojson::{parse_feature_collection, FeatureCollection};
use log::{info, warn};
use reqwest::Client;

/// Query string as ordered pairs; keys may repeat (the conditions API takes one
/// `parameters` pair per parameter).
pub(crate) type Query = Vec<(&'static str, String)>;

/// Issues a bearer-authorized GET and parses the body as a feature collection.
pub(crate) async fn get_feature_collection(
    http: &Client,
    url: &str,
    query: &Query,
    token: &str,
) -> Result<FeatureCollection, ApiError> {
    info!("GET {} ({} query parameters)", url, query.len());

    let response = http
        .get(url)
        .query(query)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| ApiError::NetworkRequest(url.to_string(), e))?;

    let status = response.status();
    if !status.is_success() {
        // Best effort; the body usually explains what was wrong with the query.
        let body = response.text().await.unwrap_or_default();
        warn!("HTTP error for {}: {} {}", url, status, body);
        return Err(ApiError::HttpStatus {
            url: url.to_string(),
            status,
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::NetworkRequest(url.to_string(), e))?;

    parse_feature_collection(&bytes).map_err(|e| ApiError::Parse {
        url: url.to_string(),
        source: e,
    })
}
