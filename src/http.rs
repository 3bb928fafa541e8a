//! Shared plumbing for the reqwest-based API clients

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::trace;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Build a client that sends `api_key` under `header` on every request
pub(crate) fn build_client(
    header: &'static str,
    api_key: &str,
    timeout: Duration,
) -> ApiResult<Client> {
    let mut key = HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidApiKey)?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header, key);

    let client = Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .user_agent(concat!("synthetics-provider/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

/// Parse an endpoint and make sure path segments can be appended to it
pub(crate) fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Single { error: String },
    Many { errors: Vec<ErrorEntry> },
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(alias = "message")]
    error: String,
}

/// Turn a non-success response into an [`ApiError::UnexpectedStatus`]
///
/// The message is taken from the service's JSON error body when present,
/// otherwise the raw body, otherwise the status reason.
pub(crate) async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    trace!("error response body ({status}): {body}");

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody::Single { error }) => error,
        Ok(ErrorBody::Many { errors }) => errors
            .into_iter()
            .map(|e| e.error)
            .collect::<Vec<_>>()
            .join("; "),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    ApiError::UnexpectedStatus { status, message }
}
