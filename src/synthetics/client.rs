//! HTTP client for the Synthetics REST API (v3)
//!
//! ## Endpoints
//!
//! | operation | request | success |
//! |---|---|---|
//! | create | `POST {base}/v3/monitors` | `201`, id in the `Location` header |
//! | get | `GET {base}/v3/monitors/{id}` | `200` with the monitor document |
//! | update | `PUT {base}/v3/monitors/{id}` | `204` |
//! | delete | `DELETE {base}/v3/monitors/{id}` | `204` |
//!
//! `404` on get or delete maps to [`ApiError::NotFound`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, trace};
use url::Url;

use super::api::SyntheticsApi;
use super::model::Monitor;
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, parse_base_url, status_error};

const API_KEY_HEADER: &str = "Api-Key";

/// Synthetics API client
///
/// Cheap to clone; the underlying reqwest client pools connections.
#[derive(Debug, Clone)]
pub struct SyntheticsClient {
    client: Client,
    base_url: Url,
}

impl SyntheticsClient {
    /// Create a client for `base_url` (e.g. `https://synthetics.newrelic.com/synthetics/api`)
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            client: build_client(API_KEY_HEADER, api_key, timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    fn monitors_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base urls, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v3", "monitors"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

/// Pull the monitor id out of a `Location` header value
///
/// The service answers with `.../v3/monitors/{id}`; only the last path
/// segment matters.
fn id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl SyntheticsApi for SyntheticsClient {
    #[instrument(skip_all, fields(name = %monitor.name))]
    async fn create_monitor(&self, monitor: Monitor) -> ApiResult<Monitor> {
        let url = self.monitors_url(None);
        trace!("POST {url}");

        let response = self.client.post(url).json(&monitor).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let id = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(id_from_location)
            .ok_or(ApiError::MissingId)?;

        debug!("created monitor {id}");
        Ok(Monitor {
            id: Some(id),
            ..monitor
        })
    }

    #[instrument(skip(self))]
    async fn get_monitor(&self, id: &str) -> ApiResult<Monitor> {
        let url = self.monitors_url(Some(id));
        trace!("GET {url}");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(id.to_string())),
            status if status.is_success() => {
                let body = response.text().await?;
                let mut monitor: Monitor = serde_json::from_str(&body)?;
                monitor.id.get_or_insert_with(|| id.to_string());
                Ok(monitor)
            }
            _ => Err(status_error(response).await),
        }
    }

    #[instrument(skip_all, fields(id = ?monitor.id))]
    async fn update_monitor(&self, monitor: Monitor) -> ApiResult<Monitor> {
        let id = monitor.id.as_deref().ok_or(ApiError::MissingId)?;
        let url = self.monitors_url(Some(id));
        trace!("PUT {url}");

        let response = self.client.put(url).json(&monitor).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(id.to_string())),
            status if status.is_success() => Ok(monitor),
            _ => Err(status_error(response).await),
        }
    }

    #[instrument(skip(self))]
    async fn delete_monitor(&self, id: &str) -> ApiResult<()> {
        let url = self.monitors_url(Some(id));
        trace!("DELETE {url}");

        let response = self.client.delete(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(id.to_string())),
            status if status.is_success() => Ok(()),
            _ => Err(status_error(response).await),
        }
    }
}
