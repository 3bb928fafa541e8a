//! Provider wiring
//!
//! Builds the API clients from a [`ProviderConfig`] once and hands out
//! resource adapters that share them. Adapters receive their client
//! explicitly; nothing is looked up globally.

use std::sync::Arc;

use tracing::debug;

use crate::cloud::{CloudApi, NerdGraphClient};
use crate::config::ProviderConfig;
use crate::error::ApiResult;
use crate::resource::{GcpLinkAccountResource, SyntheticsMonitorResource};
use crate::schema::ResourceSchema;
use crate::synthetics::{SyntheticsApi, SyntheticsClient};

pub struct Provider {
    synthetics: Arc<dyn SyntheticsApi>,
    cloud: Arc<dyn CloudApi>,
    account_id: Option<i64>,
}

impl Provider {
    /// Provider talking to the real service
    pub fn from_config(config: &ProviderConfig) -> ApiResult<Self> {
        debug!("configuring provider: {config:?}");

        let synthetics = SyntheticsClient::new(
            &config.synthetics_api_url,
            &config.api_key,
            config.timeout,
        )?;
        let cloud =
            NerdGraphClient::new(&config.nerdgraph_api_url, &config.api_key, config.timeout)?;

        Ok(Self::with_clients(
            Arc::new(synthetics),
            Arc::new(cloud),
            config.account_id,
        ))
    }

    /// Provider over arbitrary backends (in-memory ones in tests)
    pub fn with_clients(
        synthetics: Arc<dyn SyntheticsApi>,
        cloud: Arc<dyn CloudApi>,
        account_id: Option<i64>,
    ) -> Self {
        Self {
            synthetics,
            cloud,
            account_id,
        }
    }

    pub fn schemas() -> Vec<ResourceSchema> {
        vec![
            SyntheticsMonitorResource::<dyn SyntheticsApi>::schema(),
            GcpLinkAccountResource::<dyn CloudApi>::schema(),
        ]
    }

    pub fn monitors(&self) -> SyntheticsMonitorResource<dyn SyntheticsApi> {
        SyntheticsMonitorResource::new(Arc::clone(&self.synthetics))
    }

    /// GCP link adapter; `None` when no account id is configured
    pub fn gcp_link_accounts(&self) -> Option<GcpLinkAccountResource<dyn CloudApi>> {
        self.account_id
            .map(|account_id| GcpLinkAccountResource::new(Arc::clone(&self.cloud), account_id))
    }
}
