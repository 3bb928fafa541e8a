//! Cloud integrations API (linked cloud provider accounts)
//!
//! Linking a cloud account lets the monitoring service pull metrics from the
//! provider. Only GCP links are modelled here; they are identified by the
//! service-assigned linked account id within an owning account.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

pub mod client;
pub mod memory;

pub use client::NerdGraphClient;
pub use memory::MemoryCloud;

/// A cloud provider account linked to a monitoring account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub id: i64,
    pub name: String,
    /// The provider-side identity; the project id for GCP
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub nr_account_id: i64,
}

/// Operations on linked GCP accounts
///
/// Unknown linked account ids are reported as
/// [`ApiError::NotFound`](crate::error::ApiError::NotFound).
#[async_trait]
pub trait CloudApi: Send + Sync {
    async fn link_gcp_account(
        &self,
        account_id: i64,
        name: &str,
        project_id: &str,
    ) -> ApiResult<LinkedAccount>;

    async fn get_linked_account(&self, account_id: i64, id: i64) -> ApiResult<LinkedAccount>;

    async fn rename_account(&self, account_id: i64, id: i64, name: &str)
    -> ApiResult<LinkedAccount>;

    async fn unlink_account(&self, account_id: i64, id: i64) -> ApiResult<()>;
}
