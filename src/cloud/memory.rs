//! In-memory cloud integrations backend

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CloudApi, LinkedAccount};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    accounts: HashMap<(i64, i64), LinkedAccount>,
}

/// Linked accounts kept in a map keyed by (owning account, linked id)
#[derive(Debug, Default)]
pub struct MemoryCloud {
    inner: RwLock<Inner>,
}

impl MemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CloudApi for MemoryCloud {
    async fn link_gcp_account(
        &self,
        account_id: i64,
        name: &str,
        project_id: &str,
    ) -> ApiResult<LinkedAccount> {
        let mut inner = self.inner.write().await;

        if inner
            .accounts
            .iter()
            .any(|((owner, _), a)| *owner == account_id && a.external_id == project_id)
        {
            return Err(ApiError::GraphQl(vec![format!(
                "project {project_id} is already linked"
            )]));
        }

        inner.next_id += 1;
        let linked = LinkedAccount {
            id: inner.next_id,
            name: name.to_string(),
            external_id: project_id.to_string(),
            nr_account_id: account_id,
        };
        debug!("in-memory backend: linked {project_id} as {}", linked.id);
        inner.accounts.insert((account_id, linked.id), linked.clone());

        Ok(linked)
    }

    async fn get_linked_account(&self, account_id: i64, id: i64) -> ApiResult<LinkedAccount> {
        self.inner
            .read()
            .await
            .accounts
            .get(&(account_id, id))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn rename_account(
        &self,
        account_id: i64,
        id: i64,
        name: &str,
    ) -> ApiResult<LinkedAccount> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&(account_id, id))
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        account.name = name.to_string();
        Ok(account.clone())
    }

    async fn unlink_account(&self, account_id: i64, id: i64) -> ApiResult<()> {
        self.inner
            .write()
            .await
            .accounts
            .remove(&(account_id, id))
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}
