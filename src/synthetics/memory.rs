//! In-memory Synthetics backend (no remote service)
//!
//! Behaves like the real API for the purposes of the resource adapter:
//! assigns ids on create, reports unknown ids as not found, and replaces
//! monitors wholesale on update, so the adapter can be tested without
//! network access.
//!
//! Every monitor accepted by `create_monitor` and `update_monitor` is also
//! appended to a request log, so tests can inspect exactly what was sent.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::api::SyntheticsApi;
use super::model::Monitor;
use crate::error::{ApiError, ApiResult};

/// Request recorded by [`MemorySynthetics`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Create(Monitor),
    Get(String),
    Update(Monitor),
    Delete(String),
}

#[derive(Debug, Default)]
struct Inner {
    monitors: HashMap<String, Monitor>,
    calls: Vec<RecordedCall>,
}

/// In-memory implementation of [`SyntheticsApi`]
#[derive(Debug, Default)]
pub struct MemorySynthetics {
    inner: RwLock<Inner>,
}

impl MemorySynthetics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored monitor, bypassing the request log
    pub async fn stored(&self, id: &str) -> Option<Monitor> {
        self.inner.read().await.monitors.get(id).cloned()
    }

    /// Number of stored monitors
    pub async fn len(&self) -> usize {
        self.inner.read().await.monitors.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All calls received so far, oldest first
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.inner.read().await.calls.clone()
    }
}

#[async_trait]
impl SyntheticsApi for MemorySynthetics {
    async fn create_monitor(&self, monitor: Monitor) -> ApiResult<Monitor> {
        let mut inner = self.inner.write().await;
        inner.calls.push(RecordedCall::Create(monitor.clone()));

        let id = uuid::Uuid::new_v4().to_string();
        let stored = Monitor {
            id: Some(id.clone()),
            api_version: Some("0.6.0".to_string()),
            ..monitor
        };
        debug!("in-memory backend: created monitor {id}");
        inner.monitors.insert(id, stored.clone());

        Ok(stored)
    }

    async fn get_monitor(&self, id: &str) -> ApiResult<Monitor> {
        let mut inner = self.inner.write().await;
        inner.calls.push(RecordedCall::Get(id.to_string()));

        inner
            .monitors
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn update_monitor(&self, monitor: Monitor) -> ApiResult<Monitor> {
        let mut inner = self.inner.write().await;
        inner.calls.push(RecordedCall::Update(monitor.clone()));

        let id = monitor.id.clone().ok_or(ApiError::MissingId)?;
        let Some(existing) = inner.monitors.get_mut(&id) else {
            return Err(ApiError::NotFound(id));
        };

        *existing = Monitor {
            api_version: existing.api_version.take(),
            ..monitor
        };
        debug!("in-memory backend: replaced monitor {id}");

        Ok(existing.clone())
    }

    async fn delete_monitor(&self, id: &str) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        inner.calls.push(RecordedCall::Delete(id.to_string()));

        inner
            .monitors
            .remove(id)
            .map(|_| debug!("in-memory backend: deleted monitor {id}"))
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}
