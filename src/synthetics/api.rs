//! Trait for Synthetics monitor backends
//!
//! The resource adapter only ever talks to this trait, so the HTTP client
//! and the in-memory backend are interchangeable.

use async_trait::async_trait;

use super::model::Monitor;
use crate::error::ApiResult;

/// CRUD surface of the Synthetics monitor API
///
/// Implementations must be `Send + Sync`; the adapter shares one instance
/// across concurrent operations on distinct monitors.
///
/// `get_monitor` and `delete_monitor` return [`ApiError::NotFound`] when the
/// id is unknown, so callers can tell absence apart from other failures.
///
/// [`ApiError::NotFound`]: crate::error::ApiError::NotFound
#[async_trait]
pub trait SyntheticsApi: Send + Sync {
    /// Create a monitor, returning it with its newly assigned id
    async fn create_monitor(&self, monitor: Monitor) -> ApiResult<Monitor>;

    /// Fetch a monitor by id
    async fn get_monitor(&self, id: &str) -> ApiResult<Monitor>;

    /// Replace a monitor; `monitor.id` selects the target
    async fn update_monitor(&self, monitor: Monitor) -> ApiResult<Monitor>;

    /// Delete a monitor by id
    async fn delete_monitor(&self, id: &str) -> ApiResult<()>;
}
