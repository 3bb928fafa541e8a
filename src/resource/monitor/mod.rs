//! Synthetics monitor resource
//!
//! [`SyntheticsMonitorResource`] is the adapter between [`MonitorRecord`] and
//! whichever [`SyntheticsApi`] it was constructed with. It keeps no state of
//! its own: every call is self-contained, and one instance may serve
//! operations on different monitors concurrently.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::{PlanAction, ResourceError, ResourceResult, cancellable, read_after_create};
use crate::diagnostics::{Diagnostic, has_errors};
use crate::error::ApiError;
use crate::schema::ResourceSchema;
use crate::synthetics::SyntheticsApi;

pub mod mapping;
pub mod record;
pub mod schema;

pub use mapping::{build_monitor, build_update_monitor, flatten_monitor};
pub use record::{DEFAULT_SLA_THRESHOLD, MonitorRecord, VALID_FREQUENCIES};
pub use schema::{MONITOR_RESOURCE_TYPE, monitor_schema};

pub struct SyntheticsMonitorResource<A: ?Sized> {
    api: Arc<A>,
}

impl<A: ?Sized> Clone for SyntheticsMonitorResource<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

/// Reject records with errors, log the warnings
fn check(record: &MonitorRecord) -> ResourceResult<()> {
    let diagnostics = record.validate();
    for warning in diagnostics.iter().filter(|d| !d.is_error()) {
        warn!("monitor {}: {warning}", record.name);
    }
    if has_errors(&diagnostics) {
        return Err(ResourceError::Invalid(diagnostics));
    }
    Ok(())
}

impl<A: SyntheticsApi + ?Sized> SyntheticsMonitorResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn schema() -> ResourceSchema {
        monitor_schema()
    }

    /// Validate a desired record without calling the service
    pub fn validate(record: &MonitorRecord) -> Vec<Diagnostic> {
        record.validate()
    }

    /// Decide how to get from `prior` (current state) to `desired`
    ///
    /// Optional attributes left unset in `desired` are not compared: they
    /// mean "keep whatever the service has", not "clear it".
    pub fn plan(prior: Option<&MonitorRecord>, desired: &MonitorRecord) -> PlanAction {
        let Some(prior) = prior.filter(|p| p.id.is_some()) else {
            return PlanAction::Create;
        };

        if prior.monitor_type != desired.monitor_type {
            return PlanAction::Replace {
                attributes: vec!["type"],
            };
        }

        fn unset_or_equal<T: PartialEq>(desired: &Option<T>, prior: &Option<T>) -> bool {
            desired.is_none() || desired == prior
        }

        let mut attributes = Vec::new();
        if prior.name != desired.name {
            attributes.push("name");
        }
        if prior.frequency != desired.frequency {
            attributes.push("frequency");
        }
        if !unset_or_equal(&desired.uri, &prior.uri) {
            attributes.push("uri");
        }
        if prior.locations != desired.locations {
            attributes.push("locations");
        }
        if prior.status != desired.status {
            attributes.push("status");
        }
        if prior.sla_threshold != desired.sla_threshold {
            attributes.push("sla_threshold");
        }
        if !unset_or_equal(&desired.validation_string, &prior.validation_string) {
            attributes.push("validation_string");
        }
        if !unset_or_equal(&desired.verify_ssl, &prior.verify_ssl) {
            attributes.push("verify_ssl");
        }
        if !unset_or_equal(&desired.bypass_head_request, &prior.bypass_head_request) {
            attributes.push("bypass_head_request");
        }
        if !unset_or_equal(
            &desired.treat_redirect_as_failure,
            &prior.treat_redirect_as_failure,
        ) {
            attributes.push("treat_redirect_as_failure");
        }

        if attributes.is_empty() {
            PlanAction::NoOp
        } else {
            PlanAction::Update { attributes }
        }
    }

    /// Create the monitor and return its state as the service reports it
    #[instrument(skip_all, fields(name = %record.name))]
    pub async fn create(
        &self,
        record: &MonitorRecord,
        cancel: &CancellationToken,
    ) -> ResourceResult<MonitorRecord> {
        check(record)?;

        let monitor = build_monitor(record);
        info!("creating synthetics monitor {}", monitor.name);

        let created = cancellable(cancel, self.api.create_monitor(monitor)).await??;
        let id = created.id.ok_or(ApiError::MissingId)?;

        let read = self.read(&id, cancel).await;
        read_after_create("monitor", id, read)
    }

    /// Fetch the monitor; `Ok(None)` when the service no longer has it
    #[instrument(skip(self, cancel))]
    pub async fn read(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> ResourceResult<Option<MonitorRecord>> {
        info!("reading synthetics monitor {id}");

        match cancellable(cancel, self.api.get_monitor(id)).await? {
            Ok(monitor) => Ok(Some(flatten_monitor(id, monitor))),
            Err(e) if e.is_not_found() => {
                info!("synthetics monitor {id} no longer exists");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the monitor with `record`, keeping its id
    #[instrument(skip_all, fields(id = ?record.id))]
    pub async fn update(
        &self,
        record: &MonitorRecord,
        cancel: &CancellationToken,
    ) -> ResourceResult<MonitorRecord> {
        let id = record.id.as_deref().ok_or(ResourceError::MissingId)?;
        check(record)?;

        info!("updating synthetics monitor {id}");
        let monitor = build_update_monitor(id, record);
        cancellable(cancel, self.api.update_monitor(monitor)).await??;

        self.read(id, cancel)
            .await?
            .ok_or_else(|| ResourceError::Vanished {
                kind: "monitor",
                id: id.to_string(),
            })
    }

    #[instrument(skip(self, cancel))]
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> ResourceResult<()> {
        info!("deleting synthetics monitor {id}");
        cancellable(cancel, self.api.delete_monitor(id)).await??;
        Ok(())
    }

    /// Adopt an existing monitor by id
    pub async fn import(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> ResourceResult<Option<MonitorRecord>> {
        info!("importing synthetics monitor {id}");
        self.read(id, cancel).await
    }
}
