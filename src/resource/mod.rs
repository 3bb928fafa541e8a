//! Resource adapters
//!
//! Each adapter translates between a typed resource record (what the
//! orchestrator stores as desired/current state) and the remote API's domain
//! object, and drives the remote API through create/read/update/delete.
//!
//! ## Lifecycle
//!
//! ```text
//! desired record ──build──▶ domain object ──API──▶ domain object
//!                                                       │
//!                                     current record ◀──flatten
//! ```
//!
//! Every operation takes a [`CancellationToken`]. Cancelling it aborts the
//! in-flight remote call and the operation fails with
//! [`ResourceError::Cancelled`].
//!
//! "Not found" on read is not an error: the adapter returns `Ok(None)` so the
//! orchestrator can drop the resource from its state.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::diagnostics::Diagnostic;
use crate::error::ApiError;

pub mod gcp_link_account;
pub mod monitor;

pub use gcp_link_account::{GcpLinkAccountRecord, GcpLinkAccountResource};
pub use monitor::{MonitorRecord, SyntheticsMonitorResource};

/// Errors returned by resource operations
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The record failed validation; no remote call was made
    #[error("invalid configuration: {}", summarize(.0))]
    Invalid(Vec<Diagnostic>),

    /// The remote call failed; the text is the remote error's own
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// The caller cancelled the operation before the remote call finished
    #[error("operation cancelled")]
    Cancelled,

    /// The follow-up read after a write found nothing
    #[error("{kind} {id} was not found right after it was written")]
    Vanished { kind: &'static str, id: String },

    /// Update or delete was requested for a record that was never created
    #[error("resource has no id; create or import it first")]
    MissingId,

    /// The create call succeeded but reading the new resource back failed
    ///
    /// The resource exists remotely under `id`; callers must keep tracking it.
    #[error("{kind} {id} was created but could not be read back")]
    Tainted {
        kind: &'static str,
        id: String,
        #[source]
        source: Box<ResourceError>,
    },
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResourceError {
    /// Diagnostics to hand back to the orchestrator
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            ResourceError::Invalid(diagnostics) => diagnostics.clone(),
            ResourceError::Tainted { source, .. } => {
                vec![Diagnostic::from_err(self).with_detail(source)]
            }
            other => vec![Diagnostic::from_err(other)],
        }
    }

    /// Id of a resource that was created even though the operation failed
    pub fn created_id(&self) -> Option<&str> {
        match self {
            ResourceError::Tainted { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Turn the outcome of the read that follows a create into the create's result
///
/// Once the service has assigned `id`, a failing read must not lose it.
pub(crate) fn read_after_create<T>(
    kind: &'static str,
    id: String,
    read: ResourceResult<Option<T>>,
) -> ResourceResult<T> {
    match read {
        Ok(Some(current)) => Ok(current),
        Ok(None) => Err(ResourceError::Vanished { kind, id }),
        Err(source) => Err(ResourceError::Tainted {
            kind,
            id,
            source: Box::new(source),
        }),
    }
}

pub type ResourceResult<T> = Result<T, ResourceError>;

/// What applying a desired record on top of the prior state requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Nothing in state yet
    Create,
    /// Desired state already matches
    NoOp,
    /// In-place update of the listed attributes
    Update { attributes: Vec<&'static str> },
    /// A force-new attribute changed; delete then create
    Replace { attributes: Vec<&'static str> },
}

/// Run `call` unless `token` fires first
///
/// `biased` makes an already-cancelled token win without polling `call`, so
/// no request is sent at all in that case.
pub(crate) async fn cancellable<F: Future>(
    token: &CancellationToken,
    call: F,
) -> ResourceResult<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ResourceError::Cancelled),
        output = call => Ok(output),
    }
}
