//! Resource adapters for Synthetics monitors and GCP cloud link accounts.
//!
//! The crate maps strongly-typed resource records onto the remote API's
//! documents and back, and drives the remote API through the
//! create/read/update/delete lifecycle an infrastructure orchestrator
//! imposes.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use synthetics_provider::resource::{MonitorRecord, SyntheticsMonitorResource};
//! use synthetics_provider::synthetics::{MonitorStatus, MonitorType, SyntheticsClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = SyntheticsClient::new(
//!     "https://synthetics.newrelic.com/synthetics/api",
//!     "NRAK-...",
//!     std::time::Duration::from_secs(30),
//! )?;
//! let monitors = SyntheticsMonitorResource::new(Arc::new(client));
//!
//! let desired = MonitorRecord::new(
//!     MonitorType::Simple,
//!     "homepage",
//!     5,
//!     ["AWS_US_EAST_1"],
//!     MonitorStatus::Enabled,
//! )
//! .with_uri("https://example.com");
//!
//! let current = monitors.create(&desired, &CancellationToken::new()).await?;
//! println!("created {:?}", current.id);
//! # Ok(())
//! # }
//! ```

pub mod cloud;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod state;
pub mod synthetics;
pub mod util;

mod http;
