//! Synthetics monitor API
//!
//! - **api**: the `SyntheticsApi` trait the resource adapter depends on
//! - **client**: reqwest implementation against the Synthetics REST API
//! - **memory**: in-memory implementation for tests
//! - **model**: the monitor document exchanged with the service

pub mod api;
pub mod client;
pub mod memory;
pub mod model;

pub use api::SyntheticsApi;
pub use client::SyntheticsClient;
pub use memory::MemorySynthetics;
pub use model::{Monitor, MonitorOptions, MonitorStatus, MonitorType};
