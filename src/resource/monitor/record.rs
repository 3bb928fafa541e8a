use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::monitor_schema;
use crate::diagnostics::Diagnostic;
use crate::synthetics::{MonitorStatus, MonitorType};

/// Check intervals (minutes) the service accepts
pub const VALID_FREQUENCIES: [u32; 9] = [1, 5, 10, 15, 30, 60, 360, 720, 1440];

/// SLA threshold applied when the configuration leaves it out
pub const DEFAULT_SLA_THRESHOLD: f64 = 7.0;

fn default_sla_threshold() -> f64 {
    DEFAULT_SLA_THRESHOLD
}

/// Orchestrator-facing state of a Synthetics monitor
///
/// The optional HTTP options are tri-state: `None` means the configuration
/// does not mention them and the service default applies, `Some(false)` is
/// an explicit opt-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRecord {
    /// Assigned by the service on create; `None` until then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub monitor_type: MonitorType,

    pub name: String,

    /// Minutes between checks, one of [`VALID_FREQUENCIES`]
    pub frequency: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    pub locations: BTreeSet<String>,

    pub status: MonitorStatus,

    #[serde(default = "default_sla_threshold")]
    pub sla_threshold: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_head_request: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_redirect_as_failure: Option<bool>,
}

impl MonitorRecord {
    /// A record with every optional attribute unset
    pub fn new<L>(
        monitor_type: MonitorType,
        name: impl Into<String>,
        frequency: u32,
        locations: L,
        status: MonitorStatus,
    ) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            id: None,
            monitor_type,
            name: name.into(),
            frequency,
            uri: None,
            locations: locations.into_iter().map(Into::into).collect(),
            status,
            sla_threshold: DEFAULT_SLA_THRESHOLD,
            validation_string: None,
            verify_ssl: None,
            bypass_head_request: None,
            treat_redirect_as_failure: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Decode a configuration document, validating it against the schema first
    pub fn from_config(config: Value) -> Result<Self, Vec<Diagnostic>> {
        let diagnostics = monitor_schema().validate_config(&config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Err(diagnostics);
        }

        serde_json::from_value(config).map_err(|e| vec![Diagnostic::error(e)])
    }

    fn has_http_options(&self) -> bool {
        self.validation_string.is_some()
            || self.verify_ssl.is_some()
            || self.bypass_head_request.is_some()
            || self.treat_redirect_as_failure.is_some()
    }

    /// Check the record before any remote call
    ///
    /// Errors block the operation. Warnings flag combinations the service
    /// tolerates but that are probably not what the user meant.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.name.trim().is_empty() {
            diagnostics.push(Diagnostic::error("must not be empty").with_attribute("name"));
        }

        if !VALID_FREQUENCIES.contains(&self.frequency) {
            diagnostics.push(
                Diagnostic::error(format!(
                    "expected one of {VALID_FREQUENCIES:?}, got {}",
                    self.frequency
                ))
                .with_attribute("frequency"),
            );
        }

        if self.locations.is_empty() {
            diagnostics.push(
                Diagnostic::error("at least one location is required").with_attribute("locations"),
            );
        }

        if self.locations.iter().any(|l| l.trim().is_empty()) {
            diagnostics
                .push(Diagnostic::error("locations must not be blank").with_attribute("locations"));
        }

        if !self.sla_threshold.is_finite() {
            diagnostics
                .push(Diagnostic::error("must be a finite number").with_attribute("sla_threshold"));
        }

        if self.monitor_type.targets_uri() && self.uri.is_none() {
            diagnostics.push(
                Diagnostic::warning(format!(
                    "{} monitors need a uri to check",
                    self.monitor_type
                ))
                .with_attribute("uri"),
            );
        }

        if !self.monitor_type.targets_uri() && self.has_http_options() {
            diagnostics.push(Diagnostic::warning(format!(
                "validation_string, verify_ssl, bypass_head_request and treat_redirect_as_failure \
                 only apply to SIMPLE and BROWSER monitors, not {}",
                self.monitor_type
            )));
        }

        diagnostics
    }
}
