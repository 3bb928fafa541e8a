//! Domain types of the Synthetics REST API
//!
//! These mirror the JSON documents exchanged with `/v3/monitors`. Optional
//! options are skipped during serialization when unset, so the service keeps
//! its own defaults for anything the caller did not specify.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of synthetic check a monitor performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorType {
    /// Ping check against a single URI
    Simple,
    /// Single page load in a real browser
    Browser,
    /// Scripted API check
    ScriptApi,
    /// Scripted browser check
    ScriptBrowser,
    /// TLS certificate expiry check
    CertCheck,
}

impl MonitorType {
    pub const ALL: [MonitorType; 5] = [
        MonitorType::Simple,
        MonitorType::Browser,
        MonitorType::ScriptApi,
        MonitorType::ScriptBrowser,
        MonitorType::CertCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorType::Simple => "SIMPLE",
            MonitorType::Browser => "BROWSER",
            MonitorType::ScriptApi => "SCRIPT_API",
            MonitorType::ScriptBrowser => "SCRIPT_BROWSER",
            MonitorType::CertCheck => "CERT_CHECK",
        }
    }

    /// Monitor types that hit a URI directly and honour the HTTP options
    pub fn targets_uri(&self) -> bool {
        matches!(self, MonitorType::Simple | MonitorType::Browser)
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonitorType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown monitor type `{s}`"))
    }
}

/// Whether a monitor is running and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorStatus {
    Enabled,
    Muted,
    Disabled,
}

impl MonitorStatus {
    pub const ALL: [MonitorStatus; 3] = [
        MonitorStatus::Enabled,
        MonitorStatus::Muted,
        MonitorStatus::Disabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStatus::Enabled => "ENABLED",
            MonitorStatus::Muted => "MUTED",
            MonitorStatus::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonitorStatus::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown monitor status `{s}`"))
    }
}

/// HTTP options of SIMPLE and BROWSER monitors
///
/// Every field is tri-state: `None` means "not specified" and is left out of
/// the request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_string: Option<String>,

    #[serde(
        default,
        rename = "verifySSL",
        skip_serializing_if = "Option::is_none"
    )]
    pub verify_ssl: Option<bool>,

    #[serde(
        default,
        rename = "bypassHEADRequest",
        skip_serializing_if = "Option::is_none"
    )]
    pub bypass_head_request: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_redirect_as_failure: Option<bool>,
}

impl MonitorOptions {
    pub fn is_empty(&self) -> bool {
        self == &MonitorOptions::default()
    }
}

/// A monitor as the Synthetics service represents it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// Identity assigned by the service; absent on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(rename = "type")]
    pub monitor_type: MonitorType,

    /// Check interval in minutes
    pub frequency: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    pub locations: Vec<String>,

    pub status: MonitorStatus,

    pub sla_threshold: f64,

    #[serde(default, skip_serializing_if = "MonitorOptions::is_empty")]
    pub options: MonitorOptions,

    // Server-computed, never sent back.
    #[serde(default, skip_serializing)]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing)]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub modified_at: Option<String>,
}
