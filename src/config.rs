use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;
use tracing::trace;

use crate::util;

/// Service region; picks the default endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    pub fn synthetics_api_url(&self) -> &'static str {
        match self {
            Region::Us => "https://synthetics.newrelic.com/synthetics/api",
            Region::Eu => "https://synthetics.eu.newrelic.com/synthetics/api",
        }
    }

    pub fn nerdgraph_api_url(&self) -> &'static str {
        match self {
            Region::Us => "https://api.newrelic.com/graphql",
            Region::Eu => "https://api.eu.newrelic.com/graphql",
        }
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "US" => Ok(Region::Us),
            "EU" => Ok(Region::Eu),
            other => Err(format!("unknown region `{other}`")),
        }
    }
}

/// Provider configuration as written in the config file
///
/// Every field may be left out and supplied through the environment instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub account_id: Option<i64>,
    pub region: Option<Region>,
    /// Overrides the region's Synthetics endpoint
    pub synthetics_api_url: Option<String>,
    /// Overrides the region's NerdGraph endpoint
    pub nerdgraph_api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved provider configuration
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub account_id: Option<i64>,
    pub region: Region,
    pub synthetics_api_url: String,
    pub nerdgraph_api_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("region", &self.region)
            .field("synthetics_api_url", &self.synthetics_api_url)
            .field("nerdgraph_api_url", &self.nerdgraph_api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Fill unset fields from the environment
    pub fn with_env(mut self) -> Self {
        self.api_key = util::get_api_key().or(self.api_key);
        self.account_id = util::get_account_id().or(self.account_id);
        self.region = util::get_region().or(self.region);
        self.synthetics_api_url = util::get_synthetics_api_url().or(self.synthetics_api_url);
        self.nerdgraph_api_url = util::get_nerdgraph_api_url().or(self.nerdgraph_api_url);
        self
    }

    pub fn resolve(self) -> anyhow::Result<ProviderConfig> {
        let Some(api_key) = self.api_key.filter(|key| !key.is_empty()) else {
            bail!(
                "no API key configured; set `api_key` in the config file or {}",
                util::API_KEY
            );
        };

        let region = self.region.unwrap_or_default();

        Ok(ProviderConfig {
            api_key,
            account_id: self.account_id,
            region,
            synthetics_api_url: self
                .synthetics_api_url
                .unwrap_or_else(|| region.synthetics_api_url().to_string()),
            nerdgraph_api_url: self
                .nerdgraph_api_url
                .unwrap_or_else(|| region.nerdgraph_api_url().to_string()),
            timeout: Duration::from_secs(
                self.timeout_secs
                    .unwrap_or_else(util::get_default_timeout_secs),
            ),
        })
    }
}

/// Read a JSON or TOML (by extension) config file
pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let file_content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&file_content)
            .with_context(|| format!("invalid configuration file {}", path.display()))?,
        _ => serde_json::from_str(&file_content)
            .with_context(|| format!("invalid configuration file {}", path.display()))?,
    };

    trace!("loaded config from {}", path.display());
    Ok(config)
}

/// Load the provider configuration: optional file, then `.env`, then the environment
pub fn load(path: Option<&Path>) -> anyhow::Result<ProviderConfig> {
    // a missing .env file is fine
    let _ = dotenv::dotenv();

    let config = match path {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    config.with_env().resolve()
}
