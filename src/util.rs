use crate::config::Region;

pub const API_KEY: &str = "NEW_RELIC_API_KEY";
pub const ACCOUNT_ID: &str = "NEW_RELIC_ACCOUNT_ID";
pub const REGION: &str = "NEW_RELIC_REGION";
pub const SYNTHETICS_API_URL: &str = "NEW_RELIC_SYNTHETICS_API_URL";
pub const NERDGRAPH_API_URL: &str = "NEW_RELIC_NERDGRAPH_API_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn get_default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn get_api_key() -> Option<String> {
    std::env::var(API_KEY).ok().filter(|key| !key.is_empty())
}

pub fn get_account_id() -> Option<i64> {
    std::env::var(ACCOUNT_ID).ok().and_then(|id| id.parse().ok())
}

pub fn get_region() -> Option<Region> {
    std::env::var(REGION).ok().and_then(|region| region.parse().ok())
}

pub fn get_synthetics_api_url() -> Option<String> {
    std::env::var(SYNTHETICS_API_URL).ok()
}

pub fn get_nerdgraph_api_url() -> Option<String> {
    std::env::var(NERDGRAPH_API_URL).ok()
}
