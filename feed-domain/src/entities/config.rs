// Runtime configuration shared across layers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub feed_url: String,
    pub feed_page_limit: u32,
    pub poll_interval_ms: u64,
    pub poller_enabled: bool,
    pub players_url: String,
    pub team_url: String,
    pub name_cache_capacity: usize,
    pub upstream_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub redis_url: String,
    pub redis_pool_size: usize,
    pub index_name: String,
    pub key_prefix: String,
}
