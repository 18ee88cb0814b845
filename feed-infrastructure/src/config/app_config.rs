use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use feed_domain::{IndexConfig, RuntimeConfig};

use super::validation::{validate_http_url, validate_redis_url};

pub const CONFIG_ENV: &str = "FEED_INDEXER_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub redis_url: String,
    pub redis_pool_size: usize,
    pub index_name: String,
    pub key_prefix: String,
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            api_token: None,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_pool_size: 8,
            index_name: "eventIndex".to_string(),
            key_prefix: "event:".to_string(),
            feed_url: "https://www.blaseball.com/database/feed/global".to_string(),
            feed_page_limit: 100,
            poll_interval_ms: 1000,
            poller_enabled: true,
            players_url: "https://www.blaseball.com/database/players".to_string(),
            team_url: "https://www.blaseball.com/database/team".to_string(),
            name_cache_capacity: 4096,
            upstream_timeout_seconds: 10,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        self.feed_url = self.feed_url.trim().to_string();
        self.players_url = self.players_url.trim().to_string();
        self.team_url = self.team_url.trim().to_string();
        self.index_name = self.index_name.trim().to_string();
        self.key_prefix = self.key_prefix.trim().to_string();
        self.feed_page_limit = self.feed_page_limit.clamp(1, 1000);
        if self.name_cache_capacity == 0 {
            self.name_cache_capacity = 1;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_redis_url(&self.redis_url)?;
        if self.redis_pool_size == 0 {
            return Err(anyhow!("redis_pool_size must be greater than 0"));
        }
        if self.index_name.is_empty() {
            return Err(anyhow!("index_name must not be empty"));
        }
        if self.key_prefix.is_empty() {
            return Err(anyhow!("key_prefix must not be empty"));
        }
        validate_http_url("feed_url", &self.feed_url)?;
        validate_http_url("players_url", &self.players_url)?;
        validate_http_url("team_url", &self.team_url)?;
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            feed_url: self.feed_url.clone(),
            feed_page_limit: self.feed_page_limit,
            poll_interval_ms: self.poll_interval_ms,
            poller_enabled: self.poller_enabled,
            players_url: self.players_url.clone(),
            team_url: self.team_url.clone(),
            name_cache_capacity: self.name_cache_capacity,
            upstream_timeout_seconds: self.upstream_timeout_seconds,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_index_config(&self) -> IndexConfig {
        IndexConfig {
            redis_url: self.redis_url.clone(),
            redis_pool_size: self.redis_pool_size,
            index_name: self.index_name.clone(),
            key_prefix: self.key_prefix.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("FEED_INDEXER_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("FEED_INDEXER_REDIS_URL") {
            self.redis_url = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_REDIS_POOL_SIZE") {
            self.redis_pool_size = value.parse().unwrap_or(self.redis_pool_size);
        }
        if let Ok(value) = env::var("FEED_INDEXER_INDEX_NAME") {
            self.index_name = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_KEY_PREFIX") {
            self.key_prefix = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_FEED_URL") {
            self.feed_url = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_FEED_PAGE_LIMIT") {
            self.feed_page_limit = value.parse().unwrap_or(self.feed_page_limit);
        }
        if let Ok(value) = env::var("FEED_INDEXER_POLL_INTERVAL_MS") {
            self.poll_interval_ms = value.parse().unwrap_or(self.poll_interval_ms);
        }
        if let Ok(value) = env::var("FEED_INDEXER_POLLER_ENABLED") {
            self.poller_enabled = value.parse().unwrap_or(self.poller_enabled);
        }
        if let Ok(value) = env::var("FEED_INDEXER_PLAYERS_URL") {
            self.players_url = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_TEAM_URL") {
            self.team_url = value;
        }
        if let Ok(value) = env::var("FEED_INDEXER_NAME_CACHE_CAPACITY") {
            self.name_cache_capacity = value.parse().unwrap_or(self.name_cache_capacity);
        }
        if let Ok(value) = env::var("FEED_INDEXER_UPSTREAM_TIMEOUT_SECONDS") {
            self.upstream_timeout_seconds = value.parse().unwrap_or(self.upstream_timeout_seconds);
        }
        if let Ok(value) = env::var("FEED_INDEXER_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.to_index_config().index_name, "eventIndex");
        assert_eq!(config.to_runtime_config().feed_page_limit, 100);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            api_token = "  "
            feed_page_limit = 5000
            "#,
        )
        .expect("parse");
        let mut config = config;
        config.normalize();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.api_token, None);
        assert_eq!(config.feed_page_limit, 1000);
        assert_eq!(config.key_prefix, "event:");
        config.validate().expect("valid");
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = AppConfig {
            bind_addr: "not an address".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config = AppConfig {
            feed_url: "feed.example".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config = AppConfig {
            poll_interval_ms: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
