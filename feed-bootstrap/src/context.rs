use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use feed_application::AppState;
use feed_domain::{EventIndex, FeedSource};
use feed_infrastructure::{AppConfig, HttpFeedSource, HttpNameLookup, RedisEventIndex};

pub struct AppContext {
    pub state: AppState,
    pub feed_source: Arc<dyn FeedSource>,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let index_config = config.to_index_config();

        let index = Arc::new(RedisEventIndex::new(index_config.clone())?);
        index.ensure_index().await?;
        info!(
            index = %index_config.index_name,
            prefix = %index_config.key_prefix,
            "search index ready"
        );

        let names = Arc::new(HttpNameLookup::new(&runtime_config)?);
        let feed_source = Arc::new(HttpFeedSource::new(&runtime_config)?);
        let state = AppState::new(runtime_config, index, names);

        Ok(Self { state, feed_source })
    }
}
