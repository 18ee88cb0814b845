use std::sync::Arc;

use feed_domain::ports::{EventIndex, NameLookup};
use feed_domain::services::{EventDecoder, EventEncoder, QueryCompiler};
use feed_domain::RuntimeConfig;
use tokio::sync::Mutex;

use crate::{FeedCursor, FeedStreamHub, Metrics, NameCache};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_index: Arc<dyn EventIndex>,
    pub names: Arc<NameCache>,
    pub feed_hub: Arc<FeedStreamHub>,
    pub cursor: Arc<Mutex<FeedCursor>>,
    pub metrics: Arc<Metrics>,
    pub encoder: EventEncoder,
    pub decoder: EventDecoder,
    pub compiler: QueryCompiler,
}

impl AppState {
    /// Wraps `name_lookup` in a cache sized by `config.name_cache_capacity`.
    pub fn new(
        config: RuntimeConfig,
        event_index: Arc<dyn EventIndex>,
        name_lookup: Arc<dyn NameLookup>,
    ) -> Self {
        let metrics = Arc::new(Metrics::default());
        let names = Arc::new(NameCache::new(
            name_lookup,
            config.name_cache_capacity,
            metrics.clone(),
        ));
        Self {
            config,
            event_index,
            names,
            feed_hub: Arc::new(FeedStreamHub::default()),
            cursor: Arc::new(Mutex::new(FeedCursor::new())),
            metrics,
            encoder: EventEncoder::new(),
            decoder: EventDecoder::new(),
            compiler: QueryCompiler::new(),
        }
    }
}
