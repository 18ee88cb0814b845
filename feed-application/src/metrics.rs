use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_batches: AtomicU64,
    ingest_events: AtomicU64,
    encode_errors: AtomicU64,
    index_write_errors: AtomicU64,
    searches: AtomicU64,
    decode_errors: AtomicU64,
    name_lookups: AtomicU64,
}

impl Metrics {
    pub fn record_ingest(&self, event_count: usize) {
        self.ingest_batches.fetch_add(1, Ordering::Relaxed);
        self.ingest_events
            .fetch_add(event_count as u64, Ordering::Relaxed);
    }

    pub fn record_encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_index_write_error(&self) {
        self.index_write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_name_lookup(&self) {
        self.name_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ingest_events(&self) -> u64 {
        self.ingest_events.load(Ordering::Relaxed)
    }

    pub fn encode_errors(&self) -> u64 {
        self.encode_errors.load(Ordering::Relaxed)
    }

    pub fn decode_errors(&self) -> u64 {
        self.decode_errors.load(Ordering::Relaxed)
    }

    pub fn name_lookups(&self) -> u64 {
        self.name_lookups.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let batches = self.ingest_batches.load(Ordering::Relaxed);
        let events = self.ingest_events.load(Ordering::Relaxed);
        let encode_errors = self.encode_errors.load(Ordering::Relaxed);
        let write_errors = self.index_write_errors.load(Ordering::Relaxed);
        let searches = self.searches.load(Ordering::Relaxed);
        let decode_errors = self.decode_errors.load(Ordering::Relaxed);
        let lookups = self.name_lookups.load(Ordering::Relaxed);

        format!(
            "# TYPE feed_indexer_ingest_batches_total counter\n\
feed_indexer_ingest_batches_total {}\n\
# TYPE feed_indexer_ingest_events_total counter\n\
feed_indexer_ingest_events_total {}\n\
# TYPE feed_indexer_encode_errors_total counter\n\
feed_indexer_encode_errors_total {}\n\
# TYPE feed_indexer_index_write_errors_total counter\n\
feed_indexer_index_write_errors_total {}\n\
# TYPE feed_indexer_searches_total counter\n\
feed_indexer_searches_total {}\n\
# TYPE feed_indexer_decode_errors_total counter\n\
feed_indexer_decode_errors_total {}\n\
# TYPE feed_indexer_name_lookups_total counter\n\
feed_indexer_name_lookups_total {}\n",
            batches, events, encode_errors, write_errors, searches, decode_errors, lookups
        )
    }
}
