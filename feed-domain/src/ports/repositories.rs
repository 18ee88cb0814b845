use async_trait::async_trait;

use crate::entities::{FlatRecord, Page};

/// Raw result of one index search: total match count plus one field/value
/// sequence per hit, in the order the index returned them. Hits the adapter
/// could not read at all are left out and counted in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<Vec<(String, String)>>,
    pub skipped: u64,
}

#[async_trait]
pub trait EventIndex: Send + Sync {
    async fn ensure_index(&self) -> anyhow::Result<()>;
    /// Stores records keyed by their raw (un-encoded) event id.
    async fn insert_records(&self, records: &[(String, FlatRecord)]) -> anyhow::Result<()>;
    async fn search(&self, query: &str, page: Page) -> anyhow::Result<SearchHits>;
    async fn ping(&self) -> anyhow::Result<()>;
}
