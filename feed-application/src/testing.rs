// In-memory collaborators for command and query tests

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use feed_domain::{EventIndex, FlatRecord, NameLookup, Page, RuntimeConfig, SearchHits};

use crate::AppState;

pub(crate) struct CountingNames {
    players: HashMap<String, String>,
    teams: HashMap<String, String>,
    calls: AtomicUsize,
}

impl CountingNames {
    pub fn new(players: &[(&str, &str)], teams: &[(&str, &str)]) -> Self {
        let collect = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect()
        };
        Self {
            players: collect(players),
            teams: collect(teams),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameLookup for CountingNames {
    async fn player_name(&self, player_id: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.players
            .get(player_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown player {player_id}"))
    }

    async fn team_name(&self, team_id: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.teams
            .get(team_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown team {team_id}"))
    }
}

/// Stores records by id and answers every search with all of them, ordered
/// by id, remembering the last query it was given.
#[derive(Default)]
pub(crate) struct MemoryIndex {
    pub records: Mutex<BTreeMap<String, FlatRecord>>,
    pub queries: Mutex<Vec<String>>,
    pub fail_writes: bool,
    /// Reported as unreadable hits on every search.
    pub unreadable_hits: u64,
}

#[async_trait]
impl EventIndex for MemoryIndex {
    async fn ensure_index(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_records(&self, records: &[(String, FlatRecord)]) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("index unavailable");
        }
        let mut stored = self.records.lock();
        for (id, record) in records {
            stored.insert(id.clone(), record.clone());
        }
        Ok(())
    }

    async fn search(&self, query: &str, page: Page) -> anyhow::Result<SearchHits> {
        self.queries.lock().push(query.to_string());
        let stored = self.records.lock();
        let hits = stored
            .values()
            .skip(page.offset)
            .take(page.limit)
            .map(|record| {
                record
                    .iter()
                    .map(|(field, value)| (field.to_string(), value.to_string()))
                    .collect()
            })
            .collect();
        Ok(SearchHits {
            total: stored.len() as u64 + self.unreadable_hits,
            hits,
            skipped: self.unreadable_hits,
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub(crate) fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        feed_url: "http://feed.invalid/events".to_string(),
        feed_page_limit: 100,
        poll_interval_ms: 1000,
        poller_enabled: false,
        players_url: "http://names.invalid/players".to_string(),
        team_url: "http://names.invalid/team".to_string(),
        name_cache_capacity: 16,
        upstream_timeout_seconds: 5,
        request_timeout_seconds: 5,
    }
}

pub(crate) fn state_with(index: Arc<MemoryIndex>, names: Arc<CountingNames>) -> AppState {
    AppState::new(runtime_config(), index, names)
}
