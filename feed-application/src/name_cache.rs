use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use feed_domain::NameLookup;

use crate::Metrics;

/// Memoizing, bounded front for an external name lookup.
///
/// The lock is only held for the map access, never across the external call,
/// so two concurrent misses on the same id may both reach the backend.
pub struct NameCache {
    inner: Arc<dyn NameLookup>,
    players: Mutex<LruCache<String, String>>,
    teams: Mutex<LruCache<String, String>>,
    metrics: Arc<Metrics>,
}

impl NameCache {
    pub fn new(inner: Arc<dyn NameLookup>, capacity: usize, metrics: Arc<Metrics>) -> Self {
        let size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            players: Mutex::new(LruCache::new(size)),
            teams: Mutex::new(LruCache::new(size)),
            metrics,
        }
    }

    pub fn cached_players(&self) -> usize {
        self.players.lock().len()
    }

    pub fn cached_teams(&self) -> usize {
        self.teams.lock().len()
    }
}

fn cached(cache: &Mutex<LruCache<String, String>>, id: &str) -> Option<String> {
    cache.lock().get(id).cloned()
}

fn remember(cache: &Mutex<LruCache<String, String>>, id: &str, name: &str) {
    cache.lock().put(id.to_string(), name.to_string());
}

#[async_trait]
impl NameLookup for NameCache {
    async fn player_name(&self, player_id: &str) -> anyhow::Result<String> {
        if let Some(name) = cached(&self.players, player_id) {
            return Ok(name);
        }
        debug!(player_id, "player name cache miss");
        self.metrics.record_name_lookup();
        let name = self.inner.player_name(player_id).await?;
        remember(&self.players, player_id, &name);
        Ok(name)
    }

    async fn team_name(&self, team_id: &str) -> anyhow::Result<String> {
        if let Some(name) = cached(&self.teams, team_id) {
            return Ok(name);
        }
        debug!(team_id, "team name cache miss");
        self.metrics.record_name_lookup();
        let name = self.inner.team_name(team_id).await?;
        remember(&self.teams, team_id, &name);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingNames;

    #[tokio::test]
    async fn miss_triggers_one_lookup_then_hits() {
        let backend = Arc::new(CountingNames::new(&[("p1", "Test Player")], &[("t1", "Tigers")]));
        let metrics = Arc::new(Metrics::default());
        let cache = NameCache::new(backend.clone(), 16, metrics.clone());

        assert_eq!(cache.player_name("p1").await.expect("name"), "Test Player");
        assert_eq!(cache.player_name("p1").await.expect("name"), "Test Player");
        assert_eq!(cache.team_name("t1").await.expect("name"), "Tigers");

        assert_eq!(backend.calls(), 2);
        assert_eq!(metrics.name_lookups(), 2);
        assert_eq!(cache.cached_players(), 1);
        assert_eq!(cache.cached_teams(), 1);
    }

    #[tokio::test]
    async fn evicts_least_recently_used() {
        let backend = Arc::new(CountingNames::new(
            &[("p1", "One"), ("p2", "Two"), ("p3", "Three")],
            &[],
        ));
        let cache = NameCache::new(backend.clone(), 2, Arc::new(Metrics::default()));

        for id in ["p1", "p2", "p3", "p1"] {
            cache.player_name(id).await.expect("name");
        }
        assert_eq!(backend.calls(), 4);
        assert_eq!(cache.cached_players(), 2);
    }

    #[tokio::test]
    async fn failed_lookup_is_not_cached() {
        let backend = Arc::new(CountingNames::new(&[], &[]));
        let cache = NameCache::new(backend.clone(), 4, Arc::new(Metrics::default()));
        assert!(cache.player_name("ghost").await.is_err());
        assert!(cache.player_name("ghost").await.is_err());
        assert_eq!(backend.calls(), 2);
        assert_eq!(cache.cached_players(), 0);
    }
}
