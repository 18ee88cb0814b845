use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::Event;

/// Resolves identifiers to display names.
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn player_name(&self, player_id: &str) -> anyhow::Result<String>;
    async fn team_name(&self, team_id: &str) -> anyhow::Result<String>;
}

/// Upstream feed, read page by page from a cursor.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// `None` asks for the newest page; otherwise events created at or after `start`.
    async fn fetch(&self, start: Option<DateTime<Utc>>) -> anyhow::Result<Vec<Event>>;
}
