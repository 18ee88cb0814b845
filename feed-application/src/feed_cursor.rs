use std::collections::HashSet;

use chrono::{DateTime, Utc};
use feed_domain::Event;

/// Tracks how far the upstream feed has been consumed.
///
/// `latest` is the newest creation time seen so far; `last_batch` holds the
/// ids of the previous fetch so overlapping pages are not republished.
#[derive(Debug, Default, Clone)]
pub struct FeedCursor {
    latest: Option<DateTime<Utc>>,
    last_batch: HashSet<String>,
}

impl FeedCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start time for the next fetch; `None` before the first batch.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.latest
    }

    /// Records a fetch and returns the events not seen in the previous one,
    /// in their original order.
    pub fn accept(&mut self, events: Vec<Event>) -> Vec<Event> {
        if events.is_empty() {
            return events;
        }

        let batch: HashSet<String> = events.iter().map(|event| event.id.clone()).collect();
        let newest = events.iter().map(|event| event.created).max();
        self.latest = self.latest.max(newest);

        let previous = std::mem::replace(&mut self.last_batch, batch);
        events
            .into_iter()
            .filter(|event| !previous.contains(&event.id))
            .collect()
    }
}
