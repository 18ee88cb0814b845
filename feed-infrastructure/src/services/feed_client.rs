use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use feed_domain::{Event, FeedSource, RuntimeConfig};

/// Pages the upstream global feed: newest first on the first call, then
/// ascending from the cursor.
pub struct HttpFeedSource {
    client: Client,
    url: String,
    page_limit: u32,
}

impl HttpFeedSource {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            client,
            url: config.feed_url.clone(),
            page_limit: config.feed_page_limit,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, start: Option<DateTime<Utc>>) -> Result<Vec<Event>> {
        let items: Vec<Value> = self
            .client
            .get(&self.url)
            .query(&feed_params(self.page_limit, start))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("feed response is not a JSON array")?;
        Ok(parse_feed_items(items))
    }
}

fn feed_params(limit: u32, start: Option<DateTime<Utc>>) -> Vec<(&'static str, String)> {
    match start {
        Some(start) => vec![
            ("limit", limit.to_string()),
            ("sort", "1".to_string()),
            ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ],
        None => vec![("limit", limit.to_string()), ("sort", "0".to_string())],
    }
}

/// Items that do not look like events are dropped with a warning.
fn parse_feed_items(items: Vec<Value>) -> Vec<Event> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Event>(item) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!("skipping malformed feed item: {}", err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_poll_sorts_newest_first() {
        assert_eq!(
            feed_params(100, None),
            vec![("limit", "100".to_string()), ("sort", "0".to_string())]
        );
    }

    #[test]
    fn later_polls_resume_from_cursor() {
        let start = "2021-03-01T18:20:33Z".parse().expect("instant");
        assert_eq!(
            feed_params(50, Some(start)),
            vec![
                ("limit", "50".to_string()),
                ("sort", "1".to_string()),
                ("start", "2021-03-01T18:20:33.000Z".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_items_are_skipped() {
        let events = parse_feed_items(vec![
            json!({"id": "e1", "type": 1, "category": 0, "created": "2021-03-01T18:20:33.123Z"}),
            json!({"id": "e2", "type": "not a number"}),
            json!("garbage"),
        ]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "e1");
    }
}
