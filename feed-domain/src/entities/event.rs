// Event entity
// One item of the upstream global feed

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entities::Metadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: i64,
    pub category: i64,
    pub created: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub game_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Upstream fields without a dedicated slot, kept unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Event {
    /// Minimal event with every optional field empty.
    pub fn new(id: impl Into<String>, event_type: i64, category: i64, created: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            event_type,
            category,
            created,
            player_tags: Vec::new(),
            player_names: Vec::new(),
            team_tags: Vec::new(),
            team_names: Vec::new(),
            game_tags: Vec::new(),
            metadata: Metadata::new(),
            season: None,
            tournament: None,
            day: None,
            phase: None,
            description: None,
            extra: BTreeMap::new(),
        }
    }
}

/// A batch of events as published to live subscribers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedBatch {
    pub data: Vec<Event>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MetadataValue, Scalar};
    use serde_json::json;

    #[test]
    fn deserializes_upstream_feed_item() {
        let raw = json!({
            "id": "4d1b7fa8-0d44-4b7e-8c4e-53d2c3a0f0a1",
            "type": 2,
            "category": 1,
            "created": "2021-03-01T18:20:33.264Z",
            "playerTags": ["p1", "p2"],
            "teamTags": null,
            "gameTags": [],
            "metadata": {"play": 12, "mods": ["SCATTERED"]},
            "season": 11,
            "day": 40,
            "phase": 2,
            "description": "Play ball!",
            "nuts": 3
        });
        let event: Event = serde_json::from_value(raw).expect("event");
        assert_eq!(event.event_type, 2);
        assert_eq!(event.player_tags, vec!["p1", "p2"]);
        assert!(event.team_tags.is_empty());
        assert_eq!(event.season, Some(11));
        assert_eq!(event.extra.get("nuts"), Some(&json!(3)));
        assert_eq!(
            event.metadata.get("play"),
            Some(&MetadataValue::Scalar(Scalar::Int(12)))
        );
    }

    #[test]
    fn null_metadata_reads_as_empty() {
        let raw = json!({
            "id": "x",
            "type": 0,
            "category": 0,
            "created": "2020-01-01T00:00:00Z",
            "metadata": null
        });
        let event: Event = serde_json::from_value(raw).expect("event");
        assert!(event.metadata.is_empty());
        assert!(event.player_names.is_empty());
    }

    #[test]
    fn serializes_with_upstream_field_names() {
        let created = "2020-01-01T00:00:00Z".parse().expect("instant");
        let mut event = Event::new("abc", 1, 0, created);
        event.player_names.push("Test Player".to_string());
        let value = serde_json::to_value(&event).expect("json");
        assert_eq!(value["type"], json!(1));
        assert_eq!(value["playerNames"], json!(["Test Player"]));
        assert_eq!(value["created"], json!("2020-01-01T00:00:00Z"));
        assert!(value.get("season").is_none());
    }
}
