use serde_json::Value;

use crate::entities::*;
use crate::error::CodecError;
use crate::ports::NameLookup;
use crate::services::{metadata_codec, tag_codec};

/// Turns an event into the flat record stored by the index.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventEncoder;

impl EventEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Player and team display names are resolved through `names`; whatever
    /// names the event already carries are ignored.
    pub async fn encode(
        &self,
        event: &Event,
        names: &dyn NameLookup,
    ) -> Result<FlatRecord, CodecError> {
        let mut player_names = Vec::with_capacity(event.player_tags.len());
        for player_id in &event.player_tags {
            let name = names
                .player_name(player_id)
                .await
                .map_err(|source| CodecError::NameLookup {
                    id: player_id.clone(),
                    source,
                })?;
            player_names.push(name);
        }

        let mut team_names = Vec::with_capacity(event.team_tags.len());
        for team_id in &event.team_tags {
            let name = names
                .team_name(team_id)
                .await
                .map_err(|source| CodecError::NameLookup {
                    id: team_id.clone(),
                    source,
                })?;
            team_names.push(name);
        }

        let mut record = FlatRecord::new();
        record.insert(FIELD_ID, tag_codec::encode(&event.id));
        record.insert(FIELD_ETYPE, event.event_type.to_string());
        record.insert(FIELD_CATEGORY, event.category.to_string());
        record.insert(FIELD_PLAYER_TAGS, tag_codec::encode_list(&event.player_tags));
        record.insert(FIELD_PLAYER_NAMES, tag_codec::encode_list(&player_names));
        record.insert(FIELD_TEAM_TAGS, tag_codec::encode_list(&event.team_tags));
        record.insert(FIELD_TEAM_NAMES, tag_codec::encode_list(&team_names));
        record.insert(FIELD_GAME_TAGS, tag_codec::encode_list(&event.game_tags));
        record.insert(FIELD_METADATA, metadata_codec::flatten(&event.metadata));
        record.insert(FIELD_ETIMESTAMP, event.created.timestamp().to_string());

        let scalars = [
            (FIELD_SEASON, event.season),
            (FIELD_TOURNAMENT, event.tournament),
            (FIELD_DAY, event.day),
            (FIELD_PHASE, event.phase),
        ];
        for (field, value) in scalars {
            if let Some(value) = value {
                record.insert(field, value.to_string());
            }
        }
        if let Some(description) = &event.description {
            record.insert(FIELD_DESCRIPTION, description.clone());
        }

        for (field, value) in &event.extra {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                return Err(CodecError::UnsupportedField {
                    field: field.clone(),
                    reason: "name collides with a record field".to_string(),
                });
            }
            record.insert(field.clone(), pass_through_text(value));
        }

        Ok(record)
    }
}

/// Strings are stored verbatim, anything else as its JSON text.
fn pass_through_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
