use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::entities::*;
use crate::error::CodecError;
use crate::services::{metadata_codec, tag_codec};
use crate::utils::epoch_seconds_to_utc;

/// Rebuilds events from raw index hits. Field order is irrelevant; when a
/// field repeats, the last value wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventDecoder;

impl EventDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode_record(&self, record: &FlatRecord) -> Result<Event, CodecError> {
        self.decode(record.iter())
    }

    pub fn decode<I, K, V>(&self, pairs: I) -> Result<Event, CodecError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: HashMap<String, String> = pairs
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .collect();

        let id = tag_codec::decode(&take_required(&mut fields, FIELD_ID)?)?;
        let event_type = parse_required(&mut fields, FIELD_ETYPE)?;
        let category = parse_required(&mut fields, FIELD_CATEGORY)?;
        let seconds = parse_required(&mut fields, FIELD_ETIMESTAMP)?;
        let created = epoch_seconds_to_utc(seconds).ok_or_else(|| CodecError::InvalidNumber {
            field: FIELD_ETIMESTAMP.to_string(),
            value: seconds.to_string(),
        })?;

        let mut event = Event::new(id, event_type, category, created);
        event.player_tags = take_list(&mut fields, FIELD_PLAYER_TAGS)?;
        event.player_names = take_list(&mut fields, FIELD_PLAYER_NAMES)?;
        event.team_tags = take_list(&mut fields, FIELD_TEAM_TAGS)?;
        event.team_names = take_list(&mut fields, FIELD_TEAM_NAMES)?;
        event.game_tags = take_list(&mut fields, FIELD_GAME_TAGS)?;
        if let Some(metadata) = fields.remove(FIELD_METADATA) {
            event.metadata = metadata_codec::unflatten(&metadata)?;
        }

        let mut extra = BTreeMap::new();
        event.season = take_optional_int(&mut fields, FIELD_SEASON, &mut extra);
        event.tournament = take_optional_int(&mut fields, FIELD_TOURNAMENT, &mut extra);
        event.day = take_optional_int(&mut fields, FIELD_DAY, &mut extra);
        event.phase = take_optional_int(&mut fields, FIELD_PHASE, &mut extra);
        event.description = fields.remove(FIELD_DESCRIPTION);

        extra.extend(
            fields
                .into_iter()
                .map(|(field, value)| (field, Value::String(value))),
        );
        event.extra = extra;

        Ok(event)
    }
}

fn take_required(
    fields: &mut HashMap<String, String>,
    field: &'static str,
) -> Result<String, CodecError> {
    fields.remove(field).ok_or(CodecError::MissingField(field))
}

fn parse_required(
    fields: &mut HashMap<String, String>,
    field: &'static str,
) -> Result<i64, CodecError> {
    let raw = take_required(fields, field)?;
    raw.trim().parse().map_err(|_| CodecError::InvalidNumber {
        field: field.to_string(),
        value: raw,
    })
}

fn take_list(
    fields: &mut HashMap<String, String>,
    field: &str,
) -> Result<Vec<String>, CodecError> {
    match fields.remove(field) {
        Some(raw) => tag_codec::decode_list(&raw),
        None => Ok(Vec::new()),
    }
}

/// A value that is not an integer is kept verbatim among the pass-through fields.
fn take_optional_int(
    fields: &mut HashMap<String, String>,
    field: &str,
    extra: &mut BTreeMap<String, Value>,
) -> Option<i64> {
    let raw = fields.remove(field)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            extra.insert(field.to_string(), Value::String(raw));
            None
        }
    }
}
