// Flat record
// The index's native field -> string representation of an event

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const FIELD_ID: &str = "id";
pub const FIELD_ETYPE: &str = "etype";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_PLAYER_TAGS: &str = "playerTags";
pub const FIELD_PLAYER_NAMES: &str = "playerNames";
pub const FIELD_TEAM_TAGS: &str = "teamTags";
pub const FIELD_TEAM_NAMES: &str = "teamNames";
pub const FIELD_GAME_TAGS: &str = "gameTags";
pub const FIELD_METADATA: &str = "metadata";
pub const FIELD_ETIMESTAMP: &str = "etimestamp";
pub const FIELD_SEASON: &str = "season";
pub const FIELD_TOURNAMENT: &str = "tournament";
pub const FIELD_DAY: &str = "day";
pub const FIELD_PHASE: &str = "phase";
pub const FIELD_DESCRIPTION: &str = "description";

/// Fields whose value is a `|`-joined list of tokens.
pub const TOKEN_LIST_FIELDS: [&str; 5] = [
    FIELD_PLAYER_TAGS,
    FIELD_PLAYER_NAMES,
    FIELD_TEAM_TAGS,
    FIELD_TEAM_NAMES,
    FIELD_GAME_TAGS,
];

/// Field names the codec owns; pass-through fields may not reuse them.
pub const RESERVED_FIELDS: [&str; 15] = [
    FIELD_ID,
    FIELD_ETYPE,
    FIELD_CATEGORY,
    FIELD_PLAYER_TAGS,
    FIELD_PLAYER_NAMES,
    FIELD_TEAM_TAGS,
    FIELD_TEAM_NAMES,
    FIELD_GAME_TAGS,
    FIELD_METADATA,
    FIELD_ETIMESTAMP,
    FIELD_SEASON,
    FIELD_TOURNAMENT,
    FIELD_DAY,
    FIELD_PHASE,
    FIELD_DESCRIPTION,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    fields: BTreeMap<String, String>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FlatRecord {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
