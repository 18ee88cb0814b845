// Tag field value object
// Caller-facing names accepted for exact-match tag filters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagField {
    Ids,
    Season,
    Tournament,
    Category,
    Type,
    GameTags,
    TeamNames,
    TeamTags,
    PlayerTags,
    PlayerNames,
}

impl TagField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ids" => Some(TagField::Ids),
            "season" => Some(TagField::Season),
            "tournament" => Some(TagField::Tournament),
            "category" => Some(TagField::Category),
            "type" => Some(TagField::Type),
            "gameTags" => Some(TagField::GameTags),
            "teamNames" => Some(TagField::TeamNames),
            "teamTags" => Some(TagField::TeamTags),
            "playerTags" => Some(TagField::PlayerTags),
            "playerNames" => Some(TagField::PlayerNames),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagField::Ids => "ids",
            TagField::Season => "season",
            TagField::Tournament => "tournament",
            TagField::Category => "category",
            TagField::Type => "type",
            TagField::GameTags => "gameTags",
            TagField::TeamNames => "teamNames",
            TagField::TeamTags => "teamTags",
            TagField::PlayerTags => "playerTags",
            TagField::PlayerNames => "playerNames",
        }
    }

    /// Name of the field inside the index; `type` is reserved there.
    pub fn index_field(&self) -> &'static str {
        match self {
            TagField::Type => "etype",
            other => other.as_str(),
        }
    }
}
