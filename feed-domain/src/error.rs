use thiserror::Error;

/// Failures of the record codec. Each one is local to a single event, tag or clause.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed token {token:?}: {reason}")]
    Decode { token: String, reason: String },
    #[error("malformed metadata tag {tag:?}: {reason}")]
    MalformedMetadata { tag: String, reason: String },
    #[error("unsupported field {field}: {reason}")]
    UnsupportedField { field: String, reason: String },
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber { field: String, value: String },
    #[error("name lookup failed for {id}: {source}")]
    NameLookup {
        id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CodecError {
    pub fn decode(token: &str, reason: impl ToString) -> Self {
        CodecError::Decode {
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_metadata(tag: &str, reason: impl ToString) -> Self {
        CodecError::MalformedMetadata {
            tag: tag.to_string(),
            reason: reason.to_string(),
        }
    }
}
