// Query compiler
//
// Output grammar is the tag index's: `@field:[min max]` for numeric ranges and
// `@field:{tok|tok}` for tag sets. Clauses are space-joined (implicit AND) in a
// fixed order: time range, phase range, day range, tag filters in caller
// order, then metadata filters.

use crate::entities::{
    MetadataFilter, QueryFilter, RangeFilter, TagFilter, FIELD_DAY, FIELD_ETIMESTAMP,
    FIELD_METADATA, FIELD_PHASE,
};
use crate::services::{metadata_codec, tag_codec};

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryCompiler;

impl QueryCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compiles a filter into one query string; an empty filter yields "".
    pub fn compile(&self, filter: &QueryFilter) -> String {
        let mut clauses = Vec::new();

        for (field, range) in [
            (FIELD_ETIMESTAMP, &filter.created),
            (FIELD_PHASE, &filter.phase),
            (FIELD_DAY, &filter.day),
        ] {
            if let Some(clause) = range_clause(field, range) {
                clauses.push(clause);
            }
        }

        clauses.extend(filter.tags.iter().map(tag_clause));

        for metadata in &filter.metadata {
            clauses.extend(metadata_clauses(metadata));
        }

        clauses.join(" ")
    }

    pub fn compile_params<I, K, V>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.compile(&QueryFilter::from_params(params))
    }
}

fn range_clause(field: &str, range: &RangeFilter) -> Option<String> {
    if range.is_empty() {
        return None;
    }
    let min = range
        .min
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-inf".to_string());
    let max = range
        .max
        .map(|value| value.to_string())
        .unwrap_or_else(|| "inf".to_string());
    Some(format!("@{field}:[{min} {max}]"))
}

fn tag_clause(filter: &TagFilter) -> String {
    format!(
        "@{}:{{{}}}",
        filter.field.index_field(),
        tag_codec::encode_list(&filter.values)
    )
}

fn metadata_clauses(filter: &MetadataFilter) -> impl Iterator<Item = String> + '_ {
    filter.values.iter().map(move |value| {
        let tag = metadata_codec::metadata_tag(&filter.key, filter.subkey.as_deref(), value);
        format!("@{FIELD_METADATA}:{{{}}}", tag_codec::encode(&tag))
    })
}
