// Query filter
// Structured, whitelisted search parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::TagField;

pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const MAX_PAGE_LIMIT: usize = 1000;

const METADATA_PREFIX: &str = "metadata.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RangeFilter {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub field: TagField,
    pub values: Vec<String>,
}

/// `metadata.<key>[.<subkey>]=v1,v2,...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    pub subkey: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Creation instant in epoch seconds: `after` is the lower bound, `before` the upper.
    pub created: RangeFilter,
    pub phase: RangeFilter,
    pub day: RangeFilter,
    pub tags: Vec<TagFilter>,
    pub metadata: Vec<MetadataFilter>,
    pub page: Page,
}

impl QueryFilter {
    /// Builds a filter from raw parameters in caller order.
    /// Unknown names and malformed values are dropped without error.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = QueryFilter::default();
        for (name, value) in params {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                "before" => set_bound(&mut filter.created.max, parse_instant(value)),
                "after" => set_bound(&mut filter.created.min, parse_instant(value)),
                "phase_min" => set_bound(&mut filter.phase.min, parse_int(value)),
                "phase_max" => set_bound(&mut filter.phase.max, parse_int(value)),
                "day_min" => set_bound(&mut filter.day.min, parse_int(value)),
                "day_max" => set_bound(&mut filter.day.max, parse_int(value)),
                "limit" => {
                    if let Some(limit) = parse_usize(value) {
                        filter.page.limit = limit.clamp(1, MAX_PAGE_LIMIT);
                    }
                }
                "offset" => {
                    if let Some(offset) = parse_usize(value) {
                        filter.page.offset = offset;
                    }
                }
                _ => {
                    if let Some(field) = TagField::parse(name) {
                        let values = split_values(value);
                        if !values.is_empty() {
                            filter.tags.push(TagFilter { field, values });
                        }
                    } else if let Some(path) = name.strip_prefix(METADATA_PREFIX) {
                        if let Some(metadata) = parse_metadata_path(path, value) {
                            filter.metadata.push(metadata);
                        }
                    }
                }
            }
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.phase.is_empty()
            && self.day.is_empty()
            && self.tags.is_empty()
            && self.metadata.is_empty()
    }
}

/// A later occurrence only replaces an earlier bound when it parses.
fn set_bound(bound: &mut Option<i64>, parsed: Option<i64>) {
    if parsed.is_some() {
        *bound = parsed;
    }
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

/// Epoch seconds, or an RFC 3339 instant.
fn parse_instant(value: &str) -> Option<i64> {
    let value = value.trim();
    parse_int(value).or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|instant| instant.with_timezone(&Utc).timestamp())
    })
}

fn split_values(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_metadata_path(path: &str, value: &str) -> Option<MetadataFilter> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    let (key, subkey) = match segments.as_slice() {
        [key] => (key.to_string(), None),
        [key, subkey] => (key.to_string(), Some(subkey.to_string())),
        _ => return None,
    };
    let values = split_values(value);
    if values.is_empty() {
        return None;
    }
    Some(MetadataFilter {
        key,
        subkey,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_ranges_tags_and_metadata() {
        let filter = QueryFilter::from_params([
            ("after", "1000"),
            ("phase_max", "4"),
            ("type", "1,2"),
            ("metadata.mod", "scuffed"),
            ("metadata.before.name", "Jessica"),
        ]);
        assert_eq!(filter.created, RangeFilter { min: Some(1000), max: None });
        assert_eq!(filter.phase, RangeFilter { min: None, max: Some(4) });
        assert!(filter.day.is_empty());
        assert_eq!(
            filter.tags,
            vec![TagFilter {
                field: TagField::Type,
                values: vec!["1".to_string(), "2".to_string()],
            }]
        );
        assert_eq!(filter.metadata.len(), 2);
        assert_eq!(filter.metadata[1].subkey.as_deref(), Some("name"));
    }

    #[test]
    fn ignores_unknown_and_malformed_parameters() {
        let filter = QueryFilter::from_params([
            ("nuts", "5"),
            ("day_min", "soon"),
            ("metadata", "x"),
            ("metadata.a.b.c", "x"),
            ("metadata..b", "x"),
            ("season", ",,"),
        ]);
        assert!(filter.is_empty());
    }

    #[test]
    fn before_and_after_accept_rfc3339() {
        let filter = QueryFilter::from_params([("before", "2020-01-01T00:00:00Z")]);
        assert_eq!(filter.created.max, Some(1_577_836_800));
    }

    #[test]
    fn page_is_clamped() {
        let filter = QueryFilter::from_params([("limit", "50000"), ("offset", "20")]);
        assert_eq!(filter.page, Page { offset: 20, limit: MAX_PAGE_LIMIT });
        let filter = QueryFilter::from_params([("limit", "0")]);
        assert_eq!(filter.page.limit, 1);
        assert_eq!(QueryFilter::default().page.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn malformed_repeat_keeps_earlier_bound() {
        let filter = QueryFilter::from_params([
            ("after", "1000"),
            ("after", "yesterday"),
            ("day_max", "12"),
            ("day_max", ""),
            ("phase_min", "x"),
        ]);
        assert_eq!(filter.created.min, Some(1000));
        assert_eq!(filter.day.max, Some(12));
        assert_eq!(filter.phase.min, None);

        let filter = QueryFilter::from_params([("after", "1000"), ("after", "2000")]);
        assert_eq!(filter.created.min, Some(2000));
    }
}
