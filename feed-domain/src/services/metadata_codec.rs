// Metadata flattening
//
// Each metadata leaf becomes one tag, `key?value` for scalars and list items and
// `key?subkey?value` for map entries. Tags are token-encoded and `|`-joined.
//
// Reading tags back is lossy in two documented ways: every leaf goes through
// integer coercion, and a list holding exactly one item comes back as a bare
// scalar. Empty lists and maps produce no tags and disappear. A list item that
// itself contains `?` looks like a map entry; the key still reads back as a
// list as long as one of its items does not.

use std::collections::BTreeMap;

use crate::entities::{Metadata, MetadataValue, Scalar};
use crate::error::CodecError;
use crate::services::tag_codec::{self, LIST_SEPARATOR};

pub const PATH_SEPARATOR: char = '?';

pub fn metadata_tag(key: &str, subkey: Option<&str>, value: &str) -> String {
    match subkey {
        Some(subkey) => format!("{key}{PATH_SEPARATOR}{subkey}{PATH_SEPARATOR}{value}"),
        None => format!("{key}{PATH_SEPARATOR}{value}"),
    }
}

pub fn flatten(metadata: &Metadata) -> String {
    let mut tags = Vec::new();
    for (key, value) in metadata {
        match value {
            MetadataValue::Scalar(scalar) => {
                tags.push(metadata_tag(key, None, &scalar.to_string()));
            }
            MetadataValue::List(items) => {
                for item in items {
                    tags.push(metadata_tag(key, None, &item.to_string()));
                }
            }
            MetadataValue::Map(entries) => {
                for (subkey, item) in entries {
                    tags.push(metadata_tag(key, Some(subkey), &item.to_string()));
                }
            }
        }
    }
    tag_codec::encode_list(&tags)
}

/// Tags seen for one key, in field order. A key whose tags are all three-part
/// reads back as a map; any two-part tag makes it a list, and three-part tags
/// in that list keep their `subkey?value` text as the item.
#[derive(Default)]
struct Group {
    tags: Vec<(Option<String>, String)>,
}

impl Group {
    fn is_map(&self) -> bool {
        self.tags.iter().all(|(subkey, _)| subkey.is_some())
    }
}

pub fn unflatten(field: &str) -> Result<Metadata, CodecError> {
    let mut groups: BTreeMap<String, Group> = BTreeMap::new();
    if field.is_empty() {
        return Ok(Metadata::new());
    }

    for token in field.split(LIST_SEPARATOR) {
        let tag = tag_codec::decode(token)?;
        let Some((key, rest)) = tag.split_once(PATH_SEPARATOR) else {
            return Err(CodecError::malformed_metadata(&tag, "missing '?' separator"));
        };
        let entry = match rest.split_once(PATH_SEPARATOR) {
            Some((subkey, value)) => (Some(subkey.to_string()), value.to_string()),
            None => (None, rest.to_string()),
        };
        groups.entry(key.to_string()).or_default().tags.push(entry);
    }

    Ok(groups
        .into_iter()
        .map(|(key, group)| (key, coerce_group(group)))
        .collect())
}

fn coerce_group(group: Group) -> MetadataValue {
    if group.is_map() {
        return MetadataValue::Map(
            group
                .tags
                .into_iter()
                .filter_map(|(subkey, value)| subkey.map(|subkey| (subkey, Scalar::coerce(&value))))
                .collect(),
        );
    }

    let items: Vec<String> = group
        .tags
        .into_iter()
        .map(|(subkey, value)| match subkey {
            Some(subkey) => format!("{subkey}{PATH_SEPARATOR}{value}"),
            None => value,
        })
        .collect();
    match items.as_slice() {
        [single] => MetadataValue::Scalar(Scalar::coerce(single)),
        _ => MetadataValue::List(items.iter().map(|item| Scalar::coerce(item)).collect()),
    }
}
