// Tag codec
// URL-safe unpadded base64, so any text can sit inside an index tag value

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::CodecError;

pub const LIST_SEPARATOR: char = '|';

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode(text: &str) -> String {
    ENGINE.encode(text.as_bytes())
}

pub fn decode(token: &str) -> Result<String, CodecError> {
    let bytes = ENGINE
        .decode(token)
        .map_err(|err| CodecError::decode(token, err))?;
    String::from_utf8(bytes).map_err(|err| CodecError::decode(token, err))
}

/// Encodes every item and joins them with `|`.
pub fn encode_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| encode(item.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Inverse of [`encode_list`]; an empty field is an empty list.
///
/// `[""]` also encodes to the empty field, so it reads back as `[]`. Empty
/// items elsewhere in a longer list survive.
pub fn decode_list(field: &str) -> Result<Vec<String>, CodecError> {
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field.split(LIST_SEPARATOR).map(decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESERVED: [char; 5] = ['|', '@', '{', '}', ':'];

    #[test]
    fn round_trips_ascii_and_unicode() {
        for text in [
            "",
            "abc-123",
            "Jessica Telephone",
            "key?sub?value",
            "a|b@c{d}e:f",
            "Nagomi Mcdaniel 🐢",
            "日本語のテキスト",
            "line\nbreak\ttab",
        ] {
            let token = encode(text);
            assert!(!token.contains(RESERVED), "{token} contains reserved punctuation");
            assert!(!token.contains('='));
            assert_eq!(decode(&token).expect("decode"), text);
        }
    }

    #[test]
    fn uses_url_safe_alphabet() {
        // U+FBFF is "76+/" in the standard alphabet
        let token = encode("\u{fbff}");
        assert!(!token.contains('+') && !token.contains('/'));
        assert_eq!(encode("1"), "MQ");
    }

    #[test]
    fn accepts_padded_tokens() {
        assert_eq!(decode("MQ==").expect("decode"), "1");
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(decode("a+b/"), Err(CodecError::Decode { .. })));
        assert!(matches!(decode("A"), Err(CodecError::Decode { .. })));
        // valid base64, invalid UTF-8
        assert!(matches!(decode("_w"), Err(CodecError::Decode { .. })));
    }

    #[test]
    fn lists_preserve_order_and_empty_field_is_empty_list() {
        let field = encode_list(["p2", "p1", "p3"]);
        assert_eq!(field.matches('|').count(), 2);
        assert_eq!(decode_list(&field).expect("decode"), vec!["p2", "p1", "p3"]);
        assert_eq!(encode_list(Vec::<String>::new()), "");
        assert!(decode_list("").expect("decode").is_empty());
    }

    #[test]
    fn lone_empty_item_reads_back_as_empty_list() {
        assert_eq!(encode_list([""]), "");
        assert!(decode_list(&encode_list([""])).expect("decode").is_empty());
        assert_eq!(
            decode_list(&encode_list(["", "a"])).expect("decode"),
            vec!["".to_string(), "a".to_string()]
        );
    }
}
