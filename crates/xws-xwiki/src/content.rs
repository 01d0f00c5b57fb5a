//! Page content codec.
//!
//! A page's `content` holds the document metadata serialized as a JSON
//! object. Content that does not decode to an object is a
//! [`ContentParse::ParseFailure`]; the storage decides whether that reads as
//! empty metadata (lenient) or as an error (strict).

use serde_json::Value;
use xws_storage::Metadata;

use crate::error::XWikiError;

/// Outcome of decoding page content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentParse {
    /// Content is a JSON object.
    Parsed(Metadata),
    /// Content is not valid JSON, or not a JSON object.
    ParseFailure(String),
}

impl ContentParse {
    /// Decode page content.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(metadata)) => Self::Parsed(metadata),
            Ok(other) => Self::ParseFailure(format!("expected a JSON object, found {}", kind(&other))),
            Err(err) => Self::ParseFailure(err.to_string()),
        }
    }
}

/// Encode metadata as page content.
pub(crate) fn encode(metadata: &Metadata) -> Result<String, XWikiError> {
    Ok(serde_json::to_string(metadata)?)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_object() {
        let parsed = ContentParse::parse(r#"{"title":"Hello","n":1}"#);

        let ContentParse::Parsed(metadata) = parsed else {
            panic!("expected parsed content");
        };
        assert_eq!(metadata.get("title"), Some(&json!("Hello")));
        assert_eq!(metadata.get("n"), Some(&json!(1)));
    }

    #[test]
    fn test_parse_invalid_json() {
        let parsed = ContentParse::parse("= Heading =\n\nWiki syntax");

        assert!(matches!(parsed, ContentParse::ParseFailure(_)));
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(matches!(
            ContentParse::parse(""),
            ContentParse::ParseFailure(_)
        ));
    }

    #[test]
    fn test_parse_non_object() {
        let parsed = ContentParse::parse("[1, 2]");

        assert_eq!(
            parsed,
            ContentParse::ParseFailure("expected a JSON object, found an array".to_owned())
        );
    }

    #[test]
    fn test_encode_round_trip() {
        let mut metadata = Metadata::new();
        metadata.insert("title".to_owned(), json!("Hello"));

        let encoded = encode(&metadata).unwrap();

        assert_eq!(ContentParse::parse(&encoded), ContentParse::Parsed(metadata));
    }
}
