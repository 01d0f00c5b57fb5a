//! Result shapes returned by the storage verbs.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Metadata;

/// Status code reported for updates and deletions.
const NO_CONTENT: u16 = 204;

/// Outcome of a successful `post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    /// Identifier assigned to the new document.
    pub id: String,
}

/// One row of an `all_docs` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Document identifier.
    pub id: String,
    /// Placeholder value (always empty).
    #[serde(default)]
    pub value: Metadata,
    /// Document metadata, present only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Metadata>,
}

impl Row {
    /// Create a row without metadata.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Metadata::new(),
            doc: None,
        }
    }
}

/// Result of `all_docs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    /// Listed documents in backend order.
    pub rows: Vec<Row>,
    /// Number of rows.
    pub total_rows: usize,
}

impl ListResult {
    /// Build a listing, deriving `total_rows` from the rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let total_rows = rows.len();
        Self { rows, total_rows }
    }
}

/// Response of a dispatched [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Metadata of a single document.
    Document(Metadata),
    /// Identifier of a newly created document.
    Created(Created),
    /// Update or deletion succeeded.
    NoContent,
    /// Document listing.
    List(ListResult),
    /// Attachment content.
    Attachment(Vec<u8>),
}

impl Response {
    /// JSON form of the response, as returned to generic callers.
    ///
    /// Attachments have no JSON form and return `None`.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Document(metadata) => Some(json!({ "data": metadata })),
            Self::Created(created) => Some(json!({ "id": created.id })),
            Self::NoContent => Some(json!({ "status": NO_CONTENT })),
            Self::List(list) => Some(json!({ "data": list })),
            Self::Attachment(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_result_from_rows() {
        let list = ListResult::from_rows(vec![Row::new("Blog.A"), Row::new("Blog.B")]);

        assert_eq!(list.total_rows, 2);
        assert_eq!(list.rows[1].id, "Blog.B");
    }

    #[test]
    fn test_row_without_doc_serialization() {
        let row = Row::new("Blog.A");

        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"id": "Blog.A", "value": {}})
        );
    }

    #[test]
    fn test_no_content_json() {
        assert_eq!(Response::NoContent.to_json(), Some(json!({"status": 204})));
    }

    #[test]
    fn test_created_json() {
        let response = Response::Created(Created {
            id: "Blog.123".to_owned(),
        });

        assert_eq!(response.to_json(), Some(json!({"id": "Blog.123"})));
    }

    #[test]
    fn test_list_json() {
        let mut row = Row::new("Blog.A");
        row.doc = Some(Metadata::from_iter([("title".to_owned(), json!("A"))]));
        let response = Response::List(ListResult::from_rows(vec![row]));

        assert_eq!(
            response.to_json(),
            Some(json!({
                "data": {
                    "rows": [{"id": "Blog.A", "value": {}, "doc": {"title": "A"}}],
                    "total_rows": 1
                }
            }))
        );
    }

    #[test]
    fn test_attachment_has_no_json() {
        assert!(Response::Attachment(vec![1, 2, 3]).to_json().is_none());
    }
}
