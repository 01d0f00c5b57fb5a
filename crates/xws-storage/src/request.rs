//! Typed request structs for the storage verbs.
//!
//! Parameters that callers may legitimately omit (identifier, attachment name)
//! stay `Option`al here so that backends can report the omission through the
//! normal error channel before any remote call is made.

use serde::Deserialize;

use crate::storage::StorageError;
use crate::{ID_KEY, Metadata};

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Include document metadata in `all_docs` rows.
    pub include_docs: bool,
    /// Space to list from or create in (backend default when `None`).
    pub space: Option<String>,
}

/// Request addressing a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRequest {
    /// Document identifier.
    pub id: Option<String>,
}

impl DocumentRequest {
    /// Create a request for the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// Identifier, or [`StorageError::missing_id`] when absent or empty.
    pub fn require_id(&self) -> Result<&str, StorageError> {
        require_id(self.id.as_deref())
    }
}

/// Request to replace the metadata of an existing document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutRequest {
    /// Document identifier.
    pub id: Option<String>,
    /// Metadata to store, without the `_id` key.
    pub metadata: Metadata,
}

impl PutRequest {
    /// Build from generic parameters, splitting off the `_id` key.
    ///
    /// A non-string `_id` is treated as absent.
    #[must_use]
    pub fn from_params(mut params: Metadata) -> Self {
        let id = params
            .remove(ID_KEY)
            .and_then(|value| value.as_str().map(str::to_owned));
        Self {
            id,
            metadata: params,
        }
    }

    /// Identifier, or [`StorageError::missing_id`] when absent or empty.
    pub fn require_id(&self) -> Result<&str, StorageError> {
        require_id(self.id.as_deref())
    }
}

/// Request to create a document under a generated identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostRequest {
    /// Metadata to store.
    pub metadata: Metadata,
    /// Target space (backend default when `None`).
    pub space: Option<String>,
}

/// Request to list documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllDocsRequest {
    /// Space to list (backend default when `None`).
    pub space: Option<String>,
    /// Fetch and attach each document's metadata.
    pub include_docs: bool,
}

/// Request addressing an attachment of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentRequest {
    /// Document identifier.
    pub id: Option<String>,
    /// Attachment name.
    pub attachment: Option<String>,
}

impl AttachmentRequest {
    /// Create a request for the given document and attachment.
    #[must_use]
    pub fn new(id: impl Into<String>, attachment: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attachment: Some(attachment.into()),
        }
    }

    /// Identifier and attachment name, validated in that order.
    pub fn require(&self) -> Result<(&str, &str), StorageError> {
        let id = require_id(self.id.as_deref())?;
        let attachment = require_attachment(self.attachment.as_deref())?;
        Ok((id, attachment))
    }
}

/// Request to upload an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutAttachmentRequest {
    /// Document identifier.
    pub id: Option<String>,
    /// Attachment name.
    pub attachment: Option<String>,
    /// Attachment content.
    pub blob: Vec<u8>,
}

impl PutAttachmentRequest {
    /// Identifier and attachment name, validated in that order.
    pub fn require(&self) -> Result<(&str, &str), StorageError> {
        let id = require_id(self.id.as_deref())?;
        let attachment = require_attachment(self.attachment.as_deref())?;
        Ok((id, attachment))
    }
}

fn require_id(id: Option<&str>) -> Result<&str, StorageError> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(StorageError::missing_id()),
    }
}

fn require_attachment(name: Option<&str>) -> Result<&str, StorageError> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(StorageError::missing_attachment()),
    }
}
