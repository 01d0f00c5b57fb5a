//! Error types for the XWiki backend.

use std::str::Utf8Error;

use xws_storage::{StorageError, StorageErrorKind};

use crate::BACKEND;

/// Error from XWiki REST operations.
#[derive(Debug, thiserror::Error)]
pub enum XWikiError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// XML envelope parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Encoding error while decoding the XML envelope.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] Utf8Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XWikiError {
    /// HTTP status of a response error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert into a [`StorageError`] for the given document identifier.
    #[must_use]
    pub fn into_storage_error(self, id: Option<&str>) -> StorageError {
        let kind = match &self {
            Self::HttpResponse { status: 404, .. } => StorageErrorKind::NotFound,
            Self::HttpRequest(_) | Self::HttpResponse { .. } => StorageErrorKind::Transport,
            Self::Xml(_) | Self::Encoding(_) | Self::Utf8(_) | Self::Json(_) => {
                StorageErrorKind::Other
            }
        };
        let error = StorageError::new(kind)
            .with_backend(BACKEND)
            .with_source(self);
        match id {
            Some(id) => error.with_id(id),
            None => error,
        }
    }
}

impl From<XWikiError> for StorageError {
    fn from(err: XWikiError) -> Self {
        err.into_storage_error(None)
    }
}
