//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for the generic document verbs, along
//! with [`StorageError`] for unified error handling across backends.
//!
//! # Identifier Convention
//!
//! Document identifiers are opaque strings to this crate. Backends decide how
//! to map them onto their own resources (the XWiki backend reads them as
//! `"<space>.<page>"`).

use crate::Metadata;
use crate::request::{
    AllDocsRequest, AttachmentRequest, DocumentRequest, PostRequest, PutAttachmentRequest,
    PutRequest,
};
use crate::response::{Created, ListResult};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Document or attachment does not exist.
    NotFound,
    /// Network failure or unexpected response status.
    Transport,
    /// A required request parameter is absent.
    MissingParameter,
    /// Identifier cannot be mapped onto a backend resource.
    InvalidId,
    /// Stored content could not be decoded.
    MalformedContent,
    /// The backend does not support this operation.
    NotImplemented,
    /// No backend registered under the requested type tag.
    UnknownType,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Document identifier context (if applicable).
    pub id: Option<String>,
    /// Backend identifier (e.g., "XWiki").
    pub backend: Option<&'static str>,
    message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            id: None,
            backend: None,
            message: None,
            source: None,
        }
    }

    /// Attach document identifier context.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Human-readable message, if one was attached.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// The request did not carry a document identifier.
    #[must_use]
    pub fn missing_id() -> Self {
        Self::new(StorageErrorKind::MissingParameter).with_message("Document ID not specified")
    }

    /// The request did not carry an attachment name.
    #[must_use]
    pub fn missing_attachment() -> Self {
        Self::new(StorageErrorKind::MissingParameter)
            .with_message("Attachment name not specified")
    }

    /// The operation is not supported.
    ///
    /// `operation` is the upper-case verb label, e.g. `"CHECK"`.
    #[must_use]
    pub fn not_implemented(operation: &str) -> Self {
        Self::new(StorageErrorKind::NotImplemented)
            .with_message(format!("{operation} not implemented"))
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message: source (id: Space.Page)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::Transport => "Transport error",
            StorageErrorKind::MissingParameter => "Missing parameter",
            StorageErrorKind::InvalidId => "Invalid document ID",
            StorageErrorKind::MalformedContent => "Malformed content",
            StorageErrorKind::NotImplemented => "Not implemented",
            StorageErrorKind::UnknownType => "Unknown storage type",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(id) = &self.id {
            write!(f, " (id: {id})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Generic document storage.
///
/// Every verb reports its outcome through the returned `Result`, including
/// verbs a backend does not support: those return
/// [`StorageErrorKind::NotImplemented`] rather than panicking.
pub trait Storage: Send + Sync {
    /// Fetch the metadata of a document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::MissingParameter`] if the request has no
    /// identifier, or the backend error if the fetch fails.
    fn get(&self, request: &DocumentRequest) -> Result<Metadata, StorageError>;

    /// Create a document under a newly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document cannot be stored.
    fn post(&self, request: PostRequest) -> Result<Created, StorageError>;

    /// Replace the metadata of the document named by the request.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::MissingParameter`] if the request has no
    /// identifier, or the backend error if the store fails.
    fn put(&self, request: PutRequest) -> Result<(), StorageError>;

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document cannot be removed.
    fn remove(&self, request: &DocumentRequest) -> Result<(), StorageError>;

    /// List documents, optionally with their metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if listing fails or, with `include_docs`,
    /// if any single document fetch fails.
    fn all_docs(&self, request: &AllDocsRequest) -> Result<ListResult, StorageError>;

    /// Download an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the attachment cannot be read.
    fn get_attachment(&self, request: &AttachmentRequest) -> Result<Vec<u8>, StorageError>;

    /// Upload an attachment, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the attachment cannot be written.
    fn put_attachment(&self, request: PutAttachmentRequest) -> Result<(), StorageError>;

    /// Delete an attachment.
    ///
    /// # Errors
    ///
    /// Default implementation always returns [`StorageErrorKind::NotImplemented`].
    fn remove_attachment(&self, _request: &AttachmentRequest) -> Result<(), StorageError> {
        Err(StorageError::not_implemented("REMOVE ATTACHMENT"))
    }

    /// Check a document for consistency.
    ///
    /// # Errors
    ///
    /// Default implementation always returns [`StorageErrorKind::NotImplemented`].
    fn check(&self, _request: &DocumentRequest) -> Result<(), StorageError> {
        Err(StorageError::not_implemented("CHECK"))
    }

    /// Repair an inconsistent document.
    ///
    /// # Errors
    ///
    /// Default implementation always returns [`StorageErrorKind::NotImplemented`].
    fn repair(&self, _request: &DocumentRequest) -> Result<(), StorageError> {
        Err(StorageError::not_implemented("REPAIR"))
    }
}
