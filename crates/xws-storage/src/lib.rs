//! Generic document storage abstraction for XWS.
//!
//! This crate provides a [`Storage`] trait with the uniform document verbs
//! (`get`, `put`, `post`, `remove`, `all_docs` and the attachment operations)
//! so that callers can address any backend through one interface:
//!
//! - **Typed requests** built from loosely-typed parameters by [`Command`]
//! - **Single failure channel**: every verb returns `Result<_, StorageError>`
//! - **Backend selection** by type tag through [`StorageRegistry`]
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait implemented by backends (e.g. `xws-xwiki`)
//! - [`Command`] and [`dispatch`] for verb-name driven invocation
//! - [`StorageRegistry`] mapping type tags to backend factories
//!
//! # Example
//!
//! ```ignore
//! use xws_storage::{Command, Metadata, Options, StorageDescription, StorageRegistry, dispatch};
//!
//! let mut registry = StorageRegistry::new();
//! xws_xwiki::register(&mut registry);
//!
//! let description = StorageDescription::new("xwiki")
//!     .with_param("xwikiUrl", "http://localhost:8080");
//! let storage = registry.create(&description)?;
//!
//! let command = Command::from_params("allDocs", Metadata::new(), &Options::default())?;
//! let response = dispatch(storage.as_ref(), command)?;
//! ```

mod command;
mod registry;
mod request;
mod response;
mod storage;

pub use command::{Command, dispatch};
pub use registry::{StorageDescription, StorageFactory, StorageRegistry};
pub use request::{
    AllDocsRequest, AttachmentRequest, DocumentRequest, Options, PostRequest,
    PutAttachmentRequest, PutRequest,
};
pub use response::{Created, ListResult, Response, Row};
pub use storage::{Storage, StorageError, StorageErrorKind};

/// Document metadata: an opaque JSON object.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Parameter key carrying the document identifier.
pub const ID_KEY: &str = "_id";
