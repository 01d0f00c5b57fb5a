//! XWiki REST storage backend for XWS.
//!
//! This crate lets the generic [`Storage`](xws_storage::Storage) interface
//! target an XWiki instance:
//! - [`XWikiStorage`]: the storage adapter (documents are wiki pages whose
//!   content is JSON metadata)
//! - [`XWikiClient`]: sync HTTP client for the XWiki REST API
//! - [`register`]: adds the `xwiki` type to a [`StorageRegistry`]
//!
//! # Example
//!
//! ```ignore
//! use xws_storage::{DocumentRequest, Storage, StorageDescription, StorageRegistry};
//!
//! let mut registry = StorageRegistry::new();
//! xws_xwiki::register(&mut registry);
//!
//! let storage = registry.create(
//!     &StorageDescription::new("xwiki").with_param("xwikiUrl", "http://localhost:8080"),
//! )?;
//! let metadata = storage.get(&DocumentRequest::new("Blog.Hello"))?;
//! println!("{}", serde_json::to_string_pretty(&metadata)?);
//! ```

// Transport
mod api;
mod client;
pub use api::XWikiApi;
pub use client::{DEFAULT_TIMEOUT, XWikiClient};

// Identifier mapping and content codec
mod content;
mod reference;
mod xml;
pub use content::ContentParse;
pub use reference::{DEFAULT_SPACE, SEPARATOR, XWikiReference, check_space};

// Storage adapter
mod storage;
pub use storage::{
    DEFAULT_SPACE_PARAM, STRICT_CONTENT_PARAM, TIMEOUT_PARAM, URL_PARAM, XWikiStorage,
};

// Errors
pub mod error;
pub use error::XWikiError;

#[cfg(test)]
mod fake;

use xws_storage::{Storage, StorageDescription, StorageError, StorageRegistry};

/// Type tag under which the backend registers.
pub const STORAGE_TYPE: &str = "xwiki";

/// Backend name used in error messages.
pub(crate) const BACKEND: &str = "XWiki";

/// Register the `xwiki` storage type.
pub fn register(registry: &mut StorageRegistry) {
    registry.register(STORAGE_TYPE, create_storage);
}

fn create_storage(description: &StorageDescription) -> Result<Box<dyn Storage>, StorageError> {
    Ok(Box::new(XWikiStorage::from_description(description)?))
}

#[cfg(test)]
mod tests {
    use xws_storage::StorageErrorKind;

    use super::*;

    #[test]
    fn test_register_adds_xwiki_type() {
        let mut registry = StorageRegistry::new();

        register(&mut registry);

        assert!(registry.contains("xwiki"));
    }

    #[test]
    fn test_registry_creates_xwiki_storage() {
        let mut registry = StorageRegistry::new();
        register(&mut registry);
        let description =
            StorageDescription::new(STORAGE_TYPE).with_param(URL_PARAM, "http://localhost:8080");

        assert!(registry.create(&description).is_ok());
    }

    #[test]
    fn test_registry_rejects_description_without_url() {
        let mut registry = StorageRegistry::new();
        register(&mut registry);

        let err = registry
            .create(&StorageDescription::new(STORAGE_TYPE))
            .err()
            .unwrap();

        assert_eq!(err.kind, StorageErrorKind::MissingParameter);
    }
}
