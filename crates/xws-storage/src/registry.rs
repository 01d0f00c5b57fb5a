//! Storage backend registry.
//!
//! Backends register a factory under a type tag at process start; callers
//! then create storages from a [`StorageDescription`] naming that tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::Metadata;
use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Builds a storage from its description.
pub type StorageFactory = fn(&StorageDescription) -> Result<Box<dyn Storage>, StorageError>;

/// Backend selection plus backend-specific parameters.
///
/// Serialized as a flat object, e.g.
/// `{"type": "xwiki", "xwikiUrl": "http://localhost:8080"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageDescription {
    /// Type tag selecting the backend.
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Backend-specific parameters.
    #[serde(flatten)]
    pub params: Metadata,
}

impl StorageDescription {
    /// Create a description with no parameters.
    #[must_use]
    pub fn new(storage_type: impl Into<String>) -> Self {
        Self {
            storage_type: storage_type.into(),
            params: Metadata::new(),
        }
    }

    /// Set a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// String parameter, if present and a string.
    #[must_use]
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    /// Boolean parameter, if present and a boolean.
    #[must_use]
    pub fn param_bool(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(Value::as_bool)
    }

    /// Unsigned integer parameter, if present and a non-negative integer.
    #[must_use]
    pub fn param_u64(&self, key: &str) -> Option<u64> {
        self.params.get(key).and_then(Value::as_u64)
    }
}

/// Registry of storage factories keyed by type tag.
#[derive(Debug, Default)]
pub struct StorageRegistry {
    factories: BTreeMap<String, StorageFactory>,
}

impl StorageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a type tag, replacing any previous one.
    pub fn register(&mut self, storage_type: impl Into<String>, factory: StorageFactory) {
        let storage_type = storage_type.into();
        info!("Registering storage type '{}'", storage_type);
        self.factories.insert(storage_type, factory);
    }

    /// Check whether a type tag is registered.
    #[must_use]
    pub fn contains(&self, storage_type: &str) -> bool {
        self.factories.contains_key(storage_type)
    }

    /// Registered type tags in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Create a storage from its description.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::UnknownType`] if no factory is registered
    /// for the description's type, or the factory's own error.
    pub fn create(&self, description: &StorageDescription) -> Result<Box<dyn Storage>, StorageError> {
        let factory = self
            .factories
            .get(&description.storage_type)
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::UnknownType)
                    .with_message(format!("'{}'", description.storage_type))
            })?;
        factory(description)
    }
}
