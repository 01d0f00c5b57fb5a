//! Mapping between document identifiers and XWiki page references.
//!
//! A document identifier has the form `"<space>.<page>"`. It is split once,
//! at the first `.`: everything before is the space, everything after is the
//! page name (which may itself contain dots). A space name containing a dot
//! cannot be expressed; `"A.B.C"` always resolves to space `A`, page `B.C`.
//! Such space names are rejected by [`check_space`].

use xws_storage::{StorageError, StorageErrorKind};

use crate::BACKEND;

/// Separator between space and page in a document identifier.
pub const SEPARATOR: char = '.';

/// Space used when a request does not name one.
pub const DEFAULT_SPACE: &str = "JIO";

/// Space and page addressed by a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XWikiReference {
    /// Space name.
    pub space: String,
    /// Page name within the space.
    pub page: String,
}

impl XWikiReference {
    /// Create a reference from its parts.
    #[must_use]
    pub fn new(space: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            page: page.into(),
        }
    }

    /// Resolve a document identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidId`] if the identifier has no
    /// separator.
    pub fn from_id(id: &str) -> Result<Self, StorageError> {
        let (space, page) = id.split_once(SEPARATOR).ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidId)
                .with_backend(BACKEND)
                .with_message(format!("expected '<space>{SEPARATOR}<page>'"))
                .with_id(id)
        })?;
        Ok(Self::new(space, page))
    }

    /// Document identifier for this reference.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}{SEPARATOR}{}", self.space, self.page)
    }

    /// Reference to a new page with a generated unique name.
    #[must_use]
    pub fn generate(space: &str) -> Self {
        Self::new(space, uuid::Uuid::new_v4().to_string())
    }
}

/// Require a space name that can appear in a document identifier.
///
/// # Errors
///
/// Returns [`StorageErrorKind::InvalidId`] if the name contains
/// [`SEPARATOR`].
pub fn check_space(space: &str) -> Result<&str, StorageError> {
    if space.contains(SEPARATOR) {
        return Err(StorageError::new(StorageErrorKind::InvalidId)
            .with_backend(BACKEND)
            .with_message(format!(
                "space '{space}' contains the separator '{SEPARATOR}'"
            )));
    }
    Ok(space)
}

impl std::fmt::Display for XWikiReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.space, self.page)
    }
}
