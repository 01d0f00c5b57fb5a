//! [`Storage`] implementation backed by XWiki pages.
//!
//! Each document is one wiki page: its identifier `"<space>.<page>"` names the
//! page and its metadata is the page content, serialized as JSON.
//!
//! # Content Policy
//!
//! Page content that is not a JSON object is read as empty metadata and
//! logged at `warn` level. With [`XWikiStorage::with_strict_content`] such
//! content is reported as [`StorageErrorKind::MalformedContent`] instead.

use std::time::Duration;

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};
use xws_storage::{
    AllDocsRequest, AttachmentRequest, Created, DocumentRequest, ID_KEY, ListResult, Metadata,
    PostRequest, PutAttachmentRequest, PutRequest, Row, Storage, StorageDescription, StorageError,
    StorageErrorKind,
};

use crate::BACKEND;
use crate::api::XWikiApi;
use crate::client::{DEFAULT_TIMEOUT, XWikiClient};
use crate::content::{self, ContentParse};
use crate::reference::{DEFAULT_SPACE, XWikiReference, check_space};

/// Description parameter holding the server URL.
pub const URL_PARAM: &str = "xwikiUrl";
/// Description parameter overriding [`DEFAULT_SPACE`].
pub const DEFAULT_SPACE_PARAM: &str = "defaultSpace";
/// Description parameter holding the request timeout in seconds.
pub const TIMEOUT_PARAM: &str = "timeout";
/// Description parameter enabling strict content decoding.
pub const STRICT_CONTENT_PARAM: &str = "strictContent";

/// Document storage on top of the XWiki REST API.
pub struct XWikiStorage<A = XWikiClient> {
    api: A,
    default_space: String,
    strict_content: bool,
}

impl XWikiStorage<XWikiClient> {
    /// Create a storage talking HTTP to the XWiki instance at `base_url`.
    #[must_use]
    pub fn connect(base_url: &str, timeout: Duration) -> Self {
        Self::new(XWikiClient::new(base_url, timeout))
    }

    /// Build from a registry description.
    ///
    /// Reads `xwikiUrl` (required), `defaultSpace`, `timeout` (seconds) and
    /// `strictContent`. A missing or zero `timeout` means [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::MissingParameter`] if `xwikiUrl` is absent.
    pub fn from_description(description: &StorageDescription) -> Result<Self, StorageError> {
        let url = description.param_str(URL_PARAM).ok_or_else(|| {
            StorageError::new(StorageErrorKind::MissingParameter)
                .with_backend(BACKEND)
                .with_message(format!("{URL_PARAM} not specified"))
        })?;
        let mut storage = Self::connect(url, description_timeout(description))
            .with_strict_content(description.param_bool(STRICT_CONTENT_PARAM).unwrap_or(false));
        if let Some(space) = description.param_str(DEFAULT_SPACE_PARAM) {
            storage = storage.with_default_space(space);
        }
        Ok(storage)
    }
}

impl<A: XWikiApi> XWikiStorage<A> {
    /// Create a storage over the given API.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            default_space: DEFAULT_SPACE.to_owned(),
            strict_content: false,
        }
    }

    /// Space used when a request does not name one.
    #[must_use]
    pub fn with_default_space(mut self, space: impl Into<String>) -> Self {
        self.default_space = space.into();
        self
    }

    /// Report undecodable page content as an error instead of empty metadata.
    #[must_use]
    pub fn with_strict_content(mut self, strict: bool) -> Self {
        self.strict_content = strict;
        self
    }

    /// The underlying API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Requested space, or the default for `None` and empty names.
    ///
    /// Spaces containing the separator are rejected: ids built from them
    /// would resolve to a different page.
    fn space<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, StorageError> {
        check_space(
            requested
                .filter(|space| !space.is_empty())
                .unwrap_or(self.default_space.as_str()),
        )
    }

    /// Fetch and decode the metadata of a document, tagging it with `_id`.
    fn fetch_metadata(&self, id: &str) -> Result<Metadata, StorageError> {
        let reference = XWikiReference::from_id(id)?;
        let content = self
            .api
            .page_content(&reference)
            .map_err(|e| e.into_storage_error(Some(id)))?;

        let mut metadata = match content.as_deref().map(ContentParse::parse) {
            Some(ContentParse::Parsed(metadata)) => metadata,
            Some(ContentParse::ParseFailure(reason)) if self.strict_content => {
                return Err(StorageError::new(StorageErrorKind::MalformedContent)
                    .with_backend(BACKEND)
                    .with_message(reason)
                    .with_id(id));
            }
            Some(ContentParse::ParseFailure(reason)) => {
                warn!("Document {} doesn't contain valid JSON: {}", id, reason);
                Metadata::new()
            }
            None => {
                debug!("Document {} has no content", id);
                Metadata::new()
            }
        };

        metadata.insert(ID_KEY.to_owned(), Value::String(id.to_owned()));
        Ok(metadata)
    }

    /// Serialize metadata into the page content.
    fn store_metadata(
        &self,
        reference: &XWikiReference,
        metadata: &Metadata,
    ) -> Result<(), StorageError> {
        let id = reference.id();
        let body = content::encode(metadata).map_err(|e| e.into_storage_error(Some(&id)))?;
        self.api
            .put_page_content(reference, &body)
            .map_err(|e| e.into_storage_error(Some(&id)))
    }

    /// List a space without fetching metadata.
    fn list(&self, space: &str) -> Result<ListResult, StorageError> {
        let names = self.api.list_pages(space)?;
        Ok(ListResult::from_rows(names.into_iter().map(Row::new).collect()))
    }

    /// List a space and attach each document's metadata.
    ///
    /// Fetches run in parallel; results are placed by row index, so row order
    /// is the listing order. The first failed fetch fails the whole listing.
    fn list_with_docs(&self, space: &str) -> Result<ListResult, StorageError> {
        let mut list = self.list(space)?;

        debug!("Fetching {} documents from space {}", list.total_rows, space);
        let docs = list
            .rows
            .par_iter()
            .map(|row| self.fetch_metadata(&row.id))
            .collect::<Result<Vec<_>, _>>()?;

        for (row, doc) in list.rows.iter_mut().zip(docs) {
            row.doc = Some(doc);
        }
        Ok(list)
    }
}

/// Request timeout of a description; zero would fail every request.
fn description_timeout(description: &StorageDescription) -> Duration {
    let secs = description
        .param_u64(TIMEOUT_PARAM)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT);
    Duration::from_secs(secs)
}

/// Tag request validation errors with this backend.
fn tagged(err: StorageError) -> StorageError {
    err.with_backend(BACKEND)
}

impl<A: XWikiApi> Storage for XWikiStorage<A> {
    fn get(&self, request: &DocumentRequest) -> Result<Metadata, StorageError> {
        let id = request.require_id().map_err(tagged)?;
        self.fetch_metadata(id)
    }

    fn post(&self, request: PostRequest) -> Result<Created, StorageError> {
        let space = self.space(request.space.as_deref())?;
        let reference = XWikiReference::generate(space);
        self.store_metadata(&reference, &request.metadata)?;
        Ok(Created {
            id: reference.id(),
        })
    }

    fn put(&self, request: PutRequest) -> Result<(), StorageError> {
        let id = request.require_id().map_err(tagged)?;
        let reference = XWikiReference::from_id(id)?;
        self.store_metadata(&reference, &request.metadata)
    }

    fn remove(&self, request: &DocumentRequest) -> Result<(), StorageError> {
        let id = request.require_id().map_err(tagged)?;
        let reference = XWikiReference::from_id(id)?;
        self.api
            .delete_page(&reference)
            .map_err(|e| e.into_storage_error(Some(id)))
    }

    fn all_docs(&self, request: &AllDocsRequest) -> Result<ListResult, StorageError> {
        let space = self.space(request.space.as_deref())?;
        if request.include_docs {
            self.list_with_docs(space)
        } else {
            self.list(space)
        }
    }

    fn get_attachment(&self, request: &AttachmentRequest) -> Result<Vec<u8>, StorageError> {
        let (id, name) = request.require().map_err(tagged)?;
        let reference = XWikiReference::from_id(id)?;
        self.api
            .get_attachment(&reference, name)
            .map_err(|e| e.into_storage_error(Some(id)))
    }

    fn put_attachment(&self, request: PutAttachmentRequest) -> Result<(), StorageError> {
        let (id, name) = request.require().map_err(tagged)?;
        let reference = XWikiReference::from_id(id)?;
        self.api
            .put_attachment(&reference, name, &request.blob)
            .map_err(|e| e.into_storage_error(Some(id)))
    }

    fn remove_attachment(&self, _request: &AttachmentRequest) -> Result<(), StorageError> {
        Err(tagged(StorageError::not_implemented("REMOVE ATTACHMENT")))
    }

    fn check(&self, _request: &DocumentRequest) -> Result<(), StorageError> {
        Err(tagged(StorageError::not_implemented("CHECK")))
    }

    fn repair(&self, _request: &DocumentRequest) -> Result<(), StorageError> {
        Err(tagged(StorageError::not_implemented("REPAIR")))
    }
}
