//! Transport seam between the storage adapter and the XWiki REST API.

use crate::error::XWikiError;
use crate::reference::XWikiReference;

/// XWiki REST operations used by [`XWikiStorage`](crate::XWikiStorage).
///
/// [`XWikiClient`](crate::XWikiClient) implements this over HTTP. Each method
/// maps to exactly one remote call.
pub trait XWikiApi: Send + Sync {
    /// `GET .../spaces/{space}/pages`: full names of all pages in a space.
    fn list_pages(&self, space: &str) -> Result<Vec<String>, XWikiError>;

    /// `GET .../spaces/{space}/pages/{page}`: the page's `content` field.
    ///
    /// Returns `None` if the page resource has no `content` element.
    fn page_content(&self, reference: &XWikiReference) -> Result<Option<String>, XWikiError>;

    /// `PUT .../spaces/{space}/pages/{page}` with the given body.
    fn put_page_content(&self, reference: &XWikiReference, content: &str)
    -> Result<(), XWikiError>;

    /// `DELETE .../spaces/{space}/pages/{page}`.
    fn delete_page(&self, reference: &XWikiReference) -> Result<(), XWikiError>;

    /// `GET .../pages/{page}/attachments/{name}`: raw attachment bytes.
    fn get_attachment(&self, reference: &XWikiReference, name: &str)
    -> Result<Vec<u8>, XWikiError>;

    /// `PUT .../pages/{page}/attachments/{name}` with raw bytes.
    fn put_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
        data: &[u8],
    ) -> Result<(), XWikiError>;
}
