//! XWiki REST API client.
//!
//! Provides a sync HTTP client for the XWiki REST API. Requests are
//! unauthenticated; responses with status >= 400 become
//! [`XWikiError::HttpResponse`].

mod attachments;
mod pages;

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use ureq::Agent;
use ureq::http::Response;

use crate::api::XWikiApi;
use crate::error::XWikiError;
use crate::reference::XWikiReference;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Characters escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// XWiki REST API client.
pub struct XWikiClient {
    agent: Agent,
    base_url: String,
}

impl XWikiClient {
    /// Create a client for the XWiki instance at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Server URL without the `/xwiki/rest` suffix
    /// * `timeout` - Global per-request timeout
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the pages collection of a space.
    fn pages_url(&self, space: &str) -> String {
        format!(
            "{}/xwiki/rest/wikis/xwiki/spaces/{}/pages",
            self.base_url,
            encode_segment(space)
        )
    }

    /// URL of a page resource.
    fn page_url(&self, reference: &XWikiReference) -> String {
        format!(
            "{}/{}",
            self.pages_url(&reference.space),
            encode_segment(&reference.page)
        )
    }

    /// URL of a page attachment.
    fn attachment_url(&self, reference: &XWikiReference, name: &str) -> String {
        format!(
            "{}/attachments/{}",
            self.page_url(reference),
            encode_segment(name)
        )
    }
}

/// Percent-encode a single path segment.
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Turn an error status into [`XWikiError::HttpResponse`].
fn check_status(response: Response<ureq::Body>) -> Result<Response<ureq::Body>, XWikiError> {
    let status = response.status().as_u16();
    if status >= 400 {
        let error_body = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(XWikiError::HttpResponse {
            status,
            body: error_body,
        });
    }
    Ok(response)
}

impl XWikiApi for XWikiClient {
    fn list_pages(&self, space: &str) -> Result<Vec<String>, XWikiError> {
        self.get_page_names(space)
    }

    fn page_content(&self, reference: &XWikiReference) -> Result<Option<String>, XWikiError> {
        self.get_page_content(reference)
    }

    fn put_page_content(
        &self,
        reference: &XWikiReference,
        content: &str,
    ) -> Result<(), XWikiError> {
        self.update_page(reference, content)
    }

    fn delete_page(&self, reference: &XWikiReference) -> Result<(), XWikiError> {
        self.remove_page(reference)
    }

    fn get_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
    ) -> Result<Vec<u8>, XWikiError> {
        self.download_attachment(reference, name)
    }

    fn put_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
        data: &[u8],
    ) -> Result<(), XWikiError> {
        self.upload_attachment(reference, name, data)
    }
}
