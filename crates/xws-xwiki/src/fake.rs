//! In-memory [`XWikiApi`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::XWikiApi;
use crate::error::XWikiError;
use crate::reference::XWikiReference;

/// Fake wiki that keeps pages in insertion order and records every call.
///
/// Pages are addressed by space and page, as URLs address them, never by
/// the joined identifier.
#[derive(Default)]
pub(crate) struct FakeWiki {
    pages: Mutex<Vec<(XWikiReference, String)>>,
    attachments: Mutex<HashMap<(XWikiReference, String), Vec<u8>>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<XWikiReference>>,
    delays: Mutex<HashMap<XWikiReference, Duration>>,
    list_fails: Mutex<bool>,
}

impl FakeWiki {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a page with raw content.
    pub(crate) fn with_page(self, id: &str, content: &str) -> Self {
        let reference = XWikiReference::from_id(id).unwrap();
        self.pages
            .lock()
            .unwrap()
            .push((reference, content.to_owned()));
        self
    }

    /// Make content fetches for `id` fail with a server error.
    pub(crate) fn failing_on(self, id: &str) -> Self {
        let reference = XWikiReference::from_id(id).unwrap();
        self.failing.lock().unwrap().insert(reference);
        self
    }

    /// Delay content fetches for `id`.
    pub(crate) fn delayed(self, id: &str, delay: Duration) -> Self {
        let reference = XWikiReference::from_id(id).unwrap();
        self.delays.lock().unwrap().insert(reference, delay);
        self
    }

    /// Make page listing fail with a server error.
    pub(crate) fn failing_list(self) -> Self {
        *self.list_fails.lock().unwrap() = true;
        self
    }

    /// Recorded calls, e.g. `"GET Blog.Hello"`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Raw content of the page an identifier resolves to.
    pub(crate) fn content(&self, id: &str) -> Option<String> {
        self.find(&XWikiReference::from_id(id).unwrap())
    }

    /// Raw content of the page at `space` and `page`.
    pub(crate) fn content_at(&self, space: &str, page: &str) -> Option<String> {
        self.find(&XWikiReference::new(space, page))
    }

    fn find(&self, reference: &XWikiReference) -> Option<String> {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .find(|(existing, _)| existing == reference)
            .map(|(_, content)| content.clone())
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(what: &str) -> XWikiError {
        XWikiError::HttpResponse {
            status: 404,
            body: format!("{what} not found"),
        }
    }

    fn server_error() -> XWikiError {
        XWikiError::HttpResponse {
            status: 500,
            body: "internal error".to_owned(),
        }
    }
}

impl XWikiApi for FakeWiki {
    fn list_pages(&self, space: &str) -> Result<Vec<String>, XWikiError> {
        self.record(format!("LIST {space}"));
        if *self.list_fails.lock().unwrap() {
            return Err(Self::server_error());
        }
        Ok(self
            .pages
            .lock()
            .unwrap()
            .iter()
            .filter(|(reference, _)| reference.space == space)
            .map(|(reference, _)| reference.id())
            .collect())
    }

    fn page_content(&self, reference: &XWikiReference) -> Result<Option<String>, XWikiError> {
        self.record(format!("GET {reference}"));
        let delay = self.delays.lock().unwrap().get(reference).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        if self.failing.lock().unwrap().contains(reference) {
            return Err(Self::server_error());
        }
        self.find(reference)
            .map(Some)
            .ok_or_else(|| Self::not_found(&reference.id()))
    }

    fn put_page_content(
        &self,
        reference: &XWikiReference,
        content: &str,
    ) -> Result<(), XWikiError> {
        self.record(format!("PUT {reference}"));
        let mut pages = self.pages.lock().unwrap();
        match pages.iter_mut().find(|(existing, _)| existing == reference) {
            Some((_, existing)) => content.clone_into(existing),
            None => pages.push((reference.clone(), content.to_owned())),
        }
        Ok(())
    }

    fn delete_page(&self, reference: &XWikiReference) -> Result<(), XWikiError> {
        self.record(format!("DELETE {reference}"));
        let mut pages = self.pages.lock().unwrap();
        let before = pages.len();
        pages.retain(|(existing, _)| existing != reference);
        if pages.len() == before {
            return Err(Self::not_found(&reference.id()));
        }
        Ok(())
    }

    fn get_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
    ) -> Result<Vec<u8>, XWikiError> {
        self.record(format!("GET {reference}/{name}"));
        self.attachments
            .lock()
            .unwrap()
            .get(&(reference.clone(), name.to_owned()))
            .cloned()
            .ok_or_else(|| Self::not_found(name))
    }

    fn put_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
        data: &[u8],
    ) -> Result<(), XWikiError> {
        self.record(format!("PUT {reference}/{name}"));
        self.attachments
            .lock()
            .unwrap()
            .insert((reference.clone(), name.to_owned()), data.to_vec());
        Ok(())
    }
}
