//! Page operations for XWiki REST API.

use tracing::info;

use super::{XWikiClient, check_status};
use crate::error::XWikiError;
use crate::reference::XWikiReference;
use crate::xml;

impl XWikiClient {
    /// List full names of the pages in a space.
    pub(crate) fn get_page_names(&self, space: &str) -> Result<Vec<String>, XWikiError> {
        let url = self.pages_url(space);

        info!("Listing pages in space {}", space);

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/xml")
            .call()?;
        let body = check_status(response)?.into_body().read_to_string()?;

        let names = xml::page_full_names(&body)?;
        info!("Found {} pages in space {}", names.len(), space);
        Ok(names)
    }

    /// Get the `content` field of a page.
    pub(crate) fn get_page_content(
        &self,
        reference: &XWikiReference,
    ) -> Result<Option<String>, XWikiError> {
        let url = self.page_url(reference);

        info!("Getting page {}", reference);

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/xml")
            .call()?;
        let body = check_status(response)?.into_body().read_to_string()?;

        xml::page_content(&body)
    }

    /// Replace the content of a page, creating it if needed.
    pub(crate) fn update_page(
        &self,
        reference: &XWikiReference,
        content: &str,
    ) -> Result<(), XWikiError> {
        let url = self.page_url(reference);

        info!("Updating page {} ({} bytes)", reference, content.len());

        let response = self
            .agent
            .put(&url)
            .header("Content-Type", "text/plain")
            .header("Accept", "application/xml")
            .send(content.as_bytes())?;
        check_status(response)?;
        Ok(())
    }

    /// Delete a page.
    pub(crate) fn remove_page(&self, reference: &XWikiReference) -> Result<(), XWikiError> {
        let url = self.page_url(reference);

        info!("Deleting page {}", reference);

        let response = self.agent.delete(&url).call()?;
        check_status(response)?;
        Ok(())
    }
}
