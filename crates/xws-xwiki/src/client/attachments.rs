//! Attachment operations for XWiki REST API.

use tracing::info;

use super::{XWikiClient, check_status};
use crate::error::XWikiError;
use crate::reference::XWikiReference;

impl XWikiClient {
    /// Download attachment content.
    pub(crate) fn download_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
    ) -> Result<Vec<u8>, XWikiError> {
        let url = self.attachment_url(reference, name);

        info!("Downloading attachment '{}' from page {}", name, reference);

        let response = self.agent.get(&url).call()?;
        // Attachments are not bounded by the default body limit
        let data = check_status(response)?
            .into_body()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        info!("Downloaded {} bytes", data.len());
        Ok(data)
    }

    /// Upload attachment content (upsert by name).
    pub(crate) fn upload_attachment(
        &self,
        reference: &XWikiReference,
        name: &str,
        data: &[u8],
    ) -> Result<(), XWikiError> {
        let url = self.attachment_url(reference, name);

        info!(
            "Uploading attachment '{}' to page {} ({} bytes)",
            name,
            reference,
            data.len()
        );

        let response = self
            .agent
            .put(&url)
            .header("Content-Type", "application/octet-stream")
            .send(data)?;
        check_status(response)?;
        Ok(())
    }
}
