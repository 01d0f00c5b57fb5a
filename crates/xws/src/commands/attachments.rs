//! Attachment commands.

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use xws_storage::{Command, Metadata, Options, PutAttachmentRequest};

use super::id_params;
use crate::error::CliError;

/// Arguments for the get-attachment command.
#[derive(Args, Debug)]
pub(crate) struct GetAttachmentArgs {
    /// Document identifier ("Space.Page").
    id: String,

    /// Attachment name.
    name: String,

    /// Write the attachment to this file instead of stdout.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

impl GetAttachmentArgs {
    pub(crate) fn command(&self) -> Result<Command, CliError> {
        attachment_command("getAttachment", &self.id, &self.name)
    }
}

/// Arguments for the put-attachment command.
#[derive(Args, Debug)]
pub(crate) struct PutAttachmentArgs {
    /// Document identifier ("Space.Page").
    id: String,

    /// Attachment name.
    name: String,

    /// File to upload.
    file: PathBuf,
}

impl PutAttachmentArgs {
    pub(crate) fn command(&self) -> Result<Command, CliError> {
        let blob = std::fs::read(&self.file)?;
        Ok(Command::PutAttachment(PutAttachmentRequest {
            id: Some(self.id.clone()),
            attachment: Some(self.name.clone()),
            blob,
        }))
    }
}

/// Arguments for the remove-attachment command.
#[derive(Args, Debug)]
pub(crate) struct RemoveAttachmentArgs {
    /// Document identifier ("Space.Page").
    id: String,

    /// Attachment name.
    name: String,
}

impl RemoveAttachmentArgs {
    pub(crate) fn command(&self) -> Result<Command, CliError> {
        attachment_command("removeAttachment", &self.id, &self.name)
    }
}

fn attachment_command(verb: &str, id: &str, name: &str) -> Result<Command, CliError> {
    let mut params: Metadata = id_params(id);
    params.insert("_attachment".to_owned(), Value::String(name.to_owned()));
    Ok(Command::from_params(verb, params, &Options::default())?)
}
