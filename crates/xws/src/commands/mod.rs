//! CLI command implementations.
//!
//! Subcommands are turned into a generic [`Command`] through
//! [`Command::from_params`], the same path any host framework would take, and
//! run with [`dispatch`]. `put-attachment` builds its request directly, since
//! the file content is raw bytes rather than a JSON parameter.

mod attachments;
mod documents;

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use tracing::info;
use xws_config::{CliSettings, Config};
use xws_storage::{Command, Metadata, Response, Storage, StorageRegistry, dispatch};

pub(crate) use attachments::{GetAttachmentArgs, PutAttachmentArgs, RemoveAttachmentArgs};
pub(crate) use documents::{IdArgs, ListArgs, PostArgs, PutArgs};

use crate::error::CliError;
use crate::output::Output;

/// Options shared by all commands.
#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover xws.toml).
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// XWiki server URL (overrides config).
    #[arg(long, global = true, env = "XWIKI_URL")]
    pub(crate) url: Option<String>,

    /// Space used when a command does not name one (overrides config).
    #[arg(long, global = true)]
    pub(crate) default_space: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

impl GlobalArgs {
    /// Create the configured storage.
    pub(crate) fn open_storage(&self) -> Result<Box<dyn Storage>, CliError> {
        let settings = CliSettings {
            xwiki_url: self.url.clone(),
            default_space: self.default_space.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        let description = config.storage.to_description()?;

        let mut registry = StorageRegistry::new();
        xws_xwiki::register(&mut registry);

        info!("Opening {} storage", description.storage_type);
        Ok(registry.create(&description)?)
    }
}

/// Run a command and print its result.
///
/// Attachments are written to `attachment_path` when given, to stdout
/// otherwise; every other response is printed as JSON.
pub(crate) fn run(
    storage: &dyn Storage,
    command: Command,
    attachment_path: Option<&PathBuf>,
    output: &Output,
) -> Result<(), CliError> {
    let verb = command.verb();
    let response = dispatch(storage, command)?;

    match (&response, attachment_path) {
        (Response::Attachment(data), Some(path)) => {
            std::fs::write(path, data)?;
            output.success(&format!("Wrote {} bytes to {}", data.len(), path.display()));
        }
        (Response::Attachment(data), None) => output.bytes(data)?,
        _ => {
            let json = response.to_json().unwrap_or(Value::Null);
            output.data(&serde_json::to_string_pretty(&json)?)?;
        }
    }

    info!("{} completed", verb);
    Ok(())
}

/// Parameters holding just a document identifier.
pub(crate) fn id_params(id: &str) -> Metadata {
    let mut params = Metadata::new();
    params.insert("_id".to_owned(), Value::String(id.to_owned()));
    params
}

/// Parse a JSON object argument.
pub(crate) fn parse_metadata(json: &str) -> Result<Metadata, CliError> {
    match serde_json::from_str(json)? {
        Value::Object(metadata) => Ok(metadata),
        _ => Err(CliError::Validation(
            "document metadata must be a JSON object".to_owned(),
        )),
    }
}
