//! XWS CLI - document storage on XWiki.
//!
//! Provides one command per storage verb:
//! - `get`, `put`, `post`, `remove`, `list`: documents
//! - `get-attachment`, `put-attachment`, `remove-attachment`: attachments
//! - `check`, `repair`: consistency operations

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    GetAttachmentArgs, GlobalArgs, IdArgs, ListArgs, PostArgs, PutArgs, PutAttachmentArgs,
    RemoveAttachmentArgs,
};
use error::CliError;
use output::Output;

/// XWS - document storage on XWiki.
#[derive(Parser)]
#[command(name = "xws", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metadata of a document.
    Get(IdArgs),
    /// Replace the metadata of a document.
    Put(PutArgs),
    /// Create a document under a generated identifier.
    Post(PostArgs),
    /// Delete a document.
    Remove(IdArgs),
    /// List the documents of a space.
    List(ListArgs),
    /// Download an attachment.
    GetAttachment(GetAttachmentArgs),
    /// Upload an attachment.
    PutAttachment(PutAttachmentArgs),
    /// Delete an attachment.
    RemoveAttachment(RemoveAttachmentArgs),
    /// Check a document.
    Check(IdArgs),
    /// Repair a document.
    Repair(IdArgs),
}

impl Commands {
    fn execute(&self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let (command, attachment_path) = match self {
            Self::Get(args) => (args.command("get")?, None),
            Self::Put(args) => (args.command()?, None),
            Self::Post(args) => (args.command()?, None),
            Self::Remove(args) => (args.command("remove")?, None),
            Self::List(args) => (args.command()?, None),
            Self::GetAttachment(args) => (args.command()?, args.output.as_ref()),
            Self::PutAttachment(args) => (args.command()?, None),
            Self::RemoveAttachment(args) => (args.command()?, None),
            Self::Check(args) => (args.command("check")?, None),
            Self::Repair(args) => (args.command("repair")?, None),
        };

        let storage = global.open_storage()?;
        commands::run(storage.as_ref(), command, attachment_path, output)
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.command.execute(&cli.global, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
