//! Document commands: `get`, `put`, `post`, `remove`, `list`, `check`, `repair`.

use clap::Args;
use xws_storage::{Command, Metadata, Options};

use super::{id_params, parse_metadata};
use crate::error::CliError;

/// Arguments for commands addressing one document.
#[derive(Args, Debug)]
pub(crate) struct IdArgs {
    /// Document identifier ("Space.Page").
    pub(crate) id: String,
}

impl IdArgs {
    /// Build the command for the given verb.
    pub(crate) fn command(&self, verb: &str) -> Result<Command, CliError> {
        Ok(Command::from_params(
            verb,
            id_params(&self.id),
            &Options::default(),
        )?)
    }
}

/// Arguments for the put command.
#[derive(Args, Debug)]
pub(crate) struct PutArgs {
    /// Document identifier ("Space.Page").
    id: String,

    /// Document metadata as a JSON object.
    metadata: String,
}

impl PutArgs {
    pub(crate) fn command(&self) -> Result<Command, CliError> {
        let mut params = parse_metadata(&self.metadata)?;
        params.extend(id_params(&self.id));
        Ok(Command::from_params("put", params, &Options::default())?)
    }
}

/// Arguments for the post command.
#[derive(Args, Debug)]
pub(crate) struct PostArgs {
    /// Document metadata as a JSON object.
    metadata: String,

    /// Space to create the document in.
    #[arg(short, long)]
    space: Option<String>,
}

impl PostArgs {
    pub(crate) fn command(&self) -> Result<Command, CliError> {
        let options = Options {
            space: self.space.clone(),
            ..Options::default()
        };
        Ok(Command::from_params(
            "post",
            parse_metadata(&self.metadata)?,
            &options,
        )?)
    }
}

/// Arguments for the list command.
#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Space to list.
    #[arg(short, long)]
    space: Option<String>,

    /// Fetch the metadata of every listed document.
    #[arg(long)]
    include_docs: bool,
}

impl ListArgs {
    pub(crate) fn command(&self) -> Result<Command, CliError> {
        let options = Options {
            include_docs: self.include_docs,
            space: self.space.clone(),
        };
        Ok(Command::from_params("allDocs", Metadata::new(), &options)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xws_storage::{AllDocsRequest, DocumentRequest, PostRequest, PutRequest};

    use super::*;

    #[test]
    fn test_id_command() {
        let args = IdArgs {
            id: "Blog.Hello".to_owned(),
        };

        assert_eq!(
            args.command("remove").unwrap(),
            Command::Remove(DocumentRequest::new("Blog.Hello"))
        );
    }

    #[test]
    fn test_put_command_id_wins_over_metadata() {
        let args = PutArgs {
            id: "Blog.Hello".to_owned(),
            metadata: r#"{"_id": "Other.Page", "title": "Hello"}"#.to_owned(),
        };

        let Command::Put(request) = args.command().unwrap() else {
            panic!("expected put");
        };

        assert_eq!(
            request,
            PutRequest {
                id: Some("Blog.Hello".to_owned()),
                metadata: parse_metadata(r#"{"title": "Hello"}"#).unwrap(),
            }
        );
    }

    #[test]
    fn test_post_command() {
        let args = PostArgs {
            metadata: r#"{"title": "Hello"}"#.to_owned(),
            space: Some("Blog".to_owned()),
        };

        assert_eq!(
            args.command().unwrap(),
            Command::Post(PostRequest {
                metadata: parse_metadata(&json!({"title": "Hello"}).to_string()).unwrap(),
                space: Some("Blog".to_owned()),
            })
        );
    }

    #[test]
    fn test_list_command() {
        let args = ListArgs {
            space: None,
            include_docs: true,
        };

        assert_eq!(
            args.command().unwrap(),
            Command::AllDocs(AllDocsRequest {
                space: None,
                include_docs: true,
            })
        );
    }
}
