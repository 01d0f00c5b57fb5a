//! Verb-name driven invocation of a [`Storage`].
//!
//! [`Command::from_params`] is the boundary where loosely-typed parameters
//! (`_id`, `_attachment`, `_blob`) and options are turned into typed requests.

use serde_json::Value;
use tracing::debug;

use crate::request::{
    AllDocsRequest, AttachmentRequest, DocumentRequest, Options, PostRequest,
    PutAttachmentRequest, PutRequest,
};
use crate::response::Response;
use crate::storage::{Storage, StorageError};
use crate::{ID_KEY, Metadata};

const ATTACHMENT_KEY: &str = "_attachment";
const BLOB_KEY: &str = "_blob";

/// A storage verb with its typed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch document metadata.
    Get(DocumentRequest),
    /// Create a document.
    Post(PostRequest),
    /// Replace document metadata.
    Put(PutRequest),
    /// Delete a document.
    Remove(DocumentRequest),
    /// List documents.
    AllDocs(AllDocsRequest),
    /// Download an attachment.
    GetAttachment(AttachmentRequest),
    /// Upload an attachment.
    PutAttachment(PutAttachmentRequest),
    /// Delete an attachment.
    RemoveAttachment(AttachmentRequest),
    /// Check a document.
    Check(DocumentRequest),
    /// Repair a document.
    Repair(DocumentRequest),
}

impl Command {
    /// Build a command from a verb name and generic parameters.
    ///
    /// Verb names follow the generic storage interface: `get`, `post`, `put`,
    /// `remove`, `allDocs`, `getAttachment`, `putAttachment`,
    /// `removeAttachment`, `check`, `repair`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotImplemented`](crate::StorageErrorKind)
    /// for unknown verbs. Missing identifiers are not rejected here; the
    /// backend reports them when the command runs.
    pub fn from_params(
        verb: &str,
        mut params: Metadata,
        options: &Options,
    ) -> Result<Self, StorageError> {
        let command = match verb {
            "get" => Self::Get(document_request(&params)),
            "post" => Self::Post(PostRequest {
                metadata: params,
                space: options.space.clone(),
            }),
            "put" => Self::Put(PutRequest::from_params(params)),
            "remove" => Self::Remove(document_request(&params)),
            "allDocs" => Self::AllDocs(AllDocsRequest {
                space: options
                    .space
                    .clone()
                    .or_else(|| string_param(&params, "space")),
                include_docs: options.include_docs,
            }),
            "getAttachment" => Self::GetAttachment(attachment_request(&params)),
            "putAttachment" => {
                let blob = params.remove(BLOB_KEY).map(blob_bytes).unwrap_or_default();
                let request = attachment_request(&params);
                Self::PutAttachment(PutAttachmentRequest {
                    id: request.id,
                    attachment: request.attachment,
                    blob,
                })
            }
            "removeAttachment" => Self::RemoveAttachment(attachment_request(&params)),
            "check" => Self::Check(document_request(&params)),
            "repair" => Self::Repair(document_request(&params)),
            other => return Err(StorageError::not_implemented(other)),
        };
        Ok(command)
    }

    /// Verb name of the command.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::Post(_) => "post",
            Self::Put(_) => "put",
            Self::Remove(_) => "remove",
            Self::AllDocs(_) => "allDocs",
            Self::GetAttachment(_) => "getAttachment",
            Self::PutAttachment(_) => "putAttachment",
            Self::RemoveAttachment(_) => "removeAttachment",
            Self::Check(_) => "check",
            Self::Repair(_) => "repair",
        }
    }
}

/// Run a command against a storage.
///
/// Exactly one outcome is produced per command.
///
/// # Errors
///
/// Returns whatever error the storage reports for the verb.
pub fn dispatch(storage: &dyn Storage, command: Command) -> Result<Response, StorageError> {
    debug!("Dispatching {}", command.verb());

    match command {
        Command::Get(request) => storage.get(&request).map(Response::Document),
        Command::Post(request) => storage.post(request).map(Response::Created),
        Command::Put(request) => storage.put(request).map(|()| Response::NoContent),
        Command::Remove(request) => storage.remove(&request).map(|()| Response::NoContent),
        Command::AllDocs(request) => storage.all_docs(&request).map(Response::List),
        Command::GetAttachment(request) => {
            storage.get_attachment(&request).map(Response::Attachment)
        }
        Command::PutAttachment(request) => {
            storage.put_attachment(request).map(|()| Response::NoContent)
        }
        Command::RemoveAttachment(request) => storage
            .remove_attachment(&request)
            .map(|()| Response::NoContent),
        Command::Check(request) => storage.check(&request).map(|()| Response::NoContent),
        Command::Repair(request) => storage.repair(&request).map(|()| Response::NoContent),
    }
}

fn string_param(params: &Metadata, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn document_request(params: &Metadata) -> DocumentRequest {
    DocumentRequest {
        id: string_param(params, ID_KEY),
    }
}

fn attachment_request(params: &Metadata) -> AttachmentRequest {
    AttachmentRequest {
        id: string_param(params, ID_KEY),
        attachment: string_param(params, ATTACHMENT_KEY),
    }
}

/// Blob content from a JSON value: a string is taken as UTF-8 bytes, an array
/// as a byte list. Out-of-range array items are skipped.
fn blob_bytes(value: Value) -> Vec<u8> {
    match value {
        Value::String(text) => text.into_bytes(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_u64)
            .filter_map(|n| u8::try_from(n).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::StorageErrorKind;
    use crate::response::{Created, ListResult, Row};

    fn params(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    /// Storage that records the verbs it receives.
    #[derive(Default)]
    struct RecordingStorage {
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingStorage {
        fn record(&self, verb: &'static str) {
            self.calls.lock().unwrap().push(verb);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Storage for RecordingStorage {
        fn get(&self, request: &DocumentRequest) -> Result<Metadata, StorageError> {
            self.record("get");
            let id = request.require_id()?;
            Ok(params(json!({"_id": id})))
        }

        fn post(&self, _request: PostRequest) -> Result<Created, StorageError> {
            self.record("post");
            Ok(Created {
                id: "JIO.1".to_owned(),
            })
        }

        fn put(&self, request: PutRequest) -> Result<(), StorageError> {
            self.record("put");
            request.require_id()?;
            Ok(())
        }

        fn remove(&self, _request: &DocumentRequest) -> Result<(), StorageError> {
            self.record("remove");
            Ok(())
        }

        fn all_docs(&self, _request: &AllDocsRequest) -> Result<ListResult, StorageError> {
            self.record("allDocs");
            Ok(ListResult::from_rows(vec![Row::new("JIO.1")]))
        }

        fn get_attachment(&self, _request: &AttachmentRequest) -> Result<Vec<u8>, StorageError> {
            self.record("getAttachment");
            Ok(b"data".to_vec())
        }

        fn put_attachment(&self, _request: PutAttachmentRequest) -> Result<(), StorageError> {
            self.record("putAttachment");
            Ok(())
        }
    }

    #[test]
    fn test_from_params_get() {
        let command =
            Command::from_params("get", params(json!({"_id": "Blog.A"})), &Options::default())
                .unwrap();

        assert_eq!(command, Command::Get(DocumentRequest::new("Blog.A")));
    }

    #[test]
    fn test_from_params_post_uses_option_space() {
        let options = Options {
            space: Some("Blog".to_owned()),
            ..Options::default()
        };

        let command =
            Command::from_params("post", params(json!({"title": "Hello"})), &options).unwrap();

        assert_eq!(
            command,
            Command::Post(PostRequest {
                metadata: params(json!({"title": "Hello"})),
                space: Some("Blog".to_owned()),
            })
        );
    }

    #[test]
    fn test_from_params_all_docs_falls_back_to_param_space() {
        let options = Options {
            include_docs: true,
            space: None,
        };

        let command =
            Command::from_params("allDocs", params(json!({"space": "Blog"})), &options).unwrap();

        assert_eq!(
            command,
            Command::AllDocs(AllDocsRequest {
                space: Some("Blog".to_owned()),
                include_docs: true,
            })
        );
    }

    #[test]
    fn test_from_params_put_attachment_string_blob() {
        let command = Command::from_params(
            "putAttachment",
            params(json!({"_id": "Blog.A", "_attachment": "a.txt", "_blob": "hi"})),
            &Options::default(),
        )
        .unwrap();

        assert_eq!(
            command,
            Command::PutAttachment(PutAttachmentRequest {
                id: Some("Blog.A".to_owned()),
                attachment: Some("a.txt".to_owned()),
                blob: b"hi".to_vec(),
            })
        );
    }

    #[test]
    fn test_blob_bytes_from_array() {
        assert_eq!(blob_bytes(json!([1, 2, 300, 255])), vec![1, 2, 255]);
    }

    #[test]
    fn test_from_params_unknown_verb() {
        let err =
            Command::from_params("sync", Metadata::new(), &Options::default()).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotImplemented);
        assert_eq!(err.message(), Some("sync not implemented"));
    }

    #[test]
    fn test_dispatch_get() {
        let storage = RecordingStorage::default();

        let response = dispatch(&storage, Command::Get(DocumentRequest::new("Blog.A"))).unwrap();

        assert_eq!(response, Response::Document(params(json!({"_id": "Blog.A"}))));
        assert_eq!(storage.calls(), vec!["get"]);
    }

    #[test]
    fn test_dispatch_put_maps_to_no_content() {
        let storage = RecordingStorage::default();
        let request = PutRequest::from_params(params(json!({"_id": "Blog.A", "x": 1})));

        let response = dispatch(&storage, Command::Put(request)).unwrap();

        assert_eq!(response, Response::NoContent);
    }

    #[test]
    fn test_dispatch_put_without_id_fails() {
        let storage = RecordingStorage::default();

        let err = dispatch(&storage, Command::Put(PutRequest::default())).unwrap_err();

        assert_eq!(err.message(), Some("Document ID not specified"));
    }

    #[test]
    fn test_dispatch_unimplemented_defaults() {
        let storage = RecordingStorage::default();

        let remove_attachment = dispatch(
            &storage,
            Command::RemoveAttachment(AttachmentRequest::new("Blog.A", "a.txt")),
        )
        .unwrap_err();
        let check = dispatch(&storage, Command::Check(DocumentRequest::new("Blog.A"))).unwrap_err();
        let repair =
            dispatch(&storage, Command::Repair(DocumentRequest::new("Blog.A"))).unwrap_err();

        assert_eq!(
            remove_attachment.message(),
            Some("REMOVE ATTACHMENT not implemented")
        );
        assert_eq!(check.message(), Some("CHECK not implemented"));
        assert_eq!(repair.message(), Some("REPAIR not implemented"));
        assert!(storage.calls().is_empty());
    }

    #[test]
    fn test_verb_round_trips_through_from_params() {
        let verbs = [
            "get",
            "post",
            "put",
            "remove",
            "allDocs",
            "getAttachment",
            "putAttachment",
            "removeAttachment",
            "check",
            "repair",
        ];

        for verb in verbs {
            let command = Command::from_params(verb, Metadata::new(), &Options::default()).unwrap();
            assert_eq!(command.verb(), verb);
        }
    }
}
