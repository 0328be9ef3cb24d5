//! Wire messages and generated `FileService` stubs.
//!
//! Field tags are part of the wire contract; never renumber them.

use crate::models::{ObjectInfo, UploadChunk};
use crate::utils::format_timestamp;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadFileRequest {
    #[prost(string, tag = "1")]
    pub filename: String,
    #[prost(bytes = "vec", tag = "2")]
    pub content: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadFileResponse {
    #[prost(string, tag = "1")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadFileRequest {
    #[prost(string, tag = "1")]
    pub filename: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadFileResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub content: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListFilesRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileInfo {
    #[prost(string, tag = "1")]
    pub filename: String,
    #[prost(string, tag = "2")]
    pub created_at: String,
    #[prost(string, tag = "3")]
    pub updated_at: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListFilesResponse {
    #[prost(message, repeated, tag = "1")]
    pub files: Vec<FileInfo>,
}

/// Generated gRPC bindings for the file service.
#[allow(clippy::all)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/memenow.storage.v1.FileService.rs"));
}

pub use generated::file_service_client::FileServiceClient;
pub use generated::file_service_server::{FileService, FileServiceServer};

impl From<UploadFileRequest> for UploadChunk {
    fn from(request: UploadFileRequest) -> Self {
        Self {
            filename: request.filename,
            content: request.content,
        }
    }
}

impl From<ObjectInfo> for FileInfo {
    fn from(object: ObjectInfo) -> Self {
        Self {
            filename: object.name,
            created_at: format_timestamp(&object.created_at),
            updated_at: format_timestamp(&object.modified_at),
        }
    }
}
