//! Generates the `FileService` client and server stubs.
//!
//! The wire messages are declared by hand with `prost` derives in
//! `src/protocol.rs`, so the service is described with the manual builder and
//! no protobuf compiler is needed at build time.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic::codec::ProstCodec";

fn main() {
    let file_service = Service::builder()
        .name("FileService")
        .package("memenow.storage.v1")
        .comment("Chunked file upload, download and listing.")
        .method(
            Method::builder()
                .name("upload_file")
                .route_name("UploadFile")
                .comment("Streams file content to the server and commits it under one filename.")
                .input_type("crate::protocol::UploadFileRequest")
                .output_type("crate::protocol::UploadFileResponse")
                .codec_path(CODEC)
                .client_streaming()
                .build(),
        )
        .method(
            Method::builder()
                .name("download_file")
                .route_name("DownloadFile")
                .comment("Streams a stored file back in fixed-size chunks.")
                .input_type("crate::protocol::DownloadFileRequest")
                .output_type("crate::protocol::DownloadFileResponse")
                .codec_path(CODEC)
                .server_streaming()
                .build(),
        )
        .method(
            Method::builder()
                .name("list_files")
                .route_name("ListFiles")
                .comment("Lists every stored file with its timestamps.")
                .input_type("crate::protocol::ListFilesRequest")
                .output_type("crate::protocol::ListFilesResponse")
                .codec_path(CODEC)
                .build(),
        )
        .build();

    Builder::new().compile(&[file_service]);

    println!("cargo:rerun-if-changed=build.rs");
}
