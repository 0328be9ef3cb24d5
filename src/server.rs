//! # RPC Server
//!
//! Binds the transport-agnostic handlers to the generated tonic `FileService`.
//!
//! ## Responsibilities
//!
//! - **Stream adaptation**: tonic `Streaming` input becomes a chunk stream;
//!   download chunk streams become response streams
//! - **Error mapping**: `AppError` becomes a `tonic::Status` carrying the
//!   matching code and the verbatim message
//! - **Request spans**: every call runs in its own span with a request id
//! - **Lifecycle**: bind, serve, and drain on shutdown
//!
//! ## Supported Methods
//!
//! - `UploadFile` - client-streaming upload
//! - `DownloadFile` - server-streaming download
//! - `ListFiles` - unary catalog query

use std::future::Future;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status, Streaming};
use tracing::Instrument;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::handlers::FileTransferService;
use crate::logging::{log_failure, request_span};
use crate::models::UploadChunk;
use crate::protocol::{
    DownloadFileRequest, DownloadFileResponse, FileInfo, FileService, FileServiceServer,
    ListFilesRequest, ListFilesResponse, UploadFileRequest, UploadFileResponse,
};

type ResponseStream = Pin<Box<dyn Stream<Item = Result<DownloadFileResponse, Status>> + Send>>;

#[tonic::async_trait]
impl FileService for FileTransferService {
    async fn upload_file(
        &self,
        request: Request<Streaming<UploadFileRequest>>,
    ) -> Result<Response<UploadFileResponse>, Status> {
        let span = request_span("UploadFile");
        let chunks = request.into_inner().map(|message| {
            message
                .map(UploadChunk::from)
                .map_err(|status| AppError::transport("failed to receive file", status.message()))
        });

        match self.upload(chunks).instrument(span.clone()).await {
            Ok(receipt) => Ok(Response::new(UploadFileResponse {
                message: receipt.message,
            })),
            Err(error) => {
                span.in_scope(|| log_failure("UploadFile", &error));
                Err(error.into())
            }
        }
    }

    type DownloadFileStream = ResponseStream;

    async fn download_file(
        &self,
        request: Request<DownloadFileRequest>,
    ) -> Result<Response<Self::DownloadFileStream>, Status> {
        let span = request_span("DownloadFile");
        let filename = request.into_inner().filename;

        match self.download(&filename).instrument(span.clone()).await {
            Ok(chunks) => {
                let responses = chunks.map(|chunk| {
                    chunk
                        .map(|content| DownloadFileResponse { content })
                        .map_err(Status::from)
                });
                Ok(Response::new(Box::pin(responses) as ResponseStream))
            }
            Err(error) => {
                span.in_scope(|| log_failure("DownloadFile", &error));
                Err(error.into())
            }
        }
    }

    async fn list_files(
        &self,
        _request: Request<ListFilesRequest>,
    ) -> Result<Response<ListFilesResponse>, Status> {
        let span = request_span("ListFiles");

        match self.list().instrument(span.clone()).await {
            Ok(objects) => Ok(Response::new(ListFilesResponse {
                files: objects.into_iter().map(FileInfo::from).collect(),
            })),
            Err(error) => {
                span.in_scope(|| log_failure("ListFiles", &error));
                Err(error.into())
            }
        }
    }
}

/// Serves on `config.listen_addr` until `shutdown` resolves.
pub async fn serve<F>(config: &Config, service: FileTransferService, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send,
{
    let addr = config.socket_addr()?;
    tracing::info!(%addr, "file service listening");

    Server::builder()
        .add_service(FileServiceServer::new(service))
        .serve_with_shutdown(addr, shutdown)
        .await
        .map_err(|e| AppError::internal("server error", e))
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    service: FileTransferService,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "file service listening");
    }

    Server::builder()
        .add_service(FileServiceServer::new(service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .map_err(|e| AppError::internal("server error", e))
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining in-flight calls");
}
