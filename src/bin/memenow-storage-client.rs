//! Example client driver: upload a local file, list the catalog, download a file.
//!
//! ```text
//! memenow-storage-client upload ./report.pdf
//! memenow-storage-client list
//! memenow-storage-client download report.pdf ./copy.pdf
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;
use tonic::transport::Channel;

use memenow_storage_grpc::constants::{DEFAULT_SERVER_ENDPOINT, UPLOAD_CHUNK_SIZE};
use memenow_storage_grpc::protocol::{
    DownloadFileRequest, FileServiceClient, ListFilesRequest, UploadFileRequest,
};

#[derive(Debug, Parser)]
#[command(name = "memenow-storage-client", version, about = "gRPC file transfer client")]
struct Cli {
    /// Server endpoint
    #[arg(long, default_value = DEFAULT_SERVER_ENDPOINT)]
    addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a local file under its base name
    Upload { path: PathBuf },
    /// List stored files
    List,
    /// Download a stored file to a local path
    Download { filename: String, output: PathBuf },
}

/// Splits `content` into upload messages all carrying `filename`.
///
/// An empty file still sends one message so the server learns the filename.
fn upload_requests(filename: &str, content: &[u8]) -> Vec<UploadFileRequest> {
    if content.is_empty() {
        return vec![UploadFileRequest {
            filename: filename.to_string(),
            content: Vec::new(),
        }];
    }

    content
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(|piece| UploadFileRequest {
            filename: filename.to_string(),
            content: piece.to_vec(),
        })
        .collect()
}

async fn upload(client: &mut FileServiceClient<Channel>, path: &Path) -> Result<()> {
    let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("{} has no usable file name", path.display());
    };

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let requests = upload_requests(filename, &content);
    let response = client
        .upload_file(futures::stream::iter(requests))
        .await
        .context("upload failed")?;

    println!("Upload response: {}", response.into_inner().message);
    Ok(())
}

async fn list(client: &mut FileServiceClient<Channel>) -> Result<()> {
    let response = client
        .list_files(ListFilesRequest {})
        .await
        .context("list failed")?;

    for file in response.into_inner().files {
        println!("{}\t{}\t{}", file.filename, file.created_at, file.updated_at);
    }
    Ok(())
}

async fn download(
    client: &mut FileServiceClient<Channel>,
    filename: String,
    output: &Path,
) -> Result<()> {
    let mut stream = client
        .download_file(DownloadFileRequest { filename })
        .await
        .context("download failed")?
        .into_inner();

    let mut file = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("failed to create {}", output.display()))?;

    let mut bytes = 0usize;
    while let Some(chunk) = stream.message().await.context("download interrupted")? {
        file.write_all(&chunk.content).await?;
        bytes += chunk.content.len();
    }
    file.flush().await?;

    println!("Downloaded {} bytes to {}", bytes, output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut client = FileServiceClient::connect(cli.addr.clone())
        .await
        .with_context(|| format!("failed to connect to {}", cli.addr))?;

    match cli.command {
        Command::Upload { path } => upload(&mut client, &path).await,
        Command::List => list(&mut client).await,
        Command::Download { filename, output } => download(&mut client, filename, &output).await,
    }
}
