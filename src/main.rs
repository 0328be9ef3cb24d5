//! Server entry point.
//!
//! Startup order: parse flags, load and validate configuration, install the
//! logger, open the storage directory, build the admission pools, serve until
//! Ctrl-C or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use memenow_storage_grpc::constants::SERVICE_NAME;
use memenow_storage_grpc::logging::init_logging;
use memenow_storage_grpc::server::{serve, shutdown_signal};
use memenow_storage_grpc::{Config, FileTransferService, FsObjectStore};

#[derive(Debug, Parser)]
#[command(name = "memenow-storage-server", version, about = "gRPC file transfer server")]
struct Args {
    /// JSON configuration file; defaults apply to anything it omits
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding stored files (overrides the config file)
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:50051 (overrides the config file)
    #[arg(long)]
    listen: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(storage_dir) = self.storage_dir {
            config.storage_dir = storage_dir;
        }
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config.logging)?;

    tracing::info!(
        service = SERVICE_NAME,
        storage_dir = %config.storage_dir.display(),
        max_transfer_connections = config.max_transfer_connections,
        max_list_connections = config.max_list_connections,
        "starting"
    );

    let store = FsObjectStore::new(&config.storage_dir)
        .await
        .with_context(|| format!("failed to prepare {}", config.storage_dir.display()))?;
    let service = FileTransferService::from_config(Arc::new(store), &config);

    serve(&config, service, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}
