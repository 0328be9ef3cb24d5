//! Structured logging.
//!
//! Output goes through `tracing`. Each RPC call runs inside a span carrying a
//! `request_id` and the operation name, so every line a call emits can be
//! correlated.

use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::generate_unique_identifier;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this twice in one
/// process returns an error instead of panicking.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::config(format!("invalid log level {:?}: {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| AppError::config(format!("failed to install logger: {}", e)))
}

/// Opens the span one RPC call runs in.
pub fn request_span(operation: &'static str) -> Span {
    tracing::info_span!(
        "rpc",
        operation,
        request_id = %generate_unique_identifier(),
    )
}

/// Logs a failed call at the level its kind deserves.
///
/// Caller mistakes are `warn`; server-side and transport failures are `error`.
pub fn log_failure(operation: &'static str, error: &AppError) {
    match error {
        AppError::InvalidRequest { .. } | AppError::NotFound { .. } => {
            tracing::warn!(
                operation,
                status = error.status_code().as_u16(),
                error = %error,
                "request rejected"
            );
        }
        _ => {
            tracing::error!(
                operation,
                status = error.status_code().as_u16(),
                error = %error,
                "request failed"
            );
        }
    }
}
