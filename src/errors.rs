use http::StatusCode;
use thiserror::Error;
use tonic::{Code, Status};

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Every failure a call can end in.
///
/// Failures are local to the call that produced them. None of them is retried
/// by the server; the message already carries the underlying cause.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidRequest { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Internal { message: String },
    #[error("{message}")]
    Transport { message: String },
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Folds an underlying cause into an internal error: `"<context>: <cause>"`.
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: format!("{}: {}", context, cause),
        }
    }

    pub fn transport(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: format!("{}: {}", context, cause),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Numeric status of this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Transport { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn grpc_code(&self) -> Code {
        match self {
            AppError::InvalidRequest { .. } => Code::InvalidArgument,
            AppError::NotFound { .. } => Code::NotFound,
            AppError::Internal { .. } | AppError::Config { .. } => Code::Internal,
            AppError::Transport { .. } => Code::Unavailable,
        }
    }
}

impl From<AppError> for Status {
    fn from(error: AppError) -> Self {
        Status::new(error.grpc_code(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_folds_cause_into_message() {
        let err = AppError::internal("failed to save file", "disk full");
        assert_eq!(err.to_string(), "failed to save file: disk full");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_carries_code_and_verbatim_message() {
        let status: Status = AppError::invalid_request("filename is required").into();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "filename is required");

        let status: Status = AppError::not_found("file not found").into();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[test]
    fn transport_failures_map_to_unavailable() {
        let err = AppError::transport("failed to receive file", "connection reset");
        assert_eq!(err.status_code().as_u16(), 503);
        assert_eq!(err.grpc_code(), Code::Unavailable);
    }
}
