//! Error types for fabtree

use std::fmt;

#[derive(Debug, Clone)]
pub enum ExplorerError {
    BackendError { status: u16, message: String },
    HttpError(String),
    DecodeError(String),
    CaError(String),
    AuthorizationError(String),
    WalletError(String),
    AdminNotEnrolled,
    IoError(String),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExplorerError::BackendError { status, message } => {
                write!(f, "Backend error (HTTP {}): {}", status, message)
            }
            ExplorerError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ExplorerError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            ExplorerError::CaError(msg) => write!(f, "CA error: {}", msg),
            ExplorerError::AuthorizationError(msg) => write!(f, "Authorization error: {}", msg),
            ExplorerError::WalletError(msg) => write!(f, "Wallet error: {}", msg),
            ExplorerError::AdminNotEnrolled => {
                write!(
                    f,
                    "Admin identity not found or not enrolled. Run 'fabtree-enroll-admin' first"
                )
            }
            ExplorerError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ExplorerError {}

impl From<std::io::Error> for ExplorerError {
    fn from(err: std::io::Error) -> Self {
        ExplorerError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::DecodeError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ExplorerError>;
