//! Error types for the examiner domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.
//!
//! None of these ever reach an end user directly: the answer pipeline folds
//! generation failures into the returned text. They exist for startup paths
//! (loading the knowledge file, building HTTP clients) and for the provider
//! layer, where the dispatcher decides what to do with them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse knowledge file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write knowledge file at {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}
