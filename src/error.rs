//! Application error types

use thiserror::Error;

use crate::introspect::IntrospectError;

/// Errors surfaced by the descgen application layer
#[derive(Error, Debug)]
pub enum DescGenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Introspection failed: {0}")]
    Introspection(#[from] IntrospectError),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for the main application
pub type DescGenResult<T> = Result<T, DescGenError>;
