//! Pipeline Error Types

use crate::schema::SchemaError;
use std::io;
use thiserror::Error;

/// Errors raised while assembling or driving a [`Pipeline`](crate::Pipeline)
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Schema catalog could not be loaded
    #[error("Schema catalog error: {0}")]
    Catalog(#[from] SchemaError),

    /// Fetch job without devices
    #[error("Fetch job '{0}' has no devices")]
    EmptyFetchJob(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
