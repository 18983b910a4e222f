//! Error handling module for Recut

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::{MaterializationError, MediaError, PlanError};

/// Main error type for Recut operations
#[derive(Error, Debug)]
pub enum RecutError {
    /// Duration constraints are infeasible
    #[error(transparent)]
    InvalidRange(#[from] PlanError),

    /// A fragment could not be extracted
    #[error(transparent)]
    Materialization(#[from] MaterializationError),

    /// Open, concatenate or encode failed in the media adapter
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Output already exists and overwriting is disabled
    #[error("Output file already exists: {path} (use --overwrite to replace it)")]
    OutputExists { path: PathBuf },

    /// Output would replace the input
    #[error("Output path must differ from input path: {path}")]
    OutputIsInput { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Recut operations
pub type RecutResult<T> = std::result::Result<T, RecutError>;
