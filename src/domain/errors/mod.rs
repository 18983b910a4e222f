// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::Interval;

/// Errors raised while building a fragment plan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Duration constraints cannot be satisfied against the source
    #[error("Invalid duration range: {reason}")]
    InvalidRange { reason: String },
}

impl PlanError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PlanError::InvalidRange {
            reason: reason.into(),
        }
    }
}

/// Errors reported by the video I/O adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    /// Source file missing, unreadable or undecodable
    #[error("Failed to open source {path}: {reason}")]
    SourceOpen { path: PathBuf, reason: String },

    /// Requested range lies outside the source
    #[error("Extraction range [{start:.3}, {end:.3}) is outside source duration {duration:.3}s")]
    ExtractionRange { start: f64, end: f64, duration: f64 },

    /// The decoder failed on an otherwise valid range
    #[error("Failed to extract [{start:.3}, {end:.3}): {reason}")]
    Extraction { start: f64, end: f64, reason: String },

    /// Clip units could not be joined
    #[error("Failed to concatenate clips: {reason}")]
    Concatenation { reason: String },

    /// Final encode or file write failed
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

/// An extraction failed part-way through materialization
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Materialization failed at fragment {index} {interval}: {source}")]
pub struct MaterializationError {
    /// Zero-based position of the failing interval in the plan
    pub index: usize,
    pub interval: Interval,
    #[source]
    pub source: MediaError,
}
