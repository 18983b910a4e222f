//! Recut Video Remixer Library
//!
//! Slices a video into time-bounded fragments and reassembles them, either by
//! sampling random sub-clips up to a target duration or by partitioning the
//! whole source and shuffling the fragments.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{MaterializationError, MediaError, PlanError};
pub use domain::model::{
    ClipUnit, DurationRange, FragmentPlan, Interval, OutputVideo, PlanMode, RemixReport,
    RemixRequest, SourceMedia,
};
pub use error::{RecutError, RecutResult};
