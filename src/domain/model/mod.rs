// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::PlanError;


/// A `[start, end)` time range within the source, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    /// Create a new interval, rejecting empty, reversed or negative ranges
    pub fn new(start: f64, end: f64) -> Result<Self, PlanError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(PlanError::invalid(format!(
                "interval bounds must be finite (got {start}, {end})"
            )));
        }
        if start < 0.0 {
            return Err(PlanError::invalid(format!(
                "interval start {start} is negative"
            )));
        }
        if start >= end {
            return Err(PlanError::invalid(format!(
                "interval start {start} must be less than end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Length of the interval in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check that the interval lies inside `[0, total]`
    pub fn fits_within(&self, total: f64) -> bool {
        self.start >= 0.0 && self.start < self.end && self.end <= total
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end)
    }
}

/// Minimum and maximum fragment length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: f64,
    pub max: f64,
}

impl DurationRange {
    /// Create a range with `0 < min <= max`
    pub fn new(min: f64, max: f64) -> Result<Self, PlanError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PlanError::invalid(format!(
                "fragment durations must be finite (got min {min}, max {max})"
            )));
        }
        if min <= 0.0 {
            return Err(PlanError::invalid(format!(
                "minimum fragment duration must be positive (got {min})"
            )));
        }
        if min > max {
            return Err(PlanError::invalid(format!(
                "minimum fragment duration {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self { min: 1.0, max: 2.0 }
    }
}

/// How fragments are chosen from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanMode {
    /// Sample random, possibly overlapping sub-clips up to a target duration
    RandomCuts,
    /// Partition the whole source and emit the fragments in shuffled order
    PartitionShuffle,
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanMode::RandomCuts => write!(f, "random-cuts"),
            PlanMode::PartitionShuffle => write!(f, "shuffle"),
        }
    }
}

/// Ordered list of intervals to extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentPlan {
    pub mode: PlanMode,
    pub source_duration: f64,
    pub intervals: Vec<Interval>,
    /// Sum of all interval durations
    pub total_duration: f64,
}

impl FragmentPlan {
    pub(crate) fn new(mode: PlanMode, source_duration: f64, intervals: Vec<Interval>) -> Self {
        let total_duration = intervals.iter().map(Interval::duration).sum();
        Self {
            mode,
            source_duration,
            intervals,
            total_duration,
        }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }
}

/// Handle to a decodable source video
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMedia {
    path: PathBuf,
    duration: f64,
}

impl SourceMedia {
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total playable seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// One interval materialized by the adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ClipUnit {
    /// Position of the interval in the plan
    pub index: usize,
    pub interval: Interval,
    pub location: PathBuf,
}

/// Concatenation of every clip unit, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVideo {
    pub location: PathBuf,
    pub duration: f64,
    pub clip_count: usize,
}

/// Run phases reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Generating,
    Extracting,
    Concatenating,
    Writing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Loading => "Loading video",
            Phase::Generating => "Generating fragments",
            Phase::Extracting => "Extracting fragments",
            Phase::Concatenating => "Concatenating clips",
            Phase::Writing => "Writing output",
            Phase::Done => "Done",
        };
        write!(f, "{}", name)
    }
}

/// Everything needed for one remix run
#[derive(Debug, Clone)]
pub struct RemixRequest {
    pub mode: PlanMode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub range: DurationRange,
    /// Random-cuts only; defaults to the source duration
    pub target_duration: Option<f64>,
    pub seed: Option<u64>,
    pub video_codec: String,
    pub overwrite: bool,
}

impl RemixRequest {
    /// Create a request with default codec and no seed
    pub fn new(
        mode: PlanMode,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        range: DurationRange,
    ) -> Self {
        Self {
            mode,
            input: input.into(),
            output: output.into(),
            range,
            target_duration: None,
            seed: None,
            video_codec: "libx264".to_string(),
            overwrite: false,
        }
    }

    pub fn with_target_duration(mut self, target: Option<f64>) -> Self {
        self.target_duration = target;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = codec.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemixReport {
    pub mode: PlanMode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub seed: u64,
    pub fragments: usize,
    pub source_duration: f64,
    pub output_duration: f64,
    pub elapsed_seconds: f64,
    pub finished_at: DateTime<Utc>,
}

/// Plan computed without touching the output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPreview {
    pub input: PathBuf,
    pub seed: u64,
    pub plan: FragmentPlan,
}
