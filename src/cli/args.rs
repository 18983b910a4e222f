//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments shared by both remix commands
#[derive(Args, Debug, Clone)]
pub struct FragmentArgs {
    /// Input video file path
    pub input_file: PathBuf,

    /// Output video file path
    pub output_file: PathBuf,

    /// Minimum duration for each fragment (seconds)
    #[arg(long, default_value_t = 1.0, value_parser = parse_seconds)]
    pub min_duration: f64,

    /// Maximum duration for each fragment (seconds)
    #[arg(long, default_value_t = 2.0, value_parser = parse_seconds)]
    pub max_duration: f64,

    /// Seed for reproducible fragment selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Concurrent fragment extractions (0 = one per CPU)
    #[arg(long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Print the fragment plan without producing a video
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the random-cuts command
#[derive(Args, Debug, Clone)]
pub struct RandomCutsArgs {
    #[command(flatten)]
    pub fragments: FragmentArgs,

    /// Total duration of the output video (seconds, default: source duration)
    #[arg(long, value_parser = parse_seconds)]
    pub total_duration: Option<f64>,
}

/// Arguments for the shuffle command
#[derive(Args, Debug, Clone)]
pub struct ShuffleArgs {
    #[command(flatten)]
    pub fragments: FragmentArgs,
}

/// Parse a strictly positive, finite number of seconds
pub fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("duration must be positive, got {}", value));
    }
    Ok(seconds)
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    clap_num::number_range(value, 0, 256)
}
