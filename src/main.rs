//! Recut Video Remixer
//!
//! Builds a new video out of randomized fragments of a source video.
//!
//! # Usage
//!
//! ```bash
//! recut random-cuts input.mp4 output.mp4 --min-duration 1 --max-duration 2 --total-duration 30
//! recut shuffle input.mp4 output.mp4 --min-duration 1 --max-duration 3 --seed 7
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use recut_cli::cli::{commands, Cli};
use recut_cli::config_initialization::initialize_configuration;
use recut_cli::utils::logging::init_logging;

/// Main entry point for the Recut CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration(&cli)?;

    // Initialize logging
    init_logging(&config.log_level, cli.log_format);
    info!("Starting Recut video remixer");

    commands::execute(cli, config).await
}
