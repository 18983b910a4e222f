//! CLI module for Recut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

pub use args::{FragmentArgs, RandomCutsArgs, ShuffleArgs};

/// Recut video remixer
///
/// Builds a new video out of randomized fragments of a source video.
#[derive(Parser, Debug)]
#[command(name = "recut")]
#[command(about = "Recut - Remix a video from randomized fragments")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Configuration file (default: ./recut.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Replace the output file if it already exists
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// Video codec for the final encode
    #[arg(long, global = true)]
    pub video_codec: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample random clips until a target duration is reached
    RandomCuts(RandomCutsArgs),
    /// Split the whole video into fragments and shuffle their order
    Shuffle(ShuffleArgs),
}

impl Commands {
    /// Arguments shared by every command
    pub fn fragment_args(&self) -> &FragmentArgs {
        match self {
            Commands::RandomCuts(args) => &args.fragments,
            Commands::Shuffle(args) => &args.fragments,
        }
    }
}
