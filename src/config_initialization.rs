//! Configuration initialization and hierarchy management

use std::path::Path;

use tracing::info;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::cli::Cli;
use crate::error::RecutResult;

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(cli: &Cli) -> RecutResult<AppConfig> {
    resolve_configuration(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration`] with an injectable environment
pub fn resolve_configuration<F>(cli: &Cli, lookup: F) -> RecutResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1: defaults, overlaid by a config file when one is found
    let mut config = match &cli.config {
        Some(path) => TomlConfigAdapter::load_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            TomlConfigAdapter::load_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => AppConfig::default(),
    };

    // Step 2: environment variables
    let env_overrides = TomlConfigAdapter::apply_env(&mut config, lookup)?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 3: command-line arguments
    apply_cli_overrides(&mut config, cli);

    TomlConfigAdapter::validate(&config)?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(codec) = &cli.video_codec {
        config.video_codec = codec.clone();
    }
    if cli.overwrite {
        config.overwrite = true;
    }
    if let Some(jobs) = cli.command.fragment_args().jobs {
        config.jobs = jobs;
    }
}
