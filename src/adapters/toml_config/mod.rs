// TOML config adapter - Configuration loaded from TOML files and the environment

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RecutError, RecutResult};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "recut.toml";

/// Effective runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub log_level: String,
    /// Codec for the final output
    pub video_codec: String,
    /// Audio codec for intermediate clips
    pub audio_codec: String,
    /// x264-style preset for intermediate clips
    pub preset: String,
    /// Constant rate factor for intermediate clips (0-51)
    pub crf: u8,
    /// Concurrent extractions; 0 means one per CPU
    pub jobs: usize,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub overwrite: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 18,
            jobs: 1,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            overwrite: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    recut: AppConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse the `[recut]` table of a TOML document
    pub fn parse(content: &str) -> RecutResult<AppConfig> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| RecutError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })?;
        Ok(file.recut)
    }

    /// Load configuration from file
    pub fn load_file(path: &Path) -> RecutResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| RecutError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Override values from `RECUT_*` variables found through `lookup`
    pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> RecutResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = 0;

        if let Some(value) = lookup("RECUT_LOG_LEVEL") {
            config.log_level = value;
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_VIDEO_CODEC") {
            config.video_codec = value;
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_AUDIO_CODEC") {
            config.audio_codec = value;
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_PRESET") {
            config.preset = value;
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_CRF") {
            config.crf = parse_env("RECUT_CRF", &value)?;
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_JOBS") {
            config.jobs = parse_env("RECUT_JOBS", &value)?;
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_FFMPEG") {
            config.ffmpeg_path = PathBuf::from(value);
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_FFPROBE") {
            config.ffprobe_path = PathBuf::from(value);
            overrides += 1;
        }
        if let Some(value) = lookup("RECUT_OVERWRITE") {
            config.overwrite = parse_env("RECUT_OVERWRITE", &value)?;
            overrides += 1;
        }

        Ok(overrides)
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> RecutResult<()> {
        if config.crf > 51 {
            return Err(RecutError::Config {
                message: format!("CRF value cannot exceed 51 (got {})", config.crf),
            });
        }
        if config.video_codec.trim().is_empty() {
            return Err(RecutError::Config {
                message: "video codec must not be empty".to_string(),
            });
        }
        match config.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(RecutError::Config {
                message: format!(
                    "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                    other
                ),
            }),
        }
    }
}

fn parse_env<T>(key: &str, value: &str) -> RecutResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| RecutError::Config {
        message: format!("Invalid value for {}: {} ({})", key, value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [recut]
            video_codec = "libx265"
            jobs = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.video_codec, "libx265");
        assert_eq!(config.jobs, 4);
        assert_eq!(config.crf, 18);
        assert_eq!(config.audio_codec, "aac");
    }

    #[test]
    fn test_parse_empty_file() {
        assert_eq!(TomlConfigAdapter::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = TomlConfigAdapter::parse("[recut]\ncodec = \"x\"\n").unwrap_err();
        assert!(matches!(err, RecutError::Config { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[recut]\noverwrite = true\n").unwrap();

        let config = TomlConfigAdapter::load_file(&path).unwrap();
        assert!(config.overwrite);

        assert!(TomlConfigAdapter::load_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RECUT_CRF", "23"),
            ("RECUT_JOBS", "0"),
            ("RECUT_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let applied =
            TomlConfigAdapter::apply_env(&mut config, |key| env.get(key).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(config.crf, 23);
        assert_eq!(config.jobs, 0);
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = AppConfig::default();
        let result = TomlConfigAdapter::apply_env(&mut config, |key| {
            (key == "RECUT_OVERWRITE").then(|| "sometimes".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TomlConfigAdapter::validate(&AppConfig::default()).is_ok());

        let mut config = AppConfig::default();
        config.crf = 60;
        assert!(TomlConfigAdapter::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.log_level = "loud".to_string();
        assert!(TomlConfigAdapter::validate(&config).is_err());
    }
}
