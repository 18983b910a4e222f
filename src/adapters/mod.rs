// Adapters - External system implementations

pub mod ffmpeg_media;
pub mod mock_media;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use ffmpeg_media::{FfmpegMediaAdapter, FfmpegSettings};
pub use mock_media::{MockMediaAdapter, RecordingReporter};
pub use toml_config::{AppConfig, TomlConfigAdapter};
pub use tracing_log::TracingProgressAdapter;
