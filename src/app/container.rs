use std::sync::Arc;

use crate::adapters::{FfmpegMediaAdapter, FfmpegSettings, TracingProgressAdapter};
use crate::adapters::toml_config::AppConfig;
use crate::app::remix_interactor::RemixInteractor;
use crate::error::RecutResult;
use crate::ports::{Decodable, Encodable, ProgressReporter};

pub trait AppContainer: Send + Sync {
    fn remix_interactor(&self) -> Arc<RemixInteractor>;
}

pub struct DefaultAppContainer {
    remix_interactor: Arc<RemixInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> RecutResult<Self> {
        let media_adapter = Arc::new(FfmpegMediaAdapter::new(FfmpegSettings {
            ffmpeg: config.ffmpeg_path.clone(),
            ffprobe: config.ffprobe_path.clone(),
            audio_codec: config.audio_codec.clone(),
            preset: config.preset.clone(),
            crf: config.crf,
        })?);
        let progress_adapter = Arc::new(TracingProgressAdapter::new());

        let remix_interactor = Arc::new(
            RemixInteractor::new(
                Arc::clone(&media_adapter) as Arc<dyn Decodable>,
                Arc::clone(&media_adapter) as Arc<dyn Encodable>,
                Arc::clone(&progress_adapter) as Arc<dyn ProgressReporter>,
            )
            .with_jobs(config.jobs),
        );

        Ok(Self { remix_interactor })
    }
}

impl AppContainer for DefaultAppContainer {
    fn remix_interactor(&self) -> Arc<RemixInteractor> {
        Arc::clone(&self.remix_interactor)
    }
}
