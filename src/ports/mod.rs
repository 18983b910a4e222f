// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::MediaError;
use crate::domain::model::*;

/// Port for opening a source and cutting intervals out of it
#[async_trait]
pub trait Decodable: Send + Sync {
    /// Open a source video
    async fn open(&self, path: &Path) -> Result<SourceMedia, MediaError>;

    /// Total playable seconds of an opened source
    fn duration(&self, source: &SourceMedia) -> f64 {
        source.duration()
    }

    /// Materialize `[start, end)` of the source as a clip unit
    async fn extract(
        &self,
        source: &SourceMedia,
        index: usize,
        interval: Interval,
    ) -> Result<ClipUnit, MediaError>;

    /// Release an opened source. Calling it more than once is harmless.
    fn release_source(&self, source: &SourceMedia);

    /// Release a clip unit. Calling it more than once is harmless.
    fn release_clip(&self, clip: &ClipUnit);
}

/// Port for joining clip units and encoding the result
#[async_trait]
pub trait Encodable: Send + Sync {
    /// Join clips in the order given
    async fn concatenate(&self, clips: &[ClipUnit]) -> Result<OutputVideo, MediaError>;

    /// Encode the joined video to its final destination
    async fn write(&self, video: &OutputVideo, path: &Path, codec: &str)
        -> Result<(), MediaError>;

    /// Release a joined video. Calling it more than once is harmless.
    fn release_output(&self, video: &OutputVideo);
}

/// Port for user-facing progress notifications
pub trait ProgressReporter: Send + Sync {
    /// A major phase of the run has started
    fn phase(&self, phase: Phase, detail: &str);

    /// A fragment has been materialized
    fn fragment(&self, progress: &FragmentProgress);
}

/// Progress after one fragment extraction
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentProgress {
    /// One-based count of fragments done
    pub count: usize,
    pub planned: usize,
    pub interval: Interval,
    pub duration: f64,
    /// Cumulative duration of all fragments done so far
    pub total: f64,
}
