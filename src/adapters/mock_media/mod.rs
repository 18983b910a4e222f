// Mock media adapter - In-memory stand-in for the ffmpeg adapter
//
// Keeps track of every handle it hands out so callers can check that nothing
// leaks, and can be told to fail at a given step.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::MediaError;
use crate::domain::model::*;
use crate::ports::*;

/// In-memory media adapter
pub struct MockMediaAdapter {
    duration: f64,
    fail_open: bool,
    fail_extract_at: Option<usize>,
    fail_concatenate: bool,
    fail_write: bool,
    reverse_latency: bool,
    state: Mutex<MockState>,
}

/// Everything the mock adapter has observed
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub opened: Vec<PathBuf>,
    pub extracted: Vec<(usize, Interval)>,
    /// Clip indices in the order they were concatenated
    pub concatenated: Vec<usize>,
    pub written: Vec<(PathBuf, String)>,
    pub released: Vec<PathBuf>,
    live: BTreeSet<PathBuf>,
}

impl MockState {
    /// Handles handed out and not yet released
    pub fn live_handles(&self) -> usize {
        self.live.len()
    }
}

impl MockMediaAdapter {
    /// Create a mock whose sources all last `duration` seconds
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            fail_open: false,
            fail_extract_at: None,
            fail_concatenate: false,
            fail_write: false,
            reverse_latency: false,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Fail the extraction of the fragment at plan position `index`
    pub fn failing_extract_at(mut self, index: usize) -> Self {
        self.fail_extract_at = Some(index);
        self
    }

    pub fn failing_concatenate(mut self) -> Self {
        self.fail_concatenate = true;
        self
    }

    pub fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    /// Make earlier fragments take longer to extract than later ones
    pub fn with_reverse_latency(mut self) -> Self {
        self.reverse_latency = true;
        self
    }

    /// Snapshot of the recorded calls
    pub fn snapshot(&self) -> MockState {
        self.state().clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, handle: &Path) {
        let mut state = self.state();
        if state.live.remove(handle) {
            state.released.push(handle.to_path_buf());
        }
    }
}

#[async_trait]
impl Decodable for MockMediaAdapter {
    async fn open(&self, path: &Path) -> Result<SourceMedia, MediaError> {
        if self.fail_open {
            return Err(MediaError::SourceOpen {
                path: path.to_path_buf(),
                reason: "mock open failure".to_string(),
            });
        }
        let mut state = self.state();
        state.opened.push(path.to_path_buf());
        state.live.insert(path.to_path_buf());
        Ok(SourceMedia::new(path, self.duration))
    }

    async fn extract(
        &self,
        source: &SourceMedia,
        index: usize,
        interval: Interval,
    ) -> Result<ClipUnit, MediaError> {
        if !interval.fits_within(source.duration()) {
            return Err(MediaError::ExtractionRange {
                start: interval.start,
                end: interval.end,
                duration: source.duration(),
            });
        }
        if self.reverse_latency {
            let delay = 5 * (64usize.saturating_sub(index)) as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_extract_at == Some(index) {
            return Err(MediaError::Extraction {
                start: interval.start,
                end: interval.end,
                reason: "mock extraction failure".to_string(),
            });
        }

        let location = PathBuf::from(format!("mock://clip/{index}"));
        let mut state = self.state();
        state.extracted.push((index, interval));
        state.live.insert(location.clone());
        Ok(ClipUnit {
            index,
            interval,
            location,
        })
    }

    fn release_source(&self, source: &SourceMedia) {
        self.release(source.path());
    }

    fn release_clip(&self, clip: &ClipUnit) {
        self.release(&clip.location);
    }
}

#[async_trait]
impl Encodable for MockMediaAdapter {
    async fn concatenate(&self, clips: &[ClipUnit]) -> Result<OutputVideo, MediaError> {
        if self.fail_concatenate || clips.is_empty() {
            return Err(MediaError::Concatenation {
                reason: "mock concatenation failure".to_string(),
            });
        }
        let location = PathBuf::from("mock://output");
        let mut state = self.state();
        state.concatenated = clips.iter().map(|clip| clip.index).collect();
        state.live.insert(location.clone());
        Ok(OutputVideo {
            location,
            duration: clips.iter().map(|clip| clip.interval.duration()).sum(),
            clip_count: clips.len(),
        })
    }

    async fn write(&self, _video: &OutputVideo, path: &Path, codec: &str) -> Result<(), MediaError> {
        if self.fail_write {
            return Err(MediaError::Encode {
                path: path.to_path_buf(),
                reason: "mock encode failure".to_string(),
            });
        }
        self.state()
            .written
            .push((path.to_path_buf(), codec.to_string()));
        Ok(())
    }

    fn release_output(&self, video: &OutputVideo) {
        self.release(&video.location);
    }
}

/// Progress reporter that keeps every notification in memory
#[derive(Default)]
pub struct RecordingReporter {
    phases: Mutex<Vec<Phase>>,
    fragments: Mutex<Vec<FragmentProgress>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.phases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fragments(&self) -> Vec<FragmentProgress> {
        self.fragments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn phase(&self, phase: Phase, _detail: &str) {
        self.phases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(phase);
    }

    fn fragment(&self, progress: &FragmentProgress) {
        self.fragments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(progress.clone());
    }
}
