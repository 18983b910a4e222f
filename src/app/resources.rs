// Scoped ownership of adapter handles
//
// Each guard hands its handle back to the adapter on drop, on both the success
// and the error path.

use std::ops::Deref;
use std::path::Path;

use crate::domain::errors::MediaError;
use crate::domain::model::{ClipUnit, OutputVideo, SourceMedia};
use crate::ports::{Decodable, Encodable};

/// An opened source, released on drop
pub struct SourceGuard<'a> {
    decoder: &'a dyn Decodable,
    source: SourceMedia,
}

impl<'a> SourceGuard<'a> {
    pub async fn open(decoder: &'a dyn Decodable, path: &Path) -> Result<Self, MediaError> {
        let source = decoder.open(path).await?;
        Ok(Self { decoder, source })
    }
}

impl Deref for SourceGuard<'_> {
    type Target = SourceMedia;

    fn deref(&self) -> &SourceMedia {
        &self.source
    }
}

impl Drop for SourceGuard<'_> {
    fn drop(&mut self) {
        self.decoder.release_source(&self.source);
    }
}

/// Clip units awaiting concatenation, released on drop
pub struct ClipSet<'a> {
    decoder: &'a dyn Decodable,
    clips: Vec<ClipUnit>,
}

impl<'a> ClipSet<'a> {
    pub fn new(decoder: &'a dyn Decodable, capacity: usize) -> Self {
        Self {
            decoder,
            clips: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, clip: ClipUnit) {
        self.clips.push(clip);
    }

    /// Restore plan order after out-of-order completion
    pub fn sort_by_plan(&mut self) {
        self.clips.sort_by_key(|clip| clip.index);
    }

    pub fn as_slice(&self) -> &[ClipUnit] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl Drop for ClipSet<'_> {
    fn drop(&mut self) {
        for clip in self.clips.drain(..) {
            self.decoder.release_clip(&clip);
        }
    }
}

/// A concatenated video, released on drop
pub struct OutputGuard<'a> {
    encoder: &'a dyn Encodable,
    video: OutputVideo,
}

impl<'a> OutputGuard<'a> {
    pub fn new(encoder: &'a dyn Encodable, video: OutputVideo) -> Self {
        Self { encoder, video }
    }
}

impl Deref for OutputGuard<'_> {
    type Target = OutputVideo;

    fn deref(&self) -> &OutputVideo {
        &self.video
    }
}

impl Drop for OutputGuard<'_> {
    fn drop(&mut self) {
        self.encoder.release_output(&self.video);
    }
}
