//! FFmpeg media adapter
//!
//! Implements the decode and encode ports by running the `ffprobe` and
//! `ffmpeg` executables. Intermediate clips live in a private temporary
//! directory that is removed when the adapter is dropped.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::MediaError;
use crate::domain::model::*;
use crate::ports::*;

/// Container used for intermediate clips and the joined video
const INTERMEDIATE_EXTENSION: &str = "mkv";
/// Codec used for intermediate clips so they can be joined without re-encoding
const INTERMEDIATE_VIDEO_CODEC: &str = "libx264";

/// Encoder settings and executable locations
#[derive(Debug, Clone)]
pub struct FfmpegSettings {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 18,
        }
    }
}

/// FFmpeg-based media adapter
pub struct FfmpegMediaAdapter {
    settings: FfmpegSettings,
    workdir: TempDir,
    joins: AtomicUsize,
}

impl FfmpegMediaAdapter {
    /// Create new FFmpeg adapter with a fresh working directory
    pub fn new(settings: FfmpegSettings) -> std::io::Result<Self> {
        let workdir = tempfile::Builder::new().prefix("recut-").tempdir()?;
        debug!(workdir = %workdir.path().display(), "Created working directory");
        Ok(Self {
            settings,
            workdir,
            joins: AtomicUsize::new(0),
        })
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    fn clip_path(&self, index: usize) -> PathBuf {
        self.workdir
            .path()
            .join(format!("clip_{:05}.{}", index, INTERMEDIATE_EXTENSION))
    }

    /// Arguments for cutting `[start, end)` out of `input`
    pub fn extract_args(&self, input: &Path, interval: Interval, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = base_args();
        args.extend(
            [
                "-ss".to_string(),
                format!("{:.6}", interval.start),
            ]
            .map(OsString::from),
        );
        args.push("-i".into());
        args.push(input.into());
        args.extend(
            [
                "-t".to_string(),
                format!("{:.6}", interval.duration()),
                "-map".to_string(),
                "0:v:0".to_string(),
                "-map".to_string(),
                "0:a:0?".to_string(),
                "-c:v".to_string(),
                INTERMEDIATE_VIDEO_CODEC.to_string(),
                "-preset".to_string(),
                self.settings.preset.clone(),
                "-crf".to_string(),
                self.settings.crf.to_string(),
                "-c:a".to_string(),
                self.settings.audio_codec.clone(),
                "-avoid_negative_ts".to_string(),
                "make_zero".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(output.into());
        args
    }

    /// Arguments for joining the clips named in a concat list
    pub fn concat_args(&self, list: &Path, output: &Path) -> Vec<OsString> {
        let mut args = base_args();
        args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
        args.push(list.into());
        args.extend(["-c", "copy"].map(OsString::from));
        args.push(output.into());
        args
    }

    /// Arguments for the final encode
    pub fn write_args(&self, input: &Path, codec: &str, output: &Path) -> Vec<OsString> {
        let mut args = base_args();
        args.push("-i".into());
        args.push(input.into());
        args.extend(
            [
                "-map",
                "0",
                "-c:v",
                codec,
                "-c:a",
                self.settings.audio_codec.as_str(),
            ]
            .map(OsString::from),
        );
        args.push(output.into());
        args
    }

    /// Run a tool to completion, returning a short reason on failure
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<Vec<u8>, String> {
        debug!(program = %program.display(), ?args, "Running media tool");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", program.display(), e))?;

        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                summarize_stderr(&output.stderr)
            ));
        }
        Ok(output.stdout)
    }

    fn remove(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Released media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove media file"),
        }
    }
}

#[async_trait]
impl Decodable for FfmpegMediaAdapter {
    async fn open(&self, path: &Path) -> Result<SourceMedia, MediaError> {
        let open_error = |reason: String| MediaError::SourceOpen {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(open_error("file not found".to_string()));
        }

        let mut args = ["-v", "error", "-show_entries", "format=duration", "-of", "json"]
            .map(OsString::from)
            .to_vec();
        args.push(path.into());

        let stdout = self
            .run(&self.settings.ffprobe, &args)
            .await
            .map_err(open_error)?;
        let duration = parse_probe_duration(&stdout).map_err(open_error)?;

        Ok(SourceMedia::new(path, duration))
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

        let started = Instant::now();
        let location = self.clip_path(index);
        let args = self.extract_args(source.path(), interval, &location);
        if let Err(reason) = self.run(&self.settings.ffmpeg, &args).await {
            self.remove(&location);
            return Err(MediaError::Extraction {
                start: interval.start,
                end: interval.end,
                reason,
            });
        }

        debug!(
            index,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Extracted clip"
        );
        Ok(ClipUnit {
            index,
            interval,
            location,
        })
    }

    fn release_source(&self, source: &SourceMedia) {
        // The source file is only read, never owned.
        debug!(path = %source.path().display(), "Released source");
    }

    fn release_clip(&self, clip: &ClipUnit) {
        self.remove(&clip.location);
    }
}

#[async_trait]
impl Encodable for FfmpegMediaAdapter {
    async fn concatenate(&self, clips: &[ClipUnit]) -> Result<OutputVideo, MediaError> {
        let failed = |reason: String| MediaError::Concatenation { reason };
        if clips.is_empty() {
            return Err(failed("no clips to concatenate".to_string()));
        }

        let join = self.joins.fetch_add(1, Ordering::Relaxed);
        let list = self.workdir.path().join(format!("concat_{join}.txt"));
        let location = self
            .workdir
            .path()
            .join(format!("joined_{join}.{INTERMEDIATE_EXTENSION}"));

        write_concat_list(&list, clips)
            .map_err(|e| failed(format!("failed to write concat list: {e}")))?;
        let result = self
            .run(&self.settings.ffmpeg, &self.concat_args(&list, &location))
            .await;
        self.remove(&list);
        if let Err(reason) = result {
            self.remove(&location);
            return Err(failed(reason));
        }

        Ok(OutputVideo {
            location,
            duration: clips.iter().map(|clip| clip.interval.duration()).sum(),
            clip_count: clips.len(),
        })
    }

    async fn write(&self, video: &OutputVideo, path: &Path, codec: &str) -> Result<(), MediaError> {
        let failed = |reason: String| MediaError::Encode {
            path: path.to_path_buf(),
            reason,
        };

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mp4".to_string());

        // Encode next to the destination, then move into place in one step.
        let staging = tempfile::Builder::new()
            .prefix(".recut-")
            .suffix(&format!(".{extension}"))
            .tempfile_in(&directory)
            .map_err(|e| failed(format!("cannot create file in {}: {}", directory.display(), e)))?
            .into_temp_path();

        self.run(
            &self.settings.ffmpeg,
            &self.write_args(&video.location, codec, &staging),
        )
        .await
        .map_err(failed)?;

        staging
            .persist(path)
            .map_err(|e| failed(format!("cannot move encoded file into place: {}", e.error)))?;
        Ok(())
    }

    fn release_output(&self, video: &OutputVideo) {
        self.remove(&video.location);
    }
}

fn base_args() -> Vec<OsString> {
    ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
        .map(OsString::from)
        .to_vec()
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Read `format.duration` out of `ffprobe -of json` output
pub fn parse_probe_duration(stdout: &[u8]) -> Result<f64, String> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| format!("unreadable ffprobe output: {}", e))?;
    let raw = probe
        .format
        .and_then(|format| format.duration)
        .ok_or_else(|| "source has no duration".to_string())?;
    let duration: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{}'", raw))?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(format!("source has no playable duration ({})", duration));
    }
    Ok(duration)
}

/// Write an ffmpeg concat-demuxer list naming `clips` in order
fn write_concat_list(list: &Path, clips: &[ClipUnit]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(list)?;
    for clip in clips {
        let escaped = clip.location.to_string_lossy().replace('\'', "'\\''");
        writeln!(file, "file '{}'", escaped)?;
    }
    file.flush()
}

/// Last few non-empty stderr lines, joined on one line
fn summarize_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return "no error output".to_string();
    }
    lines[lines.len().saturating_sub(5)..].join(" | ")
}
