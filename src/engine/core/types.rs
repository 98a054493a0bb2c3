use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::profile::TranscodeProfile;

/// Duration and frame rate of an input file, as reported by ffprobe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Container duration in seconds
    pub duration: f64,
    /// Primary video stream frame rate (falls back to a default when unknown)
    pub frame_rate: f64,
}

impl MediaInfo {
    pub fn new(duration: f64, frame_rate: f64) -> Self {
        Self {
            duration,
            frame_rate,
        }
    }

    /// Expected number of frames: `floor(duration * frame_rate)`
    ///
    /// Degenerate inputs (negative, NaN, infinite) yield 0, which the progress
    /// model treats as an indeterminate length.
    pub fn total_frames(&self) -> u64 {
        let frames = (self.duration * self.frame_rate).floor();
        if frames.is_finite() && frames > 0.0 {
            frames as u64
        } else {
            0
        }
    }
}

/// One transcode invocation: input, derived output and the codec profile
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub profile: TranscodeProfile,
}

impl TranscodeJob {
    pub fn new(input_path: PathBuf, output_path: PathBuf, profile: TranscodeProfile) -> Self {
        Self {
            input_path,
            output_path,
            profile,
        }
    }

    /// Arguments passed to ffmpeg for this job
    pub fn ffmpeg_args(&self) -> Vec<std::ffi::OsString> {
        self.profile
            .ffmpeg_args(&self.input_path, &self.output_path)
    }
}

/// Lifecycle of the transcoding child process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildState {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}
