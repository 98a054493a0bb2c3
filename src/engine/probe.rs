// Input probing using ffprobe

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

use super::core::MediaInfo;

/// Frame rate assumed when ffprobe cannot tell us one
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed to read the {entry} of {}: {stderr}", .path.display())]
    Failed {
        program: String,
        entry: ProbeEntry,
        path: PathBuf,
        stderr: String,
    },

    #[error("Failed to parse duration {0:?} as seconds")]
    InvalidDuration(String),
}

/// The two pieces of metadata the progress bound needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEntry {
    Duration,
    FrameRate,
}

impl ProbeEntry {
    /// ffprobe arguments selecting this entry as a bare value
    fn ffprobe_args(self) -> &'static [&'static str] {
        match self {
            ProbeEntry::Duration => &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ],
            ProbeEntry::FrameRate => &[
                "-v",
                "error",
                "-select_streams",
                "v:0", // First video stream only
                "-show_entries",
                "stream=r_frame_rate",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ],
        }
    }
}

impl std::fmt::Display for ProbeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeEntry::Duration => write!(f, "duration"),
            ProbeEntry::FrameRate => write!(f, "frame rate"),
        }
    }
}

/// Source of raw metadata strings for a media file
pub trait MetadataQuery {
    /// Return the trimmed textual value of `entry` for `path`
    fn query(&self, path: &Path, entry: ProbeEntry) -> Result<String, ProbeError>;
}

/// Queries a real ffprobe binary
#[derive(Debug, Clone)]
pub struct FfprobeQuery {
    program: PathBuf,
}

impl FfprobeQuery {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeQuery {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl MetadataQuery for FfprobeQuery {
    fn query(&self, path: &Path, entry: ProbeEntry) -> Result<String, ProbeError> {
        let program = self.program.display().to_string();
        debug!(%program, %entry, path = %path.display(), "probing");

        let output = Command::new(&self.program)
            .args(entry.ffprobe_args())
            .arg(path)
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                program,
                entry,
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Computes duration and frame rate for a file
///
/// A duration failure is fatal; a frame-rate failure only degrades the
/// progress bar, so it falls back to `fallback_frame_rate`.
#[derive(Debug, Clone)]
pub struct MediaProber<Q> {
    query: Q,
    fallback_frame_rate: f64,
}

impl<Q: MetadataQuery> MediaProber<Q> {
    pub fn new(query: Q, fallback_frame_rate: f64) -> Self {
        Self {
            query,
            fallback_frame_rate,
        }
    }

    pub fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError> {
        let raw_duration = self.query.query(path, ProbeEntry::Duration)?;
        let duration = parse_duration(&raw_duration)?;

        let frame_rate = match self.query.query(path, ProbeEntry::FrameRate) {
            Ok(raw) => parse_frame_rate(&raw, self.fallback_frame_rate),
            Err(e) => {
                warn!(
                    "Frame rate unavailable ({}), assuming {} fps",
                    e, self.fallback_frame_rate
                );
                self.fallback_frame_rate
            }
        };

        debug!(duration, frame_rate, "probe complete");
        Ok(MediaInfo::new(duration, frame_rate))
    }
}

/// Parse ffprobe's bare duration value, e.g. "12.500000"
pub fn parse_duration(raw: &str) -> Result<f64, ProbeError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Ok(seconds),
        _ => Err(ProbeError::InvalidDuration(trimmed.to_string())),
    }
}

/// Parse a frame rate given as a decimal ("25") or a fraction ("30000/1001")
///
/// Anything unparsable, a zero denominator, or a non-finite value yields
/// `fallback`.
pub fn parse_frame_rate(raw: &str, fallback: f64) -> f64 {
    let trimmed = raw.trim();
    let parsed = if trimmed.contains('/') {
        parse_fraction(trimmed)
    } else {
        trimmed.parse::<f64>().ok()
    };

    match parsed {
        Some(fps) if fps.is_finite() => fps,
        _ => {
            debug!(raw = trimmed, fallback, "unparsable frame rate");
            fallback
        }
    }
}

/// Parse a fraction string like "30000/1001" to f64
fn parse_fraction(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 {
        return None;
    }

    let numerator: f64 = parts[0].trim().parse().ok()?;
    let denominator: f64 = parts[1].trim().parse().ok()?;

    if denominator == 0.0 {
        return None;
    }

    Some(numerator / denominator)
}
