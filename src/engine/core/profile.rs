use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_VIDEO_CODEC: &str = "dnxhd";
pub const DEFAULT_VIDEO_PROFILE: &str = "dnxhr_hq";
pub const DEFAULT_PIX_FMT: &str = "yuv422p";
pub const DEFAULT_AUDIO_CODEC: &str = "alac";
pub const DEFAULT_CONTAINER: &str = "mov";
pub const DEFAULT_SUFFIX: &str = "_resolve";

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_video_profile() -> String {
    DEFAULT_VIDEO_PROFILE.to_string()
}
fn default_pix_fmt() -> String {
    DEFAULT_PIX_FMT.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}
fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

/// Codec/container settings baked into the ffmpeg invocation
///
/// The defaults produce DNxHR HQ video in 4:2:2 with ALAC audio inside a
/// QuickTime container, which DaVinci Resolve (free edition included) can
/// decode on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeProfile {
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    #[serde(default = "default_video_profile")]
    pub video_profile: String,
    #[serde(default = "default_pix_fmt")]
    pub pix_fmt: String,
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Output container extension (no leading dot)
    #[serde(default = "default_container")]
    pub container: String,
    /// Appended to the input stem when naming the output file
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            video_profile: default_video_profile(),
            pix_fmt: default_pix_fmt(),
            audio_codec: default_audio_codec(),
            container: default_container(),
            suffix: default_suffix(),
        }
    }
}

impl TranscodeProfile {
    /// Build the fixed ffmpeg argument list for one input/output pair
    ///
    /// `-stats` plus `-progress pipe:2` put the frame counter on stderr, which
    /// is the only stream the orchestrator reads.
    pub fn ffmpeg_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(20);
        args.extend(["-v", "error", "-stats", "-i"].map(OsString::from));
        args.push(input.as_os_str().to_owned());
        args.push("-c:v".into());
        args.push(self.video_codec.as_str().into());
        args.push("-profile:v".into());
        args.push(self.video_profile.as_str().into());
        args.push("-pix_fmt".into());
        args.push(self.pix_fmt.as_str().into());
        args.push("-c:a".into());
        args.push(self.audio_codec.as_str().into());
        args.push("-y".into());
        args.push("-progress".into());
        args.push("pipe:2".into());
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Human readable summary printed by the dry run
    pub fn describe(&self) -> String {
        format!(
            "{} ({}, {}) + {} in .{}",
            self.video_codec, self.video_profile, self.pix_fmt, self.audio_codec, self.container
        )
    }
}

/// Derive the output path for an input file
///
/// The output sits next to the input: `<dir>/<stem><suffix>.<container>`,
/// e.g. `clips/clip.mp4` → `clips/clip_resolve.mov`.
pub fn derive_output_path(input_path: &Path, profile: &TranscodeProfile) -> PathBuf {
    let output_dir = input_path.parent().unwrap_or_else(|| Path::new(""));

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    output_dir.join(format!("{}{}.{}", stem, profile.suffix, profile.container))
}
