use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Supported input formats:
  .mp4, .mkv, .avi, .mov, .m4v

Output:
  DNxHR HQ codec in .mov container with ALAC audio

Requirements:
  FFmpeg must be installed and available in PATH";

#[derive(Parser)]
#[command(name = "resolve-transcoder", version)]
#[command(about = "A tool to transcode video files for DaVinci Resolve compatibility.")]
#[command(after_help = AFTER_HELP, disable_version_flag = true)]
pub struct Cli {
    /// Video file to transcode
    #[arg(value_name = "INPUT_FILE_PATH")]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Overwrite an existing output file without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Log probe and ffmpeg details to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Show version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Probe a video file for duration, frame rate and expected frame count
    Probe {
        /// Path to the video file
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the ffmpeg command without executing it
    DryRun {
        /// Path to the video file
        file: PathBuf,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
