use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use resolve_transcoder::config::Config;
use resolve_transcoder::engine::{
    self, FfprobeQuery, MediaProber, Orchestrator, ProgressModel, TerminalProgress, TranscodeJob,
    ValidationError,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

const INSTALL_HINT: &str = "Please install FFmpeg: https://ffmpeg.org/download.html";

pub fn run(cli: Cli) {
    let result = match cli.command {
        Some(Commands::CheckFfmpeg) => load_config().and_then(|c| handle_check_ffmpeg(&c)),
        Some(Commands::Probe { file, json }) => {
            load_config().and_then(|c| handle_probe(&file, json, &c))
        }
        Some(Commands::DryRun { file }) => load_config().and_then(|c| handle_dry_run(file, &c)),
        Some(Commands::InitConfig) => handle_init_config(),
        None => match cli.input {
            Some(input) => load_config().and_then(|c| handle_transcode(input, cli.yes, &c)),
            None => {
                print_usage();
                process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if let Some(ValidationError::MissingDependency(_)) = e.downcast_ref::<ValidationError>() {
            eprintln!("{}", INSTALL_HINT);
        }
        process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: resolve-transcoder [options] <input_file_path>");
    println!("Use --help for more information.");
}

fn load_config() -> Result<Config> {
    Config::load().context("Failed to load config")
}

fn handle_transcode(input: PathBuf, assume_yes: bool, config: &Config) -> Result<()> {
    engine::validate_input(&input)?;
    engine::check_dependencies(&[config.tools.ffmpeg.as_str(), config.tools.ffprobe.as_str()])?;

    let output = engine::derive_output_path(&input, &config.profile);
    let job = TranscodeJob::new(input, output, config.profile.clone());

    if job.output_path.exists() && !assume_yes {
        let stdin = io::stdin();
        let confirmed = confirm_overwrite(&job.output_path, &mut stdin.lock(), &mut io::stdout())
            .context("Failed to read overwrite confirmation")?;
        if !confirmed {
            println!("Transcoding cancelled.");
            return Ok(());
        }
    }

    println!(
        "Transcoding '{}' to '{}' for DaVinci Resolve compatibility...",
        job.input_path.display(),
        job.output_path.display()
    );

    let prober = MediaProber::new(
        FfprobeQuery::new(&config.tools.ffprobe),
        config.probe.fallback_frame_rate,
    );
    let mut orchestrator = Orchestrator::system(&config.tools.ffmpeg);
    let progress = ProgressModel::new(TerminalProgress::new("Transcoding"));

    let started = Instant::now();
    engine::run_job(&job, &prober, &mut orchestrator, &progress)?;

    println!(
        "\n✓ Transcoding complete in {}!",
        format_elapsed(started.elapsed())
    );
    println!("Output: {}", job.output_path.display());
    println!("You can now import the transcoded file into DaVinci Resolve.");
    Ok(())
}

/// Ask before clobbering an existing output; only "y"/"yes" proceed
fn confirm_overwrite<R: BufRead, W: Write>(
    output_path: &Path,
    input: &mut R,
    out: &mut W,
) -> io::Result<bool> {
    write!(
        out,
        "Warning: Output file '{}' already exists. Overwrite? (y/N): ",
        output_path.display()
    )?;
    out.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Elapsed time rounded to whole seconds, e.g. "1h2m3s", "4m0s", "12s"
fn format_elapsed(elapsed: Duration) -> String {
    let total = (elapsed.as_millis() + 500) / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn handle_check_ffmpeg(config: &Config) -> Result<()> {
    let version = engine::tool_version(&config.tools.ffmpeg)?;
    println!("ffmpeg found: {}", version);
    let probe_version = engine::tool_version(&config.tools.ffprobe)?;
    println!("ffprobe found: {}", probe_version);
    Ok(())
}

fn handle_probe(file: &Path, json: bool, config: &Config) -> Result<()> {
    engine::validate_input(file)?;

    let prober = MediaProber::new(
        FfprobeQuery::new(&config.tools.ffprobe),
        config.probe.fallback_frame_rate,
    );
    let info = prober.probe(file)?;

    if json {
        let report = serde_json::json!({
            "file": file,
            "duration": info.duration,
            "frame_rate": info.frame_rate,
            "total_frames": info.total_frames(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize probe report")?
        );
    } else {
        println!("Duration: {:.2} seconds", info.duration);
        println!("Frame rate: {:.3} fps", info.frame_rate);
        println!("Expected frames: {}", info.total_frames());
    }
    Ok(())
}

fn handle_dry_run(file: PathBuf, config: &Config) -> Result<()> {
    engine::validate_input(&file)?;

    let output = engine::derive_output_path(&file, &config.profile);
    let job = TranscodeJob::new(file, output, config.profile.clone());
    let orchestrator = Orchestrator::system(&config.tools.ffmpeg);

    println!("Profile: {}", job.profile.describe());
    println!("{}", orchestrator.command_for(&job).display());
    Ok(())
}

fn handle_init_config() -> Result<()> {
    let path = Config::config_path()?;

    if path.exists() {
        // A broken file is reported, never replaced: it may hold custom tool paths
        let cfg = Config::load_from(&path)
            .with_context(|| format!("Fix or remove {} and run init-config again", path.display()))?;
        println!("Config loaded successfully from {}", path.display());
        println!("{:#?}", cfg);
    } else {
        Config::default()
            .save()
            .context("Failed to save default config")?;
        println!("Default config saved to {}", path.display());
    }
    Ok(())
}
