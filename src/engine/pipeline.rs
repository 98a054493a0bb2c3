//! Probe → bound → transcode for a single job.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use super::core::{MediaInfo, TranscodeJob};
use super::probe::{MediaProber, MetadataQuery, ProbeError};
use super::progress::ProgressModel;
use super::transcode::{Orchestrator, Spawner, TranscodeError};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Error getting video info")]
    Probe(#[from] ProbeError),

    #[error("Error during transcoding")]
    Transcode(#[from] TranscodeError),
}

/// Run one job end to end
///
/// The duration probe must succeed before ffmpeg is launched. If ffmpeg fails,
/// whatever it wrote at the output path is removed. On any error the progress
/// display is abandoned before returning.
pub fn run_job<Q, S>(
    job: &TranscodeJob,
    prober: &MediaProber<Q>,
    orchestrator: &mut Orchestrator<S>,
    progress: &ProgressModel,
) -> Result<MediaInfo, JobError>
where
    Q: MetadataQuery,
    S: Spawner,
{
    let info = match prober.probe(&job.input_path) {
        Ok(info) => info,
        Err(e) => {
            progress.abandon();
            return Err(e.into());
        }
    };
    debug!(
        duration = info.duration,
        frame_rate = info.frame_rate,
        total_frames = info.total_frames(),
        "progress bound"
    );
    progress.bound(info.total_frames());

    if let Err(e) = orchestrator.run(job, progress) {
        progress.abandon();
        remove_partial_output(&job.output_path);
        return Err(e.into());
    }

    Ok(info)
}

/// Delete a half-written output file, if any
pub fn remove_partial_output(output_path: &Path) {
    if !output_path.exists() {
        return;
    }
    match std::fs::remove_file(output_path) {
        Ok(()) => debug!(path = %output_path.display(), "removed partial output"),
        Err(e) => warn!(
            "Failed to remove partial output {}: {}",
            output_path.display(),
            e
        ),
    }
}
