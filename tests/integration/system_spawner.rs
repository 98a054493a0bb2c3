// Real child processes: a shell script plays ffmpeg

use resolve_transcoder::engine::{
    ChildState, Orchestrator, ProgressModel, TranscodeError, TranscodeJob, TranscodeProfile,
};
use tempfile::TempDir;

use crate::common::fakes::{RecordingSink, TimedSink};
use crate::common::scripts::{fake_ffmpeg, write_script};
use std::time::Duration;

fn job_in(temp_dir: &TempDir) -> TranscodeJob {
    TranscodeJob::new(
        temp_dir.path().join("clip.mp4"),
        temp_dir.path().join("clip_resolve.mov"),
        TranscodeProfile::default(),
    )
}

#[test]
fn stats_redraws_drive_progress() {
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("launched");
    let ffmpeg = fake_ffmpeg(temp_dir.path(), &marker, &[25, 50, 75, 100], 0);
    let job = job_in(&temp_dir);

    let mut orchestrator = Orchestrator::system(&ffmpeg);
    let sink = RecordingSink::default();
    let progress = ProgressModel::new(sink.clone());
    progress.bound(100);

    orchestrator.run(&job, &progress).unwrap();

    assert!(marker.exists());
    assert!(job.output_path.exists());
    assert_eq!(sink.positions(), vec![0, 25, 50, 75, 100, 100]);
    assert!(sink.is_finished());
    assert_eq!(orchestrator.state(), ChildState::Succeeded);
}

#[test]
fn carriage_return_redraws_arrive_as_emitted() {
    let temp_dir = TempDir::new().unwrap();
    // Redraws end in '\r' only, never '\n'
    let ffmpeg = write_script(
        temp_dir.path(),
        "ffmpeg",
        "printf 'frame=   10 fps=10\\r' >&2\nsleep 1\nprintf 'frame=   20 fps=10\\r' >&2\nsleep 1\nexit 0",
    );
    let job = job_in(&temp_dir);

    let mut orchestrator = Orchestrator::system(&ffmpeg);
    let sink = TimedSink::new();
    let progress = ProgressModel::new(sink.clone());
    progress.bound(100);

    orchestrator.run(&job, &progress).unwrap();

    let first = sink.arrival_of(10).expect("frame 10 drawn");
    let second = sink.arrival_of(20).expect("frame 20 drawn");
    let done = sink.arrival_of(100).expect("finish drawn");
    assert!(
        second >= first + Duration::from_millis(500),
        "frame 20 at {:?} should trail frame 10 at {:?} by about a second",
        second,
        first
    );
    assert!(
        done >= second + Duration::from_millis(500),
        "frame 20 at {:?} should arrive well before exit at {:?}",
        second,
        done
    );
}

#[test]
fn non_zero_exit_reports_status_and_tail() {
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("launched");
    let ffmpeg = fake_ffmpeg(temp_dir.path(), &marker, &[10], 1);
    let job = job_in(&temp_dir);

    let mut orchestrator = Orchestrator::system(&ffmpeg);
    let progress = ProgressModel::headless();
    progress.bound(100);

    let err = orchestrator.run(&job, &progress).unwrap_err();

    match err {
        TranscodeError::Exited {
            status,
            diagnostics,
        } => {
            assert_eq!(status.code, Some(1));
            assert_eq!(diagnostics, vec!["Conversion failed!".to_string()]);
        }
        other => panic!("expected exit error, got {:?}", other),
    }
    assert_eq!(progress.snapshot().frame, 10);
    assert!(!progress.is_finished());
    assert_eq!(orchestrator.state(), ChildState::Failed);
}

#[test]
fn missing_binary_is_a_spawn_error() {
    let temp_dir = TempDir::new().unwrap();
    let job = job_in(&temp_dir);
    let mut orchestrator = Orchestrator::system(temp_dir.path().join("no-such-ffmpeg"));

    let err = orchestrator
        .run(&job, &ProgressModel::headless())
        .unwrap_err();

    assert!(matches!(err, TranscodeError::Spawn { .. }));
    assert_eq!(orchestrator.state(), ChildState::Failed);
}
