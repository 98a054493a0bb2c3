// Transcoding engine - independent of the CLI

pub mod core;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod render;
pub mod transcode;
pub mod validate;

pub use self::core::*;
pub use pipeline::{JobError, remove_partial_output, run_job};
pub use probe::{
    DEFAULT_FRAME_RATE, FfprobeQuery, MediaProber, MetadataQuery, ProbeEntry, ProbeError,
};
pub use progress::{NoProgress, ProgressModel, ProgressSink, ProgressSnapshot};
pub use render::TerminalProgress;
pub use transcode::{
    ChildHandle, CommandSpec, ExitOutcome, Orchestrator, Spawner, SystemSpawner, TranscodeError,
};
pub use validate::{ValidationError, check_dependencies, validate_input};
