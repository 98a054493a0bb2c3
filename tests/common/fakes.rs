/// In-process stand-ins for ffprobe, ffmpeg and the terminal
use resolve_transcoder::engine::{
    ChildHandle, CommandSpec, ExitOutcome, MetadataQuery, ProbeEntry, ProbeError, ProgressSink,
    Spawner,
};
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// ffprobe replacement answering from fixed strings
pub struct CannedQuery {
    pub duration: Result<String, String>,
    pub frame_rate: Result<String, String>,
}

impl CannedQuery {
    pub fn new(duration: &str, frame_rate: &str) -> Self {
        Self {
            duration: Ok(duration.to_string()),
            frame_rate: Ok(frame_rate.to_string()),
        }
    }

    pub fn frame_rate_fails(mut self) -> Self {
        self.frame_rate = Err("Stream specifier 'v:0' matches no streams".to_string());
        self
    }

    pub fn duration_fails(mut self) -> Self {
        self.duration = Err("Invalid data found when processing input".to_string());
        self
    }
}

impl MetadataQuery for CannedQuery {
    fn query(&self, path: &Path, entry: ProbeEntry) -> Result<String, ProbeError> {
        let answer = match entry {
            ProbeEntry::Duration => &self.duration,
            ProbeEntry::FrameRate => &self.frame_rate,
        };
        answer.clone().map_err(|stderr| ProbeError::Failed {
            program: "ffprobe".to_string(),
            entry,
            path: path.to_path_buf(),
            stderr,
        })
    }
}

pub struct ScriptedChild {
    stderr: Option<Vec<u8>>,
    exit_code: Option<i32>,
}

impl ChildHandle for ScriptedChild {
    fn take_diagnostics(&mut self) -> Option<Box<dyn Read + Send>> {
        self.stderr
            .take()
            .map(|bytes| Box::new(Cursor::new(bytes)) as Box<dyn Read + Send>)
    }

    fn wait(&mut self) -> io::Result<ExitOutcome> {
        Ok(ExitOutcome {
            code: self.exit_code,
        })
    }
}

/// ffmpeg replacement replaying a fixed stderr transcript
#[derive(Clone)]
pub struct ScriptedSpawner {
    stderr: String,
    exit_code: Option<i32>,
    launched: Arc<Mutex<Vec<CommandSpec>>>,
}

impl ScriptedSpawner {
    pub fn new(stderr: &str, exit_code: i32) -> Self {
        Self {
            stderr: stderr.to_string(),
            exit_code: Some(exit_code),
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn launches(&self) -> Vec<CommandSpec> {
        self.launched.lock().unwrap().clone()
    }
}

impl Spawner for ScriptedSpawner {
    type Child = ScriptedChild;

    fn spawn(&self, spec: &CommandSpec) -> io::Result<ScriptedChild> {
        self.launched.lock().unwrap().push(spec.clone());
        Ok(ScriptedChild {
            stderr: Some(self.stderr.clone().into_bytes()),
            exit_code: self.exit_code,
        })
    }
}

/// Progress sink remembering every position it was asked to draw
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub lengths: Arc<Mutex<Vec<Option<u64>>>>,
    pub positions: Arc<Mutex<Vec<u64>>>,
    pub finished: Arc<Mutex<bool>>,
    pub abandoned: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn positions(&self) -> Vec<u64> {
        self.positions.lock().unwrap().clone()
    }

    pub fn lengths(&self) -> Vec<Option<u64>> {
        self.lengths.lock().unwrap().clone()
    }

    pub fn is_finished(&self) -> bool {
        *self.finished.lock().unwrap()
    }

    pub fn is_abandoned(&self) -> bool {
        *self.abandoned.lock().unwrap()
    }
}

impl ProgressSink for RecordingSink {
    fn set_length(&self, total: Option<u64>) {
        self.lengths.lock().unwrap().push(total);
    }

    fn set_position(&self, position: u64) {
        self.positions.lock().unwrap().push(position);
    }

    fn finish(&self) {
        *self.finished.lock().unwrap() = true;
    }

    fn abandon(&self) {
        *self.abandoned.lock().unwrap() = true;
    }
}

/// Progress sink stamping each position with the time it arrived
#[derive(Clone)]
pub struct TimedSink {
    started: Instant,
    pub positions: Arc<Mutex<Vec<(u64, Duration)>>>,
}

impl TimedSink {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            positions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// When `position` was first drawn
    pub fn arrival_of(&self, position: u64) -> Option<Duration> {
        self.positions
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, at)| *at)
    }
}

impl ProgressSink for TimedSink {
    fn set_length(&self, _total: Option<u64>) {}

    fn set_position(&self, position: u64) {
        self.positions
            .lock()
            .unwrap()
            .push((position, self.started.elapsed()));
    }

    fn finish(&self) {}

    fn abandon(&self) {}
}
