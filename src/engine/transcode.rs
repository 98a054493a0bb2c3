//! Runs ffmpeg for one job and turns its stderr into progress updates.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::LazyLock;
use std::thread;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::core::{ChildState, TranscodeJob};
use super::progress::ProgressModel;

/// Non-progress stderr lines kept for error reports
const DIAGNOSTIC_TAIL_LINES: usize = 10;

static FRAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"frame=\s*(\d+)").expect("valid frame regex"));

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to capture ffmpeg diagnostics")]
    NoDiagnostics,

    #[error("Failed to wait for ffmpeg")]
    Wait(#[source] io::Error),

    #[error("ffmpeg failed: {status}{}", format_tail(.diagnostics))]
    Exited {
        status: ExitOutcome,
        diagnostics: Vec<String>,
    },
}

fn format_tail(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n{}", lines.join("\n"))
    }
}

/// How the child ended; `code` is `None` when killed by a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl std::fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status: {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Program plus arguments for one launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Shell-like rendering for logs and dry runs
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().to_string()];
        parts.extend(self.args.iter().map(|arg| {
            let s = arg.to_string_lossy();
            if s.contains(' ') {
                format!("\"{}\"", s)
            } else {
                s.to_string()
            }
        }));
        parts.join(" ")
    }
}

/// A launched child whose stderr can be taken once and which can be awaited
pub trait ChildHandle {
    fn take_diagnostics(&mut self) -> Option<Box<dyn Read + Send>>;
    fn wait(&mut self) -> io::Result<ExitOutcome>;
}

/// Launches children; swapped for a fake in tests
pub trait Spawner {
    type Child: ChildHandle;
    fn spawn(&self, spec: &CommandSpec) -> io::Result<Self::Child>;
}

/// Spawns real processes: stdin and stdout null, stderr piped
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl ChildHandle for Child {
    fn take_diagnostics(&mut self) -> Option<Box<dyn Read + Send>> {
        self.stderr
            .take()
            .map(|stderr| Box::new(stderr) as Box<dyn Read + Send>)
    }

    fn wait(&mut self) -> io::Result<ExitOutcome> {
        Child::wait(self).map(ExitOutcome::from)
    }
}

impl Spawner for SystemSpawner {
    type Child = Child;

    fn spawn(&self, spec: &CommandSpec) -> io::Result<Child> {
        Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
    }
}

/// Extract the frame counter from one stderr line, if present
///
/// Matches both `-stats` lines (`frame=  120 fps=...`) and `-progress`
/// key/value lines (`frame=120`).
pub fn parse_frame_line(line: &str) -> Option<u64> {
    FRAME_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Drain the diagnostic stream, feeding frame counters to the model
///
/// Both `\n` and `\r` end a line: `-stats` redraws its status line with a
/// bare `\r`, and each redraw reaches the model as soon as it is read.
/// Returns the last few lines that were not progress output.
fn drain_diagnostics(stream: Box<dyn Read + Send>, progress: &ProgressModel) -> Vec<String> {
    let mut reader = BufReader::new(stream);
    let mut tail: VecDeque<String> = VecDeque::with_capacity(DIAGNOSTIC_TAIL_LINES);
    let mut line: Vec<u8> = Vec::new();

    loop {
        let buf = match reader.fill_buf() {
            Ok([]) => break,
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "ffmpeg stderr read failed");
                break;
            }
        };

        let consumed = match buf.iter().position(|b| *b == b'\n' || *b == b'\r') {
            Some(end) => {
                line.extend_from_slice(&buf[..end]);
                handle_line(&line, progress, &mut tail);
                line.clear();
                end + 1
            }
            None => {
                line.extend_from_slice(buf);
                buf.len()
            }
        };
        reader.consume(consumed);
    }

    // Unterminated last line
    handle_line(&line, progress, &mut tail);

    tail.into_iter().collect()
}

fn handle_line(raw: &[u8], progress: &ProgressModel, tail: &mut VecDeque<String>) {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if let Some(frame) = parse_frame_line(line) {
        progress.advance(frame);
    } else if !is_progress_key(line) {
        if tail.len() == DIAGNOSTIC_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line.to_string());
    }
}

/// `-progress` emits `key=value` lines besides `frame=`; none are diagnostics
fn is_progress_key(line: &str) -> bool {
    line.split_once('=').is_some_and(|(key, value)| {
        !key.is_empty()
            && !value.contains(' ')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

/// Owns one ffmpeg run from launch to exit
pub struct Orchestrator<S> {
    spawner: S,
    program: PathBuf,
    state: ChildState,
}

impl Orchestrator<SystemSpawner> {
    /// Orchestrator launching the given ffmpeg binary
    pub fn system(program: impl Into<PathBuf>) -> Self {
        Self::new(SystemSpawner, program)
    }
}

impl<S: Spawner> Orchestrator<S> {
    pub fn new(spawner: S, program: impl Into<PathBuf>) -> Self {
        Self {
            spawner,
            program: program.into(),
            state: ChildState::NotStarted,
        }
    }

    pub fn state(&self) -> ChildState {
        self.state
    }

    /// The exact command `run` would launch for `job`
    pub fn command_for(&self, job: &TranscodeJob) -> CommandSpec {
        CommandSpec {
            program: self.program.clone(),
            args: job.ffmpeg_args(),
        }
    }

    /// Launch ffmpeg, stream progress into `progress`, and wait for exit
    ///
    /// The stderr reader runs on a scoped thread that is always joined before
    /// this returns. Removing a partial output file on failure is left to the
    /// caller.
    pub fn run(
        &mut self,
        job: &TranscodeJob,
        progress: &ProgressModel,
    ) -> Result<(), TranscodeError> {
        let spec = self.command_for(job);
        info!(command = %spec.display(), "starting ffmpeg");

        let mut child = match self.spawner.spawn(&spec) {
            Ok(child) => child,
            Err(source) => {
                self.state = ChildState::Failed;
                return Err(TranscodeError::Spawn {
                    program: spec.program.display().to_string(),
                    source,
                });
            }
        };
        self.state = ChildState::Running;

        let Some(stream) = child.take_diagnostics() else {
            // Still reap the child so nothing is left behind
            let _ = child.wait();
            self.state = ChildState::Failed;
            return Err(TranscodeError::NoDiagnostics);
        };

        let (wait_result, diagnostics) = thread::scope(|scope| {
            let reader = scope.spawn(move || drain_diagnostics(stream, progress));
            let wait_result = child.wait();
            let diagnostics = reader.join().unwrap_or_else(|_| {
                warn!("ffmpeg stderr reader panicked");
                Vec::new()
            });
            (wait_result, diagnostics)
        });

        let status = match wait_result {
            Ok(status) => status,
            Err(e) => {
                self.state = ChildState::Failed;
                return Err(TranscodeError::Wait(e));
            }
        };
        debug!(%status, "ffmpeg exited");

        if !status.success() {
            self.state = ChildState::Failed;
            return Err(TranscodeError::Exited {
                status,
                diagnostics,
            });
        }

        self.state = ChildState::Succeeded;
        progress.finish();
        Ok(())
    }
}
