//! Frame-counter progress tracking.
//!
//! The stream reader is the only writer; renderers and callers only read.
//! All state lives in atomics so the reader thread and the thread waiting on
//! ffmpeg never contend on a lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Where progress is drawn
///
/// A length of `None` means the total is unknown and the sink should show an
/// unbounded indicator (spinner) instead of a fraction.
pub trait ProgressSink: Send + Sync {
    fn set_length(&self, total: Option<u64>);
    fn set_position(&self, position: u64);
    fn finish(&self);
    /// Stop drawing without claiming completion (the job failed)
    fn abandon(&self);
}

/// Sink that draws nothing (dry runs, tests, piped output)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_length(&self, _total: Option<u64>) {}
    fn set_position(&self, _position: u64) {}
    fn finish(&self) {}
    fn abandon(&self) {}
}

/// Point-in-time view of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Expected total frames; 0 means indeterminate
    pub total: u64,
    /// Highest frame counter reported so far (may exceed `total`)
    pub frame: u64,
    pub finished: bool,
}

impl ProgressSnapshot {
    /// Displayed position: the frame counter clamped to the bound
    ///
    /// Once finished this is the full bound. With an indeterminate bound the
    /// raw counter is shown as-is.
    pub fn position(&self) -> u64 {
        if self.total == 0 {
            self.frame
        } else if self.finished {
            self.total
        } else {
            self.frame.min(self.total)
        }
    }

    /// Completion in `[0.0, 1.0]`, `None` while the length is indeterminate
    pub fn fraction(&self) -> Option<f64> {
        if self.finished {
            return Some(1.0);
        }
        if self.total == 0 {
            return None;
        }
        Some(self.position() as f64 / self.total as f64)
    }

    /// Completion percentage (0.0 while indeterminate and unfinished)
    pub fn percent(&self) -> f64 {
        self.fraction().map(|f| f * 100.0).unwrap_or(0.0)
    }
}

/// Bounded, monotonic completion estimate fed by ffmpeg's frame counter
pub struct ProgressModel {
    total: AtomicU64,
    frame: AtomicU64,
    finished: AtomicBool,
    sink: Box<dyn ProgressSink>,
}

impl ProgressModel {
    pub fn new(sink: impl ProgressSink + 'static) -> Self {
        Self {
            total: AtomicU64::new(0),
            frame: AtomicU64::new(0),
            finished: AtomicBool::new(false),
            sink: Box::new(sink),
        }
    }

    /// Model with no renderer attached
    pub fn headless() -> Self {
        Self::new(NoProgress)
    }

    /// Set the expected total frame count; 0 means indeterminate
    pub fn bound(&self, total_frames: u64) {
        self.total.store(total_frames, Ordering::Release);
        self.sink
            .set_length((total_frames > 0).then_some(total_frames));
        self.sink.set_position(self.snapshot().position());
    }

    /// Record a newly reported frame counter
    ///
    /// Values lower than or equal to the current counter are ignored so the
    /// bar never moves backwards. Returns whether the counter advanced.
    pub fn advance(&self, frame: u64) -> bool {
        let previous = self.frame.fetch_max(frame, Ordering::AcqRel);
        if frame <= previous {
            return false;
        }
        self.sink.set_position(self.snapshot().position());
        true
    }

    /// Force the display to 100% regardless of the last reported frame
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
        let snapshot = self.snapshot();
        self.sink.set_position(snapshot.position());
        self.sink.finish();
    }

    /// Release the display after a failure; the state is left as it was
    pub fn abandon(&self) {
        self.sink.abandon();
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total: self.total.load(Ordering::Acquire),
            frame: self.frame.load(Ordering::Acquire),
            finished: self.finished.load(Ordering::Acquire),
        }
    }

    /// Displayed (clamped) position
    pub fn position(&self) -> u64 {
        self.snapshot().position()
    }

    pub fn percent(&self) -> f64 {
        self.snapshot().percent()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ProgressModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressModel")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}
