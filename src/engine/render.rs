// Terminal progress bar backed by indicatif

use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

use super::progress::ProgressSink;

const BAR_TEMPLATE: &str =
    "{msg} {percent:>3}% [{bar:50}] ({pos}/{len}, {fps}) [{elapsed_precise}:{eta_precise}]";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} frame {pos} ({fps}) [{elapsed_precise}]";

fn with_fps_key(style: ProgressStyle) -> ProgressStyle {
    style.with_key("fps", |state: &ProgressState, w: &mut dyn Write| {
        let _ = write!(w, "{:.0} fps", state.per_sec());
    })
}

fn bar_style() -> ProgressStyle {
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("██░");
    with_fps_key(style)
}

fn spinner_style() -> ProgressStyle {
    let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    with_fps_key(style)
}

/// Progress bar on stderr; hidden automatically when stderr is not a terminal
#[derive(Debug, Clone)]
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(description: &str) -> Self {
        let bar = ProgressBar::no_length();
        bar.set_style(spinner_style());
        bar.set_message(description.to_string());
        Self { bar }
    }

    /// Handle for printing above the bar without tearing it
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl ProgressSink for TerminalProgress {
    fn set_length(&self, total: Option<u64>) {
        match total {
            Some(len) => {
                self.bar.disable_steady_tick();
                self.bar.set_style(bar_style());
                self.bar.set_length(len);
            }
            None => {
                self.bar.set_style(spinner_style());
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
        }
    }

    fn set_position(&self, position: u64) {
        self.bar.set_position(position);
    }

    fn finish(&self) {
        self.bar.finish();
    }

    fn abandon(&self) {
        self.bar.disable_steady_tick();
        self.bar.abandon();
    }
}
