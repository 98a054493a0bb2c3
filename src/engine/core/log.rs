use tracing::Level;

/// Install the global tracing subscriber
///
/// Logs go to stderr so stdout stays clean for the summary lines. Warnings
/// only by default; `verbose` turns on the debug trail (probe commands, the
/// full ffmpeg invocation, exit status).
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
