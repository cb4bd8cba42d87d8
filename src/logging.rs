use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Build the subscriber used by [`init`] without installing it.
///
/// With `debug` the default level is `debug` and `RUST_LOG` may override it;
/// otherwise `info` is forced. Output goes to `log_file` when given, stderr
/// otherwise.
pub fn subscriber(debug: bool, log_file: Option<&Path>) -> impl tracing::Subscriber + Send + Sync {
    // When debug logging is disabled we force `info` level regardless of the
    // `RUST_LOG` environment variable.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let (writer, ansi) = match log_file.map(file_appender) {
        Some(Ok(appender)) => (BoxMakeWriter::new(appender), false),
        Some(Err(e)) => {
            eprintln!("failed to open log file, logging to stderr: {e}");
            (BoxMakeWriter::new(std::io::stderr), true)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .finish()
}

fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("prompt_injector.log");
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)?)
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(debug: bool, log_file: Option<&Path>) {
    let _ = tracing::subscriber::set_global_default(subscriber(debug, log_file));
}

/// Initialise logging from loaded settings.
pub fn init_from_settings(settings: &crate::settings::Settings) {
    init(settings.debug_logging, settings.log_file.as_deref());
}
