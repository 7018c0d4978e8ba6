//! Logging init: file under the XDG state dir, or stderr as a fallback.
//!
//! The default filter directives come from the caller so the binary decides
//! its own verbosity; `RUST_LOG` overrides them either way.

use anyhow::Result;
use std::fs;
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Per-write target: the log file, or stderr when the file clone fails.
enum FileOrStderr {
    File(std::fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Initialize structured logging to `downgate.log` under the XDG state home.
/// Returns Err when the state dir is unusable so the caller can fall back to
/// [`init_stderr`].
pub fn init(default_directives: &str) -> Result<()> {
    let state_home = xdg::BaseDirectories::with_prefix("downgate")?.get_state_home();
    fs::create_dir_all(&state_home)?;
    let log_path = state_home.join("downgate.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let writer = BoxMakeWriter::new(move || {
        file.try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directives))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("logging to {}", log_path.display());
    Ok(())
}

/// Stderr-only logging, for when [`init`] fails.
pub fn init_stderr(default_directives: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directives))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
