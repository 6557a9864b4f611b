//! Logging init: file under the XDG state dir, with stderr fallback.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Per-event writer cloned out of a shared log file handle.
struct LogWriter(Arc<fs::File>);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

fn open_log_file() -> anyhow::Result<(Arc<fs::File>, PathBuf)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("memsweep")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("memsweep.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((Arc::new(file), path))
}

fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info,memsweep=debug" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize structured logging to `~/.local/state/memsweep/memsweep.log`.
/// If the state dir is unwritable, log to stderr instead of failing the CLI.
pub fn init(verbose: bool) {
    match open_log_file() {
        Ok((file, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(verbose))
                .with_writer(move || LogWriter(Arc::clone(&file)))
                .with_ansi(false)
                .init();
            tracing::info!("memsweep logging initialized at {}", path.display());
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(verbose))
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
            tracing::warn!("log file unavailable ({err:#}); logging to stderr");
        }
    }
}
