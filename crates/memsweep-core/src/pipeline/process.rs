//! External process invocation with captured diagnostics.
//!
//! All blocking in the pipeline happens here, at subprocess exit waits. No
//! timeout is enforced: a hung solver blocks its scheduler slot until it
//! exits. A caller-supplied timeout would wrap [`run_logged`]; this is the
//! single seam for it.

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

const TAIL_LINES: usize = 5;
const TAIL_MAX_CHARS: usize = 800;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write log {path}: {source}")]
    Log {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` failed ({status}): {tail}")]
    Failed {
        program: String,
        status: String,
        tail: String,
    },
}

/// Last few lines of a process stream, for failure diagnostics.
fn tail_of(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().rev().take(TAIL_LINES).collect();
    let mut tail = lines
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join(" | ");
    if tail.len() > TAIL_MAX_CHARS {
        let cut = tail.len() - TAIL_MAX_CHARS;
        tail = format!("...{}", &tail[cut..]);
    }
    if tail.is_empty() {
        tail = "(no output)".to_string();
    }
    tail
}

/// Runs `program args..` with `cwd` as working directory, waiting for exit.
/// Combined stdout+stderr is written to `log` when given. Non-zero exit
/// yields an error carrying the exit status and an output tail.
pub(crate) async fn run_logged(
    program: &str,
    args: &[String],
    cwd: &Path,
    log: Option<&Path>,
) -> Result<(), ProcessError> {
    tracing::debug!(program, ?args, cwd = %cwd.display(), "running external process");
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if let Some(log) = log {
        let mut contents = output.stdout.clone();
        contents.extend_from_slice(&output.stderr);
        tokio::fs::write(log, &contents)
            .await
            .map_err(|source| ProcessError::Log {
                path: log.display().to_string(),
                source,
            })?;
    }

    if output.status.success() {
        return Ok(());
    }
    let stream = if output.stderr.is_empty() {
        &output.stdout
    } else {
        &output.stderr
    };
    Err(ProcessError::Failed {
        program: program.to_string(),
        status: output.status.to_string(),
        tail: tail_of(stream),
    })
}

/// Returns the names from `expected` that are absent or empty in `dir`.
pub(crate) fn missing_outputs(dir: &Path, expected: &[String]) -> Vec<String> {
    expected
        .iter()
        .filter(|name| {
            match std::fs::metadata(dir.join(name.as_str())) {
                Ok(meta) => meta.len() == 0,
                Err(_) => true,
            }
        })
        .cloned()
        .collect()
}
