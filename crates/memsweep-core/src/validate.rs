//! Read-only verification of finished job directories.
//!
//! The validator inspects only what is on disk. It never re-runs a tool and
//! never mutates a job directory, so it can be pointed at a sweep from a
//! previous run (or a crashed one) and always reach the same verdicts.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ValidationConfig;
use crate::pipeline::process::missing_outputs;

/// Verdict for one job directory.
///
/// Artifact presence is checked before the log is consulted: a directory
/// missing its outputs is incomplete even when the solver reported success,
/// and the distinction matters for resume selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ValidationVerdict {
    /// Every required artifact exists and the log carries the success
    /// marker. The reported energy is metadata; its absence does not
    /// demote the verdict.
    Complete { energy: Option<f64> },
    /// One or more required artifacts are absent or empty.
    MissingArtifacts { missing: Vec<String> },
    /// Artifacts are all present but the log lacks the success marker.
    SolverFailed { detail: String },
}

impl ValidationVerdict {
    pub fn is_complete(&self) -> bool {
        matches!(self, ValidationVerdict::Complete { .. })
    }
}

/// Validates one job directory against the configured manifest and markers.
///
/// Fails only on environmental trouble (an unreadable log); every pipeline
/// outcome, good or bad, maps to a verdict.
pub fn validate_job_dir(dir: &Path, rules: &ValidationConfig) -> Result<ValidationVerdict> {
    let missing = missing_outputs(dir, &rules.required_artifacts);
    if !missing.is_empty() {
        return Ok(ValidationVerdict::MissingArtifacts { missing });
    }

    let log_path = dir.join(&rules.log_file);
    let log = std::fs::read_to_string(&log_path)
        .with_context(|| format!("read log {}", log_path.display()))?;

    if !log.contains(&rules.success_marker) {
        return Ok(ValidationVerdict::SolverFailed {
            detail: format!(
                "success marker `{}` not found in {}",
                rules.success_marker, rules.log_file
            ),
        });
    }

    Ok(ValidationVerdict::Complete {
        energy: parse_energy(&log, &rules.energy_marker),
    })
}

/// First numeric token after the last marker line, if any. Solver logs
/// report the value in scientific notation, which `f64` parses directly.
fn parse_energy(log: &str, marker: &str) -> Option<f64> {
    if marker.is_empty() {
        return None;
    }
    log.lines()
        .filter(|line| line.contains(marker))
        .last()
        .and_then(|line| {
            let (_, rest) = line.split_once(marker)?;
            rest.split_whitespace().find_map(|tok| tok.parse::<f64>().ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts;
    use std::path::PathBuf;

    fn complete_dir(log: &str) -> (tempfile::TempDir, PathBuf, ValidationConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let rules = ValidationConfig::default();
        for name in &rules.required_artifacts {
            if name != artifacts::SOLVE_LOG {
                std::fs::write(tmp.path().join(name), "data").unwrap();
            }
        }
        std::fs::write(tmp.path().join(artifacts::SOLVE_LOG), log).unwrap();
        let dir = tmp.path().to_path_buf();
        (tmp, dir, rules)
    }

    const GOOD_LOG: &str = "\
Global net ELEC energy = 1.234567E+02 kJ/mol\n\
Thanks for using APBS\n";

    #[test]
    fn complete_directory_with_energy() {
        let (_tmp, dir, rules) = complete_dir(GOOD_LOG);
        let verdict = validate_job_dir(&dir, &rules).unwrap();
        assert_eq!(
            verdict,
            ValidationVerdict::Complete {
                energy: Some(123.4567)
            }
        );
    }

    #[test]
    fn marker_without_energy_is_still_complete() {
        let (_tmp, dir, rules) = complete_dir("Thanks for using APBS\n");
        let verdict = validate_job_dir(&dir, &rules).unwrap();
        assert_eq!(verdict, ValidationVerdict::Complete { energy: None });
    }

    #[test]
    fn missing_artifact_wins_over_success_marker() {
        let (_tmp, dir, rules) = complete_dir(GOOD_LOG);
        std::fs::remove_file(dir.join("pot_fg.dx")).unwrap();
        let verdict = validate_job_dir(&dir, &rules).unwrap();
        assert_eq!(
            verdict,
            ValidationVerdict::MissingArtifacts {
                missing: vec!["pot_fg.dx".to_string()]
            }
        );
    }

    #[test]
    fn empty_artifact_counts_as_missing() {
        let (_tmp, dir, rules) = complete_dir(GOOD_LOG);
        std::fs::write(dir.join("dielx_cg_m.dx"), "").unwrap();
        let verdict = validate_job_dir(&dir, &rules).unwrap();
        let ValidationVerdict::MissingArtifacts { missing } = verdict else {
            panic!("expected missing artifacts");
        };
        assert_eq!(missing, vec!["dielx_cg_m.dx".to_string()]);
    }

    #[test]
    fn absent_marker_is_a_solver_failure() {
        let (_tmp, dir, rules) = complete_dir("iteration 12 diverged\n");
        let verdict = validate_job_dir(&dir, &rules).unwrap();
        let ValidationVerdict::SolverFailed { detail } = verdict else {
            panic!("expected solver failure");
        };
        assert!(detail.contains("Thanks for using APBS"));
    }

    #[test]
    fn validation_is_deterministic() {
        let (_tmp, dir, rules) = complete_dir(GOOD_LOG);
        let first = validate_job_dir(&dir, &rules).unwrap();
        let second = validate_job_dir(&dir, &rules).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn energy_takes_the_last_marker_line() {
        let log = "\
Global net ELEC energy = 1.0E+00 kJ/mol\n\
Global net ELEC energy = 2.5E+00 kJ/mol\n\
Thanks for using APBS\n";
        assert_eq!(parse_energy(log, "Global net ELEC energy"), Some(2.5));
    }

    #[test]
    fn energy_parse_tolerates_garbage() {
        assert_eq!(parse_energy("Global net ELEC energy = oops\n", "Global net ELEC energy"), None);
        assert_eq!(parse_energy("", "Global net ELEC energy"), None);
    }
}
