//! Batch summary assembled after the scheduler drains.
//!
//! One line per job in the text rendering; the JSON form carries the same
//! data for downstream tooling. Failed jobs point at the captured log of
//! the stage that broke, when that stage keeps one.

use anyhow::Result;
use serde::Serialize;

use crate::artifacts;
use crate::jobs::JobSpec;
use crate::pipeline::{JobOutcome, Stage};

#[derive(Debug, Serialize)]
pub struct JobReport {
    pub label: String,
    pub dir: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Jobs skipped by resume selection because they were already complete.
    pub skipped: usize,
    pub jobs: Vec<JobReport>,
}

/// Log captured by a stage, if it keeps one. Input preparation and the
/// membrane editor run without a log file.
fn stage_log(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::GenerateCoefficients => Some(artifacts::COEFF_LOG),
        Stage::ProductionSolve => Some(artifacts::SOLVE_LOG),
        Stage::PrepareInputs | Stage::ApplyMembrane => None,
    }
}

impl SweepReport {
    pub fn new(results: &[(JobSpec, JobOutcome)], skipped: usize) -> Self {
        let jobs: Vec<JobReport> = results
            .iter()
            .map(|(job, outcome)| match outcome {
                JobOutcome::Succeeded => JobReport {
                    label: job.label(),
                    dir: job.dir.display().to_string(),
                    succeeded: true,
                    failed_stage: None,
                    reason: None,
                    log: None,
                },
                JobOutcome::Failed { stage, reason } => JobReport {
                    label: job.label(),
                    dir: job.dir.display().to_string(),
                    succeeded: false,
                    failed_stage: Some(stage.to_string()),
                    reason: Some(reason.clone()),
                    log: stage_log(*stage).map(|l| job.dir.join(l).display().to_string()),
                },
            })
            .collect();
        let succeeded = jobs.iter().filter(|j| j.succeeded).count();
        Self {
            total: jobs.len(),
            succeeded,
            failed: jobs.len() - succeeded,
            skipped,
            jobs,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{} jobs: {} succeeded, {} failed",
            self.total, self.succeeded, self.failed
        );
        if self.skipped > 0 {
            out.push_str(&format!(" ({} skipped, already complete)", self.skipped));
        }
        out.push('\n');
        for job in &self.jobs {
            if job.succeeded {
                out.push_str(&format!("  ok    {}\n", job.label));
            } else {
                let stage = job.failed_stage.as_deref().unwrap_or("?");
                let reason = job.reason.as_deref().unwrap_or("");
                out.push_str(&format!("  FAIL  {}  [{}] {}\n", job.label, stage, reason));
                if let Some(log) = &job.log {
                    out.push_str(&format!("        see {log}\n"));
                }
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
