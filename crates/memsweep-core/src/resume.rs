//! Resume selection: decide which jobs of a batch still need to run.
//!
//! Granularity is the whole job. A directory that validates as complete is
//! skipped; anything else is re-run from the first stage, which overwrites
//! whatever partial artifacts the previous attempt left behind.

use crate::config::ValidationConfig;
use crate::jobs::JobSpec;
use crate::validate::{validate_job_dir, ValidationVerdict};

/// Partition of a batch into jobs to skip and jobs to (re-)run.
#[derive(Debug)]
pub struct ResumeSelection {
    /// Jobs whose directories validated as complete, in batch order.
    pub complete: Vec<JobSpec>,
    /// Jobs that must run, in batch order.
    pub pending: Vec<JobSpec>,
}

/// Validates every job directory and splits the batch. A directory that
/// cannot be validated (an unreadable log, say) is scheduled for re-run
/// rather than trusted.
pub fn select_incomplete(jobs: Vec<JobSpec>, rules: &ValidationConfig) -> ResumeSelection {
    let mut complete = Vec::new();
    let mut pending = Vec::new();
    for job in jobs {
        match validate_job_dir(&job.dir, rules) {
            Ok(ValidationVerdict::Complete { .. }) => {
                tracing::info!(job = %job.label(), "already complete, skipping");
                complete.push(job);
            }
            Ok(verdict) => {
                tracing::debug!(job = %job.label(), ?verdict, "incomplete, will run");
                pending.push(job);
            }
            Err(e) => {
                tracing::warn!(job = %job.label(), error = %format!("{e:#}"), "unvalidatable, will run");
                pending.push(job);
            }
        }
    }
    ResumeSelection { complete, pending }
}
