//! Run multiple job pipelines concurrently under a fixed slot budget.
//!
//! Keeps up to `max_concurrent_jobs` pipelines running at once; when one
//! finishes, the next queued job starts until the batch is drained. There
//! are no retries here: a failed job releases its slot and the batch keeps
//! going.

pub mod pool;

pub use pool::for_each_bounded;

use std::future::Future;

use anyhow::Result;

use crate::jobs::JobSpec;
use crate::pipeline::JobOutcome;

/// Dispatches every job through `run_job`, at most `max_concurrent` at a
/// time, in batch order. Returns each job paired with its outcome, in the
/// same order the jobs were given.
pub async fn run_jobs_parallel<F, Fut>(
    jobs: Vec<JobSpec>,
    max_concurrent: usize,
    run_job: F,
) -> Result<Vec<(JobSpec, JobOutcome)>>
where
    F: Fn(JobSpec) -> Fut,
    Fut: Future<Output = JobOutcome> + Send + 'static,
{
    let total = jobs.len();
    tracing::info!(total, max_concurrent, "dispatching batch");

    let outcomes = for_each_bounded(jobs.clone(), max_concurrent, run_job).await?;
    let paired: Vec<(JobSpec, JobOutcome)> = jobs.into_iter().zip(outcomes).collect();

    let succeeded = paired.iter().filter(|(_, o)| o.is_success()).count();
    tracing::info!(total, succeeded, failed = total - succeeded, "batch drained");
    Ok(paired)
}
