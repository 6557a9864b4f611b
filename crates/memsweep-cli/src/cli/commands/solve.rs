//! `memsweep solve` / `memsweep resume` - drive job pipelines to completion.

use std::sync::Arc;

use anyhow::{bail, Result};
use memsweep_core::config::SweepConfig;
use memsweep_core::report::SweepReport;
use memsweep_core::resume::select_incomplete;
use memsweep_core::template::Templates;
use memsweep_core::{pipeline, protonate, scheduler};

use super::discover_and_expand;

/// Runs the batch. With `resume_only`, jobs whose directories already
/// validate as complete are skipped; otherwise every job runs, overwriting
/// previous output.
pub async fn run_solve(cfg: &SweepConfig, resume_only: bool) -> Result<()> {
    let templates = Templates::load(cfg)?;
    let (structures, batch) = discover_and_expand(cfg)?;

    let tasks = protonate::plan_protonation(cfg, &structures);
    protonate::run_protonation(cfg, tasks).await?;

    let (pending, skipped) = if resume_only {
        let selection = select_incomplete(batch, &cfg.validation);
        (selection.pending, selection.complete.len())
    } else {
        (batch, 0)
    };
    if pending.is_empty() {
        println!("Nothing to do: all {skipped} job(s) already complete.");
        return Ok(());
    }

    let shared_cfg = Arc::new(cfg.clone());
    let templates = Arc::new(templates);
    let results = scheduler::run_jobs_parallel(pending, cfg.max_concurrent_jobs, move |job| {
        pipeline::run_job(Arc::clone(&shared_cfg), Arc::clone(&templates), job)
    })
    .await?;

    let report = SweepReport::new(&results, skipped);
    print!("{}", report.render_text());
    if !report.all_succeeded() {
        bail!("{} of {} job(s) failed", report.failed, report.total);
    }
    Ok(())
}
