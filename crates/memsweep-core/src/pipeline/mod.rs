//! The per-job pipeline: four strictly ordered stages over one directory.
//!
//! Each stage consumes the on-disk artifacts of its predecessor and checks
//! its own expected outputs before handing off, so a tool that exits zero
//! without producing its files still fails at the stage that owns them.
//! A job never reads or writes outside its own directory.

pub mod process;
pub mod stage;

mod inputs;

pub use inputs::prepare_inputs;
pub use stage::{JobOutcome, Stage, StageFailure};

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::artifacts;
use crate::config::SweepConfig;
use crate::jobs::JobSpec;
use crate::template::{membrane_editor_args, Templates};

use process::{missing_outputs, run_logged};

/// Drives one job through all four stages. Stage failures are captured in
/// the returned outcome, never propagated as errors; a failed job must not
/// disturb the rest of the batch.
pub async fn run_job(
    cfg: Arc<SweepConfig>,
    templates: Arc<Templates>,
    job: JobSpec,
) -> JobOutcome {
    let label = job.label();
    tracing::info!(job = %label, "starting pipeline");
    match run_stages(&cfg, &templates, &job).await {
        Ok(()) => {
            tracing::info!(job = %label, "pipeline complete");
            JobOutcome::Succeeded
        }
        Err(failure) => {
            tracing::warn!(
                job = %label,
                stage = %failure.stage,
                reason = %failure.reason,
                "pipeline failed"
            );
            failure.into()
        }
    }
}

async fn run_stages(
    cfg: &SweepConfig,
    templates: &Templates,
    job: &JobSpec,
) -> Result<(), StageFailure> {
    inputs::prepare_inputs(cfg, templates, job)
        .await
        .map_err(|e| StageFailure::new(Stage::PrepareInputs, format!("{e:#}")))?;
    generate_coefficients(cfg, job).await?;
    apply_membrane(cfg, job).await?;
    production_solve(cfg, job).await
}

/// Dummy solver run producing the dielectric, kappa, and charge maps for
/// both grids.
async fn generate_coefficients(cfg: &SweepConfig, job: &JobSpec) -> Result<(), StageFailure> {
    let stage = Stage::GenerateCoefficients;
    let log = job.dir.join(artifacts::COEFF_LOG);
    run_logged(
        &cfg.tools.solver,
        &[artifacts::COEFF_INPUT.to_string()],
        &job.dir,
        Some(&log),
    )
    .await
    .map_err(|e| StageFailure::new(stage, e.to_string()))?;
    expect_outputs(job, &artifacts::coefficient_maps(), stage)
}

/// Writes the membrane exclusion region into each dielectric and kappa map.
/// The eight editor invocations touch disjoint files, so they run
/// concurrently within the job's scheduler slot.
async fn apply_membrane(cfg: &SweepConfig, job: &JobSpec) -> Result<(), StageFailure> {
    let stage = Stage::ApplyMembrane;
    let scalars = membrane_editor_args(job, cfg);

    let mut set = JoinSet::new();
    for (input, _) in artifacts::membrane_edits() {
        let editor = cfg.tools.editor.clone();
        let dir = job.dir.clone();
        let mut args = Vec::with_capacity(1 + scalars.len());
        args.push(input);
        args.extend(scalars.iter().cloned());
        set.spawn(async move { run_logged(&editor, &args, &dir, None).await });
    }
    while let Some(res) = set.join_next().await {
        res.map_err(|e| StageFailure::new(stage, format!("editor task failed: {e}")))?
            .map_err(|e| StageFailure::new(stage, e.to_string()))?;
    }

    let outputs: Vec<String> = artifacts::membrane_edits()
        .into_iter()
        .map(|(_, out)| out)
        .collect();
    expect_outputs(job, &outputs, stage)
}

/// Production solve over the membrane-modified maps, producing the
/// potential grids and the log the validator scans.
async fn production_solve(cfg: &SweepConfig, job: &JobSpec) -> Result<(), StageFailure> {
    let stage = Stage::ProductionSolve;
    let log = job.dir.join(artifacts::SOLVE_LOG);
    run_logged(
        &cfg.tools.solver,
        &[artifacts::SOLVE_INPUT.to_string()],
        &job.dir,
        Some(&log),
    )
    .await
    .map_err(|e| StageFailure::new(stage, e.to_string()))?;
    expect_outputs(job, &artifacts::potential_maps(), stage)
}

fn expect_outputs(job: &JobSpec, expected: &[String], stage: Stage) -> Result<(), StageFailure> {
    let missing = missing_outputs(&job.dir, expected);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StageFailure::new(
            stage,
            format!("expected outputs missing or empty: {}", missing.join(", ")),
        ))
    }
}
