//! Structure protonation: turn `.pdb` inputs into pH-specific `.pqr` files.
//!
//! Protonation state depends on pH but not on ionic strength, so one run
//! per (structure, pH) pair serves every job that shares it. Prepared
//! files live under `run_dir/prepared/` and survive across invocations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::SweepConfig;
use crate::jobs::{format_value, prepared_structure_path, StructureFile};
use crate::pipeline::process::run_logged;
use crate::scheduler::for_each_bounded;

/// One pending protonation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtonationTask {
    pub id: String,
    pub input: PathBuf,
    pub ph: f64,
    pub output: PathBuf,
}

impl ProtonationTask {
    fn label(&self) -> String {
        format!("{}_pH{}", self.id, format_value(self.ph))
    }
}

/// Plans the protonation runs still needed: every (pdb structure, pH)
/// combination whose prepared output is absent or empty.
pub fn plan_protonation(cfg: &SweepConfig, structures: &[StructureFile]) -> Vec<ProtonationTask> {
    let mut tasks = Vec::new();
    for s in structures.iter().filter(|s| s.needs_protonation) {
        for &ph in &cfg.ph_values {
            let output = prepared_structure_path(cfg, &s.id, ph);
            let prepared = std::fs::metadata(&output).map(|m| m.len() > 0).unwrap_or(false);
            if prepared {
                tracing::debug!(output = %output.display(), "already prepared, skipping");
                continue;
            }
            tasks.push(ProtonationTask {
                id: s.id.clone(),
                input: s.path.clone(),
                ph,
                output,
            });
        }
    }
    tasks
}

/// Runs the planned protonations, bounded by the job slot budget. Any
/// failure aborts the sweep before jobs start; a missing prepared file
/// would otherwise surface later as an input-staging failure in every job
/// that shares it.
pub async fn run_protonation(cfg: &SweepConfig, tasks: Vec<ProtonationTask>) -> Result<()> {
    if tasks.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(cfg.prepared_dir())
        .with_context(|| format!("create {}", cfg.prepared_dir().display()))?;
    tracing::info!(count = tasks.len(), "protonating structures");

    let tool = cfg.tools.protonate.clone();
    let forcefield = cfg.tools.forcefield.clone();
    let results = for_each_bounded(tasks, cfg.max_concurrent_jobs, move |task| {
        let tool = tool.clone();
        let forcefield = forcefield.clone();
        async move {
            let label = task.label();
            (label, protonate_one(&tool, &forcefield, &task).await)
        }
    })
    .await?;

    let failures: Vec<String> = results
        .into_iter()
        .filter_map(|(label, res)| res.err().map(|e| format!("{label}: {e:#}")))
        .collect();
    if !failures.is_empty() {
        bail!("protonation failed for {}", failures.join("; "));
    }
    Ok(())
}

async fn protonate_one(tool: &str, forcefield: &str, task: &ProtonationTask) -> Result<()> {
    let log = task.output.with_extension("log");
    let args = vec![
        "--ff".to_string(),
        forcefield.to_string(),
        "--with-ph".to_string(),
        format_value(task.ph),
        task.input.display().to_string(),
        task.output.display().to_string(),
    ];
    run_logged(tool, &args, Path::new("."), Some(&log)).await?;

    let len = std::fs::metadata(&task.output).map(|m| m.len()).unwrap_or(0);
    if len == 0 {
        bail!("{} produced no output at {}", tool, task.output.display());
    }
    Ok(())
}
