//! CLI command handlers, one file per command.

mod all;
mod clean;
mod inputs;
mod pqrs;
mod solve;
mod validate;

pub use all::run_all;
pub use clean::run_clean;
pub use inputs::run_inputs;
pub use pqrs::run_pqrs;
pub use solve::run_solve;
pub use validate::run_validate;

use anyhow::{Context, Result};
use memsweep_core::config::SweepConfig;
use memsweep_core::jobs::{self, JobSpec, StructureFile};

/// Discovers input structures and expands the job batch from configuration.
pub(super) fn discover_and_expand(
    cfg: &SweepConfig,
) -> Result<(Vec<StructureFile>, Vec<JobSpec>)> {
    let structures = jobs::discover_structures(&cfg.input_dir)?;
    let batch = jobs::expand_jobs(cfg, &structures).context("expand sweep")?;
    Ok((structures, batch))
}
