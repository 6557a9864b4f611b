//! `memsweep inputs` - render solver inputs without running any tool.
//!
//! Useful for inspecting what the solver would be fed. Expects protonation
//! to have run already when the batch includes `.pdb` structures.

use anyhow::Result;
use memsweep_core::config::SweepConfig;
use memsweep_core::pipeline;
use memsweep_core::template::Templates;

use super::discover_and_expand;

pub async fn run_inputs(cfg: &SweepConfig) -> Result<()> {
    let templates = Templates::load(cfg)?;
    let (_, batch) = discover_and_expand(cfg)?;
    for job in &batch {
        pipeline::prepare_inputs(cfg, &templates, job).await?;
        println!("rendered {}", job.dir.display());
    }
    println!("{} job director(ies) ready", batch.len());
    Ok(())
}
