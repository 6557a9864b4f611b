//! `memsweep pqrs` - protonate structures ahead of a sweep.

use anyhow::Result;
use memsweep_core::config::SweepConfig;
use memsweep_core::{jobs, protonate};

pub async fn run_pqrs(cfg: &SweepConfig) -> Result<()> {
    let structures = jobs::discover_structures(&cfg.input_dir)?;
    let tasks = protonate::plan_protonation(cfg, &structures);
    if tasks.is_empty() {
        println!("All structures already prepared.");
        return Ok(());
    }
    let count = tasks.len();
    protonate::run_protonation(cfg, tasks).await?;
    println!(
        "Prepared {count} structure file(s) under {}",
        cfg.prepared_dir().display()
    );
    Ok(())
}
