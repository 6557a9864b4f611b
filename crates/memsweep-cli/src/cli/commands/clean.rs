//! `memsweep clean` - remove sweep output.

use anyhow::{Context, Result};
use memsweep_core::config::SweepConfig;

/// Removes the job directories; with `all`, the whole run directory
/// including prepared structures.
pub fn run_clean(cfg: &SweepConfig, all: bool) -> Result<()> {
    let target = if all { cfg.run_dir.clone() } else { cfg.jobs_dir() };
    if !target.exists() {
        println!("Nothing to clean at {}", target.display());
        return Ok(());
    }
    std::fs::remove_dir_all(&target)
        .with_context(|| format!("remove {}", target.display()))?;
    println!("Removed {}", target.display());
    Ok(())
}
