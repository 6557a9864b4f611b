//! `memsweep all` - the one-shot path: protonate, solve, validate.

use anyhow::Result;
use memsweep_core::config::SweepConfig;

use super::{run_solve, run_validate};

pub async fn run_all(cfg: &SweepConfig) -> Result<()> {
    run_solve(cfg, false).await?;
    run_validate(cfg, false, false)
}
