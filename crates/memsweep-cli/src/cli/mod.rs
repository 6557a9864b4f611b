//! CLI for the memsweep sweep orchestrator.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use memsweep_core::{config, logging};
use std::path::PathBuf;

use commands::{run_all, run_clean, run_inputs, run_pqrs, run_solve, run_validate};

/// Top-level CLI for the memsweep sweep orchestrator.
#[derive(Debug, Parser)]
#[command(name = "memsweep")]
#[command(about = "memsweep: membrane electrostatics parameter sweep orchestrator", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default ./memsweep.toml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Sweep overrides shared by every command that expands the job batch.
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Override the configured pH values (repeatable).
    #[arg(long = "ph", value_name = "PH")]
    pub ph: Vec<f64>,

    /// Override the configured ionic strengths in mol/L (repeatable).
    #[arg(long = "ionic-strength", value_name = "MOLAR")]
    pub ionic_strength: Vec<f64>,

    /// Run up to N job pipelines concurrently.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl SweepArgs {
    fn apply(&self, cfg: &mut config::SweepConfig) {
        if !self.ph.is_empty() {
            cfg.ph_values = self.ph.clone();
        }
        if !self.ionic_strength.is_empty() {
            cfg.ionic_strengths = self.ionic_strength.clone();
        }
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent_jobs = jobs;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Protonate `.pdb` structures into pH-specific `.pqr` files.
    Pqrs {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Render solver inputs into every job directory without running anything.
    Inputs {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Run the whole sweep, re-running jobs even if already complete.
    Solve {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Run only the jobs whose directories do not validate as complete.
    Resume {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Check every job directory and report a verdict per job.
    Validate {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Include SHA-256 digests of the required artifacts.
        #[arg(long)]
        checksum: bool,
    },

    /// Delete job directories; with --all, the whole run directory.
    Clean {
        /// Also remove prepared structures, wiping the run directory.
        #[arg(long)]
        all: bool,
    },

    /// Protonate, solve, and validate in one go.
    All {
        #[command(flatten)]
        sweep: SweepArgs,
    },
}

impl CliCommand {
    fn sweep_args(&self) -> Option<&SweepArgs> {
        match self {
            CliCommand::Pqrs { sweep }
            | CliCommand::Inputs { sweep }
            | CliCommand::Solve { sweep }
            | CliCommand::Resume { sweep }
            | CliCommand::Validate { sweep, .. }
            | CliCommand::All { sweep } => Some(sweep),
            CliCommand::Clean { .. } => None,
        }
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut cfg = config::load_or_init(cli.config.as_deref())?;
    if let Some(sweep) = cli.command.sweep_args() {
        sweep.apply(&mut cfg);
    }
    cfg.validate()?;
    tracing::debug!(?cfg, "configuration loaded");

    match cli.command {
        CliCommand::Pqrs { .. } => run_pqrs(&cfg).await,
        CliCommand::Inputs { .. } => run_inputs(&cfg).await,
        CliCommand::Solve { .. } => run_solve(&cfg, false).await,
        CliCommand::Resume { .. } => run_solve(&cfg, true).await,
        CliCommand::Validate { json, checksum, .. } => run_validate(&cfg, json, checksum),
        CliCommand::Clean { all } => run_clean(&cfg, all),
        CliCommand::All { .. } => run_all(&cfg).await,
    }
}
