//! `memsweep validate` - verdict per job directory, text or JSON.

use anyhow::{bail, Result};
use serde::Serialize;

use memsweep_core::checksum::digest_artifacts;
use memsweep_core::config::SweepConfig;
use memsweep_core::validate::{validate_job_dir, ValidationVerdict};

use super::discover_and_expand;

#[derive(Serialize)]
struct ArtifactDigest {
    name: String,
    sha256: Option<String>,
}

#[derive(Serialize)]
struct JobEntry {
    label: String,
    dir: String,
    #[serde(flatten)]
    verdict: ValidationVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifacts: Option<Vec<ArtifactDigest>>,
}

#[derive(Serialize)]
struct ValidateReport {
    complete: usize,
    missing_artifacts: usize,
    solver_failed: usize,
    jobs: Vec<JobEntry>,
}

impl ValidateReport {
    fn incomplete(&self) -> usize {
        self.missing_artifacts + self.solver_failed
    }
}

pub fn run_validate(cfg: &SweepConfig, json: bool, checksum: bool) -> Result<()> {
    let (_, batch) = discover_and_expand(cfg)?;

    let mut entries = Vec::with_capacity(batch.len());
    for job in &batch {
        let verdict = validate_job_dir(&job.dir, &cfg.validation)?;
        let artifacts = if checksum {
            let digests = digest_artifacts(&job.dir, &cfg.validation.required_artifacts)?;
            Some(
                digests
                    .into_iter()
                    .map(|(name, sha256)| ArtifactDigest { name, sha256 })
                    .collect(),
            )
        } else {
            None
        };
        entries.push(JobEntry {
            label: job.label(),
            dir: job.dir.display().to_string(),
            verdict,
            artifacts,
        });
    }

    let mut complete = 0;
    let mut missing_artifacts = 0;
    let mut solver_failed = 0;
    for entry in &entries {
        match &entry.verdict {
            ValidationVerdict::Complete { .. } => complete += 1,
            ValidationVerdict::MissingArtifacts { .. } => missing_artifacts += 1,
            ValidationVerdict::SolverFailed { .. } => solver_failed += 1,
        }
    }
    let report = ValidateReport {
        complete,
        missing_artifacts,
        solver_failed,
        jobs: entries,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_text(&report);
    }
    if report.incomplete() > 0 {
        bail!(
            "{} of {} job(s) incomplete",
            report.incomplete(),
            report.jobs.len()
        );
    }
    Ok(())
}

fn render_text(report: &ValidateReport) {
    for entry in &report.jobs {
        match &entry.verdict {
            ValidationVerdict::Complete { energy } => match energy {
                Some(e) => println!("ok    {}  energy {e} kJ/mol", entry.label),
                None => println!("ok    {}  (no energy reported)", entry.label),
            },
            ValidationVerdict::MissingArtifacts { missing } => {
                println!("MISS  {}  missing: {}", entry.label, missing.join(", "));
            }
            ValidationVerdict::SolverFailed { detail } => {
                println!("FAIL  {}  {detail}", entry.label);
            }
        }
        if let Some(artifacts) = &entry.artifacts {
            for a in artifacts {
                match &a.sha256 {
                    Some(digest) => println!("        {digest}  {}", a.name),
                    None => println!("        {:64}  {} (absent)", "-", a.name),
                }
            }
        }
    }
    println!(
        "{} complete, {} missing artifacts, {} solver failed",
        report.complete, report.missing_artifacts, report.solver_failed
    );
}
