//! Per-job input preparation: render templates and stage the structure file.

use anyhow::{Context, Result};

use crate::artifacts;
use crate::config::SweepConfig;
use crate::jobs::JobSpec;
use crate::template::{membrane_par_contents, Templates};

/// Creates the job directory and writes everything the later stages read:
/// both rendered solver inputs, the membrane parameter file, and a copy of
/// the structure under its canonical name.
///
/// Idempotent: re-running overwrites the rendered files in place.
pub async fn prepare_inputs(
    cfg: &SweepConfig,
    templates: &Templates,
    job: &JobSpec,
) -> Result<()> {
    tokio::fs::create_dir_all(&job.dir)
        .await
        .with_context(|| format!("create job dir {}", job.dir.display()))?;

    let coeff = templates.render_coeff(job, cfg);
    let solve = templates.render_solve(job, cfg);
    for (name, text) in [
        (artifacts::COEFF_INPUT, coeff.text.as_str()),
        (artifacts::SOLVE_INPUT, solve.text.as_str()),
        (artifacts::MEMBRANE_PAR, &membrane_par_contents(job, cfg)),
    ] {
        let path = job.dir.join(name);
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("write {}", path.display()))?;
    }

    let dest = job.dir.join(artifacts::STRUCTURE_FILE);
    tokio::fs::copy(&job.structure_file, &dest)
        .await
        .with_context(|| {
            format!(
                "copy structure {} into {}",
                job.structure_file.display(),
                job.dir.display()
            )
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job_in(dir: &std::path::Path) -> JobSpec {
        JobSpec {
            structure: "gA".to_string(),
            structure_file: dir.join("gA.pqr"),
            ph: 7.0,
            ionic_strength: 0.15,
            dir: dir.join("jobs").join("gA_pH7.0_is0.15"),
        }
    }

    #[tokio::test]
    async fn writes_all_four_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("gA.pqr"), "ATOM 1").unwrap();
        let cfg = SweepConfig::default();
        let templates = Templates::load(&cfg).unwrap();
        let job = job_in(tmp.path());

        prepare_inputs(&cfg, &templates, &job).await.unwrap();

        for name in [
            artifacts::COEFF_INPUT,
            artifacts::SOLVE_INPUT,
            artifacts::MEMBRANE_PAR,
            artifacts::STRUCTURE_FILE,
        ] {
            assert!(job.dir.join(name).exists(), "missing {name}");
        }
        let coeff = std::fs::read_to_string(job.dir.join(artifacts::COEFF_INPUT)).unwrap();
        assert!(coeff.contains("conc 0.15"));
        assert!(!coeff.contains('@'));
    }

    #[tokio::test]
    async fn missing_structure_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SweepConfig::default();
        let templates = Templates::load(&cfg).unwrap();
        let mut job = job_in(tmp.path());
        job.structure_file = PathBuf::from("does/not/exist.pqr");

        let err = prepare_inputs(&cfg, &templates, &job).await.unwrap_err();
        assert!(err.to_string().contains("copy structure"));
    }
}
