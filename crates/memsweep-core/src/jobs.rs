//! Job identity: structure discovery and sweep cross-product expansion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::SweepConfig;

/// One unit of work: a (structure, pH, ionic strength) combination and its
/// exclusive output directory. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    /// Structure identifier (input file stem).
    pub structure: String,
    /// Structure file the pipeline copies into the job directory.
    pub structure_file: PathBuf,
    pub ph: f64,
    pub ionic_strength: f64,
    /// Output directory owned exclusively by this job.
    pub dir: PathBuf,
}

impl JobSpec {
    /// Stable identity, also the job directory name. Unique per batch.
    pub fn label(&self) -> String {
        format!(
            "{}_pH{}_is{}",
            self.structure,
            format_value(self.ph),
            format_value(self.ionic_strength)
        )
    }
}

/// A discovered input structure file.
#[derive(Debug, Clone)]
pub struct StructureFile {
    pub id: String,
    pub path: PathBuf,
    /// `.pdb` sources must be protonated before the pipeline can run.
    pub needs_protonation: bool,
}

/// Sweep expansion error. Distinguishes "misconfiguration" from a
/// silently-empty job list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("no input structures found")]
    NoStructures,
    #[error("sweep dimension `{0}` has no values")]
    NoSweepValues(&'static str),
    #[error("duplicate job `{0}` (repeated value in a sweep list?)")]
    DuplicateJob(String),
}

/// Formats a sweep scalar for labels, directory names, and templates.
/// Whole numbers keep one decimal place so `pH7.0` stays unambiguous.
pub(crate) fn format_value(v: f64) -> String {
    if v == v.trunc() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Path of the protonated copy of `id` at `ph`, under `run_dir/prepared/`.
pub fn prepared_structure_path(cfg: &SweepConfig, id: &str, ph: f64) -> PathBuf {
    cfg.prepared_dir()
        .join(format!("{id}_pH{}.pqr", format_value(ph)))
}

/// Lists `.pqr` and `.pdb` files under `input_dir`, sorted by id.
pub fn discover_structures(input_dir: &Path) -> Result<Vec<StructureFile>> {
    let entries = std::fs::read_dir(input_dir)
        .with_context(|| format!("read input dir {}", input_dir.display()))?;

    let mut structures = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let needs_protonation = match ext.to_ascii_lowercase().as_str() {
            "pqr" => false,
            "pdb" => true,
            _ => continue,
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        structures.push(StructureFile {
            id: stem.to_string(),
            path: path.clone(),
            needs_protonation,
        });
    }
    structures.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(structures)
}

/// Expands the full Cartesian product structures x pH x ionic strength.
///
/// Pure transformation over already-loaded configuration; enforces the
/// uniqueness invariant on job directories.
pub fn expand_jobs(
    cfg: &SweepConfig,
    structures: &[StructureFile],
) -> Result<Vec<JobSpec>, ExpandError> {
    if structures.is_empty() {
        return Err(ExpandError::NoStructures);
    }
    if cfg.ph_values.is_empty() {
        return Err(ExpandError::NoSweepValues("ph_values"));
    }
    if cfg.ionic_strengths.is_empty() {
        return Err(ExpandError::NoSweepValues("ionic_strengths"));
    }

    let jobs_dir = cfg.jobs_dir();
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(structures.len() * cfg.ph_values.len() * cfg.ionic_strengths.len());
    for s in structures {
        for &ph in &cfg.ph_values {
            let structure_file = if s.needs_protonation {
                prepared_structure_path(cfg, &s.id, ph)
            } else {
                s.path.clone()
            };
            for &ionic_strength in &cfg.ionic_strengths {
                let job = JobSpec {
                    structure: s.id.clone(),
                    structure_file: structure_file.clone(),
                    ph,
                    ionic_strength,
                    dir: PathBuf::new(),
                };
                let label = job.label();
                if !seen.insert(label.clone()) {
                    return Err(ExpandError::DuplicateJob(label));
                }
                let dir = jobs_dir.join(&label);
                jobs.push(JobSpec { dir, ..job });
            }
        }
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structures(n: usize) -> Vec<StructureFile> {
        (0..n)
            .map(|i| StructureFile {
                id: format!("prot{i}"),
                path: PathBuf::from(format!("structures/prot{i}.pqr")),
                needs_protonation: false,
            })
            .collect()
    }

    #[test]
    fn cross_product_cardinality_and_unique_dirs() {
        let mut cfg = SweepConfig::default();
        cfg.ph_values = vec![4.5, 7.0, 9.0];
        cfg.ionic_strengths = vec![0.15, 0.30];
        let jobs = expand_jobs(&cfg, &structures(4)).unwrap();
        assert_eq!(jobs.len(), 3 * 2 * 4);
        let dirs: HashSet<_> = jobs.iter().map(|j| j.dir.clone()).collect();
        assert_eq!(dirs.len(), jobs.len());
    }

    #[test]
    fn label_format() {
        let job = JobSpec {
            structure: "gramicidin".to_string(),
            structure_file: PathBuf::from("structures/gramicidin.pqr"),
            ph: 7.0,
            ionic_strength: 0.15,
            dir: PathBuf::new(),
        };
        assert_eq!(job.label(), "gramicidin_pH7.0_is0.15");
    }

    #[test]
    fn empty_inputs_are_errors_not_empty_lists() {
        let cfg = SweepConfig::default();
        assert_eq!(expand_jobs(&cfg, &[]).unwrap_err(), ExpandError::NoStructures);

        let mut cfg = SweepConfig::default();
        cfg.ph_values.clear();
        assert_eq!(
            expand_jobs(&cfg, &structures(1)).unwrap_err(),
            ExpandError::NoSweepValues("ph_values")
        );

        let mut cfg = SweepConfig::default();
        cfg.ionic_strengths.clear();
        assert_eq!(
            expand_jobs(&cfg, &structures(1)).unwrap_err(),
            ExpandError::NoSweepValues("ionic_strengths")
        );
    }

    #[test]
    fn repeated_sweep_value_is_rejected() {
        let mut cfg = SweepConfig::default();
        cfg.ph_values = vec![7.0, 7.0];
        let err = expand_jobs(&cfg, &structures(1)).unwrap_err();
        assert!(matches!(err, ExpandError::DuplicateJob(_)));
    }

    #[test]
    fn pdb_structures_resolve_to_prepared_path() {
        let cfg = SweepConfig::default();
        let s = StructureFile {
            id: "pore".to_string(),
            path: PathBuf::from("structures/pore.pdb"),
            needs_protonation: true,
        };
        let jobs = expand_jobs(&cfg, &[s]).unwrap();
        assert_eq!(
            jobs[0].structure_file,
            cfg.prepared_dir().join("pore_pH7.0.pqr")
        );
    }

    #[test]
    fn discover_structures_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["beta.pqr", "alpha.pdb", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let found = discover_structures(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "alpha");
        assert!(found[0].needs_protonation);
        assert_eq!(found[1].id, "beta");
        assert!(!found[1].needs_protonation);
    }

    #[test]
    fn format_value_keeps_decimal_for_whole_numbers() {
        assert_eq!(format_value(7.0), "7.0");
        assert_eq!(format_value(0.15), "0.15");
        assert_eq!(format_value(10.0), "10.0");
    }
}
