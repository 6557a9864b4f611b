use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifacts;

/// External tool invocations (opaque binaries, found on PATH or by path).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Electrostatics solver binary (coefficient dummy run and production solve).
    pub solver: String,
    /// Membrane map editor binary.
    pub editor: String,
    /// Structure protonation binary.
    pub protonate: String,
    /// Forcefield flag value passed to the protonation tool.
    pub forcefield: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            solver: "apbs".to_string(),
            editor: "draw_membrane2".to_string(),
            protonate: "pdb2pqr".to_string(),
            forcefield: "PARSE".to_string(),
        }
    }
}

/// Grid geometry shared by both solver stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid points per dimension.
    pub dime: [u32; 3],
    /// Coarse-grid lengths in Angstrom.
    pub coarse_len: [f64; 3],
    /// Fine-grid lengths in Angstrom.
    pub fine_len: [f64; 3],
    /// Grid center in Angstrom.
    pub center: [f64; 3],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dime: [97, 97, 97],
            coarse_len: [120.0, 120.0, 120.0],
            fine_len: [60.0, 60.0, 60.0],
            center: [0.0, 0.0, 0.0],
        }
    }
}

/// Physical constants fed into the solver inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub protein_dielectric: f64,
    pub solvent_dielectric: f64,
    /// Temperature in Kelvin.
    pub temperature: f64,
    /// Mobile ion radius in Angstrom.
    pub ion_radius: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            protein_dielectric: 2.0,
            solvent_dielectric: 78.54,
            temperature: 298.15,
            ion_radius: 2.0,
        }
    }
}

/// Membrane exclusion-region geometry passed to the map editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MembraneConfig {
    /// Membrane center along z in Angstrom.
    pub z_center: f64,
    /// Bilayer thickness in Angstrom.
    pub thickness: f64,
    /// Dielectric constant inside the membrane slab.
    pub dielectric: f64,
    /// Transmembrane voltage in kT/e.
    pub voltage: f64,
    /// Upper leaflet exclusion (pore) radius in Angstrom.
    pub radius_top: f64,
    /// Lower leaflet exclusion (pore) radius in Angstrom.
    pub radius_bottom: f64,
}

impl Default for MembraneConfig {
    fn default() -> Self {
        Self {
            z_center: 0.0,
            thickness: 40.0,
            dielectric: 2.0,
            voltage: 0.0,
            radius_top: 0.0,
            radius_bottom: 0.0,
        }
    }
}

/// What a finished job directory must look like. The marker strings belong
/// to the solver's own output format, so they are configuration rather than
/// hard-coded logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Artifact names that must exist and be non-empty in each job directory.
    pub required_artifacts: Vec<String>,
    /// Log file scanned for the success marker.
    pub log_file: String,
    /// Literal string whose presence in the log signals numerical success.
    pub success_marker: String,
    /// Literal string on the line carrying the reported energy value.
    pub energy_marker: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_artifacts: artifacts::default_required_artifacts(),
            log_file: artifacts::SOLVE_LOG.to_string(),
            success_marker: "Thanks for using APBS".to_string(),
            energy_marker: "Global net ELEC energy".to_string(),
        }
    }
}

/// Full sweep configuration loaded from `memsweep.toml`.
///
/// Immutable after load; shared read-only by every concurrent job. There is
/// no ambient/global lookup anywhere in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Directory holding input structures (`.pqr` used as-is, `.pdb` protonated first).
    pub input_dir: PathBuf,
    /// Directory receiving `prepared/` structures and per-job `jobs/` directories.
    pub run_dir: PathBuf,
    /// pH sweep values.
    pub ph_values: Vec<f64>,
    /// Ionic strength sweep values in mol/L.
    pub ionic_strengths: Vec<f64>,
    /// Maximum number of jobs running their pipeline at once.
    pub max_concurrent_jobs: usize,
    /// Escalate a template missing an expected placeholder from warning to error.
    pub strict_templates: bool,
    /// Optional override for the built-in coefficient-stage template.
    pub coeff_template: Option<PathBuf>,
    /// Optional override for the built-in production-stage template.
    pub solve_template: Option<PathBuf>,
    pub tools: ToolsConfig,
    pub grid: GridConfig,
    pub physics: PhysicsConfig,
    pub membrane: MembraneConfig,
    pub validation: ValidationConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("structures"),
            run_dir: PathBuf::from("runs"),
            ph_values: vec![7.0],
            ionic_strengths: vec![0.15],
            max_concurrent_jobs: 2,
            strict_templates: false,
            coeff_template: None,
            solve_template: None,
            tools: ToolsConfig::default(),
            grid: GridConfig::default(),
            physics: PhysicsConfig::default(),
            membrane: MembraneConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Directory holding protonated structures.
    pub fn prepared_dir(&self) -> PathBuf {
        self.run_dir.join("prepared")
    }

    /// Directory holding per-job output directories.
    pub fn jobs_dir(&self) -> PathBuf {
        self.run_dir.join("jobs")
    }

    /// Startup validation. Configuration problems abort before any job is
    /// attempted; they are cheap to detect here and expensive to discover
    /// mid-sweep.
    pub fn validate(&self) -> Result<()> {
        if self.ph_values.is_empty() {
            bail!("configuration error: ph_values is empty");
        }
        if self.ionic_strengths.is_empty() {
            bail!("configuration error: ionic_strengths is empty");
        }
        for (name, bin) in [
            ("tools.solver", &self.tools.solver),
            ("tools.editor", &self.tools.editor),
            ("tools.protonate", &self.tools.protonate),
        ] {
            if bin.trim().is_empty() {
                bail!("configuration error: {} is empty", name);
            }
        }
        if self.membrane.thickness <= 0.0 {
            bail!(
                "configuration error: membrane.thickness must be > 0 (got {})",
                self.membrane.thickness
            );
        }
        if self.validation.required_artifacts.is_empty() {
            bail!("configuration error: validation.required_artifacts is empty");
        }
        Ok(())
    }
}

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "memsweep.toml";

/// Load configuration from `path` (or `./memsweep.toml`), creating a default
/// file if none exists so a fresh run directory is self-documenting.
pub fn load_or_init(path: Option<&Path>) -> Result<SweepConfig> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    if !path.exists() {
        let default_cfg = SweepConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, toml)
            .with_context(|| format!("write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: SweepConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SweepConfig::default();
        assert_eq!(cfg.ph_values, vec![7.0]);
        assert_eq!(cfg.ionic_strengths, vec![0.15]);
        assert_eq!(cfg.max_concurrent_jobs, 2);
        assert!(!cfg.strict_templates);
        assert_eq!(cfg.tools.solver, "apbs");
        assert_eq!(cfg.validation.log_file, "solve.log");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SweepConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SweepConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.ph_values, cfg.ph_values);
        assert_eq!(parsed.ionic_strengths, cfg.ionic_strengths);
        assert_eq!(parsed.grid.dime, cfg.grid.dime);
        assert_eq!(parsed.validation.required_artifacts, cfg.validation.required_artifacts);
    }

    #[test]
    fn config_toml_partial_file_uses_defaults() {
        let toml = r#"
            ph_values = [4.5, 7.0]
            ionic_strengths = [0.1, 0.5, 1.0]
            max_concurrent_jobs = 4

            [membrane]
            thickness = 32.0
        "#;
        let cfg: SweepConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.ph_values, vec![4.5, 7.0]);
        assert_eq!(cfg.ionic_strengths.len(), 3);
        assert_eq!(cfg.max_concurrent_jobs, 4);
        assert_eq!(cfg.membrane.thickness, 32.0);
        // untouched sections keep defaults
        assert_eq!(cfg.membrane.dielectric, 2.0);
        assert_eq!(cfg.tools.editor, "draw_membrane2");
        assert_eq!(cfg.physics.solvent_dielectric, 78.54);
    }

    #[test]
    fn validate_rejects_empty_sweeps() {
        let mut cfg = SweepConfig::default();
        cfg.ph_values.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = SweepConfig::default();
        cfg.ionic_strengths.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_tool_and_bad_membrane() {
        let mut cfg = SweepConfig::default();
        cfg.tools.solver = "  ".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = SweepConfig::default();
        cfg.membrane.thickness = 0.0;
        assert!(cfg.validate().is_err());
    }
}
