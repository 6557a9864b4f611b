//! Solver-input templates: loading, startup validation, and rendering.
//!
//! Two templates are long-lived (coefficient stage, production stage); the
//! membrane-geometry parameter file is always generated fresh, never
//! templated.

pub mod render;
pub mod tokens;

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::SweepConfig;
use crate::jobs::{format_value, JobSpec};

pub use render::{render, Rendered};

const DEFAULT_COEFF: &str = include_str!("assets/coeff.in.tmpl");
const DEFAULT_SOLVE: &str = include_str!("assets/solve.in.tmpl");

/// The active template set, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Templates {
    pub coeff: String,
    pub solve: String,
}

impl Templates {
    /// Loads built-in templates (or configured overrides) and validates the
    /// disjoint-token invariant plus placeholder coverage against them.
    ///
    /// A template missing an expected placeholder is warned about here, once
    /// per run; with `strict_templates` it aborts before any job starts.
    pub fn load(cfg: &SweepConfig) -> Result<Self> {
        let coeff = read_override(&cfg.coeff_template, DEFAULT_COEFF)?;
        let solve = read_override(&cfg.solve_template, DEFAULT_SOLVE)?;
        let templates = Self { coeff, solve };
        templates.validate(cfg)?;
        Ok(templates)
    }

    fn validate(&self, cfg: &SweepConfig) -> Result<()> {
        let probe = JobSpec {
            structure: "probe".to_string(),
            structure_file: PathBuf::from("probe.pqr"),
            ph: cfg.ph_values.first().copied().unwrap_or(7.0),
            ionic_strength: cfg.ionic_strengths.first().copied().unwrap_or(0.15),
            dir: PathBuf::new(),
        };
        let values = tokens::token_values(&probe, cfg);
        tokens::validate_token_set(&values).context("template token set")?;

        for (name, text) in [("coefficient", &self.coeff), ("production", &self.solve)] {
            let rendered = render(text, &values);
            for token in &rendered.missing {
                tracing::warn!(
                    template = name,
                    token,
                    "template does not contain an expected placeholder; the solver \
                     input will keep whatever literal value the template carries"
                );
            }
            if cfg.strict_templates && !rendered.is_complete() {
                bail!(
                    "{} template is missing placeholders {:?} and strict_templates is set",
                    name,
                    rendered.missing
                );
            }
        }
        Ok(())
    }

    /// Renders the coefficient-stage input for one job.
    pub fn render_coeff(&self, job: &JobSpec, cfg: &SweepConfig) -> Rendered {
        render(&self.coeff, &tokens::token_values(job, cfg))
    }

    /// Renders the production-stage input for one job.
    pub fn render_solve(&self, job: &JobSpec, cfg: &SweepConfig) -> Rendered {
        render(&self.solve, &tokens::token_values(job, cfg))
    }
}

fn read_override(path: &Option<PathBuf>, default: &str) -> Result<String> {
    match path {
        Some(p) => {
            fs::read_to_string(p).with_context(|| format!("read template {}", p.display()))
        }
        None => Ok(default.to_string()),
    }
}

/// Contents of the membrane-geometry parameter side file: the seven scalars
/// the map editor receives, in invocation order.
pub fn membrane_par_contents(job: &JobSpec, cfg: &SweepConfig) -> String {
    let m = &cfg.membrane;
    format!(
        "# membrane geometry for {}\n\
         z_center {}\n\
         thickness {}\n\
         dielectric {}\n\
         voltage {}\n\
         ionic_strength {}\n\
         radius_top {}\n\
         radius_bottom {}\n",
        job.label(),
        format_value(m.z_center),
        format_value(m.thickness),
        format_value(m.dielectric),
        format_value(m.voltage),
        format_value(job.ionic_strength),
        format_value(m.radius_top),
        format_value(m.radius_bottom),
    )
}

/// Arguments handed to the membrane editor after the map file name.
pub fn membrane_editor_args(job: &JobSpec, cfg: &SweepConfig) -> Vec<String> {
    let m = &cfg.membrane;
    [
        m.z_center,
        m.thickness,
        m.dielectric,
        m.voltage,
        job.ionic_strength,
        m.radius_top,
        m.radius_bottom,
    ]
    .iter()
    .map(|v| format_value(*v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobSpec {
        JobSpec {
            structure: "gA".to_string(),
            structure_file: PathBuf::from("structures/gA.pqr"),
            ph: 7.0,
            ionic_strength: 0.15,
            dir: PathBuf::from("runs/jobs/gA_pH7.0_is0.15"),
        }
    }

    #[test]
    fn builtin_templates_render_completely() {
        let cfg = SweepConfig::default();
        let templates = Templates::load(&cfg).unwrap();

        let coeff = templates.render_coeff(&job(), &cfg);
        assert!(coeff.is_complete(), "missing: {:?}", coeff.missing);
        for token in tokens::ALL {
            assert!(!coeff.text.contains(token));
        }
        assert!(coeff.text.contains("mol pqr protein.pqr"));
        assert!(coeff.text.contains("conc 0.15"));
        assert!(coeff.text.contains("dime 97 97 97"));

        let solve = templates.render_solve(&job(), &cfg);
        assert!(solve.is_complete());
        assert!(solve.text.contains("dielx_cg_m.dx"));
        assert!(solve.text.contains("write pot dx pot_fg"));
    }

    #[test]
    fn strict_templates_rejects_incomplete_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coeff.in.tmpl");
        std::fs::write(&path, "read\n    mol pqr @PQR@\nend\n").unwrap();

        let mut cfg = SweepConfig::default();
        cfg.coeff_template = Some(path.clone());
        // default policy: warn only
        assert!(Templates::load(&cfg).is_ok());

        cfg.strict_templates = true;
        assert!(Templates::load(&cfg).is_err());
    }

    #[test]
    fn membrane_par_lists_seven_parameters() {
        let cfg = SweepConfig::default();
        let par = membrane_par_contents(&job(), &cfg);
        let values: Vec<_> = par.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(values.len(), 7);
        assert!(par.contains("thickness 40.0"));
        assert!(par.contains("ionic_strength 0.15"));
    }

    #[test]
    fn editor_args_follow_par_file_order() {
        let cfg = SweepConfig::default();
        let args = membrane_editor_args(&job(), &cfg);
        assert_eq!(args.len(), 7);
        assert_eq!(args[1], "40.0");
        assert_eq!(args[4], "0.15");
    }
}
