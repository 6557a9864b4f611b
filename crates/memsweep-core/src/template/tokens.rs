//! Recognized placeholder tokens and the disjoint-token invariant.
//!
//! Substitution is plain sequential find-replace, which is only sound if no
//! recognized token can appear inside another token or inside a substituted
//! value. That invariant is validated at startup against the active template
//! set instead of being assumed.

use thiserror::Error;

use crate::config::SweepConfig;
use crate::jobs::{format_value, JobSpec};

pub const PQR: &str = "@PQR@";
pub const PH: &str = "@PH@";
pub const IONSTR: &str = "@IONSTR@";
pub const ION_RADIUS: &str = "@ION_RADIUS@";
pub const DIME: &str = "@DIME@";
pub const CGLEN: &str = "@CGLEN@";
pub const FGLEN: &str = "@FGLEN@";
pub const GCENT: &str = "@GCENT@";
pub const PDIE: &str = "@PDIE@";
pub const SDIE: &str = "@SDIE@";
pub const TEMP: &str = "@TEMP@";

/// Every recognized token, in substitution order.
pub const ALL: [&str; 11] = [
    PQR, PH, IONSTR, ION_RADIUS, DIME, CGLEN, FGLEN, GCENT, PDIE, SDIE, TEMP,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenSetError {
    #[error("placeholder `{outer}` contains placeholder `{inner}`")]
    NestedTokens { outer: String, inner: String },
    #[error("substituted value for `{token}` contains placeholder `{inner}`: {value:?}")]
    ValueContainsToken {
        token: String,
        inner: String,
        value: String,
    },
}

fn triple(v: [f64; 3]) -> String {
    format!("{} {} {}", v[0], v[1], v[2])
}

/// Resolves every recognized token against one job and the shared config.
pub fn token_values(job: &JobSpec, cfg: &SweepConfig) -> Vec<(&'static str, String)> {
    vec![
        (PQR, crate::artifacts::STRUCTURE_FILE.to_string()),
        (PH, format_value(job.ph)),
        (IONSTR, format_value(job.ionic_strength)),
        (ION_RADIUS, format_value(cfg.physics.ion_radius)),
        (
            DIME,
            format!("{} {} {}", cfg.grid.dime[0], cfg.grid.dime[1], cfg.grid.dime[2]),
        ),
        (CGLEN, triple(cfg.grid.coarse_len)),
        (FGLEN, triple(cfg.grid.fine_len)),
        (GCENT, triple(cfg.grid.center)),
        (PDIE, format_value(cfg.physics.protein_dielectric)),
        (SDIE, format_value(cfg.physics.solvent_dielectric)),
        (TEMP, format_value(cfg.physics.temperature)),
    ]
}

/// Checks the disjoint-token invariant for one resolved value set.
pub fn validate_token_set(values: &[(&'static str, String)]) -> Result<(), TokenSetError> {
    for (outer, _) in values {
        for (inner, _) in values {
            if outer != inner && outer.contains(inner) {
                return Err(TokenSetError::NestedTokens {
                    outer: (*outer).to_string(),
                    inner: (*inner).to_string(),
                });
            }
        }
    }
    for (token, value) in values {
        for (inner, _) in values {
            if value.contains(inner) {
                return Err(TokenSetError::ValueContainsToken {
                    token: (*token).to_string(),
                    inner: (*inner).to_string(),
                    value: value.clone(),
                });
            }
        }
    }
    Ok(())
}
