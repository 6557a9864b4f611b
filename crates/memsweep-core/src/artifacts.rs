//! Canonical file names inside a job's output directory.
//!
//! The job directory is the sole contract between pipeline and validator,
//! so every producer and consumer goes through these names.

/// Canonical structure file copied into each job directory.
pub const STRUCTURE_FILE: &str = "protein.pqr";

/// Rendered coefficient-stage solver input.
pub const COEFF_INPUT: &str = "coeff.in";

/// Rendered production-stage solver input.
pub const SOLVE_INPUT: &str = "solve.in";

/// Generated membrane-geometry parameter side file.
pub const MEMBRANE_PAR: &str = "membrane.par";

/// Captured output of the coefficient-stage solver run.
pub const COEFF_LOG: &str = "coeff.log";

/// Captured output of the production solve. Scanned for the success marker.
pub const SOLVE_LOG: &str = "solve.log";

/// Grid suffixes: coarse and fine.
pub const GRIDS: [&str; 2] = ["cg", "fg"];

/// Coefficient fields that get a membrane exclusion region written into them.
const MEMBRANE_FIELDS: [&str; 4] = ["dielx", "diely", "dielz", "kappa"];

/// Coefficient fields produced by the dummy run (charge is kept unmodified).
const COEFF_FIELDS: [&str; 5] = ["dielx", "diely", "dielz", "kappa", "charge"];

/// Maps the coefficient-generation stage must produce (per grid).
pub fn coefficient_maps() -> Vec<String> {
    let mut maps = Vec::with_capacity(COEFF_FIELDS.len() * GRIDS.len());
    for grid in GRIDS {
        for field in COEFF_FIELDS {
            maps.push(format!("{field}_{grid}.dx"));
        }
    }
    maps
}

/// (input, output) pairs for the membrane editor, one invocation each.
pub fn membrane_edits() -> Vec<(String, String)> {
    let mut edits = Vec::with_capacity(MEMBRANE_FIELDS.len() * GRIDS.len());
    for grid in GRIDS {
        for field in MEMBRANE_FIELDS {
            edits.push((
                format!("{field}_{grid}.dx"),
                format!("{field}_{grid}_m.dx"),
            ));
        }
    }
    edits
}

/// Potential maps the production solve must produce.
pub fn potential_maps() -> Vec<String> {
    GRIDS.iter().map(|grid| format!("pot_{grid}.dx")).collect()
}

/// Default validation manifest: membrane-modified maps, potentials, and the
/// production log. Overridable via the `[validation]` config section.
pub fn default_required_artifacts() -> Vec<String> {
    let mut required: Vec<String> = membrane_edits().into_iter().map(|(_, out)| out).collect();
    required.extend(potential_maps());
    required.push(SOLVE_LOG.to_string());
    required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_maps_cover_both_grids() {
        let maps = coefficient_maps();
        assert_eq!(maps.len(), 10);
        assert!(maps.contains(&"dielx_cg.dx".to_string()));
        assert!(maps.contains(&"charge_fg.dx".to_string()));
    }

    #[test]
    fn membrane_edits_exclude_charge() {
        let edits = membrane_edits();
        assert_eq!(edits.len(), 8);
        assert!(edits.iter().all(|(input, _)| !input.starts_with("charge")));
        assert!(edits
            .iter()
            .any(|(input, output)| input == "kappa_fg.dx" && output == "kappa_fg_m.dx"));
    }

    #[test]
    fn default_manifest_contains_potentials_and_log() {
        let required = default_required_artifacts();
        assert!(required.contains(&"pot_cg.dx".to_string()));
        assert!(required.contains(&"pot_fg.dx".to_string()));
        assert!(required.contains(&SOLVE_LOG.to_string()));
        assert!(!required.contains(&"dielx_cg.dx".to_string()));
        assert!(required.contains(&"dielx_cg_m.dx".to_string()));
    }
}
