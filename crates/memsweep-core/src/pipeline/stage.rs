//! Pipeline stages and per-job outcomes.

use std::fmt;

/// The ordered steps of one job's pipeline. Strictly sequential: each stage
/// consumes the on-disk artifacts of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PrepareInputs,
    GenerateCoefficients,
    ApplyMembrane,
    ProductionSolve,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PrepareInputs => "prepare-inputs",
            Stage::GenerateCoefficients => "generate-coefficients",
            Stage::ApplyMembrane => "apply-membrane",
            Stage::ProductionSolve => "production-solve",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one stage: which step broke and the captured diagnostic
/// (exit status and stderr tail, or the underlying I/O error).
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub stage: Stage,
    pub reason: String,
}

impl StageFailure {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Result of driving one job's pipeline to completion or failure.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Succeeded,
    Failed { stage: Stage, reason: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }
}

impl From<StageFailure> for JobOutcome {
    fn from(f: StageFailure) -> Self {
        JobOutcome::Failed {
            stage: f.stage,
            reason: f.reason,
        }
    }
}
