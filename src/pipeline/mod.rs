pub mod stage1_validate;
pub mod stage2_score;
pub mod stage3_rank;
pub mod stage4_normalize;
pub mod stage5_compare;
pub mod stage6_report;

use std::time::Instant;

use crate::model::comparison::Comparison;
use crate::model::errors::{PipelineError, ValidationError};
use crate::model::method::Method;
use crate::model::record::RiskRegister;
use crate::model::result::{MethodResult, MethodResults};
use crate::pipeline::stage2_score::score_rows;
use crate::pipeline::stage3_rank::rank;
use crate::pipeline::stage5_compare::assemble_comparison;

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Comparable(Comparison),
    Failed { rejected: Vec<Method> },
}

/// Everything one run produces. Errors are kept even when the run succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    pub results: MethodResults,
    pub state: RunState,
}

impl PipelineRun {
    pub fn errors(&self) -> Vec<ValidationError> {
        self.results.all_errors()
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        match &self.state {
            RunState::Comparable(c) => Some(c),
            RunState::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, RunState::Failed { .. })
    }

    /// The fatal error of a failed run, for the first rejected method.
    pub fn failure(&self) -> Option<PipelineError> {
        match &self.state {
            RunState::Comparable(_) => None,
            RunState::Failed { rejected } => rejected.first().map(|&method| {
                PipelineError::EmptyValidSet {
                    method,
                    errors: self.results.get(method).errors.clone(),
                }
            }),
        }
    }
}

/// Validates, scores and ranks the register under one method.
pub fn run_method(register: &RiskRegister, method: Method) -> MethodResult {
    let started = Instant::now();
    let (scored, errors) = score_rows(&register.rows, method);
    let ranked = rank(scored);
    tracing::info!(
        "{}: {} valid, {} rejected",
        method.label(),
        ranked.len(),
        errors.len()
    );
    tracing::debug!(
        "{} pass finished in {:?}",
        method.label(),
        started.elapsed()
    );
    MethodResult {
        method,
        ranked,
        errors,
    }
}

/// Runs the three methods independently, then assembles the comparison.
pub fn run_pipeline(register: &RiskRegister) -> PipelineRun {
    let (fmea, (risk_matrix, bow_tie)) = rayon::join(
        || run_method(register, Method::Fmea),
        || {
            rayon::join(
                || run_method(register, Method::RiskMatrix),
                || run_method(register, Method::BowTie),
            )
        },
    );
    let results = MethodResults {
        fmea,
        risk_matrix,
        bow_tie,
    };

    let risk_names = register.risk_names();
    let state = match assemble_comparison(&risk_names, &results) {
        Ok(comparison) => RunState::Comparable(comparison),
        Err(PipelineError::EmptyValidSet { .. }) => {
            let rejected = results.rejected();
            for method in &rejected {
                tracing::error!("no valid data to process for {}", method.label());
            }
            RunState::Failed { rejected }
        }
    };

    PipelineRun {
        results,
        state,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
