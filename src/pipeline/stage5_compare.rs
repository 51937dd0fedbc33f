use crate::model::comparison::{Comparison, ComparisonRow};
use crate::model::errors::PipelineError;
use crate::model::method::Method;
use crate::model::result::{MethodResults, MethodState};
use crate::pipeline::stage4_normalize::lookup;

/// Joins the three methods' normalized scores per risk, in register order.
///
/// Fails when any method has no valid rows; no partial comparison is built.
pub fn assemble_comparison(
    risk_names: &[String],
    results: &MethodResults,
) -> Result<Comparison, PipelineError> {
    for method in Method::ALL {
        let result = results.get(method);
        if result.state() == MethodState::Rejected {
            return Err(PipelineError::EmptyValidSet {
                method,
                errors: result.errors.clone(),
            });
        }
    }

    let rows = risk_names
        .iter()
        .map(|name| ComparisonRow {
            risk_name: name.clone(),
            fmea: lookup(&results.fmea, name),
            risk_matrix: lookup(&results.risk_matrix, name),
            bow_tie: lookup(&results.bow_tie, name),
        })
        .collect();

    Ok(Comparison { rows })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_compare.rs"]
mod tests;
