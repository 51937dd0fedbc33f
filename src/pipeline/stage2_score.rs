use crate::model::errors::ValidationError;
use crate::model::method::Method;
use crate::model::record::{MethodInputs, RawRow, ScoredRecord, ValidatedRow};
use crate::pipeline::stage1_validate::validate_row;

/// Raw method score at full precision.
///
/// Bow-Tie divides by `barrier_effectiveness`, which validation keeps in `[1, 5]`.
pub fn raw_score(inputs: &MethodInputs) -> f64 {
    match *inputs {
        MethodInputs::Fmea {
            probability_pct,
            impact,
            detection,
        } => (probability_pct / 100.0) * impact * detection,
        MethodInputs::RiskMatrix {
            probability,
            impact,
        } => probability * impact,
        MethodInputs::BowTie {
            cause_likelihood,
            consequence_severity,
            barrier_effectiveness,
        } => (cause_likelihood * consequence_severity) / barrier_effectiveness,
    }
}

pub fn score_row(row: ValidatedRow) -> ScoredRecord {
    let score = raw_score(&row.inputs);
    ScoredRecord {
        row_index: row.row_index,
        risk_name: row.risk_name,
        task_affected: row.task_affected,
        inputs: row.inputs,
        score,
    }
}

impl Method {
    /// Validates and scores one register row under this method.
    pub fn assess(self, row: &RawRow, row_index: usize) -> Result<ScoredRecord, ValidationError> {
        validate_row(row, row_index, self).map(score_row)
    }
}

/// Scores every row of the register, splitting accepted rows from rejections.
/// Both sequences keep register order.
pub fn score_rows(rows: &[RawRow], method: Method) -> (Vec<ScoredRecord>, Vec<ValidationError>) {
    let mut scored = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        match method.assess(row, row_index) {
            Ok(record) => scored.push(record),
            Err(err) => {
                tracing::warn!("{err}");
                errors.push(err);
            }
        }
    }
    (scored, errors)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_score.rs"]
mod tests;
