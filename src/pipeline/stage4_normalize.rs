use crate::model::comparison::{ComparisonCell, NormalizedScore, ScoreSource};
use crate::model::method::{Method, Normalization};
use crate::model::result::MethodResult;

/// Maps a raw score onto the shared 0..100 axis.
///
/// Not clamped: a score outside the method's theoretical bounds extrapolates
/// outside 0..100.
pub fn normalize(method: Method, raw: f64) -> f64 {
    match method.normalization() {
        Normalization::Identity => raw,
        Normalization::Linear { floor, ceiling } => ((raw - floor) / (ceiling - floor)) * 100.0,
    }
}

/// Normalized score of `risk_name` under `result`'s method.
///
/// A risk with no valid row under this method is scored as raw 0, which
/// normalizes to 0 for FMEA but to a negative value for Risk Matrix and
/// Bow-Tie. The cell is marked `Substituted` so callers can tell it apart.
pub fn lookup(result: &MethodResult, risk_name: &str) -> ComparisonCell {
    match result.find(risk_name) {
        Some(record) => ComparisonCell {
            value: normalize(result.method, record.score),
            source: ScoreSource::Scored,
        },
        None => ComparisonCell {
            value: normalize(result.method, 0.0),
            source: ScoreSource::Substituted,
        },
    }
}

pub fn normalized_scores(result: &MethodResult) -> Vec<NormalizedScore> {
    result
        .ranked
        .iter()
        .map(|r| NormalizedScore {
            risk_name: r.risk_name.clone(),
            method: r.method(),
            value: normalize(r.method(), r.score),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_normalize.rs"]
mod tests;
