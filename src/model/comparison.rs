use serde::Serialize;

use crate::model::method::Method;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedScore {
    pub risk_name: String,
    pub method: Method,
    pub value: f64,
}

/// Where a comparison slot's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Scored,
    /// The risk has no valid row under this method; raw score 0 was normalized instead.
    Substituted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub value: f64,
    pub source: ScoreSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub risk_name: String,
    pub fmea: ComparisonCell,
    pub risk_matrix: ComparisonCell,
    pub bow_tie: ComparisonCell,
}

impl ComparisonRow {
    pub fn get(&self, method: Method) -> ComparisonCell {
        match method {
            Method::Fmea => self.fmea,
            Method::RiskMatrix => self.risk_matrix,
            Method::BowTie => self.bow_tie,
        }
    }

    pub fn substituted(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| self.get(*m).source == ScoreSource::Substituted)
            .collect()
    }
}

/// Per-risk normalized triples in register order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
}
