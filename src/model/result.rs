use serde::Serialize;

use crate::model::errors::ValidationError;
use crate::model::method::Method;
use crate::model::record::ScoredRecord;
use crate::pipeline::stage3_rank::top_n;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodState {
    Scored,
    Rejected,
}

/// Output of one method over the full register: valid rows ranked by
/// descending score, plus every rejection in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodResult {
    pub method: Method,
    pub ranked: Vec<ScoredRecord>,
    pub errors: Vec<ValidationError>,
}

impl MethodResult {
    pub fn state(&self) -> MethodState {
        if self.ranked.is_empty() {
            MethodState::Rejected
        } else {
            MethodState::Scored
        }
    }

    pub fn top(&self, n: usize) -> &[ScoredRecord] {
        top_n(&self.ranked, n)
    }

    /// First ranked record carrying `risk_name`; with duplicate names this is the highest score.
    pub fn find(&self, risk_name: &str) -> Option<&ScoredRecord> {
        self.ranked.iter().find(|r| r.risk_name == risk_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodResults {
    pub fmea: MethodResult,
    pub risk_matrix: MethodResult,
    pub bow_tie: MethodResult,
}

impl MethodResults {
    pub fn get(&self, method: Method) -> &MethodResult {
        match method {
            Method::Fmea => &self.fmea,
            Method::RiskMatrix => &self.risk_matrix,
            Method::BowTie => &self.bow_tie,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodResult> {
        [&self.fmea, &self.risk_matrix, &self.bow_tie].into_iter()
    }

    pub fn rejected(&self) -> Vec<Method> {
        self.iter()
            .filter(|r| r.state() == MethodState::Rejected)
            .map(|r| r.method)
            .collect()
    }

    /// Every accumulated error, method by method, in row order within a method.
    pub fn all_errors(&self) -> Vec<ValidationError> {
        self.iter().flat_map(|r| r.errors.iter().cloned()).collect()
    }
}
