pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::errors::ValidationError;
use crate::model::method::Method;
use crate::model::result::MethodState;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub path: Option<String>,
    pub n_rows: usize,
    pub n_columns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopRisk {
    pub rank: usize,
    pub risk_name: String,
    pub task_affected: String,
    pub score: f64,
    pub normalized: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodSummary {
    pub method: Method,
    pub label: &'static str,
    pub score_column: &'static str,
    pub state: MethodState,
    pub n_valid: usize,
    pub n_rejected: usize,
    pub normalized_median: Option<f64>,
    pub normalized_p90: Option<f64>,
    pub top: Vec<TopRisk>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub input: InputMeta,
    pub state: &'static str,
    pub primary_method: Method,
    pub top_n: usize,
    pub methods: Vec<MethodSummary>,
    pub rejected_methods: Vec<Method>,
    pub substituted_slots: usize,
    pub errors: Vec<ValidationError>,
}

pub fn format_f64_2(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

/// Compact rendering of an input value: `4`, `4.5`.
pub fn format_input(v: f64) -> String {
    format!("{v}")
}

pub fn quantile_indexed(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    Some(sorted[idx])
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.5)
}

pub fn p90(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.90)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
