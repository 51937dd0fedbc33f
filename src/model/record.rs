use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::model::method::Method;

/// A single cell as read from the register.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Rendering used in error messages and text reports.
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(v) => format!("{v}"),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub cells: BTreeMap<String, CellValue>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

/// The immutable input table. Row order is the register order.
#[derive(Debug, Clone, Default)]
pub struct RiskRegister {
    pub source: Option<PathBuf>,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RiskRegister {
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.cells.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self {
            source: None,
            columns,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Risk names in register order. Rows without a usable name yield an empty string.
    pub fn risk_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                row.get(crate::model::method::RISK_NAME_COLUMN)
                    .map(|v| v.display().trim().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Typed, range-checked inputs of one method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum MethodInputs {
    Fmea {
        probability_pct: f64,
        impact: f64,
        detection: f64,
    },
    RiskMatrix {
        probability: f64,
        impact: f64,
    },
    BowTie {
        cause_likelihood: f64,
        consequence_severity: f64,
        barrier_effectiveness: f64,
    },
}

impl MethodInputs {
    pub fn method(&self) -> Method {
        match self {
            MethodInputs::Fmea { .. } => Method::Fmea,
            MethodInputs::RiskMatrix { .. } => Method::RiskMatrix,
            MethodInputs::BowTie { .. } => Method::BowTie,
        }
    }

    /// Values in the column order of `Method::fields`.
    pub fn values(&self) -> Vec<f64> {
        match *self {
            MethodInputs::Fmea {
                probability_pct,
                impact,
                detection,
            } => vec![probability_pct, impact, detection],
            MethodInputs::RiskMatrix {
                probability,
                impact,
            } => vec![probability, impact],
            MethodInputs::BowTie {
                cause_likelihood,
                consequence_severity,
                barrier_effectiveness,
            } => vec![cause_likelihood, consequence_severity, barrier_effectiveness],
        }
    }
}

/// A register row that passed validation, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub row_index: usize,
    pub risk_name: String,
    pub task_affected: String,
    pub inputs: MethodInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub row_index: usize,
    pub risk_name: String,
    pub task_affected: String,
    pub inputs: MethodInputs,
    pub score: f64,
}

impl ScoredRecord {
    pub fn method(&self) -> Method {
        self.inputs.method()
    }
}
