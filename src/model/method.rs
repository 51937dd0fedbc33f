use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const RISK_NAME_COLUMN: &str = "Risk Name";
pub const TASK_AFFECTED_COLUMN: &str = "Task Affected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Fmea,
    RiskMatrix,
    BowTie,
}

/// One numeric input column and its closed validity range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldSpec {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Linear map from a method's raw score onto the shared 0..100 axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    Identity,
    Linear { floor: f64, ceiling: f64 },
}

const FMEA_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "Probability (%)",
        min: 0.0,
        max: 100.0,
    },
    FieldSpec {
        column: "Impact (Severity)",
        min: 1.0,
        max: 10.0,
    },
    FieldSpec {
        column: "Detection",
        min: 1.0,
        max: 10.0,
    },
];

const RISK_MATRIX_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "Probability",
        min: 1.0,
        max: 5.0,
    },
    FieldSpec {
        column: "Impact",
        min: 1.0,
        max: 5.0,
    },
];

const BOW_TIE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "Cause Likelihood",
        min: 1.0,
        max: 5.0,
    },
    FieldSpec {
        column: "Consequence Severity",
        min: 1.0,
        max: 5.0,
    },
    FieldSpec {
        column: "Barrier Effectiveness",
        min: 1.0,
        max: 5.0,
    },
];

impl Method {
    pub const ALL: [Method; 3] = [Method::Fmea, Method::RiskMatrix, Method::BowTie];

    pub fn label(self) -> &'static str {
        match self {
            Method::Fmea => "FMEA",
            Method::RiskMatrix => "Risk Matrix",
            Method::BowTie => "Bow-Tie",
        }
    }

    /// File-name safe identifier.
    pub fn key(self) -> &'static str {
        match self {
            Method::Fmea => "fmea",
            Method::RiskMatrix => "risk_matrix",
            Method::BowTie => "bow_tie",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Method::Fmea => FMEA_FIELDS,
            Method::RiskMatrix => RISK_MATRIX_FIELDS,
            Method::BowTie => BOW_TIE_FIELDS,
        }
    }

    pub fn score_column(self) -> &'static str {
        match self {
            Method::Fmea => "RPN",
            Method::RiskMatrix => "Risk Score",
            Method::BowTie => "Barrier Score",
        }
    }

    /// Bow-Tie's floor is the smallest reachable score, 1 * 1 / 5.
    pub fn normalization(self) -> Normalization {
        match self {
            Method::Fmea => Normalization::Identity,
            Method::RiskMatrix => Normalization::Linear {
                floor: 1.0,
                ceiling: 25.0,
            },
            Method::BowTie => Normalization::Linear {
                floor: 0.2,
                ceiling: 25.0,
            },
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            Method::Fmea => "(Probability (%) / 100) * Impact (Severity) * Detection",
            Method::RiskMatrix => "Probability * Impact",
            Method::BowTie => "(Cause Likelihood * Consequence Severity) / Barrier Effectiveness",
        }
    }

    /// The methods other than `self`, in canonical order.
    pub fn others(self) -> [Method; 2] {
        match self {
            Method::Fmea => [Method::RiskMatrix, Method::BowTie],
            Method::RiskMatrix => [Method::Fmea, Method::BowTie],
            Method::BowTie => [Method::Fmea, Method::RiskMatrix],
        }
    }
}

/// Every column a complete register carries, in the order the register template lists them.
pub fn register_columns() -> Vec<&'static str> {
    let mut out = vec![RISK_NAME_COLUMN];
    for method in Method::ALL {
        for field in method.fields() {
            out.push(field.column);
        }
    }
    out.push(TASK_AFFECTED_COLUMN);
    out
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown method {0:?} (use fmea|risk-matrix|bow-tie)")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_', ' '], "");
        match norm.as_str() {
            "fmea" => Ok(Method::Fmea),
            "riskmatrix" => Ok(Method::RiskMatrix),
            "bowtie" => Ok(Method::BowTie),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/method.rs"]
mod tests;
