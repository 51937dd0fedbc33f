use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::model::method::{Method, RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN};

/// Why a row was rejected under one method.
///
/// Missing and unparseable numeric cells share the message prefix
/// `missing or invalid data in one of the columns`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowErrorKind {
    #[error("{}", missing_message(.field))]
    MissingField { field: String },
    #[error("missing or invalid data in one of the columns: {field} is not a number ({value:?})")]
    UnparseableNumber { field: String, value: String },
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },
}

fn missing_message(field: &str) -> String {
    if field == RISK_NAME_COLUMN || field == TASK_AFFECTED_COLUMN {
        "missing or invalid Risk Name or Task Affected".to_string()
    } else {
        format!("missing or invalid data in one of the columns ({field})")
    }
}

impl RowErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            RowErrorKind::MissingField { .. } => "MissingField",
            RowErrorKind::UnparseableNumber { .. } => "UnparseableNumber",
            RowErrorKind::OutOfRange { .. } => "OutOfRange",
        }
    }
}

/// One rejected row under one method.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub row_index: usize,
    pub method: Method,
    pub kind: RowErrorKind,
}

impl ValidationError {
    /// Spreadsheet line of the row; line 1 is the header.
    pub fn line(&self) -> usize {
        self.row_index + 2
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {} ({})", self.line(), self.kind, self.method.label())
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ValidationError", 4)?;
        s.serialize_field("row_index", &self.row_index)?;
        s.serialize_field("method", &self.method)?;
        s.serialize_field("kind", self.kind.code())?;
        s.serialize_field("message", &self.message())?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("no valid data to process for {method}: {} row(s) rejected", .errors.len())]
    EmptyValidSet {
        method: Method,
        errors: Vec<ValidationError>,
    },
}
