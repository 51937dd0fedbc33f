use crate::model::errors::{RowErrorKind, ValidationError};
use crate::model::method::{FieldSpec, Method, RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN};
use crate::model::record::{CellValue, MethodInputs, RawRow, ValidatedRow};

/// Checks one register row against a method's contract.
///
/// Checks run in order and stop at the first failure:
/// 1. `Risk Name` and `Task Affected` are present and non-empty;
/// 2. every method column is present and parses as a finite number;
/// 3. every value lies within its closed range.
pub fn validate_row(
    row: &RawRow,
    row_index: usize,
    method: Method,
) -> Result<ValidatedRow, ValidationError> {
    let reject = |kind: RowErrorKind| ValidationError {
        row_index,
        method,
        kind,
    };

    let risk_name = identity_cell(row, RISK_NAME_COLUMN).map_err(reject)?;
    let task_affected = identity_cell(row, TASK_AFFECTED_COLUMN).map_err(reject)?;

    let fields = method.fields();
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        values.push(numeric_cell(row, field).map_err(reject)?);
    }

    for (field, &value) in fields.iter().zip(&values) {
        check_range(field, value).map_err(reject)?;
    }

    Ok(ValidatedRow {
        row_index,
        risk_name,
        task_affected,
        inputs: build_inputs(method, &values),
    })
}

fn identity_cell(row: &RawRow, column: &str) -> Result<String, RowErrorKind> {
    let missing = || RowErrorKind::MissingField {
        field: column.to_string(),
    };
    match row.get(column) {
        Some(CellValue::Text(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(CellValue::Number(v)) if v.is_finite() => Ok(format!("{v}")),
        _ => Err(missing()),
    }
}

fn numeric_cell(row: &RawRow, field: &FieldSpec) -> Result<f64, RowErrorKind> {
    let cell = match row.get(field.column) {
        Some(cell) if !cell.is_empty() => cell,
        _ => {
            return Err(RowErrorKind::MissingField {
                field: field.column.to_string(),
            });
        }
    };
    let parsed = match cell {
        CellValue::Number(v) => Some(*v),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Empty => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(RowErrorKind::UnparseableNumber {
            field: field.column.to_string(),
            value: cell.display(),
        }),
    }
}

fn check_range(field: &FieldSpec, value: f64) -> Result<(), RowErrorKind> {
    if field.contains(value) {
        Ok(())
    } else {
        Err(RowErrorKind::OutOfRange {
            field: field.column.to_string(),
            min: field.min,
            max: field.max,
            actual: value,
        })
    }
}

fn build_inputs(method: Method, values: &[f64]) -> MethodInputs {
    match method {
        Method::Fmea => MethodInputs::Fmea {
            probability_pct: values[0],
            impact: values[1],
            detection: values[2],
        },
        Method::RiskMatrix => MethodInputs::RiskMatrix {
            probability: values[0],
            impact: values[1],
        },
        Method::BowTie => MethodInputs::BowTie {
            cause_likelihood: values[0],
            consequence_severity: values[1],
            barrier_effectiveness: values[2],
        },
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_validate.rs"]
mod tests;
