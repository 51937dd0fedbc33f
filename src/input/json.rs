use std::collections::BTreeMap;
use std::io::Read;

use serde_json::Value;

use crate::input::InputError;
use crate::model::record::{CellValue, RawRow, RiskRegister};

/// Parses a JSON array of row objects.
///
/// Any JSON value is accepted as a cell; values that are neither numbers,
/// strings nor null are kept as their JSON text and rejected per row by
/// validation.
pub fn parse_json<R: Read>(reader: R) -> Result<RiskRegister, InputError> {
    let records: Vec<BTreeMap<String, Value>> =
        serde_json::from_reader(reader).map_err(|e| InputError::Parse(e.to_string()))?;

    let rows = records
        .into_iter()
        .map(|cells| RawRow {
            cells: cells
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), cell_from_json(v)))
                .collect(),
        })
        .collect();

    Ok(RiskRegister::from_rows(rows))
}

fn cell_from_json(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Number(n) => n
            .as_f64()
            .map_or_else(|| CellValue::Text(n.to_string()), CellValue::Number),
        Value::String(s) => CellValue::from_text(&s),
        other => CellValue::Text(other.to_string()),
    }
}
