use std::path::Path;

use thiserror::Error;

pub mod audit;
pub mod delimited;
pub mod json;
pub mod source;

use crate::model::record::RiskRegister;
use audit::audit_columns;
use delimited::parse_delimited;
use json::parse_json;
use source::open_maybe_gz;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported register format: {0} (use .csv, .tsv, .txt or .json, optionally .gz)")]
    UnsupportedFormat(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("register is empty: {0}")]
    Empty(String),
    #[error("register is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFormat {
    Csv,
    Tsv,
    Json,
}

impl RegisterFormat {
    pub fn delimiter(self) -> Option<u8> {
        match self {
            RegisterFormat::Csv => Some(b','),
            RegisterFormat::Tsv => Some(b'\t'),
            RegisterFormat::Json => None,
        }
    }
}

pub fn detect_format(path: &Path) -> Result<RegisterFormat, InputError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".csv") {
        Ok(RegisterFormat::Csv)
    } else if name.ends_with(".tsv") || name.ends_with(".txt") {
        Ok(RegisterFormat::Tsv)
    } else if name.ends_with(".json") {
        Ok(RegisterFormat::Json)
    } else {
        Err(InputError::UnsupportedFormat(path.display().to_string()))
    }
}

/// Reads a register file. With `strict_columns`, every column of the full
/// register template must be present in the header.
pub fn load_register(path: &Path, strict_columns: bool) -> Result<RiskRegister, InputError> {
    let format = detect_format(path)?;
    let reader = open_maybe_gz(path)?;
    let mut register = match format.delimiter() {
        Some(delim) => parse_delimited(reader, delim)?,
        None => parse_json(reader)?,
    };
    if register.is_empty() {
        return Err(InputError::Empty(path.display().to_string()));
    }
    register.source = Some(path.to_path_buf());

    tracing::info!(
        "loaded register {}: {} rows, {} columns",
        path.display(),
        register.len(),
        register.columns.len()
    );

    let audit = audit_columns(&register.columns);
    for (method, missing) in &audit.missing_by_method {
        tracing::warn!(
            "register has no {} column(s) {}; every row will be rejected under {}",
            method.label(),
            missing.join(", "),
            method.label()
        );
    }
    if !audit.missing_identity.is_empty() {
        tracing::warn!(
            "register has no {} column(s); every row will be rejected",
            audit.missing_identity.join(", ")
        );
    }
    if strict_columns && !audit.is_complete() {
        return Err(InputError::MissingColumns(
            audit.missing_all().into_iter().map(str::to_string).collect(),
        ));
    }

    Ok(register)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
