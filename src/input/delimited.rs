use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::input::InputError;
use crate::model::record::{CellValue, RawRow, RiskRegister};

/// Parses a header-first delimited table with RFC 4180 quoting; quoted
/// fields may span lines. Cells are trimmed and blank cells become
/// `CellValue::Empty`. Records whose cells are all blank are skipped.
pub fn parse_delimited<R: Read>(reader: R, delim: u8) -> Result<RiskRegister, InputError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delim)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    if header.iter().all(str::is_empty) {
        return Err(InputError::Parse("register has no header line".to_string()));
    }

    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    let mut keep = Vec::with_capacity(header.len());
    for name in header.iter() {
        let name = name.trim_start_matches('\u{feff}').trim().to_string();
        if name.is_empty() || columns.contains(&name) {
            if !name.is_empty() {
                tracing::warn!("duplicate column {name:?} in register header; keeping first");
            }
            keep.push(None);
            continue;
        }
        keep.push(Some(columns.len()));
        columns.push(name);
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() > keep.len() {
            tracing::warn!(
                "register line {} has {} fields, header has {}; extra fields ignored",
                record.position().map_or(0, |p| p.line()),
                record.len(),
                keep.len()
            );
        }

        let mut row = RawRow::default();
        for (pos, slot) in keep.iter().enumerate() {
            let Some(col) = slot else {
                continue;
            };
            let value = record
                .get(pos)
                .map(CellValue::from_text)
                .unwrap_or(CellValue::Empty);
            row.cells.insert(columns[*col].clone(), value);
        }
        rows.push(row);
    }

    Ok(RiskRegister {
        source: None,
        columns,
        rows,
    })
}
