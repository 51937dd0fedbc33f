use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::audit::audit_columns;
use super::delimited::parse_delimited;
use super::json::parse_json;
use super::{InputError, RegisterFormat, detect_format, load_register};
use crate::model::errors::RowErrorKind;
use crate::model::method::Method;
use crate::model::record::CellValue;
use crate::pipeline::run_pipeline;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

const HEADER: &str = "Risk Name,Probability (%),Impact (Severity),Detection,Probability,Impact,Cause Likelihood,Consequence Severity,Barrier Effectiveness,Task Affected";

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_riskqc_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn reader(text: &str) -> Cursor<Vec<u8>> {
    Cursor::new(text.as_bytes().to_vec())
}

#[test]
fn test_detect_format() {
    assert_eq!(detect_format(Path::new("r.csv")).unwrap(), RegisterFormat::Csv);
    assert_eq!(detect_format(Path::new("R.CSV.gz")).unwrap(), RegisterFormat::Csv);
    assert_eq!(detect_format(Path::new("r.tsv")).unwrap(), RegisterFormat::Tsv);
    assert_eq!(detect_format(Path::new("r.txt")).unwrap(), RegisterFormat::Tsv);
    assert_eq!(detect_format(Path::new("r.json.gz")).unwrap(), RegisterFormat::Json);
    assert!(matches!(
        detect_format(Path::new("r.xlsx")),
        Err(InputError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_parse_delimited_cells() {
    let text = format!("\u{feff}{HEADER}\r\n\r\nX, 50 ,5,2,4,5,5,5,1,Task A\r\nY,,5,2,4,5,5,5,1\r\n");
    let register = parse_delimited(reader(&text), b',').unwrap();
    assert_eq!(register.columns.len(), 10);
    assert_eq!(register.columns[0], "Risk Name");
    assert_eq!(register.len(), 2);

    let x = &register.rows[0];
    assert_eq!(x.get("Probability (%)"), Some(&CellValue::Text("50".to_string())));
    assert_eq!(x.get("Task Affected"), Some(&CellValue::Text("Task A".to_string())));

    let y = &register.rows[1];
    assert_eq!(y.get("Probability (%)"), Some(&CellValue::Empty));
    assert_eq!(y.get("Task Affected"), Some(&CellValue::Empty));
    assert_eq!(register.risk_names(), vec!["X", "Y"]);
}

#[test]
fn test_parse_delimited_duplicate_and_blank_header() {
    let text = "Risk Name,,Risk Name,Detection\nA,skip,B,3\n";
    let register = parse_delimited(reader(text), b',').unwrap();
    assert_eq!(register.columns, vec!["Risk Name", "Detection"]);
    assert_eq!(
        register.rows[0].get("Risk Name"),
        Some(&CellValue::Text("A".to_string()))
    );
}

#[test]
fn test_parse_delimited_no_header() {
    let err = parse_delimited(reader("\n\n"), b',').unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
}

#[test]
fn test_parse_delimited_quoted_fields() {
    let text = "Risk Name,Task Affected,Probability,Impact\n\"Flood\",\"Line one\nline two\",4,5\n\"Late, again\",\"say \"\"hi\"\"\",2,3\n";
    let register = parse_delimited(reader(text), b',').unwrap();
    assert_eq!(register.len(), 2);
    assert_eq!(
        register.rows[0].get("Task Affected"),
        Some(&CellValue::Text("Line one\nline two".to_string()))
    );
    assert_eq!(
        register.rows[0].get("Impact"),
        Some(&CellValue::Text("5".to_string()))
    );
    assert_eq!(register.risk_names(), vec!["Flood", "Late, again"]);
    assert_eq!(
        register.rows[1].get("Task Affected"),
        Some(&CellValue::Text("say \"hi\"".to_string()))
    );
}

#[test]
fn test_parse_delimited_tabs_keep_empty_cells() {
    let text = "Risk Name\tDetection\tImpact\na\t\tb\n";
    let register = parse_delimited(reader(text), b'\t').unwrap();
    let row = &register.rows[0];
    assert_eq!(row.get("Detection"), Some(&CellValue::Empty));
    assert_eq!(row.get("Impact"), Some(&CellValue::Text("b".to_string())));
}

#[test]
fn test_parse_delimited_skips_blank_records() {
    let text = "Risk Name,Detection\nA,3\n,\nB,4\n";
    let register = parse_delimited(reader(text), b',').unwrap();
    assert_eq!(register.risk_names(), vec!["A", "B"]);
}

#[test]
fn test_parse_json_rows() {
    let text = r#"[
        {"Risk Name": " X ", "Probability (%)": 50, "Detection": "2", "Task Affected": null},
        {"Risk Name": "Y", "Impact": 4.5}
    ]"#;
    let register = parse_json(reader(text)).unwrap();
    assert_eq!(register.len(), 2);
    let x = &register.rows[0];
    assert_eq!(x.get("Risk Name"), Some(&CellValue::Text("X".to_string())));
    assert_eq!(x.get("Probability (%)"), Some(&CellValue::Number(50.0)));
    assert_eq!(x.get("Detection"), Some(&CellValue::Text("2".to_string())));
    assert_eq!(x.get("Task Affected"), Some(&CellValue::Empty));
    assert!(register.columns.iter().any(|c| c == "Impact"));

    assert!(matches!(
        parse_json(reader("{\"not\": \"an array\"}")),
        Err(InputError::Parse(_))
    ));
}

#[test]
fn test_parse_json_odd_cell_rejects_only_its_row() {
    let text = r#"[
        {"Risk Name": "A", "Task Affected": "T", "Probability": 4, "Impact": 5},
        {"Risk Name": "B", "Task Affected": "T", "Probability": true, "Impact": [1]}
    ]"#;
    let register = parse_json(reader(text)).unwrap();
    assert_eq!(register.len(), 2);
    assert_eq!(
        register.rows[1].get("Probability"),
        Some(&CellValue::Text("true".to_string()))
    );

    let run = run_pipeline(&register);
    let matrix = &run.results.risk_matrix;
    assert_eq!(matrix.ranked.len(), 1);
    assert_eq!(matrix.ranked[0].risk_name, "A");
    assert_eq!(matrix.ranked[0].score, 20.0);
    assert_eq!(matrix.errors.len(), 1);
    assert_eq!(matrix.errors[0].row_index, 1);
    assert_eq!(
        matrix.errors[0].kind,
        RowErrorKind::UnparseableNumber {
            field: "Probability".to_string(),
            value: "true".to_string(),
        }
    );
}

#[test]
fn test_load_register_tsv_and_gz() {
    let dir = make_temp_dir();
    let tsv = format!(
        "{}\nX\t50\t5\t2\t4\t5\t5\t5\t1\tTask\n",
        HEADER.replace(',', "\t")
    );
    let plain = dir.join("register.tsv");
    write_file(&plain, &tsv);
    let gz = dir.join("register.tsv.gz");
    write_gz(&gz, &tsv);

    let a = load_register(&plain, true).unwrap();
    let b = load_register(&gz, true).unwrap();
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.columns, b.columns);
    assert_eq!(a.source.as_deref(), Some(plain.as_path()));
}

#[test]
fn test_load_register_empty() {
    let dir = make_temp_dir();
    let path = dir.join("empty.csv");
    write_file(&path, &format!("{HEADER}\n"));
    assert!(matches!(
        load_register(&path, false),
        Err(InputError::Empty(_))
    ));
}

#[test]
fn test_load_register_strict_columns() {
    let dir = make_temp_dir();
    let path = dir.join("partial.csv");
    write_file(
        &path,
        "Risk Name,Probability (%),Impact (Severity),Detection,Task Affected\nX,50,5,2,T\n",
    );

    let lenient = load_register(&path, false).unwrap();
    assert_eq!(lenient.len(), 1);

    match load_register(&path, true) {
        Err(InputError::MissingColumns(cols)) => assert_eq!(
            cols,
            vec![
                "Probability",
                "Impact",
                "Cause Likelihood",
                "Consequence Severity",
                "Barrier Effectiveness",
            ]
        ),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_audit_columns() {
    let columns: Vec<String> = ["Risk Name", "Probability", "Impact", "Detection"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let audit = audit_columns(&columns);
    assert!(!audit.is_complete());
    assert_eq!(audit.missing_identity, vec!["Task Affected"]);
    assert_eq!(audit.missing_by_method.len(), 2);
    assert_eq!(
        audit.missing_by_method[0],
        (Method::Fmea, vec!["Probability (%)", "Impact (Severity)"])
    );
    assert_eq!(audit.missing_by_method[1].0, Method::BowTie);
    assert_eq!(audit.missing_all().last(), Some(&"Task Affected"));
}
