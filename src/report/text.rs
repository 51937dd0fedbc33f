use crate::model::comparison::{Comparison, ScoreSource};
use crate::model::method::{Method, RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN};
use crate::model::record::ScoredRecord;
use crate::model::result::MethodResults;
use crate::pipeline::PipelineRun;
use crate::report::{format_f64_2, format_input};

/// Text view of a run: the primary method in full, the other methods'
/// top-N, the cross-method comparison, then every rejected row.
pub fn render_results_text(run: &PipelineRun, primary: Method, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str("Risk Assessment Results\n");
    out.push_str("=======================\n\n");

    render_method_section(&mut out, &run.results, primary, None);
    for method in primary.others() {
        out.push('\n');
        render_method_section(&mut out, &run.results, method, Some(top_n));
    }

    if let Some(comparison) = run.comparison() {
        out.push('\n');
        render_comparison(&mut out, comparison);
    }

    let errors = run.errors();
    if !errors.is_empty() {
        out.push_str("\nErrors encountered:\n");
        for err in &errors {
            out.push_str(&err.to_string());
            out.push('\n');
        }
    }

    out
}

fn render_method_section(
    out: &mut String,
    results: &MethodResults,
    method: Method,
    limit: Option<usize>,
) {
    let result = results.get(method);
    let (title, records) = match limit {
        None => (
            format!("{} Results (All Risks):", method.label().to_uppercase()),
            &result.ranked[..],
        ),
        Some(n) => (
            format!("{} Top {} Risks:", method.label().to_uppercase(), n),
            result.top(n),
        ),
    };
    out.push_str(&title);
    out.push('\n');
    if records.is_empty() {
        out.push_str("(no valid rows)\n");
        return;
    }
    out.push_str(&render_table(&method_headers(method), &method_rows(records)));
}

fn method_headers(method: Method) -> Vec<String> {
    let mut headers = vec![RISK_NAME_COLUMN.to_string()];
    headers.extend(method.fields().iter().map(|f| f.column.to_string()));
    headers.push(TASK_AFFECTED_COLUMN.to_string());
    headers.push(method.score_column().to_string());
    headers
}

fn method_rows(records: &[ScoredRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            let mut row = vec![r.risk_name.clone()];
            row.extend(r.inputs.values().into_iter().map(format_input));
            row.push(r.task_affected.clone());
            row.push(format_f64_2(r.score));
            row
        })
        .collect()
}

fn render_comparison(out: &mut String, comparison: &Comparison) {
    out.push_str("Normalized Scores (0 to 100) in Register Order:\n");
    let mut headers = vec![RISK_NAME_COLUMN.to_string()];
    headers.extend(Method::ALL.iter().map(|m| m.label().to_string()));
    let rows = comparison
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.risk_name.clone()];
            for method in Method::ALL {
                let cell = row.get(method);
                let mut text = format_f64_2(cell.value);
                if cell.source == ScoreSource::Substituted {
                    text.push('*');
                }
                cells.push(text);
            }
            cells
        })
        .collect::<Vec<_>>();
    out.push_str(&render_table(&headers, &rows));
    if comparison.rows.iter().any(|r| !r.substituted().is_empty()) {
        out.push_str("* no valid row under this method; raw score 0 substituted\n");
    }
}

/// Right-aligned fixed-width table.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{cell:>w$}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(&line);
    out.push('\n');
}
