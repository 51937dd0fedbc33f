use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::comparison::Comparison;
use crate::model::method::{Method, RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN};
use crate::model::record::RiskRegister;
use crate::model::result::MethodResult;
use crate::pipeline::PipelineRun;
use crate::pipeline::stage4_normalize::{normalize, normalized_scores};
use crate::report::json::render_summary_json;
use crate::report::text::render_results_text;
use crate::report::{
    InputMeta, MethodSummary, SummaryData, ToolMeta, TopRisk, format_f64_6, format_input, median,
    p90,
};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub primary: Method,
    pub top_n: usize,
    pub tool_name: String,
    pub tool_version: String,
}

/// Writes the run's artifacts into `out_dir` and returns their paths.
///
/// A failed run only gets `summary.json`.
pub fn write_reports(
    run: &PipelineRun,
    register: &RiskRegister,
    options: &ReportOptions,
    out_dir: &Path,
) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let summary = build_summary(run, register, options);
    let json = render_summary_json(&summary).map_err(std::io::Error::other)?;
    let summary_path = out_dir.join("summary.json");
    write_text(&summary_path, &json)?;
    written.push(summary_path);

    let Some(comparison) = run.comparison() else {
        return Ok(written);
    };

    let results_path = out_dir.join("results.txt");
    write_text(
        &results_path,
        &render_results_text(run, options.primary, options.top_n),
    )?;
    written.push(results_path);

    for method in Method::ALL {
        let path = out_dir.join(format!("ranking_{}.tsv", method.key()));
        write_ranking_tsv(run.results.get(method), &path)?;
        written.push(path);
    }

    let comparison_path = out_dir.join("comparison.tsv");
    write_comparison_tsv(comparison, &comparison_path)?;
    written.push(comparison_path);

    for path in &written {
        tracing::info!("wrote {}", path.display());
    }
    Ok(written)
}

fn write_ranking_tsv(result: &MethodResult, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let mut header = vec!["rank", "row", RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN];
    header.extend(result.method.fields().iter().map(|f| f.column));
    header.push(result.method.score_column());
    header.push("normalized");
    writeln!(w, "{}", header.join("\t"))?;

    for (i, record) in result.ranked.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            (record.row_index + 2).to_string(),
            sanitize(&record.risk_name),
            sanitize(&record.task_affected),
        ];
        row.extend(record.inputs.values().into_iter().map(format_input));
        row.push(format_f64_6(record.score));
        row.push(format_f64_6(normalize(result.method, record.score)));
        writeln!(w, "{}", row.join("\t"))?;
    }
    w.flush()
}

fn write_comparison_tsv(comparison: &Comparison, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let mut header = vec![RISK_NAME_COLUMN.to_string()];
    header.extend(Method::ALL.iter().map(|m| m.key().to_string()));
    header.push("substituted".to_string());
    writeln!(w, "{}", header.join("\t"))?;

    for row in &comparison.rows {
        let mut line = vec![sanitize(&row.risk_name)];
        for method in Method::ALL {
            line.push(format_f64_6(row.get(method).value));
        }
        line.push(
            row.substituted()
                .iter()
                .map(|m| m.key())
                .collect::<Vec<_>>()
                .join(","),
        );
        writeln!(w, "{}", line.join("\t"))?;
    }
    w.flush()
}

pub fn build_summary(
    run: &PipelineRun,
    register: &RiskRegister,
    options: &ReportOptions,
) -> SummaryData {
    let methods = run
        .results
        .iter()
        .map(|result| method_summary(result, options.top_n))
        .collect();

    let substituted_slots = run
        .comparison()
        .map(|c| c.rows.iter().map(|r| r.substituted().len()).sum::<usize>())
        .unwrap_or(0);

    SummaryData {
        tool: ToolMeta {
            name: options.tool_name.clone(),
            version: options.tool_version.clone(),
        },
        input: InputMeta {
            path: register.source.as_ref().map(|p| p.display().to_string()),
            n_rows: register.len(),
            n_columns: register.columns.len(),
        },
        state: if run.is_failed() {
            "failed"
        } else {
            "comparable"
        },
        primary_method: options.primary,
        top_n: options.top_n,
        methods,
        rejected_methods: run.results.rejected(),
        substituted_slots,
        errors: run.errors(),
    }
}

fn method_summary(result: &MethodResult, top_n: usize) -> MethodSummary {
    let normalized = normalized_scores(result)
        .into_iter()
        .map(|n| n.value)
        .collect::<Vec<_>>();
    let top = result
        .top(top_n)
        .iter()
        .enumerate()
        .map(|(i, r)| TopRisk {
            rank: i + 1,
            risk_name: r.risk_name.clone(),
            task_affected: r.task_affected.clone(),
            score: r.score,
            normalized: normalized[i],
        })
        .collect();

    MethodSummary {
        method: result.method,
        label: result.method.label(),
        score_column: result.method.score_column(),
        state: result.state(),
        n_valid: result.ranked.len(),
        n_rejected: result.errors.len(),
        normalized_median: median(&normalized),
        normalized_p90: p90(&normalized),
        top,
    }
}

fn sanitize(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
