mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::{InputError, load_register};
use crate::model::errors::PipelineError;
use crate::model::method::{Method, RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN};
use crate::pipeline::run_pipeline;
use crate::pipeline::stage6_report::{ReportOptions, write_reports};
use crate::report::format_input;
use crate::report::text::render_table;

#[derive(Debug, Parser)]
#[command(
    name = "kira-riskqc",
    version,
    about = "Score a risk register under FMEA, Risk Matrix and Bow-Tie and compare the methods."
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a register and write reports.
    Run(RunArgs),
    /// Print the columns, ranges and formulas each method expects.
    Columns,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Register file (.csv, .tsv, .txt or .json, optionally .gz).
    #[arg(long)]
    input: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Method whose full ranking leads the text report.
    #[arg(long, default_value = "fmea")]
    primary: Method,

    /// Number of top risks listed for the other methods.
    #[arg(long, default_value_t = 3)]
    top: usize,

    /// Fail when the register lacks any column of the full template.
    #[arg(long)]
    strict_columns: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("failed to write reports: {0}")]
    Report(#[from] std::io::Error),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli.command) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Run(args) => run_assessment(&args),
        Command::Columns => {
            print!("{}", render_columns());
            Ok(())
        }
    }
}

fn run_assessment(args: &RunArgs) -> Result<(), AppError> {
    let register = load_register(&args.input, args.strict_columns)?;
    let run = run_pipeline(&register);

    let options = ReportOptions {
        primary: args.primary,
        top_n: args.top,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    write_reports(&run, &register, &options, &args.out)?;

    if let Some(err) = run.failure() {
        return Err(err.into());
    }

    let errors = run.errors();
    if !errors.is_empty() {
        tracing::warn!("{} row rejection(s) across all methods", errors.len());
    }
    Ok(())
}

fn render_columns() -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Every method needs: {RISK_NAME_COLUMN}, {TASK_AFFECTED_COLUMN} (non-empty text)\n\n"
    ));
    for method in Method::ALL {
        out.push_str(&format!("{} ({})\n", method.label(), method.score_column()));
        let headers = vec![
            "Column".to_string(),
            "Min".to_string(),
            "Max".to_string(),
        ];
        let rows = method
            .fields()
            .iter()
            .map(|f| {
                vec![
                    f.column.to_string(),
                    format_input(f.min),
                    format_input(f.max),
                ]
            })
            .collect::<Vec<_>>();
        out.push_str(&render_table(&headers, &rows));
        out.push_str(&format!("Score: {}\n\n", method.formula()));
    }
    out
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
