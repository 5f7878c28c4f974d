use std::path::PathBuf;

use miette::IntoDiagnostic;
use nfasat_engine::{check_source, PipelineOptions};
use tracing::debug;

use crate::commands::helpers::{
    input_source, parse_output_format, parse_solver_choice, read_source,
};
use crate::types::OutputFormat;

/// Handler for the single `nfasat [FILE]` command.
pub(crate) fn run_check_command(
    file: Option<PathBuf>,
    solver: String,
    timeout: u64,
    dump_smt: Option<PathBuf>,
    format: String,
    max_input_bytes: u64,
) -> miette::Result<()> {
    let output_format = parse_output_format(&format)?;
    let source = input_source(file);
    let text = read_source(&source, max_input_bytes)?;
    let options = PipelineOptions {
        solver: parse_solver_choice(&solver)?,
        timeout_secs: timeout,
        dump_smt,
    };

    let report = check_source(&text, &source.display_name(), &options)?;
    debug!(
        variables = report.stats.variables,
        elapsed_ms = report.stats.solve_elapsed_ms,
        "check finished"
    );

    match output_format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
    }
    Ok(())
}
