use std::io::Read;
use std::path::PathBuf;

use miette::IntoDiagnostic;
use nfasat_engine::SolverChoice;

use crate::types::{InputSource, OutputFormat};

pub(crate) fn parse_solver_choice(raw: &str) -> miette::Result<SolverChoice> {
    match raw {
        "z3" => Ok(SolverChoice::Z3),
        "cvc5" => Ok(SolverChoice::Cvc5),
        other => miette::bail!("Unknown solver: {other}. Use 'z3' or 'cvc5'."),
    }
}

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => miette::bail!("Unknown output format: {other}. Use 'text' or 'json'."),
    }
}

pub(crate) fn input_source(file: Option<PathBuf>) -> InputSource {
    match file {
        Some(path) if path.as_os_str() != "-" => InputSource::File(path),
        _ => InputSource::Stdin,
    }
}

/// Read the whole input, refusing anything larger than `max_bytes`.
pub(crate) fn read_source(source: &InputSource, max_bytes: u64) -> miette::Result<String> {
    let name = source.display_name();
    match source {
        InputSource::Stdin => read_limited(std::io::stdin().lock(), max_bytes, &name),
        InputSource::File(path) => {
            let metadata = std::fs::metadata(path)
                .into_diagnostic()
                .map_err(|e| e.wrap_err(format!("Cannot read {name}")))?;
            if metadata.len() > max_bytes {
                miette::bail!(
                    "Input file {name} is {} bytes, exceeding the limit of {max_bytes} bytes",
                    metadata.len()
                );
            }
            let file = std::fs::File::open(path).into_diagnostic()?;
            read_limited(file, max_bytes, &name)
        }
    }
}

fn read_limited<R: Read>(reader: R, max_bytes: u64, name: &str) -> miette::Result<String> {
    let mut text = String::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_string(&mut text)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("Cannot read {name}")))?;
    if text.len() as u64 > max_bytes {
        miette::bail!("Input {name} exceeds the limit of {max_bytes} bytes");
    }
    Ok(text)
}
