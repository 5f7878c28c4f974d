use std::collections::HashSet;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use thiserror::Error;

use crate::backends::smtlib_printer::{to_smtlib, LOGIC};
use crate::formula::{Formula, VarId};
use crate::solver::{Assignment, SatResult, SatSolver};

#[derive(Debug, Error)]
pub enum Cvc5Error {
    #[error("cvc5 I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cvc5 not found: {0}")]
    NotFound(String),
    #[error("cvc5 error: {0}")]
    SolverError(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(VarId),
}

/// cvc5 driven over SMT-LIB2 on its stdin/stdout.
///
/// Commands without output are written without waiting; only `check-sat` and
/// `get-value` read a reply, one balanced s-expression each.
pub struct Cvc5Solver {
    child: Child,
    input: ChildStdin,
    output: BufReader<ChildStdout>,
    declared: HashSet<VarId>,
}

impl Cvc5Solver {
    pub fn new() -> Result<Self, Cvc5Error> {
        Self::with_command_and_timeout("cvc5", None)
    }

    /// `timeout_secs == 0` means no limit.
    pub fn with_timeout_secs(timeout_secs: u64) -> Result<Self, Cvc5Error> {
        let limit = (timeout_secs > 0).then(|| timeout_secs.saturating_mul(1000));
        Self::with_command_and_timeout("cvc5", limit)
    }

    pub fn with_command_and_timeout(cmd: &str, timeout_ms: Option<u64>) -> Result<Self, Cvc5Error> {
        let mut command = Command::new(cmd);
        command.args(["--lang=smt2", "--incremental", "--produce-models"]);
        if let Some(ms) = timeout_ms {
            command.arg(format!("--tlimit-per={ms}"));
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Cvc5Error::NotFound(format!("{cmd}: {e}")))?;

        let (Some(input), Some(output)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(Cvc5Error::SolverError("cvc5 pipes unavailable".into()));
        };
        let mut solver = Self {
            child,
            input,
            output: BufReader::new(output),
            declared: HashSet::new(),
        };
        solver.write(&format!("(set-logic {LOGIC})"))?;
        Ok(solver)
    }

    fn write(&mut self, command: &str) -> Result<(), Cvc5Error> {
        writeln!(self.input, "{command}")?;
        Ok(())
    }

    /// Send `command` and read back one reply.
    fn query(&mut self, command: &str) -> Result<String, Cvc5Error> {
        self.write(command)?;
        self.input.flush()?;
        let reply = read_reply(&mut self.output)?;
        if reply.is_empty() {
            return Err(Cvc5Error::SolverError(format!(
                "cvc5 exited without answering `{command}`"
            )));
        }
        if reply.starts_with("(error") {
            return Err(Cvc5Error::SolverError(reply));
        }
        Ok(reply)
    }
}

impl Drop for Cvc5Solver {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl SatSolver for Cvc5Solver {
    type Error = Cvc5Error;

    fn declare_var(&mut self, var: VarId) -> Result<(), Cvc5Error> {
        if self.declared.insert(var) {
            self.write(&format!("(declare-const {var} Bool)"))?;
        }
        Ok(())
    }

    fn assert(&mut self, formula: &Formula) -> Result<(), Cvc5Error> {
        if let Some(var) = formula
            .collect_vars()
            .into_iter()
            .find(|v| !self.declared.contains(v))
        {
            return Err(Cvc5Error::UnknownVariable(var));
        }
        self.write(&format!("(assert {})", to_smtlib(formula)))
    }

    fn check_sat(&mut self) -> Result<SatResult, Cvc5Error> {
        match self.query("(check-sat)")?.as_str() {
            "sat" => Ok(SatResult::Sat),
            "unsat" => Ok(SatResult::Unsat),
            "unknown" => Ok(SatResult::Unknown("cvc5 returned unknown".into())),
            other => Err(Cvc5Error::SolverError(other.to_string())),
        }
    }

    fn check_sat_with_model(
        &mut self,
        vars: &[VarId],
    ) -> Result<(SatResult, Option<Assignment>), Cvc5Error> {
        if let Some(var) = vars.iter().find(|v| !self.declared.contains(v)) {
            return Err(Cvc5Error::UnknownVariable(*var));
        }
        let result = self.check_sat()?;
        if result != SatResult::Sat {
            return Ok((result, None));
        }
        if vars.is_empty() {
            return Ok((SatResult::Sat, Some(Assignment::default())));
        }

        let names: Vec<String> = vars.iter().map(VarId::to_string).collect();
        let reply = self.query(&format!("(get-value ({}))", names.join(" ")))?;
        let values = parse_bool_values(&reply)
            .ok_or_else(|| Cvc5Error::SolverError(format!("unreadable model: {reply}")))?;
        let assignment = vars
            .iter()
            .zip(&names)
            .filter_map(|(var, name)| {
                values
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, value)| (*var, *value))
            })
            .collect();
        Ok((SatResult::Sat, Some(assignment)))
    }

    fn reset(&mut self) -> Result<(), Cvc5Error> {
        self.write("(reset)")?;
        self.write(&format!("(set-logic {LOGIC})"))?;
        self.declared.clear();
        Ok(())
    }
}

/// Read lines until the parentheses balance. Empty at end of stream.
fn read_reply<R: BufRead>(reader: &mut R) -> Result<String, Cvc5Error> {
    let mut reply = String::new();
    let mut depth = 0i64;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        depth += line.matches('(').count() as i64 - line.matches(')').count() as i64;
        reply.push_str(line.trim());
        if depth <= 0 && !reply.is_empty() {
            break;
        }
        reply.push(' ');
    }
    Ok(reply)
}

/// Parse `((v0 true) (v3 false) ...)` into name/value pairs.
fn parse_bool_values(reply: &str) -> Option<Vec<(String, bool)>> {
    let inner = reply.trim().strip_prefix('(')?.strip_suffix(')')?;
    inner
        .split(')')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.strip_prefix('(')?.split_whitespace();
            let name = parts.next()?.to_string();
            let value = match parts.next()? {
                "true" => true,
                "false" => false,
                _ => return None,
            };
            parts.next().is_none().then_some((name, value))
        })
        .collect()
}
