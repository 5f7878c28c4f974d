use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, warn};

use nfasat_dsl::{parse_with_diagnostics, ParseError};
use nfasat_ir::Automaton;
use nfasat_smt::backends::cvc5_backend::Cvc5Solver;
use nfasat_smt::backends::smtlib_printer::write_smtlib_script;
#[cfg(feature = "z3")]
use nfasat_smt::backends::z3_backend::Z3Solver;
use nfasat_smt::search::{reset_search_profile, take_search_profile};
use nfasat_smt::{
    encode_rejection_search, run_rejection_search, EncodeError, SatSolver, SearchResult,
};

use crate::result::{CheckReport, CheckResult, CheckStats};
use crate::witness::{decode_word, render_word, DecodeError};

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
    #[error("Problem too large to encode: {0}")]
    #[diagnostic(
        code(nfasat::encode::too_large),
        help("lower the word length or shrink the automaton")
    )]
    TooLarge(#[from] EncodeError),
    #[error("Solver error: {0}")]
    #[diagnostic(code(nfasat::solver))]
    Solver(String),
    #[error("Solver could not decide: {0}")]
    #[diagnostic(
        code(nfasat::solver::unknown),
        help("raise --timeout or try the other backend with --solver")
    )]
    Unknown(String),
    #[error("Solver backend '{0}' is not compiled into this build")]
    #[diagnostic(code(nfasat::solver::unavailable))]
    BackendUnavailable(&'static str),
    #[error("Witness decoding failed: {0}")]
    #[diagnostic(code(nfasat::internal::decode))]
    Decode(#[from] DecodeError),
    #[error("Decoded witness '{word}' is accepted by the automaton")]
    #[diagnostic(code(nfasat::internal::unconfirmed_witness))]
    UnconfirmedWitness { word: String },
    #[error("Could not write SMT dump to {}: {source}", path.display())]
    #[diagnostic(code(nfasat::io::dump))]
    Dump {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Which solver backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverChoice {
    #[default]
    Z3,
    Cvc5,
}

impl SolverChoice {
    pub fn name(self) -> &'static str {
        match self {
            SolverChoice::Z3 => "z3",
            SolverChoice::Cvc5 => "cvc5",
        }
    }
}

/// Options for one non-acceptance check.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub solver: SolverChoice,
    /// Per-query solver time limit; 0 disables it.
    pub timeout_secs: u64,
    /// Also write the encoding as an SMT-LIB2 script to this path.
    pub dump_smt: Option<PathBuf>,
}

/// Parse `source` and check it.
pub fn check_source(
    source: &str,
    filename: &str,
    options: &PipelineOptions,
) -> Result<CheckReport, PipelineError> {
    let (input, diagnostics) = parse_with_diagnostics(source, filename)?;
    for diag in &diagnostics {
        warn!(code = %diag.code, "{}", diag.message);
    }
    info!(
        states = input.automaton.num_states(),
        symbols = input.automaton.num_symbols(),
        transitions = input.automaton.transitions().len(),
        length = input.length,
        "automaton parsed"
    );
    check_automaton(&input.automaton, input.length, options)
}

/// Check whether `automaton` rejects some word of `length` symbols using
/// the backend selected in `options`.
pub fn check_automaton(
    automaton: &Automaton,
    length: usize,
    options: &PipelineOptions,
) -> Result<CheckReport, PipelineError> {
    if let Some(path) = &options.dump_smt {
        dump_smt_to_file(automaton, length, path)?;
    }
    info!(solver = options.solver.name(), timeout_secs = options.timeout_secs, "starting check");
    match options.solver {
        SolverChoice::Z3 => run_z3(automaton, length, options.timeout_secs),
        SolverChoice::Cvc5 => {
            let mut solver = Cvc5Solver::with_timeout_secs(options.timeout_secs)
                .map_err(|e| PipelineError::Solver(e.to_string()))?;
            check_with_solver(&mut solver, automaton, length)
        }
    }
}

#[cfg(feature = "z3")]
fn run_z3(
    automaton: &Automaton,
    length: usize,
    timeout_secs: u64,
) -> Result<CheckReport, PipelineError> {
    let mut solver = Z3Solver::with_timeout_secs(timeout_secs);
    check_with_solver(&mut solver, automaton, length)
}

#[cfg(not(feature = "z3"))]
fn run_z3(
    _automaton: &Automaton,
    _length: usize,
    _timeout_secs: u64,
) -> Result<CheckReport, PipelineError> {
    Err(PipelineError::BackendUnavailable("z3"))
}

/// Run the check against any [`SatSolver`].
///
/// A SAT verdict is decoded into a word and confirmed by simulating the
/// automaton on it; a word the automaton accepts is reported as
/// [`PipelineError::UnconfirmedWitness`] rather than printed.
pub fn check_with_solver<S: SatSolver>(
    solver: &mut S,
    automaton: &Automaton,
    length: usize,
) -> Result<CheckReport, PipelineError> {
    let encoding = encode_rejection_search(automaton, length)?;
    reset_search_profile();
    let outcome = run_rejection_search(solver, &encoding)
        .map_err(|e| PipelineError::Solver(e.to_string()))?;
    let profile = take_search_profile();

    let result = match outcome {
        SearchResult::NoWitness => {
            info!(length, "every word is accepted");
            CheckResult::AllAccepted { length }
        }
        SearchResult::Witness { assignment } => {
            let word = decode_word(automaton, &encoding.layout, &assignment)?;
            let rendered = render_word(automaton, &word);
            if automaton.accepts(&word) {
                return Err(PipelineError::UnconfirmedWitness { word: rendered });
            }
            info!(length, word = %rendered, "found rejected word");
            CheckResult::Rejected {
                length,
                word: word
                    .iter()
                    .map(|&s| automaton.symbol_label(s).unwrap_or("?").to_string())
                    .collect(),
            }
        }
        SearchResult::Unknown { reason } => return Err(PipelineError::Unknown(reason)),
    };

    Ok(CheckReport {
        result,
        stats: CheckStats {
            states: automaton.num_states(),
            symbols: automaton.num_symbols(),
            transitions: automaton.transitions().len(),
            variables: encoding.layout.num_vars(),
            solve_elapsed_ms: u64::try_from(profile.solve_elapsed_ms).unwrap_or(u64::MAX),
        },
    })
}

fn dump_smt_to_file(automaton: &Automaton, length: usize, path: &Path) -> Result<(), PipelineError> {
    let encoding = encode_rejection_search(automaton, length)?;
    let dump_err = |source| PipelineError::Dump {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(dump_err)?;
    let mut out = BufWriter::new(file);
    write_smtlib_script(&mut out, automaton, &encoding).map_err(dump_err)?;
    std::io::Write::flush(&mut out).map_err(dump_err)?;
    info!(path = %path.display(), "SMT dump written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfasat_smt::{Assignment, Formula, SatResult, VarId};
    use std::convert::Infallible;

    /// Returns a fixed model regardless of what was asserted.
    struct CannedSolver {
        verdict: SatResult,
        values: Vec<bool>,
    }

    impl SatSolver for CannedSolver {
        type Error = Infallible;

        fn declare_var(&mut self, _var: VarId) -> Result<(), Infallible> {
            Ok(())
        }

        fn assert(&mut self, _formula: &Formula) -> Result<(), Infallible> {
            Ok(())
        }

        fn check_sat(&mut self) -> Result<SatResult, Infallible> {
            Ok(self.verdict.clone())
        }

        fn check_sat_with_model(
            &mut self,
            vars: &[VarId],
        ) -> Result<(SatResult, Option<Assignment>), Infallible> {
            let model = (self.verdict == SatResult::Sat).then(|| {
                vars.iter()
                    .zip(self.values.iter().chain(std::iter::repeat(&false)))
                    .map(|(v, b)| (*v, *b))
                    .collect()
            });
            Ok((self.verdict.clone(), model))
        }

        fn reset(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn loop_automaton(final_state: bool) -> Automaton {
        let mut nfa = Automaton::new();
        nfa.add_symbol("a").unwrap();
        nfa.add_state("s0").unwrap();
        nfa.mark_initial("s0").unwrap();
        if final_state {
            nfa.mark_final("s0").unwrap();
        }
        nfa.add_transition("s0", "a", "s0").unwrap();
        nfa
    }

    #[test]
    fn unsat_reports_all_accepted() {
        let mut solver = CannedSolver {
            verdict: SatResult::Unsat,
            values: vec![],
        };
        let report = check_with_solver(&mut solver, &loop_automaton(true), 1).unwrap();
        assert_eq!(report.result, CheckResult::AllAccepted { length: 1 });
        assert_eq!(report.stats.variables, 3);
    }

    #[test]
    fn accepted_witness_is_refused() {
        let mut solver = CannedSolver {
            verdict: SatResult::Sat,
            values: vec![true],
        };
        let err = check_with_solver(&mut solver, &loop_automaton(true), 1).unwrap_err();
        assert!(matches!(err, PipelineError::UnconfirmedWitness { ref word } if word == "a"));
    }

    #[test]
    fn malformed_model_is_a_decode_fault() {
        let mut solver = CannedSolver {
            verdict: SatResult::Sat,
            values: vec![false],
        };
        let err = check_with_solver(&mut solver, &loop_automaton(false), 1).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Decode(DecodeError::NoSymbol { step: 0 })
        ));
    }

    #[test]
    fn unknown_verdict_is_an_error() {
        let mut solver = CannedSolver {
            verdict: SatResult::Unknown("timeout".into()),
            values: vec![],
        };
        let err = check_with_solver(&mut solver, &loop_automaton(false), 1).unwrap_err();
        assert_eq!(err.to_string(), "Solver could not decide: timeout");
    }

    #[test]
    fn parse_errors_pass_through() {
        let err = check_source("nonsense", "bad.nfa", &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(ParseError::Syntax { .. })));
    }

    #[test]
    fn dump_writes_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.smt2");
        dump_smt_to_file(&loop_automaton(false), 2, &path).unwrap();
        let script = std::fs::read_to_string(&path).unwrap();
        assert!(script.contains("(check-sat)"));
        assert!(script.contains("; state s0 active at step 2"));
    }

    #[test]
    fn oversized_length_is_an_error_before_solving() {
        let mut solver = CannedSolver {
            verdict: SatResult::Sat,
            values: vec![],
        };
        let err = check_with_solver(&mut solver, &loop_automaton(false), usize::MAX).unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge(EncodeError::Layout(_))));
        let code = miette::Diagnostic::code(&err).map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("nfasat::encode::too_large"));
    }

    #[test]
    fn oversized_dump_is_refused_without_creating_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.smt2");
        let err = dump_smt_to_file(&loop_automaton(false), 1 << 31, &path).unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge(_)));
        assert!(!path.exists());
    }

    #[test]
    fn dump_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("query.smt2");
        let err = dump_smt_to_file(&loop_automaton(false), 1, &path).unwrap_err();
        assert!(matches!(err, PipelineError::Dump { .. }));
    }
}
