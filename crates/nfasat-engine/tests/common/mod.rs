#![allow(dead_code)]

use std::convert::Infallible;

use nfasat_engine::{check_with_solver, CheckReport, PipelineError};
use nfasat_smt::{Assignment, Formula, SatResult, SatSolver, VarId};

/// Largest number of variables the exhaustive solver will enumerate.
pub const MAX_VARS: usize = 20;

/// Brute-force solver: tries every assignment of the declared variables in
/// ascending binary order and returns the first model.
#[derive(Default)]
pub struct ExhaustiveSolver {
    declared: Vec<VarId>,
    asserted: Vec<Formula>,
}

impl ExhaustiveSolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn first_model(&self) -> Result<Option<Assignment>, String> {
        if self.declared.len() > MAX_VARS {
            return Err(format!(
                "{} variables exceed the exhaustive limit of {MAX_VARS}",
                self.declared.len()
            ));
        }
        for bits in 0u64..(1u64 << self.declared.len()) {
            let candidate: Assignment = self
                .declared
                .iter()
                .enumerate()
                .map(|(i, v)| (*v, bits & (1 << i) != 0))
                .collect();
            if self.asserted.iter().all(|f| f.eval(&candidate) == Some(true)) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

impl SatSolver for ExhaustiveSolver {
    type Error = Infallible;

    fn declare_var(&mut self, var: VarId) -> Result<(), Infallible> {
        if !self.declared.contains(&var) {
            self.declared.push(var);
        }
        Ok(())
    }

    fn assert(&mut self, formula: &Formula) -> Result<(), Infallible> {
        self.asserted.push(formula.clone());
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Infallible> {
        Ok(match self.first_model() {
            Ok(Some(_)) => SatResult::Sat,
            Ok(None) => SatResult::Unsat,
            Err(reason) => SatResult::Unknown(reason),
        })
    }

    fn check_sat_with_model(
        &mut self,
        vars: &[VarId],
    ) -> Result<(SatResult, Option<Assignment>), Infallible> {
        Ok(match self.first_model() {
            Ok(Some(model)) => {
                let projected = vars
                    .iter()
                    .filter_map(|v| model.get(*v).map(|b| (*v, b)))
                    .collect();
                (SatResult::Sat, Some(projected))
            }
            Ok(None) => (SatResult::Unsat, None),
            Err(reason) => (SatResult::Unknown(reason), None),
        })
    }

    fn reset(&mut self) -> Result<(), Infallible> {
        self.declared.clear();
        self.asserted.clear();
        Ok(())
    }
}

pub fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {path}: {e}"))
}

/// Parse a fixture and check it with the exhaustive solver.
pub fn check_fixture(name: &str) -> Result<CheckReport, PipelineError> {
    let input = nfasat_dsl::parse(&load_fixture(name), name)?;
    check_with_solver(&mut ExhaustiveSolver::new(), &input.automaton, input.length)
}
