use std::collections::HashMap;

use thiserror::Error;
use z3::ast::Bool;
use z3::SatResult as Z3SatResult;

use crate::formula::{Formula, VarId};
use crate::solver::{Assignment, SatResult, SatSolver};

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("Z3 error: {0}")]
    Internal(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(VarId),
}

/// In-process Z3 backend over boolean constants named `v{id}`.
pub struct Z3Solver {
    solver: z3::Solver,
    vars: HashMap<VarId, Bool>,
    params: Option<z3::Params>,
}

impl Z3Solver {
    pub fn new() -> Self {
        Self {
            solver: z3::Solver::new(),
            vars: HashMap::new(),
            params: None,
        }
    }

    /// A solver that gives up with `unknown` after `timeout_secs`; 0 disables the limit.
    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        if timeout_secs == 0 {
            return Self::new();
        }
        let solver = z3::Solver::new();
        let mut params = z3::Params::new();
        let timeout_ms = u32::try_from(timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX);
        params.set_u32("timeout", timeout_ms);
        solver.set_params(&params);
        Self {
            solver,
            vars: HashMap::new(),
            params: Some(params),
        }
    }

    fn translate(&self, formula: &Formula) -> Result<Bool, Z3Error> {
        match formula {
            Formula::Var(id) => self
                .vars
                .get(id)
                .cloned()
                .ok_or(Z3Error::UnknownVariable(*id)),
            Formula::Const(b) => Ok(Bool::from_bool(*b)),
            Formula::And(terms) => {
                let bools = terms
                    .iter()
                    .map(|t| self.translate(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&Bool> = bools.iter().collect();
                Ok(Bool::and(&refs))
            }
            Formula::Or(terms) => {
                let bools = terms
                    .iter()
                    .map(|t| self.translate(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&Bool> = bools.iter().collect();
                Ok(Bool::or(&refs))
            }
            Formula::Not(inner) => Ok(self.translate(inner)?.not()),
            Formula::Implies(lhs, rhs) => {
                let l = self.translate(lhs)?;
                let r = self.translate(rhs)?;
                Ok(l.implies(&r))
            }
        }
    }

    fn convert(&self, result: Z3SatResult) -> SatResult {
        match result {
            Z3SatResult::Sat => SatResult::Sat,
            Z3SatResult::Unsat => SatResult::Unsat,
            Z3SatResult::Unknown => SatResult::Unknown(
                self.solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "Z3 returned unknown".into()),
            ),
        }
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver for Z3Solver {
    type Error = Z3Error;

    fn declare_var(&mut self, var: VarId) -> Result<(), Z3Error> {
        self.vars
            .entry(var)
            .or_insert_with(|| Bool::new_const(var.to_string()));
        Ok(())
    }

    fn assert(&mut self, formula: &Formula) -> Result<(), Z3Error> {
        let term = self.translate(formula)?;
        self.solver.assert(&term);
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Z3Error> {
        let result = self.solver.check();
        Ok(self.convert(result))
    }

    fn check_sat_with_model(
        &mut self,
        vars: &[VarId],
    ) -> Result<(SatResult, Option<Assignment>), Z3Error> {
        match self.solver.check() {
            Z3SatResult::Sat => {
                let model = self
                    .solver
                    .get_model()
                    .ok_or_else(|| Z3Error::Internal("SAT but no model available".into()))?;
                let mut assignment = Assignment::default();
                for var in vars {
                    let Some(constant) = self.vars.get(var) else {
                        return Err(Z3Error::UnknownVariable(*var));
                    };
                    if let Some(value) = model.eval::<Bool>(constant, true).and_then(|v| v.as_bool()) {
                        assignment.insert(*var, value);
                    }
                }
                Ok((SatResult::Sat, Some(assignment)))
            }
            other => Ok((self.convert(other), None)),
        }
    }

    fn reset(&mut self) -> Result<(), Z3Error> {
        self.solver.reset();
        // Z3 may drop per-solver parameters on reset.
        if let Some(params) = &self.params {
            self.solver.set_params(params);
        }
        self.vars.clear();
        Ok(())
    }
}
