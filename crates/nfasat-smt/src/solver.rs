use std::collections::HashMap;

use crate::formula::{Formula, VarId};

/// Result of a satisfiability check.
#[derive(Debug, Clone, PartialEq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown(String),
}

/// Truth values produced by a solver for a SAT verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub values: HashMap<VarId, bool>,
}

impl Assignment {
    /// Truth value of `var`, or `None` if the solver never reported it.
    pub fn get(&self, var: VarId) -> Option<bool> {
        self.values.get(&var).copied()
    }

    pub fn insert(&mut self, var: VarId, value: bool) {
        self.values.insert(var, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(VarId, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (VarId, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Abstract boolean-satisfiability oracle.
///
/// The encoder and decoder only talk to solvers through this trait, so any
/// conforming backend can be substituted.
pub trait SatSolver {
    type Error: std::error::Error;

    /// Declare a boolean variable.
    fn declare_var(&mut self, var: VarId) -> Result<(), Self::Error>;

    /// Assert a constraint.
    fn assert(&mut self, formula: &Formula) -> Result<(), Self::Error>;

    /// Check satisfiability.
    fn check_sat(&mut self) -> Result<SatResult, Self::Error>;

    /// Check satisfiability and extract the values of `vars` if SAT.
    fn check_sat_with_model(
        &mut self,
        vars: &[VarId],
    ) -> Result<(SatResult, Option<Assignment>), Self::Error>;

    /// Reset the solver state.
    fn reset(&mut self) -> Result<(), Self::Error>;
}
