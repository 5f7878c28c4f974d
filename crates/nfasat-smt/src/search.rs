//! Single-shot solve orchestration for a rejection encoding.

use std::cell::RefCell;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::encoder::RejectionEncoding;
use crate::solver::{Assignment, SatResult, SatSolver};

/// Outcome of one rejection search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// The formula is unsatisfiable: no witness of this length exists.
    NoWitness,
    /// The formula is satisfiable; `assignment` covers the model variables.
    Witness { assignment: Assignment },
    /// The solver gave up or produced no usable model.
    Unknown { reason: String },
}

/// Timing and size figures for the searches run on this thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchProfile {
    pub solve_calls: u64,
    pub solve_elapsed_ms: u128,
    pub declared_vars: u64,
    pub asserted_formulas: u64,
}

thread_local! {
    static SEARCH_PROFILE: RefCell<SearchProfile> = RefCell::new(SearchProfile::default());
}

pub fn reset_search_profile() {
    SEARCH_PROFILE.with(|cell| {
        *cell.borrow_mut() = SearchProfile::default();
    });
}

pub fn current_search_profile() -> SearchProfile {
    SEARCH_PROFILE.with(|cell| cell.borrow().clone())
}

pub fn take_search_profile() -> SearchProfile {
    SEARCH_PROFILE.with(|cell| std::mem::take(&mut *cell.borrow_mut()))
}

fn record_setup(declared: usize, asserted: usize) {
    SEARCH_PROFILE.with(|cell| {
        let mut p = cell.borrow_mut();
        p.declared_vars = p.declared_vars.saturating_add(declared as u64);
        p.asserted_formulas = p.asserted_formulas.saturating_add(asserted as u64);
    });
}

fn record_solve(elapsed_ms: u128) {
    SEARCH_PROFILE.with(|cell| {
        let mut p = cell.borrow_mut();
        p.solve_calls = p.solve_calls.saturating_add(1);
        p.solve_elapsed_ms = p.solve_elapsed_ms.saturating_add(elapsed_ms);
    });
}

/// Submit `encoding` to `solver` and classify the verdict.
///
/// The solver is reset first, then the transition and correctness formulas
/// are asserted and exactly one satisfiability check is issued. Solver
/// errors propagate; an `unknown` verdict or a SAT verdict without a model
/// becomes [`SearchResult::Unknown`] and is never retried.
pub fn run_rejection_search<S: SatSolver>(
    solver: &mut S,
    encoding: &RejectionEncoding,
) -> Result<SearchResult, S::Error> {
    solver.reset()?;
    for var in &encoding.declarations {
        solver.declare_var(*var)?;
    }
    solver.assert(&encoding.transition)?;
    solver.assert(&encoding.correctness)?;
    record_setup(encoding.declarations.len(), 2);

    info!(
        length = encoding.length(),
        variables = encoding.declarations.len(),
        "checking for a rejected word"
    );
    let started = Instant::now();
    let (verdict, model) = solver.check_sat_with_model(&encoding.model_vars)?;
    let elapsed_ms = started.elapsed().as_millis();
    record_solve(elapsed_ms);
    debug!(elapsed_ms, ?verdict, "solver returned");

    Ok(match (verdict, model) {
        (SatResult::Unsat, _) => SearchResult::NoWitness,
        (SatResult::Sat, Some(assignment)) => SearchResult::Witness { assignment },
        (SatResult::Sat, None) => {
            warn!("solver reported SAT without a model");
            SearchResult::Unknown {
                reason: "solver reported SAT but returned no model".into(),
            }
        }
        (SatResult::Unknown(reason), _) => {
            warn!(%reason, "solver returned unknown");
            SearchResult::Unknown { reason }
        }
    })
}
