use nfasat_ir::Automaton;
use thiserror::Error;
use tracing::debug;

use crate::formula::{Formula, VarId};

mod variables;

pub use variables::{IndexedVar, LayoutError, VarLayout};

/// Upper bound on the number of top-level clauses a single encoding may have.
pub const MAX_CLAUSES: usize = 1 << 28;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("encoding needs at least {clauses} clauses, above the limit of {limit}")]
    TooManyClauses { clauses: usize, limit: usize },
}

/// Variables and formulas of a rejection search for a fixed word length.
#[derive(Debug, Clone)]
pub struct RejectionEncoding {
    /// Id layout shared with the decoder.
    pub layout: VarLayout,
    /// Variables to declare before asserting.
    pub declarations: Vec<VarId>,
    /// Forward-propagation constraints for every transition at every step.
    pub transition: Formula,
    /// Symbol exclusivity, state coverage, initial and final-rejection constraints.
    pub correctness: Formula,
    /// Variables to extract for witness reconstruction.
    pub model_vars: Vec<VarId>,
}

impl RejectionEncoding {
    pub fn length(&self) -> usize {
        self.layout.length()
    }

    /// `transition ∧ correctness`, the formula handed to the solver.
    pub fn conjunction(&self) -> Formula {
        Formula::and(vec![self.transition.clone(), self.correctness.clone()])
    }
}

/// For every step `s < n` and transition `(p, a, q)`: `p@s ∧ a@s ⇒ q@(s+1)`.
pub fn encode_transitions(automaton: &Automaton, layout: &VarLayout) -> Formula {
    Formula::and(
        (0..layout.length())
            .flat_map(|step| {
                automaton.transitions().iter().map(move |t| {
                    let source = layout.state_var(t.from, step);
                    let symbol = layout.symbol_var(t.symbol, step);
                    let target = layout.state_var(t.to, step + 1);
                    Formula::and(vec![source, symbol]).implies(target)
                })
            })
            .collect(),
    )
}

/// Exactly one symbol per step: pairwise exclusion plus coverage of the alphabet.
pub fn encode_symbol_exclusivity(automaton: &Automaton, layout: &VarLayout) -> Formula {
    let k = automaton.num_symbols();
    let mut per_step = Vec::new();
    for step in 0..layout.length() {
        let mut exclusions = Vec::new();
        for i in 0..k {
            for j in (i + 1)..k {
                exclusions.push(
                    Formula::and(vec![layout.symbol_var(i, step), layout.symbol_var(j, step)])
                        .not(),
                );
            }
        }
        let coverage = Formula::or((0..k).map(|a| layout.symbol_var(a, step)).collect());
        per_step.push(Formula::and(vec![Formula::and(exclusions), coverage]));
    }
    Formula::and(per_step)
}

/// At least one active state at every step `0..=n`.
pub fn encode_state_coverage(automaton: &Automaton, layout: &VarLayout) -> Formula {
    Formula::and(
        (0..=layout.length())
            .map(|step| {
                Formula::or(
                    (0..automaton.num_states())
                        .map(|q| layout.state_var(q, step))
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Every initial state is active at step 0.
pub fn encode_initial(automaton: &Automaton, layout: &VarLayout) -> Formula {
    Formula::and(
        automaton
            .initial_states()
            .iter()
            .map(|&q| layout.state_var(q, 0))
            .collect(),
    )
}

/// No final state is active at step `n`.
pub fn encode_final_rejection(automaton: &Automaton, layout: &VarLayout) -> Formula {
    Formula::and(
        automaton
            .final_states()
            .iter()
            .map(|&q| layout.state_var(q, layout.length()).not())
            .collect(),
    )
}

pub fn encode_correctness(automaton: &Automaton, layout: &VarLayout) -> Formula {
    Formula::and(vec![
        encode_symbol_exclusivity(automaton, layout),
        encode_state_coverage(automaton, layout),
        encode_initial(automaton, layout),
        encode_final_rejection(automaton, layout),
    ])
}

/// Top-level clause count of the rejection encoding, saturating at `usize::MAX`.
pub fn estimate_clauses(automaton: &Automaton, length: usize) -> usize {
    let k = automaton.num_symbols();
    let per_step_exclusivity = k.saturating_mul(k.saturating_sub(1)) / 2 + 1;
    length
        .saturating_mul(automaton.transitions().len())
        .saturating_add(length.saturating_mul(per_step_exclusivity))
        .saturating_add(length.saturating_add(1))
        .saturating_add(automaton.initial_states().len())
        .saturating_add(automaton.final_states().len())
}

/// Encode "some word of length `length` is not accepted by `automaton`".
///
/// The formula is satisfiable when a word exists together with an activation
/// pattern that is closed under the transitions, contains the initial states,
/// is non-empty at every step and avoids every final state at the end.
///
/// Sizes are checked before any formula is built: the variables must fit the
/// 32-bit id space and the clause count must stay within [`MAX_CLAUSES`].
pub fn encode_rejection_search(
    automaton: &Automaton,
    length: usize,
) -> Result<RejectionEncoding, EncodeError> {
    let layout = VarLayout::new(automaton.num_states(), automaton.num_symbols(), length)?;
    let clauses = estimate_clauses(automaton, length);
    if clauses > MAX_CLAUSES {
        return Err(EncodeError::TooManyClauses {
            clauses,
            limit: MAX_CLAUSES,
        });
    }
    let transition = encode_transitions(automaton, &layout);
    let correctness = encode_correctness(automaton, &layout);
    debug!(
        length,
        states = automaton.num_states(),
        symbols = automaton.num_symbols(),
        transitions = automaton.transitions().len(),
        variables = layout.num_vars(),
        transition_nodes = transition.size(),
        correctness_nodes = correctness.size(),
        "encoded rejection search"
    );
    Ok(RejectionEncoding {
        declarations: layout.all_vars().collect(),
        model_vars: layout.symbol_vars().collect(),
        layout,
        transition,
        correctness,
    })
}
