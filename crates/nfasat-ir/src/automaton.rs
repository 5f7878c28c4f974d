use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Index of a state in [`Automaton::states`].
pub type StateId = usize;
/// Index of a symbol in [`Automaton::alphabet`].
pub type SymbolId = usize;

/// Errors raised while assembling an automaton from labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate state label '{0}'")]
    DuplicateState(String),
    #[error("duplicate symbol label '{0}'")]
    DuplicateSymbol(String),
    #[error("unknown state '{0}'")]
    UnknownState(String),
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
}

/// A single `(source, symbol, target)` triple of the transition relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    pub from: StateId,
    pub symbol: SymbolId,
    pub to: StateId,
}

/// A nondeterministic finite automaton over string-labelled states and symbols.
///
/// States and symbols keep their insertion order; that order fixes the dense
/// [`StateId`] / [`SymbolId`] indices used by the encoder and the order in which
/// the decoder scans the alphabet. The transition relation need not be
/// deterministic or total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Automaton {
    states: IndexSet<String>,
    alphabet: IndexSet<String>,
    initial: IndexSet<StateId>,
    final_states: IndexSet<StateId>,
    transitions: IndexSet<Transition>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, label: impl Into<String>) -> Result<StateId, ModelError> {
        let label = label.into();
        let (id, inserted) = self.states.insert_full(label);
        if !inserted {
            return Err(ModelError::DuplicateState(self.states[id].clone()));
        }
        Ok(id)
    }

    pub fn add_symbol(&mut self, label: impl Into<String>) -> Result<SymbolId, ModelError> {
        let label = label.into();
        let (id, inserted) = self.alphabet.insert_full(label);
        if !inserted {
            return Err(ModelError::DuplicateSymbol(self.alphabet[id].clone()));
        }
        Ok(id)
    }

    /// Mark a declared state as initial. Marking twice is a no-op.
    pub fn mark_initial(&mut self, label: &str) -> Result<StateId, ModelError> {
        let id = self.require_state(label)?;
        self.initial.insert(id);
        Ok(id)
    }

    /// Mark a declared state as final. Marking twice is a no-op.
    pub fn mark_final(&mut self, label: &str) -> Result<StateId, ModelError> {
        let id = self.require_state(label)?;
        self.final_states.insert(id);
        Ok(id)
    }

    /// Add `(from, symbol, to)` to the transition relation.
    ///
    /// Returns `Ok(false)` if the triple was already present.
    pub fn add_transition(&mut self, from: &str, symbol: &str, to: &str) -> Result<bool, ModelError> {
        let transition = Transition {
            from: self.require_state(from)?,
            symbol: self.require_symbol(symbol)?,
            to: self.require_state(to)?,
        };
        Ok(self.transitions.insert(transition))
    }

    fn require_state(&self, label: &str) -> Result<StateId, ModelError> {
        self.find_state(label)
            .ok_or_else(|| ModelError::UnknownState(label.to_string()))
    }

    fn require_symbol(&self, label: &str) -> Result<SymbolId, ModelError> {
        self.find_symbol(label)
            .ok_or_else(|| ModelError::UnknownSymbol(label.to_string()))
    }

    pub fn find_state(&self, label: &str) -> Option<StateId> {
        self.states.get_index_of(label)
    }

    pub fn find_symbol(&self, label: &str) -> Option<SymbolId> {
        self.alphabet.get_index_of(label)
    }

    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    pub fn alphabet(&self) -> &IndexSet<String> {
        &self.alphabet
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.alphabet.len()
    }

    pub fn state_label(&self, id: StateId) -> Option<&str> {
        self.states.get_index(id).map(String::as_str)
    }

    pub fn symbol_label(&self, id: SymbolId) -> Option<&str> {
        self.alphabet.get_index(id).map(String::as_str)
    }

    pub fn initial_states(&self) -> &IndexSet<StateId> {
        &self.initial
    }

    pub fn final_states(&self) -> &IndexSet<StateId> {
        &self.final_states
    }

    pub fn is_final(&self, id: StateId) -> bool {
        self.final_states.contains(&id)
    }

    pub fn transitions(&self) -> &IndexSet<Transition> {
        &self.transitions
    }

    fn state_labels(&self, ids: &IndexSet<StateId>) -> Vec<&str> {
        ids.iter().filter_map(|id| self.state_label(*id)).collect()
    }

    /// Resolve a word given as symbol labels.
    pub fn word_from_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<SymbolId>, ModelError> {
        labels
            .iter()
            .map(|label| self.require_symbol(label.as_ref()))
            .collect()
    }

    /// States reachable from `current` by reading `symbol` once.
    pub fn successors(&self, current: &BTreeSet<StateId>, symbol: SymbolId) -> BTreeSet<StateId> {
        self.transitions
            .iter()
            .filter(|t| t.symbol == symbol && current.contains(&t.from))
            .map(|t| t.to)
            .collect()
    }

    /// Set of states reached after reading `word` from the initial states.
    pub fn run(&self, word: &[SymbolId]) -> BTreeSet<StateId> {
        let mut current: BTreeSet<StateId> = self.initial.iter().copied().collect();
        for &symbol in word {
            if current.is_empty() {
                break;
            }
            current = self.successors(&current, symbol);
        }
        current
    }

    /// Whether some run over `word` ends in a final state.
    pub fn accepts(&self, word: &[SymbolId]) -> bool {
        self.run(word).iter().any(|s| self.is_final(*s))
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Automaton:")?;
        writeln!(
            f,
            "  Alphabet: {}",
            self.alphabet.iter().cloned().collect::<Vec<_>>().join(" ")
        )?;
        writeln!(
            f,
            "  States: {}",
            self.states.iter().cloned().collect::<Vec<_>>().join(" ")
        )?;
        writeln!(f, "  Initial: {}", self.state_labels(&self.initial).join(" "))?;
        writeln!(f, "  Final: {}", self.state_labels(&self.final_states).join(" "))?;
        writeln!(f, "  Transitions:")?;
        for t in &self.transitions {
            writeln!(
                f,
                "    {} --{}--> {}",
                self.state_label(t.from).unwrap_or("?"),
                self.symbol_label(t.symbol).unwrap_or("?"),
                self.state_label(t.to).unwrap_or("?"),
            )?;
        }
        Ok(())
    }
}
