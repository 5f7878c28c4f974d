//! Variable naming for the rejection encoding.
//!
//! Two families of boolean variables are laid out in one dense index space:
//! - `State { state, step }` for `step` in `0..=n`: occupies `[0, (n+1)*|Q|)`
//! - `Symbol { symbol, step }` for `step` in `0..n`: follows, `n*|Σ|` ids
//!
//! Within a family ids are step-major, so every `(kind, entity, step)` triple
//! gets its own id and decoding an id is a pair of divisions.

use nfasat_ir::{StateId, SymbolId};
use thiserror::Error;

use crate::formula::{Formula, VarId};

/// The layout needs more variables than 32-bit ids can name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{num_states} states, {num_symbols} symbols and word length {length} need more than 2^32 - 1 variables")]
pub struct LayoutError {
    pub num_states: usize,
    pub num_symbols: usize,
    pub length: usize,
}

/// Meaning of a variable in the rejection encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexedVar {
    /// State `state` is active after `step` symbols have been read.
    State { state: StateId, step: usize },
    /// The symbol read between step `step` and `step + 1` is `symbol`.
    Symbol { symbol: SymbolId, step: usize },
}

/// Dense id layout for a fixed automaton shape and word length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLayout {
    num_states: usize,
    num_symbols: usize,
    length: usize,
    symbol_offset: u32,
    num_vars: u32,
}

impl VarLayout {
    /// Lay out `(length + 1)·num_states + length·num_symbols` ids.
    ///
    /// Fails when that total does not fit in `u32`, so every id the layout
    /// hands out is distinct.
    pub fn new(num_states: usize, num_symbols: usize, length: usize) -> Result<Self, LayoutError> {
        let too_large = || LayoutError {
            num_states,
            num_symbols,
            length,
        };
        let symbol_offset = length
            .checked_add(1)
            .and_then(|steps| steps.checked_mul(num_states))
            .ok_or_else(too_large)?;
        let num_vars = length
            .checked_mul(num_symbols)
            .and_then(|symbols| symbols.checked_add(symbol_offset))
            .ok_or_else(too_large)?;
        Ok(Self {
            num_states,
            num_symbols,
            length,
            symbol_offset: u32::try_from(symbol_offset).map_err(|_| too_large())?,
            num_vars: u32::try_from(num_vars).map_err(|_| too_large())?,
        })
    }

    /// Target word length `n`.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    fn symbol_offset(&self) -> usize {
        self.symbol_offset as usize
    }

    /// Total number of variables in the layout.
    pub fn num_vars(&self) -> usize {
        self.num_vars as usize
    }

    pub fn id(&self, var: IndexedVar) -> VarId {
        let index = match var {
            IndexedVar::State { state, step } => {
                debug_assert!(state < self.num_states && step <= self.length);
                step * self.num_states + state
            }
            IndexedVar::Symbol { symbol, step } => {
                debug_assert!(symbol < self.num_symbols && step < self.length);
                self.symbol_offset() + step * self.num_symbols + symbol
            }
        };
        debug_assert!(index < self.num_vars());
        // In range: `new` checked that every index fits in u32.
        VarId(index as u32)
    }

    pub fn state(&self, state: StateId, step: usize) -> VarId {
        self.id(IndexedVar::State { state, step })
    }

    pub fn symbol(&self, symbol: SymbolId, step: usize) -> VarId {
        self.id(IndexedVar::Symbol { symbol, step })
    }

    pub fn state_var(&self, state: StateId, step: usize) -> Formula {
        Formula::var(self.state(state, step))
    }

    pub fn symbol_var(&self, symbol: SymbolId, step: usize) -> Formula {
        Formula::var(self.symbol(symbol, step))
    }

    /// Inverse of [`VarLayout::id`]; `None` for ids outside the layout.
    pub fn decode(&self, id: VarId) -> Option<IndexedVar> {
        let index = id.index();
        if index < self.symbol_offset() {
            // num_states > 0 here, otherwise the state range is empty.
            Some(IndexedVar::State {
                state: index % self.num_states,
                step: index / self.num_states,
            })
        } else if index < self.num_vars() {
            let rel = index - self.symbol_offset();
            Some(IndexedVar::Symbol {
                symbol: rel % self.num_symbols,
                step: rel / self.num_symbols,
            })
        } else {
            None
        }
    }

    /// Every id of the layout, states first.
    pub fn all_vars(&self) -> impl Iterator<Item = VarId> {
        (0..self.num_vars).map(VarId)
    }

    /// Symbol-variable ids, step-major. These are the ones the decoder reads.
    pub fn symbol_vars(&self) -> impl Iterator<Item = VarId> {
        (self.symbol_offset..self.num_vars).map(VarId)
    }
}
