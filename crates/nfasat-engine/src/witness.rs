use nfasat_ir::{Automaton, SymbolId};
use nfasat_smt::{Assignment, VarLayout};
use thiserror::Error;

/// A word as symbol indices into the automaton's alphabet.
pub type Word = Vec<SymbolId>;

/// The assignment contradicts the exactly-one-symbol constraint.
///
/// These never occur with a correct solver; they indicate an inconsistency
/// between the encoding and the model it returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no symbol is chosen at step {step}")]
    NoSymbol { step: usize },
    #[error("symbols '{first}' and '{second}' are both chosen at step {step}")]
    AmbiguousSymbol {
        step: usize,
        first: String,
        second: String,
    },
    #[error("model has no value for symbol '{symbol}' at step {step}")]
    MissingValue { step: usize, symbol: String },
}

fn label(automaton: &Automaton, symbol: SymbolId) -> String {
    automaton.symbol_label(symbol).unwrap_or("?").to_string()
}

/// Read the witness word out of a satisfying assignment.
///
/// For each step the alphabet is scanned in declaration order and the single
/// symbol whose variable is true is selected.
pub fn decode_word(
    automaton: &Automaton,
    layout: &VarLayout,
    assignment: &Assignment,
) -> Result<Word, DecodeError> {
    let mut word = Vec::with_capacity(layout.length());
    for step in 0..layout.length() {
        let mut chosen = None;
        for symbol in 0..automaton.num_symbols() {
            let value = assignment
                .get(layout.symbol(symbol, step))
                .ok_or_else(|| DecodeError::MissingValue {
                    step,
                    symbol: label(automaton, symbol),
                })?;
            if !value {
                continue;
            }
            if let Some(first) = chosen {
                return Err(DecodeError::AmbiguousSymbol {
                    step,
                    first: label(automaton, first),
                    second: label(automaton, symbol),
                });
            }
            chosen = Some(symbol);
        }
        word.push(chosen.ok_or(DecodeError::NoSymbol { step })?);
    }
    Ok(word)
}

/// Space-separated symbol labels of `word`.
pub fn render_word(automaton: &Automaton, word: &[SymbolId]) -> String {
    word.iter()
        .map(|&s| automaton.symbol_label(s).unwrap_or("?"))
        .collect::<Vec<_>>()
        .join(" ")
}
