//! Proptest strategies for generating well-formed `Automaton` instances.

use proptest::prelude::*;

use crate::automaton::Automaton;

/// Strategy for a small well-formed `Automaton` suitable for property testing.
///
/// Generated automata have:
/// - 1–3 states labelled `q0`, `q1`, ...
/// - 1–2 symbols labelled `a`, `b`
/// - arbitrary (possibly empty) initial and final subsets
/// - an arbitrary subset of all possible transition triples
///
/// The sizes stay small enough for exhaustive word enumeration in tests.
pub fn arb_automaton() -> impl Strategy<Value = Automaton> {
    (1..=3usize, 1..=2usize)
        .prop_flat_map(|(nstates, nsymbols)| {
            let triples = nstates * nsymbols * nstates;
            (
                Just(nstates),
                Just(nsymbols),
                proptest::collection::vec(any::<bool>(), nstates),
                proptest::collection::vec(any::<bool>(), nstates),
                proptest::collection::vec(any::<bool>(), triples),
            )
        })
        .prop_map(|(nstates, nsymbols, initial, finals, present)| {
            let mut nfa = Automaton::new();
            let symbols: Vec<String> = ["a", "b"][..nsymbols]
                .iter()
                .map(|s| s.to_string())
                .collect();
            let states: Vec<String> = (0..nstates).map(|i| format!("q{i}")).collect();
            for sym in &symbols {
                nfa.add_symbol(sym.clone()).expect("generated symbols are distinct");
            }
            for state in &states {
                nfa.add_state(state.clone()).expect("generated states are distinct");
            }
            for (state, flag) in states.iter().zip(&initial) {
                if *flag {
                    nfa.mark_initial(state).expect("state declared above");
                }
            }
            for (state, flag) in states.iter().zip(&finals) {
                if *flag {
                    nfa.mark_final(state).expect("state declared above");
                }
            }
            let mut idx = 0;
            for from in &states {
                for sym in &symbols {
                    for to in &states {
                        if present[idx] {
                            nfa.add_transition(from, sym, to)
                                .expect("labels declared above");
                        }
                        idx += 1;
                    }
                }
            }
            nfa
        })
}

/// Strategy for a word of `len` symbols over an alphabet of `num_symbols`.
pub fn arb_word(num_symbols: usize, len: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0..num_symbols.max(1), len)
}
