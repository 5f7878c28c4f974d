mod common;

use common::ExhaustiveSolver;
use nfasat_engine::{check_with_solver, CheckResult};
use nfasat_ir::proptest_generators::arb_automaton;
use nfasat_ir::{Automaton, SymbolId};
use proptest::prelude::*;

fn all_words(num_symbols: usize, length: usize) -> Vec<Vec<SymbolId>> {
    let mut words = vec![Vec::new()];
    for _ in 0..length {
        words = words
            .into_iter()
            .flat_map(|w| {
                (0..num_symbols).map(move |s| {
                    let mut next = w.clone();
                    next.push(s);
                    next
                })
            })
            .collect();
    }
    words
}

/// Every prefix of `word`, including the empty one, leaves some state active.
fn run_stays_alive(nfa: &Automaton, word: &[SymbolId]) -> bool {
    (0..=word.len()).all(|k| !nfa.run(&word[..k]).is_empty())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reported_words_are_rejected(nfa in arb_automaton(), length in 0usize..=2) {
        let report = check_with_solver(&mut ExhaustiveSolver::new(), &nfa, length).unwrap();
        if let CheckResult::Rejected { word, .. } = &report.result {
            prop_assert_eq!(word.len(), length);
            let ids = nfa.word_from_labels(word.as_slice()).unwrap();
            prop_assert!(!nfa.accepts(&ids));
        }
    }

    #[test]
    fn all_accepted_leaves_no_live_rejected_word(nfa in arb_automaton(), length in 0usize..=2) {
        let report = check_with_solver(&mut ExhaustiveSolver::new(), &nfa, length).unwrap();
        if report.result == (CheckResult::AllAccepted { length }) {
            for word in all_words(nfa.num_symbols(), length) {
                prop_assert!(
                    nfa.accepts(&word) || !run_stays_alive(&nfa, &word),
                    "live rejected word {:?} was missed",
                    word
                );
            }
        }
    }

    #[test]
    fn stats_reflect_the_automaton(nfa in arb_automaton(), length in 0usize..=2) {
        let report = check_with_solver(&mut ExhaustiveSolver::new(), &nfa, length).unwrap();
        prop_assert_eq!(report.stats.states, nfa.num_states());
        prop_assert_eq!(report.stats.symbols, nfa.num_symbols());
        prop_assert_eq!(report.stats.transitions, nfa.transitions().len());
        prop_assert_eq!(
            report.stats.variables,
            (length + 1) * nfa.num_states() + length * nfa.num_symbols()
        );
        prop_assert_eq!(report.result.length(), length);
    }
}
