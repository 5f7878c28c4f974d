#![no_main]
use libfuzzer_sys::fuzz_target;
use nfasat_smt::encoder::estimate_clauses;
use nfasat_smt::{encode_rejection_search, IndexedVar, VarLayout};

/// Largest encoding actually built per input.
const BUILD_BUDGET: usize = 1 << 16;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(input) = nfasat_dsl::parse(s, "fuzz.nfa") else {
        return;
    };
    let nfa = &input.automaton;
    let length = input.length;

    let layout = match VarLayout::new(nfa.num_states(), nfa.num_symbols(), length) {
        Ok(layout) => layout,
        Err(_) => {
            // Must be refused before any formula is built.
            assert!(encode_rejection_search(nfa, length).is_err());
            return;
        }
    };

    // Corner ids of a checked layout decode back to their triple.
    let mut corners = Vec::new();
    if nfa.num_states() > 0 {
        corners.push(IndexedVar::State { state: 0, step: 0 });
        corners.push(IndexedVar::State {
            state: nfa.num_states() - 1,
            step: length,
        });
    }
    if nfa.num_symbols() > 0 && length > 0 {
        corners.push(IndexedVar::Symbol { symbol: 0, step: 0 });
        corners.push(IndexedVar::Symbol {
            symbol: nfa.num_symbols() - 1,
            step: length - 1,
        });
    }
    for var in corners {
        let id = layout.id(var);
        assert!(id.index() < layout.num_vars());
        assert_eq!(layout.decode(id), Some(var));
    }

    if estimate_clauses(nfa, length) <= BUILD_BUDGET {
        let encoding = encode_rejection_search(nfa, length).expect("within every limit");
        assert_eq!(encoding.layout.num_vars(), encoding.declarations.len());
        let _ = nfasat_smt::backends::smtlib_printer::to_smtlib(&encoding.conjunction());
    }
});
