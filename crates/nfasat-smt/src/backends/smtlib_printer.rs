use std::io::{self, Write};

use nfasat_ir::Automaton;

use crate::encoder::{IndexedVar, RejectionEncoding};
use crate::formula::Formula;

/// Logic used for every script; the encoding is purely propositional.
pub const LOGIC: &str = "QF_UF";

/// Print a formula as an SMT-LIB2 term.
pub fn to_smtlib(formula: &Formula) -> String {
    match formula {
        Formula::Var(id) => id.to_string(),
        Formula::Const(b) => b.to_string(),
        Formula::And(terms) => nary("and", "true", terms),
        Formula::Or(terms) => nary("or", "false", terms),
        Formula::Not(inner) => format!("(not {})", to_smtlib(inner)),
        Formula::Implies(lhs, rhs) => format!("(=> {} {})", to_smtlib(lhs), to_smtlib(rhs)),
    }
}

fn nary(op: &str, neutral: &str, terms: &[Formula]) -> String {
    match terms {
        [] => neutral.to_string(),
        [single] => to_smtlib(single),
        _ => {
            let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
            format!("({op} {})", inner.join(" "))
        }
    }
}

/// Human-readable meaning of a variable, used in script comments.
pub fn describe_var(automaton: &Automaton, var: IndexedVar) -> String {
    match var {
        IndexedVar::State { state, step } => format!(
            "state {} active at step {step}",
            automaton.state_label(state).unwrap_or("?")
        ),
        IndexedVar::Symbol { symbol, step } => format!(
            "symbol {} read at step {step}",
            automaton.symbol_label(symbol).unwrap_or("?")
        ),
    }
}

/// Write a standalone SMT-LIB2 script for `encoding`.
///
/// Each declaration carries a comment naming the state or symbol it stands
/// for, so the script can be replayed by hand against any SMT-LIB solver.
pub fn write_smtlib_script<W: Write>(
    out: &mut W,
    automaton: &Automaton,
    encoding: &RejectionEncoding,
) -> io::Result<()> {
    writeln!(
        out,
        "; rejection search: {} states, {} symbols, word length {}",
        automaton.num_states(),
        automaton.num_symbols(),
        encoding.length()
    )?;
    writeln!(out, "(set-logic {LOGIC})")?;
    for id in &encoding.declarations {
        match encoding.layout.decode(*id) {
            Some(var) => writeln!(
                out,
                "(declare-const {id} Bool) ; {}",
                describe_var(automaton, var)
            )?,
            None => writeln!(out, "(declare-const {id} Bool)")?,
        }
    }
    writeln!(out, "; transitions")?;
    writeln!(out, "(assert {})", to_smtlib(&encoding.transition))?;
    writeln!(out, "; correctness")?;
    writeln!(out, "(assert {})", to_smtlib(&encoding.correctness))?;
    writeln!(out, "(check-sat)")?;
    if !encoding.model_vars.is_empty() {
        let names: Vec<String> = encoding.model_vars.iter().map(|v| v.to_string()).collect();
        writeln!(out, "(get-value ({}))", names.join(" "))?;
    }
    Ok(())
}
