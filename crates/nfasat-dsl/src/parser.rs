#![allow(clippy::result_large_err)]

use nfasat_ir::{Automaton, ModelError};
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{LabelKind, ParseDiagnostic, ParseDiagnosticSeverity, ParseError, Span};

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct NfaParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

/// A validated automaton together with the requested word length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub automaton: Automaton,
    pub length: usize,
}

fn span_from(pair: &Pair<'_>) -> Span {
    let s = pair.as_span();
    Span::new(s.start(), s.end())
}

/// Largest word length the parser accepts.
pub const MAX_LENGTH: usize = u32::MAX as usize;

/// Source text and name, attached to every error for rendering.
struct Ctx<'a> {
    source: &'a str,
    filename: &'a str,
}

impl Ctx<'_> {
    fn src(&self) -> miette::NamedSource<String> {
        miette::NamedSource::new(self.filename, self.source.to_owned())
    }

    fn integer(&self, pair: &Pair<'_>) -> Result<usize, ParseError> {
        pair.as_str()
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidInteger {
                text: pair.as_str().to_string(),
                span: span_from(pair).into(),
                src: self.src(),
            })
    }

    /// Word length; variable ids are 32-bit, so anything above
    /// [`MAX_LENGTH`] can never be encoded.
    fn length(&self, pair: &Pair<'_>) -> Result<usize, ParseError> {
        let value = self.integer(pair)?;
        if value > MAX_LENGTH {
            return Err(ParseError::InvalidInteger {
                text: pair.as_str().to_string(),
                span: span_from(pair).into(),
                src: self.src(),
            });
        }
        Ok(value)
    }

    fn model_error(&self, err: ModelError, pair: &Pair<'_>) -> ParseError {
        let span = span_from(pair).into();
        match err {
            ModelError::DuplicateState(name) => ParseError::Duplicate {
                kind: LabelKind::State,
                name,
                span,
                src: self.src(),
            },
            ModelError::DuplicateSymbol(name) => ParseError::Duplicate {
                kind: LabelKind::Symbol,
                name,
                span,
                src: self.src(),
            },
            ModelError::UnknownState(name) => ParseError::UnknownReference {
                kind: LabelKind::State,
                name,
                span,
                src: self.src(),
            },
            ModelError::UnknownSymbol(name) => ParseError::UnknownReference {
                kind: LabelKind::Symbol,
                name,
                span,
                src: self.src(),
            },
        }
    }
}

/// Declared counts from the first line.
struct Header<'a> {
    alphabet: (usize, Pair<'a>),
    states: (usize, Pair<'a>),
    initial: (usize, Pair<'a>),
    finals: (usize, Pair<'a>),
    transitions: (usize, Pair<'a>),
}

/// Parse an automaton description.
pub fn parse(source: &str, filename: &str) -> Result<ParsedInput, ParseError> {
    let (input, _) = parse_with_diagnostics(source, filename)?;
    Ok(input)
}

/// Parse an automaton description and report count mismatches as warnings.
///
/// The transition count of the header is binding; the other four counts are
/// only cross-checked.
pub fn parse_with_diagnostics(
    source: &str,
    filename: &str,
) -> Result<(ParsedInput, Vec<ParseDiagnostic>), ParseError> {
    let ctx = Ctx { source, filename };
    let mut pairs = NfaParser::parse(Rule::input, source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p + 1),
            pest::error::InputLocation::Span((s, e)) => (s, e),
        };
        let end = end.min(source.len()).max(start);
        ParseError::syntax(format!("{e}"), Span::new(start, end), source, filename)
    })?;
    let Some(input) = pairs.next() else {
        return Err(ParseError::syntax("empty input", Span::new(0, 0), source, filename));
    };

    let mut header = None;
    let mut automaton = Automaton::new();
    let mut diagnostics = Vec::new();
    let mut transition_lines = 0usize;
    let mut length = 0usize;

    for pair in input.into_inner() {
        match pair.as_rule() {
            Rule::header => header = Some(parse_header(&ctx, pair)?),
            Rule::alphabet => {
                for label in pair.into_inner() {
                    automaton
                        .add_symbol(label.as_str())
                        .map_err(|e| ctx.model_error(e, &label))?;
                }
            }
            Rule::states => {
                for label in pair.into_inner() {
                    automaton
                        .add_state(label.as_str())
                        .map_err(|e| ctx.model_error(e, &label))?;
                }
            }
            Rule::initial => {
                for label in pair.into_inner() {
                    automaton
                        .mark_initial(label.as_str())
                        .map_err(|e| ctx.model_error(e, &label))?;
                }
            }
            Rule::finals => {
                for label in pair.into_inner() {
                    automaton
                        .mark_final(label.as_str())
                        .map_err(|e| ctx.model_error(e, &label))?;
                }
            }
            Rule::transition => {
                transition_lines += 1;
                let span = span_from(&pair);
                let labels: Vec<Pair<'_>> = pair.into_inner().collect();
                let [from, symbol, to] = labels.as_slice() else {
                    return Err(ParseError::syntax(
                        "transition needs a source, a symbol and a target",
                        span,
                        source,
                        filename,
                    ));
                };
                let fresh = automaton
                    .add_transition(from.as_str(), symbol.as_str(), to.as_str())
                    .map_err(|e| {
                        let culprit = match e {
                            ModelError::UnknownSymbol(_) => symbol,
                            ModelError::UnknownState(ref name) if name == from.as_str() => from,
                            _ => to,
                        };
                        ctx.model_error(e, culprit)
                    })?;
                if !fresh {
                    diagnostics.push(ParseDiagnostic {
                        code: "duplicate_transition".into(),
                        severity: ParseDiagnosticSeverity::Warning,
                        message: format!(
                            "transition `{} {} {}` is listed more than once",
                            from.as_str(),
                            symbol.as_str(),
                            to.as_str()
                        ),
                        suggestion: Some("remove the repeated line".into()),
                        span: Some(span),
                    });
                }
            }
            Rule::length => {
                if let Some(count) = pair.into_inner().next() {
                    length = ctx.length(&count)?;
                }
            }
            _ => {}
        }
    }

    let Some(header) = header else {
        return Err(ParseError::syntax("missing header line", Span::new(0, 0), source, filename));
    };
    let (declared, declared_pair) = &header.transitions;
    if *declared != transition_lines {
        return Err(ParseError::TransitionCount {
            declared: *declared,
            found: transition_lines,
            span: span_from(declared_pair).into(),
            src: ctx.src(),
        });
    }

    let checks = [
        ("alphabet", &header.alphabet, automaton.num_symbols()),
        ("state", &header.states, automaton.num_states()),
        ("initial", &header.initial, automaton.initial_states().len()),
        ("final", &header.finals, automaton.final_states().len()),
    ];
    for (what, (declared, pair), actual) in checks {
        if *declared != actual {
            diagnostics.push(ParseDiagnostic {
                code: format!("{what}_count_mismatch"),
                severity: ParseDiagnosticSeverity::Warning,
                message: format!("header declares {declared} {what} entries but {actual} are listed"),
                suggestion: Some(format!("change the header count to {actual}")),
                span: Some(span_from(pair)),
            });
        }
    }

    Ok((ParsedInput { automaton, length }, diagnostics))
}

fn parse_header<'a>(ctx: &Ctx<'_>, pair: Pair<'a>) -> Result<Header<'a>, ParseError> {
    let mut counts = Vec::with_capacity(5);
    for count in pair.into_inner() {
        counts.push((ctx.integer(&count)?, count));
    }
    let mut counts = counts.into_iter();
    match (
        counts.next(),
        counts.next(),
        counts.next(),
        counts.next(),
        counts.next(),
    ) {
        (Some(alphabet), Some(states), Some(initial), Some(finals), Some(transitions)) => {
            Ok(Header {
                alphabet,
                states,
                initial,
                finals,
                transitions,
            })
        }
        _ => Err(ParseError::syntax(
            "header needs five counts",
            Span::new(0, 0),
            ctx.source,
            ctx.filename,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARITY: &str = "\
2 2 1 1 4
a b
even odd
even
even
even a odd
even b even
odd a even
odd b odd
3
";

    #[test]
    fn parses_well_formed_input() {
        let (input, diags) = parse_with_diagnostics(PARITY, "parity.nfa").unwrap();
        assert!(diags.is_empty());
        assert_eq!(input.length, 3);
        let nfa = &input.automaton;
        assert_eq!(nfa.num_symbols(), 2);
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.transitions().len(), 4);
        assert_eq!(nfa.symbol_label(0), Some("a"));
        assert_eq!(nfa.state_label(1), Some("odd"));
        assert!(nfa.is_final(0));
    }

    #[test]
    fn empty_initial_and_final_lines_are_allowed() {
        let src = "1 1 0 0 0\na\ns0\n\n\n2\n";
        let input = parse(src, "t.nfa").unwrap();
        assert!(input.automaton.initial_states().is_empty());
        assert!(input.automaton.final_states().is_empty());
        assert_eq!(input.length, 2);
    }

    #[test]
    fn tolerates_crlf_extra_spaces_and_missing_final_newline() {
        let src = "1 1 1 0 1\r\n a \r\ns0\r\ns0\r\n\r\ns0  a\ts0\r\n0";
        let input = parse(src, "t.nfa").unwrap();
        assert_eq!(input.automaton.transitions().len(), 1);
        assert_eq!(input.length, 0);
    }

    #[test]
    fn transition_count_is_binding() {
        let src = "1 1 1 1 2\na\ns0\ns0\ns0\ns0 a s0\n1\n";
        match parse(src, "t.nfa").unwrap_err() {
            ParseError::TransitionCount {
                declared, found, ..
            } => {
                assert_eq!(declared, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected TransitionCount, got {other:?}"),
        }
    }

    #[test]
    fn other_count_mismatches_are_warnings() {
        let src = "3 2 1 1 1\na\ns0\ns0\ns0\ns0 a s0\n1\n";
        let (input, diags) = parse_with_diagnostics(src, "t.nfa").unwrap();
        assert_eq!(input.automaton.num_symbols(), 1);
        let codes: Vec<&str> = diags.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["alphabet_count_mismatch", "state_count_mismatch"]);
        assert!(diags
            .iter()
            .all(|d| d.severity == ParseDiagnosticSeverity::Warning));
    }

    #[test]
    fn duplicate_transition_lines_warn() {
        let src = "1 1 1 0 2\na\ns0\ns0\n\ns0 a s0\ns0 a s0\n1\n";
        let (input, diags) = parse_with_diagnostics(src, "t.nfa").unwrap();
        assert_eq!(input.automaton.transitions().len(), 1);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "duplicate_transition");
    }

    #[test]
    fn unknown_symbol_points_at_symbol() {
        let src = "1 1 1 0 1\na\ns0\ns0\n\ns0 z s0\n1\n";
        match parse(src, "t.nfa").unwrap_err() {
            ParseError::UnknownReference {
                kind, name, span, ..
            } => {
                assert_eq!(kind, LabelKind::Symbol);
                assert_eq!(name, "z");
                assert_eq!(&src[span.offset()..span.offset() + span.len()], "z");
            }
            other => panic!("expected UnknownReference, got {other:?}"),
        }
    }

    #[test]
    fn unknown_target_state_points_at_target() {
        let src = "1 1 1 0 1\na\ns0\ns0\n\ns0 a s9\n1\n";
        match parse(src, "t.nfa").unwrap_err() {
            ParseError::UnknownReference {
                kind, name, span, ..
            } => {
                assert_eq!(kind, LabelKind::State);
                assert_eq!(name, "s9");
                assert_eq!(span.offset(), src.find("s9").unwrap());
            }
            other => panic!("expected UnknownReference, got {other:?}"),
        }
    }

    #[test]
    fn unknown_initial_state_is_rejected() {
        let src = "1 1 1 0 0\na\ns0\nq\n\n1\n";
        assert!(matches!(
            parse(src, "t.nfa").unwrap_err(),
            ParseError::UnknownReference {
                kind: LabelKind::State,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_symbol_is_rejected() {
        let src = "2 1 0 0 0\na a\ns0\n\n\n1\n";
        assert!(matches!(
            parse(src, "t.nfa").unwrap_err(),
            ParseError::Duplicate {
                kind: LabelKind::Symbol,
                ..
            }
        ));
    }

    #[test]
    fn malformed_lines_are_syntax_errors() {
        for src in [
            "",
            "1 1 1 0\na\ns0\ns0\n\n1\n",
            "1 1 1 0 1\na\ns0\ns0\n\ns0 a\n1\n",
            "1 1 1 0 0\na\ns0\ns0\n\nx\n",
            "1 1 1 0 0\na\ns0\ns0\n\n-1\n",
        ] {
            assert!(
                matches!(parse(src, "t.nfa"), Err(ParseError::Syntax { .. })),
                "expected syntax error for {src:?}"
            );
        }
    }

    #[test]
    fn oversized_length_is_reported() {
        let src = "1 1 1 0 0\na\ns0\ns0\n\n99999999999999999999999999\n";
        assert!(matches!(
            parse(src, "t.nfa").unwrap_err(),
            ParseError::InvalidInteger { .. }
        ));
    }

    #[test]
    fn length_beyond_the_variable_space_is_refused() {
        let src = "1 1 1 0 1\na\ns0\ns0\n\ns0 a s0\n18446744073709551615\n";
        match parse(src, "t.nfa").unwrap_err() {
            ParseError::InvalidInteger { text, span, .. } => {
                assert_eq!(text, "18446744073709551615");
                assert_eq!(span.offset(), src.rfind("1844").unwrap());
            }
            other => panic!("expected InvalidInteger, got {other:?}"),
        }
        let src = "1 1 1 0 0\na\ns0\ns0\n\n4294967296\n";
        assert!(matches!(
            parse(src, "t.nfa").unwrap_err(),
            ParseError::InvalidInteger { .. }
        ));
        let src = "1 1 1 0 0\na\ns0\ns0\n\n4294967295\n";
        assert_eq!(parse(src, "t.nfa").unwrap().length, MAX_LENGTH);
    }
}
