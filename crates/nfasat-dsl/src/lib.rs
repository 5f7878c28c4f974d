#![doc = include_str!("../README.md")]

//! Parser for the line-oriented automaton input format.

pub mod errors;
pub mod parser;

pub use errors::{ParseDiagnostic, ParseDiagnosticSeverity, ParseError, Span};
pub use parser::{parse, parse_with_diagnostics, ParsedInput, MAX_LENGTH};
