#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Byte range in the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseDiagnosticSeverity {
    Warning,
}

/// Non-fatal finding about well-formed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub code: String,
    pub severity: ParseDiagnosticSeverity,
    pub message: String,
    pub suggestion: Option<String>,
    pub span: Option<Span>,
}

/// Kind of label a reference or declaration names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    State,
    Symbol,
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelKind::State => write!(f, "state"),
            LabelKind::Symbol => write!(f, "symbol"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("Syntax error: {message}")]
    #[diagnostic(code(nfasat::parse::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Header declares {declared} transitions but {found} transition lines follow")]
    #[diagnostic(
        code(nfasat::parse::transition_count),
        help("the fifth header number must equal the number of `source symbol target` lines")
    )]
    TransitionCount {
        declared: usize,
        found: usize,
        #[label("declared here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Duplicate {kind} '{name}'")]
    #[diagnostic(code(nfasat::parse::duplicate))]
    Duplicate {
        kind: LabelKind,
        name: String,
        #[label("already declared")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Unknown {kind} '{name}'")]
    #[diagnostic(
        code(nfasat::parse::unknown_reference),
        help("every {kind} must be declared on its own line before it is used")
    )]
    UnknownReference {
        kind: LabelKind,
        name: String,
        #[label("not declared")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Integer '{text}' is out of range")]
    #[diagnostic(code(nfasat::parse::invalid_integer))]
    InvalidInteger {
        text: String,
        #[label("too large")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, span: Span, source: &str, filename: &str) -> Self {
        ParseError::Syntax {
            message: message.into(),
            span: span.into(),
            src: miette::NamedSource::new(filename, source.to_owned()),
        }
    }
}
