#![doc = include_str!("../README.md")]

//! End-to-end non-acceptance check: parse, encode, solve, decode, confirm.

pub mod pipeline;
pub mod result;
pub mod witness;

pub use pipeline::{
    check_automaton, check_source, check_with_solver, PipelineError, PipelineOptions,
    SolverChoice,
};
pub use result::{CheckReport, CheckResult, CheckStats};
