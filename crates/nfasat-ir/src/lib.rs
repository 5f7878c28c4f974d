#![doc = include_str!("../README.md")]

//! Automaton model for nfasat.
//!
//! This crate defines the immutable NFA description consumed by the encoder
//! together with a subset-simulation used to double-check decoded witnesses.

pub mod automaton;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;

pub use automaton::{Automaton, ModelError, StateId, SymbolId, Transition};
