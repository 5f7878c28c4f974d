#![doc = include_str!("../README.md")]

//! Propositional rejection encoding for NFAs and the solver backends that decide it.

pub mod backends;
pub mod encoder;
pub mod formula;
pub mod search;
pub mod solver;

pub use encoder::{
    encode_rejection_search, EncodeError, IndexedVar, LayoutError, RejectionEncoding, VarLayout,
};
pub use formula::{Formula, VarId};
pub use search::{run_rejection_search, SearchProfile, SearchResult};
pub use solver::{Assignment, SatResult, SatSolver};
