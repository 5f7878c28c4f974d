//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Decide whether a nondeterministic finite automaton rejects some word of a\n\
    given length by handing a propositional encoding to an SMT solver.\n\n\
    Input (one item per line):\n  \
    <#symbols> <#states> <#initial> <#final> <#transitions>\n  \
    <alphabet>\n  \
    <states>\n  \
    <initial states>\n  \
    <final states>\n  \
    <source> <symbol> <target>   (one line per transition)\n  \
    <length>\n\n\
    Output: YES if every word of that length is accepted, otherwise NO and a\n\
    rejected word on the next line.";

#[derive(Parser)]
#[command(name = "nfasat")]
#[command(about = "Check whether an NFA rejects some word of a given length")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Input file; reads stdin when omitted or `-`
    pub(crate) file: Option<PathBuf>,

    /// Solver backend to use
    #[arg(long, default_value = "z3", value_parser = ["z3", "cvc5"])]
    pub(crate) solver: String,

    /// Solver timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 0)]
    pub(crate) timeout: u64,

    /// Dump the SMT-LIB2 encoding to this file before solving
    #[arg(long)]
    pub(crate) dump_smt: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub(crate) format: String,

    /// Maximum input size in bytes
    #[arg(long, default_value_t = 1048576)]
    pub(crate) max_input_bytes: u64,
}
