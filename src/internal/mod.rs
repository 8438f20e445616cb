/// Module that provides functions and types related to character sets.
mod char_set;

/// Module with conversion to graphviz dot format.
pub(crate) mod dot;

/// Module with the DFA compiler and runtime.
mod dfa;
pub(crate) use dfa::Dfa;

/// Module with the regular expression algebra.
mod expr;

/// Module with the expression vector type.
mod expr_vec;
pub(crate) use expr_vec::ExprVec;

/// Module for ID types.
mod ids;

/// Module with the regex surface syntax parser.
mod parser;
pub(crate) use parser::parse_regex;

/// Module with the state-to-pattern index.
mod pattern_index;
pub(crate) use pattern_index::PatternIndex;

/// Module with the streaming scanner engine.
mod scanner_impl;
pub(crate) use scanner_impl::ScannerImpl;
