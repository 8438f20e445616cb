#![forbid(missing_docs)]
//! # `descan`
//! The `descan` crate is a streaming multi-pattern text scanner built on
//! Brzozowski-style regular-expression derivatives. A catalog of named
//! patterns is compiled into a single deterministic finite automaton whose
//! states are equivalence classes of derivatives; a scanner then drives that
//! automaton over an unbounded character stream and reports the longest,
//! earliest-declared match at each position.
//!
//! Contexts are compiled once and shared; scanners are cheap, single-owner
//! cursors over a context. Patterns can be declared in code or loaded from a
//! JSON pattern definition file, and a compiled context can be serialized
//! into an opaque versioned blob and restored later.
//!
//! # Example
//! ```rust
//! use descan::{ContextBuilder, Pattern, PatternId};
//!
//! let ctxt = ContextBuilder::new()
//!     .add_pattern(Pattern::new(
//!         PatternId::new(1, 1),
//!         "ssn".to_string(),
//!         "[[:digit:]]{3}[ -][[:digit:]]{2}[ -][[:digit:]]{4}".to_string(),
//!     ))
//!     .add_pattern(Pattern::new(
//!         PatternId::new(2, 1),
//!         "visa".to_string(),
//!         "4[[:digit:]]{3}([ -]?[[:digit:]]{4}){3}".to_string(),
//!     ))
//!     .build();
//!
//! let mut scanner = ctxt.scanner();
//! let mut matches = scanner.update("Hi, here is my social security number 444-42-1234");
//! matches.extend(scanner.complete());
//!
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].name(), "ssn");
//! assert_eq!(matches[0].pos(), 38);
//! assert_eq!(matches[0].text(), "444-42-1234");
//! ```
//!
//! # Streaming
//! The scanner buffers characters between advance points, so matches may
//! span `update` calls arbitrarily; feeding one big string or many small
//! chunks yields the same match sequence. Call [Scanner::complete] once the
//! input ends to flush matches that could otherwise still grow.
//!
//! # Ignore patterns
//! A pattern built with [Pattern::with_ignore] consumes its matches
//! silently. Declaring an ignore pattern for a well-formed longer input
//! masks the shorter matches other patterns would report inside it.
//!
//! # Regex surface syntax
//! POSIX extended regex without anchors: alternation, grouping, `* + ?`,
//! counted repetition `{m}`/`{m,n}`, `.`, bracket sets with negation and
//! ranges, the POSIX character classes (`[:digit:]` et al.) with the usual
//! escape shorthands (`\d \D \s \S \w \a \x`), set intersection `S1{-}S2`
//! and set union `S1{+}S2`, and the control escapes `\b \f \n \r \t`.

/// Module with error definitions.
mod errors;
pub use errors::{DescanError, DescanErrorKind, DeserializationError, RegexError, Result};

/// Module with the scanner context.
mod context;
pub use context::{AutomatonStats, ScannerContext};

/// Module with the context builder.
mod context_builder;
pub use context_builder::ContextBuilder;

/// The module with internal implementation details.
mod internal;

/// Module that provides the Match type.
mod match_type;
pub use match_type::Match;

/// Module that provides the Pattern and PatternId types.
mod pattern;
pub use pattern::{Pattern, PatternId};

/// Module with the pattern definition file loader.
pub mod pattern_file;

/// The module with the streaming scanner.
mod scanner;
pub use scanner::Scanner;

/// Module that provides a Span type.
mod span;
pub use span::Span;
