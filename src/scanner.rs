use std::fmt::Debug;

use crate::{internal::ScannerImpl, Match};

/// A streaming scanner.
///
/// A scanner drives the context's automaton over an unbounded character
/// stream, fed piecewise through [Scanner::update] calls, and reports
/// matches with longest-match, earliest-pattern-wins semantics. Characters
/// are buffered between advance points, so a match can span any number of
/// `update` calls; feeding the same characters in different chunkings yields
/// the same matches.
///
/// A scanner is cheap to create and exclusively owns its mutable state; it
/// is not meant to be shared between threads. Use one scanner per thread,
/// all built from the same [crate::ScannerContext].
pub struct Scanner {
    inner: ScannerImpl,
}

impl Scanner {
    pub(crate) fn new(inner: ScannerImpl) -> Self {
        Self { inner }
    }

    /// Consume a single character and return the matches it resolved.
    pub fn update_char(&mut self, c: char) -> Vec<Match> {
        let mut matches = Vec::new();
        self.inner.update_char(c, &mut matches);
        matches
    }

    /// Consume a string and return the matches it resolved, in input order.
    pub fn update(&mut self, input: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        self.inner.update(input, &mut matches);
        matches
    }

    /// Signal the end of the input and return the residual matches.
    ///
    /// Without this call, a match that could still be extended by further
    /// input stays buffered. Completing is idempotent; afterwards the
    /// scanner should be dropped or [reset](Scanner::reset).
    pub fn complete(&mut self) -> Vec<Match> {
        let mut matches = Vec::new();
        self.inner.complete(&mut matches);
        matches
    }

    /// Reset the scanner to its initial state: buffers empty, position 0.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// The absolute character offset the scanner has committed up to, i.e.
    /// the number of characters either reported as matches or skipped.
    pub fn position(&self) -> usize {
        self.inner.position()
    }
}

impl Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scanner {{ inner: {:?} }}", self.inner)
    }
}
