//! The streaming scanner engine.
//!
//! The engine owns the live DFA state, a scan buffer of the characters
//! consumed since the last advance point, a stack of buffered match
//! candidates (top = longest) and the absolute position counter. Matches are
//! resolved with longest-match, earliest-pattern-wins semantics: resolution
//! is triggered when the DFA reaches a final state, walks the candidate
//! stack from the longest candidate down, and picks the first pattern
//! indexed for the candidate's state.
//!
//! Buffer invariant: the scan buffer holds exactly the characters consumed
//! since the last advance point; the live state is the result of stepping
//! the DFA over the whole buffer from the start state; every buffered
//! candidate is a prefix of the buffer. Advancing trims the resolved prefix,
//! clears the candidates, resets the live state and moves the absolute
//! position, after which the remaining tail is rescanned from the start
//! state.

use std::collections::VecDeque;
use std::sync::Arc;

use log::{error, trace};

use crate::context::ContextInner;
use crate::Match;

use super::ids::StateID;

pub(crate) struct ScannerImpl {
    ctxt: Arc<ContextInner>,
    /// The live DFA state.
    current: StateID,
    /// The characters consumed since the last advance point.
    scan_buffer: VecDeque<char>,
    /// Buffered match candidates; the top is the longest one.
    match_buffer: Vec<(StateID, String)>,
    /// Absolute character offset of the first character of the scan buffer.
    pos: usize,
}

impl ScannerImpl {
    pub(crate) fn new(ctxt: Arc<ContextInner>) -> Self {
        let start = ctxt.dfa.start();
        ScannerImpl {
            ctxt,
            current: start,
            scan_buffer: VecDeque::new(),
            match_buffer: Vec::new(),
            pos: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Consume one character, appending any matches it resolves to `out`.
    pub(crate) fn update_char(&mut self, c: char, out: &mut Vec<Match>) {
        self.scan_buffer.push_back(c);
        self.current = self.ctxt.dfa.step(self.current, c);
        let state = self.ctxt.dfa.state(self.current);
        if state.is_accepting() {
            let text: String = self.scan_buffer.iter().collect();
            self.match_buffer.push((self.current, text));
        }
        if state.is_final() {
            // Resolve the buffered match first; the character that triggered
            // finality stays in the buffer and is rescanned afterwards.
            if self.match_buffer.is_empty() || !self.resolve(out) {
                self.advance(1);
            }
            self.run_buffer(out, false);
        }
    }

    /// Consume a string; matches are reported in input order.
    pub(crate) fn update(&mut self, input: &str, out: &mut Vec<Match>) {
        for c in input.chars() {
            self.update_char(c, out);
        }
    }

    /// Signal the end of the input: resolve what the live scan has buffered
    /// and drain the remaining buffer, forcing progress where the regular
    /// scan would pause for more input. Idempotent once the buffer is
    /// drained.
    pub(crate) fn complete(&mut self, out: &mut Vec<Match>) {
        if self.scan_buffer.is_empty() {
            return;
        }
        if self.match_buffer.is_empty() || !self.resolve(out) {
            self.advance(1);
        }
        self.run_buffer(out, true);
    }

    /// Reset the scanner to its initial state.
    pub(crate) fn reset(&mut self) {
        self.current = self.ctxt.dfa.start();
        self.scan_buffer.clear();
        self.match_buffer.clear();
        self.pos = 0;
    }

    /// Rescan the buffer from the start state, resolving matches as they
    /// finalize. Without `complete`, scanning pauses when the buffer is
    /// exhausted with the DFA still live; with it, progress is forced by the
    /// best buffered match or by a single character until the buffer is
    /// empty.
    fn run_buffer(&mut self, out: &mut Vec<Match>, complete: bool) {
        'rescan: loop {
            debug_assert_eq!(self.current, self.ctxt.dfa.start());
            debug_assert!(self.match_buffer.is_empty());
            let mut index = 0;
            while index < self.scan_buffer.len() {
                let c = self.scan_buffer[index];
                self.current = self.ctxt.dfa.step(self.current, c);
                let state = self.ctxt.dfa.state(self.current);
                if state.is_accepting() {
                    let text: String = self.scan_buffer.iter().take(index + 1).collect();
                    self.match_buffer.push((self.current, text));
                }
                if state.is_final() {
                    if self.match_buffer.is_empty() || !self.resolve(out) {
                        self.advance(1);
                    }
                    continue 'rescan;
                }
                index += 1;
            }
            if !complete || self.scan_buffer.is_empty() {
                return;
            }
            if self.match_buffer.is_empty() || !self.resolve(out) {
                self.advance(1);
            }
        }
    }

    /// Backtracking match resolution: walk the candidate stack from the
    /// longest candidate down and attribute it to the earliest-declared
    /// pattern indexed for its state. On success the resolved prefix is
    /// consumed (and reported unless the pattern is an ignore pattern).
    fn resolve(&mut self, out: &mut Vec<Match>) -> bool {
        while let Some((state, text)) = self.match_buffer.pop() {
            match self.ctxt.index.patterns(state) {
                Some([pattern, ..]) => {
                    let pattern = pattern.clone();
                    let length = text.chars().count();
                    debug_assert!(length >= 1);
                    if pattern.is_ignore() {
                        trace!(
                            "suppressing ignore match {} '{}' at {}",
                            pattern.id(),
                            text.escape_default(),
                            self.pos
                        );
                    } else {
                        out.push(Match::new(
                            pattern.id(),
                            pattern.name().to_string(),
                            self.pos,
                            text,
                        ));
                    }
                    self.advance(length);
                    return true;
                }
                Some(_) => {
                    // No pattern attributed here; fall back to the next
                    // shorter candidate.
                }
                None => {
                    error!(
                        "accepting state {} has no pattern index entry, dropping match",
                        state
                    );
                    self.match_buffer.clear();
                    return false;
                }
            }
        }
        false
    }

    /// Consume `count` characters: trim them off the scan buffer, clear the
    /// candidates, reset the live state and move the absolute position.
    fn advance(&mut self, count: usize) {
        debug_assert!(count >= 1);
        for _ in 0..count {
            self.scan_buffer.pop_front();
        }
        self.match_buffer.clear();
        self.current = self.ctxt.dfa.start();
        self.pos += count;
    }
}

impl std::fmt::Debug for ScannerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScannerImpl {{ state: {}, pos: {}, buffered: {}, candidates: {} }}",
            self.current,
            self.pos,
            self.scan_buffer.len(),
            self.match_buffer.len()
        )
    }
}
