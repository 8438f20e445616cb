//! The state-to-pattern index.
//!
//! For every accepting state of the automaton the index records which
//! patterns' vector coordinates are nullable there, in declaration order.
//! The scanner's backtracking resolution consults it to attribute a buffered
//! match to the earliest-declared pattern.

use serde::{Deserialize, Serialize};

use crate::Pattern;

use super::ids::StateID;

/// Maps state ids to the patterns accepted in that state.
///
/// Entries are kept sorted by state id; the compiler callback produces them
/// in creation order, so inserts only ever append.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PatternIndex {
    entries: Vec<(StateID, Vec<Pattern>)>,
}

impl PatternIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that `state` accepts `pattern`. Patterns for one state must be
    /// inserted in declaration order; states must be inserted in creation
    /// order.
    pub(crate) fn insert(&mut self, state: StateID, pattern: Pattern) {
        if let Some((last, patterns)) = self.entries.last_mut() {
            if *last == state {
                patterns.push(pattern);
                return;
            }
            debug_assert!(*last < state);
        }
        self.entries.push((state, vec![pattern]));
    }

    /// The patterns accepted in `state`, earliest-declared first, or `None`
    /// if the state is not an accepting state.
    pub(crate) fn patterns(&self, state: StateID) -> Option<&[Pattern]> {
        self.entries
            .binary_search_by_key(&state, |(id, _)| *id)
            .ok()
            .map(|index| self.entries[index].1.as_slice())
    }

    /// The number of indexed (accepting) states.
    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
