//! The DFA compiler and runtime.
//!
//! The compiler closes an expression vector under partitioned derivation
//! with an explicit worklist: every unique vector becomes one state, interned
//! through a hash map, which the canonical form of the algebra turns into a
//! derivative-equivalence test. A caller-supplied callback observes every
//! freshly created state together with its source vector; the context
//! builder uses it to populate the state-to-pattern index.
//!
//! The runtime is a passive transition structure; stepping it never fails
//! and never allocates.

use log::{debug, trace};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::char_set::CharSet;
use super::expr_vec::ExprVec;
use super::ids::{StateID, StateIDBase};

/// A single DFA state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DfaState {
    id: StateID,
    /// The source vector was nullable, i.e. at least one pattern matches the
    /// input consumed so far.
    accepting: bool,
    /// The source vector was final, i.e. no further input can change the
    /// acceptance decision of any coordinate.
    is_final: bool,
    /// The exceptional transitions; the sets are pairwise disjoint.
    transitions: Vec<(CharSet, StateID)>,
    /// The successor for every character outside all exceptional sets.
    default: StateID,
}

impl DfaState {
    #[inline]
    pub(crate) fn id(&self) -> StateID {
        self.id
    }

    #[inline]
    pub(crate) fn is_accepting(&self) -> bool {
        self.accepting
    }

    #[inline]
    pub(crate) fn is_final(&self) -> bool {
        self.is_final
    }

    pub(crate) fn transitions(&self) -> &[(CharSet, StateID)] {
        &self.transitions
    }

    pub(crate) fn default_target(&self) -> StateID {
        self.default
    }
}

/// Compile-time statistics of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DfaStats {
    pub(crate) states: usize,
    pub(crate) accepting: usize,
    pub(crate) finals: usize,
}

/// A deterministic finite automaton over expression vectors.
///
/// Immutable after compilation; stepping it from multiple threads needs no
/// synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    /// Compile the automaton for an expression vector.
    ///
    /// `on_state` fires exactly once per state, in creation order, at the
    /// moment the state's id is assigned and before its transitions are
    /// filled in. The callback receives only the identity and the source
    /// vector.
    pub(crate) fn compile<F>(start: ExprVec, mut on_state: F) -> Self
    where
        F: FnMut(StateID, &ExprVec),
    {
        let mut states: Vec<DfaState> = Vec::new();
        let mut vectors: Vec<ExprVec> = Vec::new();
        let mut interned: FxHashMap<ExprVec, StateID> = FxHashMap::default();

        intern_state(
            start,
            &mut states,
            &mut vectors,
            &mut interned,
            &mut on_state,
        );

        let mut next = 0;
        while next < states.len() {
            let vector = vectors[next].clone();
            let map = vector.derive_classes();
            let mut transitions = Vec::with_capacity(map.classes.len());
            for (successor, set) in map.classes {
                let target = intern_state(
                    successor,
                    &mut states,
                    &mut vectors,
                    &mut interned,
                    &mut on_state,
                );
                transitions.push((set, target));
            }
            let default = intern_state(
                map.default,
                &mut states,
                &mut vectors,
                &mut interned,
                &mut on_state,
            );
            states[next].transitions = transitions;
            states[next].default = default;
            next += 1;
        }

        let dfa = Dfa { states };
        let stats = dfa.stats();
        debug!(
            "compiled automaton: {} states, {} accepting, {} final",
            stats.states, stats.accepting, stats.finals
        );
        dfa
    }

    /// The start state.
    #[inline]
    pub(crate) fn start(&self) -> StateID {
        StateID::new(0)
    }

    /// Take the transition for `c` out of `state`.
    #[inline]
    pub(crate) fn step(&self, state: StateID, c: char) -> StateID {
        let state = &self.states[state.as_usize()];
        for (set, target) in &state.transitions {
            if set.contains(c) {
                return *target;
            }
        }
        state.default
    }

    #[inline]
    pub(crate) fn state(&self, id: StateID) -> &DfaState {
        &self.states[id.as_usize()]
    }

    pub(crate) fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Walk the whole input and report whether the resulting state accepts.
    #[allow(dead_code)]
    pub(crate) fn matches(&self, input: &str) -> bool {
        let mut state = self.start();
        for c in input.chars() {
            state = self.step(state, c);
        }
        self.state(state).is_accepting()
    }

    pub(crate) fn stats(&self) -> DfaStats {
        DfaStats {
            states: self.states.len(),
            accepting: self.states.iter().filter(|s| s.accepting).count(),
            finals: self.states.iter().filter(|s| s.is_final).count(),
        }
    }
}

/// Look up a vector's state or create it, notifying the callback for fresh
/// states. Re-encountered vectors are never notified twice.
fn intern_state<F>(
    vector: ExprVec,
    states: &mut Vec<DfaState>,
    vectors: &mut Vec<ExprVec>,
    interned: &mut FxHashMap<ExprVec, StateID>,
    on_state: &mut F,
) -> StateID
where
    F: FnMut(StateID, &ExprVec),
{
    if let Some(id) = interned.get(&vector) {
        return *id;
    }
    let id = StateID::new(states.len() as StateIDBase);
    let state = DfaState {
        id,
        accepting: vector.nullable(),
        is_final: vector.is_final(),
        transitions: Vec::new(),
        default: id,
    };
    trace!(
        "new state {}: accepting={}, final={}, vector={}",
        id,
        state.accepting,
        state.is_final,
        vector
    );
    states.push(state);
    interned.insert(vector.clone(), id);
    vectors.push(vector);
    on_state(id, &vectors[id.as_usize()]);
    id
}
