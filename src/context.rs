//! The scanner context: the compiled automaton bundled with its
//! state-to-pattern index.

use std::io::Write;
use std::sync::Arc;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::errors::{DescanError, DescanErrorKind, DeserializationError, Result};
use crate::internal::{parse_regex, Dfa, ExprVec, PatternIndex, ScannerImpl};
use crate::{Pattern, Scanner};

/// Magic tag and schema id of the serialized context format.
const MAGIC: &[u8; 8] = b"DSCANCTX";
const SCHEMA_VERSION: u32 = 1;
const HEADER_LEN: usize = MAGIC.len() + 4;

/// Compile-time statistics of a context's automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomatonStats {
    /// The total number of states.
    pub states: usize,
    /// The number of accepting states.
    pub accepting: usize,
    /// The number of final states.
    pub finals: usize,
}

/// The shared immutable core of a context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ContextInner {
    pub(crate) dfa: Dfa,
    pub(crate) index: PatternIndex,
}

/// A compiled scanner context.
///
/// A context pairs the automaton compiled from a pattern catalog with the
/// index that attributes accepting states back to their patterns. It is
/// created once, is deeply immutable and cheap to clone, and can spawn any
/// number of independent [Scanner]s, also across threads.
#[derive(Debug, Clone)]
pub struct ScannerContext {
    inner: Arc<ContextInner>,
}

impl ScannerContext {
    /// Compile a context from a pattern catalog.
    ///
    /// Patterns whose regex fails to parse are reported to the logger and
    /// excluded; the surviving patterns keep their declaration order, which
    /// decides match attribution when several patterns accept the same text.
    pub(crate) fn from_patterns(patterns: Vec<Pattern>) -> Self {
        let mut exprs = Vec::with_capacity(patterns.len());
        let mut kept = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            match parse_regex(pattern.regex()) {
                Ok(expr) => {
                    exprs.push(expr);
                    kept.push(pattern);
                }
                Err(err) => {
                    let err = DescanError::new(DescanErrorKind::RegexParse(
                        err,
                        pattern.regex().to_string(),
                    ));
                    error!("skipping pattern {} ({}): {}", pattern.id(), pattern.name(), err);
                }
            }
        }
        debug!("compiling context with {} patterns", kept.len());
        let mut index = PatternIndex::new();
        let dfa = Dfa::compile(ExprVec::new(exprs), |state, vector| {
            for (coordinate, expr) in vector.iter().enumerate() {
                if expr.nullable() {
                    index.insert(state, kept[coordinate].clone());
                }
            }
        });
        ScannerContext {
            inner: Arc::new(ContextInner { dfa, index }),
        }
    }

    /// Create a scanner over this context.
    pub fn scanner(&self) -> Scanner {
        Scanner::new(ScannerImpl::new(self.inner.clone()))
    }

    /// Statistics of the compiled automaton.
    pub fn stats(&self) -> AutomatonStats {
        let stats = self.inner.dfa.stats();
        AutomatonStats {
            states: stats.states,
            accepting: stats.accepting,
            finals: stats.finals,
        }
    }

    /// Serialize the context into an opaque, versioned byte blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
        serde_json::to_writer(&mut bytes, &*self.inner).map_err(std::io::Error::from)?;
        Ok(bytes)
    }

    /// Restore a context from a blob produced by [ScannerContext::to_bytes].
    ///
    /// Data without the magic tag, with a different schema id or with a
    /// corrupted payload is rejected; no partial context is ever returned.
    pub fn from_bytes(data: &[u8]) -> Result<ScannerContext> {
        if data.len() < HEADER_LEN || &data[..MAGIC.len()] != MAGIC {
            return Err(DeserializationError::BadMagic.into());
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&data[MAGIC.len()..HEADER_LEN]);
        let version = u32::from_le_bytes(version);
        if version != SCHEMA_VERSION {
            return Err(DeserializationError::SchemaVersion {
                found: version,
                expected: SCHEMA_VERSION,
            }
            .into());
        }
        let inner: ContextInner = serde_json::from_slice(&data[HEADER_LEN..])
            .map_err(|err| DeserializationError::Payload(err.to_string()))?;
        Ok(ScannerContext {
            inner: Arc::new(inner),
        })
    }

    /// Render the automaton as a Graphviz DOT graph.
    pub fn write_dot<W: Write>(&self, label: &str, output: &mut W) {
        crate::internal::dot::context_render(&self.inner, label, output);
    }
}
