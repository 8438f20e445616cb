use std::path::Path;

use crate::{pattern_file, Pattern, Result, ScannerContext};

/// A builder for creating a scanner context.
///
/// Patterns are compiled in the order they were added; when several patterns
/// produce equally long matches at the same position, the first-added one
/// wins.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    patterns: Vec<Pattern>,
}

impl ContextBuilder {
    /// Creates a new context builder.
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Adds a pattern to the context builder.
    pub fn add_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Adds multiple patterns to the context builder.
    pub fn add_patterns<P>(mut self, patterns: P) -> Self
    where
        P: IntoIterator<Item = Pattern>,
    {
        self.patterns.extend(patterns);
        self
    }

    /// Loads a pattern definition file and adds its expanded patterns.
    ///
    /// IO and format errors surface immediately; per-pattern regex problems
    /// do not (they are reported and skipped when the context is built).
    pub fn add_patterns_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.patterns.extend(pattern_file::load_patterns(path)?);
        Ok(self)
    }

    /// Builds the scanner context.
    pub fn build(self) -> ScannerContext {
        ScannerContext::from_patterns(self.patterns)
    }
}
