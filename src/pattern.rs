//! Module with the pattern types and their methods.
use serde::{Deserialize, Serialize};

/// The identifier of a pattern.
///
/// The major component comes from the pattern definition; the minor
/// component disambiguates the concrete expansions (boundary and regex
/// variants) of a single definition and is assigned from 0 upward by the
/// pattern file loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternId {
    major: u32,
    minor: u32,
}

impl PatternId {
    /// Create a new pattern id.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Get the major component.
    #[inline]
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Get the minor component.
    #[inline]
    pub fn minor(&self) -> u32 {
        self.minor
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A pattern the scanner searches for.
///
/// A pattern couples an identifier and a display name with the source text
/// of a regular expression. Patterns are bundled into a
/// [crate::ScannerContext] in declaration order; when several patterns
/// produce a match of the same length at the same position, the
/// earliest-declared one wins.
///
/// A pattern with the `ignore` flag set suppresses its matches instead of
/// reporting them. This is the standard way to mask well-formed longer
/// inputs that a shorter pattern would otherwise report a piece of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    id: PatternId,
    name: String,
    regex: String,
    #[serde(default)]
    ignore: bool,
}

impl Pattern {
    /// Create a new pattern.
    pub fn new(id: PatternId, name: String, regex: String) -> Self {
        Self {
            id,
            name,
            regex,
            ignore: false,
        }
    }

    /// Turn the pattern into an ignore pattern: its matches are consumed
    /// silently instead of being reported.
    pub fn with_ignore(self) -> Self {
        Self {
            ignore: true,
            ..self
        }
    }

    /// Get the pattern id.
    #[inline]
    pub fn id(&self) -> PatternId {
        self.id
    }

    /// Get the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the source regex.
    #[inline]
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Check if the pattern is an ignore pattern.
    #[inline]
    pub fn is_ignore(&self) -> bool {
        self.ignore
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} '{}'",
            self.id,
            self.name,
            self.regex.escape_default()
        )?;
        if self.ignore {
            write!(f, " (ignore)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_id_display() {
        assert_eq!(PatternId::new(4, 1).to_string(), "4.1");
    }

    #[test]
    fn test_pattern_serialization() {
        let pattern = Pattern::new(
            PatternId::new(1, 0),
            "ssn".to_string(),
            "[[:digit:]]{9}".to_string(),
        )
        .with_ignore();
        let serialized = serde_json::to_string(&pattern).unwrap();
        let deserialized: Pattern = serde_json::from_str(&serialized).unwrap();
        assert_eq!(pattern, deserialized);
        assert!(deserialized.is_ignore());
    }
}
