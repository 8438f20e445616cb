use crate::{PatternId, Span};

/// A match reported by the scanner.
///
/// The position is the absolute character offset at which the matched text
/// began, counted from the first character the scanner ever consumed.
/// Matches of ignore patterns are consumed silently and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    id: PatternId,
    name: String,
    pos: usize,
    text: String,
}

impl Match {
    /// Create a new match.
    pub(crate) fn new(id: PatternId, name: String, pos: usize, text: String) -> Self {
        Self {
            id,
            name,
            pos,
            text,
        }
    }

    /// Get the id of the matched pattern.
    #[inline]
    pub fn pattern_id(&self) -> PatternId {
        self.id
    }

    /// Get the display name of the matched pattern.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the absolute character offset of the start of the match.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Get the matched text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length of the match in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the match is empty. The scanner never reports empty
    /// matches, so this is false for every reported match.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the span of the match in character offsets.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.pos, self.pos + self.len())
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} '{}'",
            self.id,
            self.name,
            self.pos,
            self.text.escape_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_accessors() {
        let m = Match::new(
            PatternId::new(1, 1),
            "ssn".to_string(),
            38,
            "444-42-1234".to_string(),
        );
        assert_eq!(m.pattern_id(), PatternId::new(1, 1));
        assert_eq!(m.name(), "ssn");
        assert_eq!(m.pos(), 38);
        assert_eq!(m.text(), "444-42-1234");
        assert_eq!(m.len(), 11);
        assert_eq!(m.span(), Span::new(38, 49));
        assert_eq!(m.to_string(), "1.1 ssn 38 '444-42-1234'");
    }
}
