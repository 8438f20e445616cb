use thiserror::Error;

/// The result type for the `descan` crate.
pub type Result<T> = std::result::Result<T, DescanError>;

/// The error type for the `descan` crate.
#[derive(Error, Debug)]
pub struct DescanError {
    /// The source of the error.
    pub source: Box<DescanErrorKind>,
}

impl DescanError {
    /// Create a new `DescanError`.
    pub fn new(kind: DescanErrorKind) -> Self {
        DescanError {
            source: Box::new(kind),
        }
    }
}

impl std::fmt::Display for DescanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum DescanErrorKind {
    /// The surface syntax of a pattern is malformed. Pattern regexes are
    /// parsed during context construction; a failing pattern is logged and
    /// excluded from the compiled automaton rather than aborting the build.
    #[error("'{1}' {0}")]
    RegexParse(RegexError, String),

    /// A std::io error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A pattern definition file is not valid.
    #[error("pattern file error: {0}")]
    PatternFile(String),

    /// A serialized scanner context was rejected.
    #[error(transparent)]
    Deserialization(DeserializationError),
}

impl From<std::io::Error> for DescanError {
    fn from(error: std::io::Error) -> Self {
        DescanError::new(DescanErrorKind::Io(error))
    }
}

impl From<DeserializationError> for DescanError {
    fn from(error: DeserializationError) -> Self {
        DescanError::new(DescanErrorKind::Deserialization(error))
    }
}

/// An error in the surface syntax of a regular expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// The pattern ended in the middle of a construct.
    #[error("unexpected end of pattern")]
    UnexpectedEnd,

    /// A character that cannot start or continue a construct.
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),

    /// A `(` without a matching `)`.
    #[error("unclosed group")]
    UnclosedGroup,

    /// A `[` without a matching `]`.
    #[error("unclosed character set")]
    UnclosedSet,

    /// A `[:name:]` class with an unknown name.
    #[error("unknown character class '[:{0}:]'")]
    UnknownClass(String),

    /// A range whose endpoints are not literal characters or whose upper
    /// bound does not exceed its lower bound.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Counted repetition with missing or decreasing bounds.
    #[error("invalid repetition bounds")]
    InvalidRepetition,

    /// A bracket set without any member.
    #[error("empty character set")]
    EmptyClass,

    /// A negated class escape inside a bracket set.
    #[error("negated class escapes are not allowed inside bracket sets")]
    NegatedClassInSet,
}

/// The reasons a serialized scanner context can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeserializationError {
    /// The data does not carry the context magic tag.
    #[error("not a serialized scanner context")]
    BadMagic,

    /// The data was produced by a different schema version.
    #[error("unsupported schema version {found}, expected {expected}")]
    SchemaVersion {
        /// The version found in the data.
        found: u32,
        /// The version this build understands.
        expected: u32,
    },

    /// The payload after the header could not be decoded.
    #[error("corrupted context payload: {0}")]
    Payload(String),
}
