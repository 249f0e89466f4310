/// Errors that can occur while reading or converting a prefab document.
///
/// Every variant is scoped to a single document; a batch caller reports it
/// and moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid `{field}`: {reason}")]
    Schema { field: &'static str, reason: String },

    #[error("unsupported prefab format version {0}")]
    UnsupportedVersion(u64),

    #[error("malformed token {token:?} on layer line {line}")]
    Format { line: usize, token: String },

    #[error("layer shape does not match size: {0}")]
    ShapeMismatch(ShapeMismatch),
}

/// Ways a layer list can disagree with the declared size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// Total number of layer entries is wrong.
    LineCount { expected: usize, actual: usize },
    /// A row line sits where a plane separator belongs.
    MissingSeparator { line: usize },
    /// A plane separator sits where a row line belongs.
    UnexpectedSeparator { line: usize },
    /// A row has the wrong number of tokens.
    TokenCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineCount { expected, actual } => {
                write!(f, "expected {expected} layer lines, got {actual}")
            }
            Self::MissingSeparator { line } => {
                write!(f, "line {line} should be a plane separator")
            }
            Self::UnexpectedSeparator { line } => {
                write!(f, "unexpected plane separator on line {line}")
            }
            Self::TokenCount {
                line,
                expected,
                actual,
            } => write!(f, "line {line} has {actual} tokens, expected {expected}"),
        }
    }
}

impl CodecError {
    pub(crate) fn schema(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Schema {
            field,
            reason: reason.into(),
        }
    }
}
