use crate::data::IndexKind;

/// Failure of a single query. Every variant names the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Malformed or empty caller input.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid move: '{0}'")]
    InvalidMove(String),

    #[error("Invalid Pokemon type(s): {invalid:?}. Valid types: {valid:?}")]
    InvalidType {
        invalid: Vec<String>,
        valid: Vec<String>,
    },

    #[error("Maximum 2 types allowed, got {}: {:?}", .0.len(), .0)]
    TooManyTypes(Vec<String>),

    /// Well-formed query that matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// Input of the wrong kind, e.g. a number where a name was expected.
    #[error("Expected {expected} for '{field}', got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl QueryError {
    /// Stable tag for transports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidMove(_) => "invalid_move",
            Self::InvalidType { .. } => "invalid_type",
            Self::TooManyTypes(_) => "too_many_types",
            Self::NotFound(_) => "not_found",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Fatal startup failure: the loader handed over an empty index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineInitError {
    #[error("Repository returned empty {0} index")]
    EmptyIndex(IndexKind),
}

pub type QueryResult<T> = Result<T, QueryError>;
