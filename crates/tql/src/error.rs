//! Error types for tql

use thiserror::Error;

/// Result type alias for tql operations
pub type TqlResult<T> = Result<T, TqlError>;

/// Everything that can go wrong while parsing a template or building a query.
///
/// None of these are transient: a failed build means the template or the
/// values handed to it are malformed, and the whole attempt must be discarded.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TqlError {
    /// The skeleton and the interpolated values do not line up.
    #[error("untemplated SQL call: {segments} segment(s) cannot surround {args} value(s)")]
    UntemplatedCall { segments: usize, args: usize },

    /// A `Query` was interpolated into another query or fragment.
    #[error("illegal query recursion: a query cannot be nested inside a query or fragment")]
    IllegalQueryRecursion,

    /// Something that is not a node ended up in a node sequence.
    #[error("illegal node type in build: {found}")]
    IllegalNodeType { found: String },

    /// Records passed to a Values node do not share the same columns.
    #[error(
        "values records mismatch: record {row} has columns {found:?}, expected {expected:?}"
    )]
    ValuesRecordsMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A Values or Set node with nothing to render.
    #[error("{clause} requires at least one column")]
    EmptyRecords { clause: &'static str },

    /// A value could not be converted into the shape a node needs.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TqlError {
    /// Create an illegal node type error
    pub fn illegal_node(found: impl Into<String>) -> Self {
        Self::IllegalNodeType {
            found: found.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UntemplatedCall { .. } => "untemplated_sql_call",
            Self::IllegalQueryRecursion => "illegal_query_recursion",
            Self::IllegalNodeType { .. } => "illegal_node_type_in_build",
            Self::ValuesRecordsMismatch { .. } => "values_records_mismatch",
            Self::EmptyRecords { .. } => "empty_records",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Check if this is an untemplated call error
    pub fn is_untemplated_call(&self) -> bool {
        matches!(self, Self::UntemplatedCall { .. })
    }

    /// Check if this is an illegal query recursion error
    pub fn is_query_recursion(&self) -> bool {
        matches!(self, Self::IllegalQueryRecursion)
    }

    /// Check if this is an illegal node type error
    pub fn is_illegal_node(&self) -> bool {
        matches!(self, Self::IllegalNodeType { .. })
    }

    /// Check if this is a values records mismatch error
    pub fn is_records_mismatch(&self) -> bool {
        matches!(self, Self::ValuesRecordsMismatch { .. })
    }
}

impl From<serde_json::Error> for TqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
