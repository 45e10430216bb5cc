//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Coarse classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments or an editor called without a built tree.
    Configuration,
    /// Malformed markup found while building.
    Structure,
    /// A requested table row does not exist or has no cells.
    NotFound,
    /// The line source failed.
    Io,
}

/// Domain errors represent violations of the markup grammar or of an
/// editor's preconditions. Editors return them before touching the tree.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("argument `{0}` must not be empty")]
    EmptyArgument(&'static str),

    #[error("word must be a single token without whitespace: {0:?}")]
    InvalidWord(String),

    #[error("row index must be 1 or greater, got {0}")]
    InvalidRowIndex(usize),

    #[error("tag `{tag}` is not supported by {operation}")]
    UnsupportedTag { operation: &'static str, tag: String },

    #[error("document has not been built")]
    TreeNotBuilt,

    #[error("document source already consumed")]
    SourceConsumed,

    #[error("document is empty")]
    EmptyDocument,

    #[error("line {line}: expected an opening tag for the document root, found {found:?}")]
    MissingRootTag { line: usize, found: String },

    #[error("line {line}: closing tag </{found}> does not match open element <{expected}>")]
    MismatchedClose {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: closing tag </{tag}> without an open element")]
    UnexpectedClose { line: usize, tag: String },

    #[error("line {line}: content after the document root was closed")]
    TrailingContent { line: usize },

    #[error("line {line}: element <{tag}> has no children")]
    EmptyElement { line: usize, tag: String },

    #[error("element <{tag}> is never closed")]
    UnclosedElement { tag: String },

    #[error("table has {rows} row(s), row {row} requested")]
    RowNotFound { row: usize, rows: usize },

    #[error("row {row} has no cells")]
    EmptyRow { row: usize },

    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::EmptyArgument(_)
            | DomainError::InvalidWord(_)
            | DomainError::InvalidRowIndex(_)
            | DomainError::UnsupportedTag { .. }
            | DomainError::TreeNotBuilt
            | DomainError::SourceConsumed => ErrorKind::Configuration,
            DomainError::EmptyDocument
            | DomainError::MissingRootTag { .. }
            | DomainError::MismatchedClose { .. }
            | DomainError::UnexpectedClose { .. }
            | DomainError::TrailingContent { .. }
            | DomainError::EmptyElement { .. }
            | DomainError::UnclosedElement { .. } => ErrorKind::Structure,
            DomainError::RowNotFound { .. } | DomainError::EmptyRow { .. } => ErrorKind::NotFound,
            DomainError::Read { .. } => ErrorKind::Io,
        }
    }
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Rejects empty tag or word arguments.
pub(crate) fn require_non_empty(name: &'static str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::EmptyArgument(name));
    }
    Ok(())
}
