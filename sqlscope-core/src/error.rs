//! Error types for sqlscope
//!
//! Rendering failures are raised as [`ParseError`] by the node that detects
//! them and travel up the tree unchanged. The query boundary folds them into
//! the single public [`Error`] type.

use thiserror::Error;

/// Failures raised while rendering expressions, entities and statements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A table or column definition collides with another visible definition
    #[error("`{name}' definition is ambiguous: domain has {count} definitions with that name")]
    AmbiguousDefinition { name: String, count: usize },

    /// A reference matches more than one visible definition
    #[error("`{name}' reference is ambiguous: domain has {count} definitions with that name or alias")]
    AmbiguousReference { name: String, count: usize },

    /// A column reference names a table that is not visible
    #[error("column `{column}': table reference `{table}' is not defined in the domain")]
    UnresolvedTableReference { column: String, table: String },

    /// Deliberately unsupported rendering path
    #[error("{what} is not implemented")]
    NotImplemented { what: String },

    /// A domain key was read before being populated
    #[error("domain key `{key}' not found")]
    KeyNotFound { key: String },

    /// Malformed input detected while assembling a node
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ParseError {
    pub fn ambiguous_definition(name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousDefinition {
            name: name.into(),
            count,
        }
    }

    pub fn ambiguous_reference(name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousReference {
            name: name.into(),
            count,
        }
    }

    pub fn unresolved_table(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::UnresolvedTableReference {
            column: column.into(),
            table: table.into(),
        }
    }

    pub fn not_implemented(what: impl Into<String>) -> Self {
        Self::NotImplemented { what: what.into() }
    }

    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }
}

/// The main error type for sqlscope operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A render-time failure surfaced through a query
    #[error("Query::render() error : {message}")]
    Render { message: String },

    /// Malformed input to a construction call
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Convenience Result type for sqlscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type used inside the render tree
pub type ParseResult<T> = std::result::Result<T, ParseError>;

impl Error {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidArgument { message } => Self::InvalidArgument { message },
            other => Self::Render {
                message: other.to_string(),
            },
        }
    }
}
