use miette::Diagnostic;
use thiserror::Error;

/// Result type for rewrite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing, traversing or rewriting a syntax tree
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(jsrewrite::io_error))]
    Io(String),

    /// The requested edit is not allowed in the path's current state.
    /// Raised before the tree is touched.
    #[error("Invalid operation: {message}")]
    #[diagnostic(code(jsrewrite::invalid_operation))]
    InvalidOperation { message: String },

    #[error("{message}")]
    #[diagnostic(code(jsrewrite::parse_error))]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A replacement list contains a node that cannot be placed in the target container
    #[error("Node list verification failed{}: {message}", .index.map(|i| format!(" at index {}", i)).unwrap_or_default())]
    #[diagnostic(code(jsrewrite::verification_error))]
    Verification {
        index: Option<usize>,
        message: String,
    },

    #[error("Duplicate declaration \"{name}\"")]
    #[diagnostic(code(jsrewrite::duplicate_declaration))]
    DuplicateDeclaration { name: String },

    #[error("Unsupported syntax: {message}")]
    #[diagnostic(code(jsrewrite::unsupported))]
    Unsupported { message: String },

    #[error("{node} has no field named `{field}`")]
    #[diagnostic(code(jsrewrite::unknown_field))]
    UnknownField { field: String, node: String },

    #[error("Code generation failed: {message}")]
    #[diagnostic(code(jsrewrite::codegen_error))]
    Codegen { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(jsrewrite::internal_error))]
    Internal { message: String },
}

impl Error {
    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create a verification error for the node at `index`
    pub fn verification(index: Option<usize>, message: impl Into<String>) -> Self {
        Error::Verification {
            index,
            message: message.into(),
        }
    }

    /// Create an unsupported syntax error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
