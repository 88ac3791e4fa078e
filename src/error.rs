//! Error types for relq.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelqError {
    /// An AST node, operator or method the compiler cannot translate.
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// UPDATE or DELETE compiled without a WHERE clause.
    #[error("{statement} requires a WHERE clause")]
    MissingPredicate { statement: &'static str },

    /// A value could not be converted to the target field's type.
    #[error("Cannot convert {value} to {target} for field '{field}'")]
    ConversionError {
        field: String,
        value: String,
        target: &'static str,
    },

    /// Metadata resolution was requested for a type with no mapped fields.
    #[error("Type '{0}' has no mapped fields")]
    UnknownType(String),
}

impl RelqError {
    /// Create an unsupported-expression error naming the offending construct.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedExpression(what.into())
    }

    /// Create a conversion error for a field.
    pub fn conversion(field: impl Into<String>, value: impl Into<String>, target: &'static str) -> Self {
        Self::ConversionError {
            field: field.into(),
            value: value.into(),
            target,
        }
    }
}

/// Result type alias for relq operations.
pub type RelqResult<T> = Result<T, RelqError>;
