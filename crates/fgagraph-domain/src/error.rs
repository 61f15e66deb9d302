//! Domain error types for model graph operations.

use thiserror::Error;

/// Domain-specific errors for building, analyzing and rendering model graphs.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Error parsing an authorization model (DSL or JSON).
    #[error("model parse error: {message}")]
    ModelParseError { message: String },

    /// Error validating an authorization model.
    #[error("model validation error: {message}")]
    ModelValidationError { message: String },

    /// A rewrite references a type or relation the type system cannot resolve.
    #[error("cannot resolve relation '{relation}' on type '{type_name}'")]
    ModelLookupError { type_name: String, relation: String },

    /// A rewrite carries a variant tag outside the supported set.
    #[error("unsupported rewrite variant '{variant}' in {type_name}#{relation}")]
    UnsupportedRewriteVariant {
        type_name: String,
        relation: String,
        variant: String,
    },

    /// Error serializing the graph to its text form.
    #[error("render error: {message}")]
    RenderError { message: String },
}

impl From<std::fmt::Error> for DomainError {
    fn from(err: std::fmt::Error) -> Self {
        DomainError::RenderError {
            message: err.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
