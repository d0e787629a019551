use thiserror::Error;

use crate::field::SemanticType;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: SemanticType,
        actual: String,
    },
    #[error("expected {expected} field values, got {actual}")]
    Arity { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
