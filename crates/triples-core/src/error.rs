//! Error types for the fragment model.

use crate::field::{Field, FieldKind};

/// Errors raised while building fragments and field sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A value of the wrong kind was supplied for a field.
    #[error("field '{field}' expects a {expected} value, got {actual}")]
    KindMismatch {
        field: Field,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// A key that is not part of the schema.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A field that a variant declaration may not override.
    #[error("field '{field}' cannot be overridden by variant '{variant}'")]
    NotVariantField { variant: String, field: Field },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mismatch_names_the_field() {
        let err = CoreError::KindMismatch {
            field: Field::Int,
            expected: FieldKind::Width,
            actual: FieldKind::Text,
        };
        let msg = err.to_string();
        assert!(msg.contains("'int'"));
        assert!(msg.contains("width"));
    }
}
