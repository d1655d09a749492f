//! Marshaling error types

use thiserror::Error;

/// Errors that abort a marshal call.
///
/// Every variant is terminal: the enclosing call returns it as its sole
/// result and produces no document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// A field annotation does not follow the `role,argument` grammar.
    #[error("malformed annotation on {type_name}.{field}: {reason}")]
    MalformedAnnotation {
        /// Type declaring the field.
        type_name: String,
        /// Source path of the field.
        field: String,
        /// What is wrong with the annotation.
        reason: String,
    },

    /// A reachable type has no primary field after merging compositions.
    #[error("missing primary field: {type_name} declares no `primary` annotation")]
    MissingPrimary {
        /// Type without a primary field.
        type_name: String,
    },

    /// A field value cannot be represented under its declared role.
    #[error("unsupported field type on {type_name}.{field}: {reason}")]
    UnsupportedFieldType {
        /// Type declaring the field.
        type_name: String,
        /// Source path of the field.
        field: String,
        /// Why the value cannot be represented.
        reason: String,
    },
}

impl MarshalError {
    /// Creates a malformed annotation error.
    pub fn malformed_annotation(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedAnnotation {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing primary error.
    pub fn missing_primary(type_name: impl Into<String>) -> Self {
        Self::MissingPrimary {
            type_name: type_name.into(),
        }
    }

    /// Creates an unsupported field type error.
    pub fn unsupported_field_type(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFieldType {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for marshaling operations.
pub type MarshalResult<T> = Result<T, MarshalError>;
