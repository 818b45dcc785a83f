//! Typed record getter errors

/// Error returned by the typed getters on [`Record`](crate::model::Record).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The record has no value for the field.
    #[error("record '{record}' has no field '{field}'")]
    Missing { record: String, field: String },

    /// The field holds a value of another type.
    #[error("record '{record}' field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        record: String,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(record: &str, field: &str) -> Self {
        Self::Missing {
            record: record.to_string(),
            field: field.to_string(),
        }
    }

    pub fn type_mismatch(
        record: &str,
        field: &str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            record: record.to_string(),
            field: field.to_string(),
            expected,
            actual,
        }
    }

    /// The field name this error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field, .. } | Self::TypeMismatch { field, .. } => field,
        }
    }
}
