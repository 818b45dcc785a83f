//! Column schema declaration errors

/// Error raised while declaring a table schema.
///
/// Schemas are static declarations, so these only surface when a table
/// kind is declared incorrectly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A column was declared with an empty key.
    #[error("column at position {position} has an empty key")]
    EmptyKey { position: usize },

    /// Two columns share the same key.
    #[error("duplicate column key '{key}'")]
    DuplicateKey { key: String },

    /// `min_width` is larger than `max_width`.
    #[error("column '{key}' has min width {min} above max width {max}")]
    InvalidBounds { key: String, min: f64, max: f64 },

    /// Base width is zero, negative or not finite.
    #[error("column '{key}' has invalid base width {width}")]
    InvalidBaseWidth { key: String, width: f64 },

    /// Flex weight is negative or not finite.
    #[error("column '{key}' has invalid flex weight {weight}")]
    InvalidFlex { key: String, weight: f64 },
}
