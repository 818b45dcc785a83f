//! Settings persistence errors

/// Error raised by settings backends and repositories.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),

    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),

    /// A backend rejected the operation for its own reasons.
    #[error("backend error: {0}")]
    Backend(String),
}

impl SettingsError {
    /// Creates a backend error from any message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
