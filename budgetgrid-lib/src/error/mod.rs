//! Error types

mod field;
mod schema;
mod settings;

pub use field::*;
pub use schema::*;
pub use settings::*;

/// Crate-level error wrapping the per-concern error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
