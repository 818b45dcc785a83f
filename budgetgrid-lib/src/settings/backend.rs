//! Raw key-value settings storage.

use async_trait::async_trait;

use crate::error::SettingsError;

/// Byte-level key-value storage behind a layout repository.
///
/// Implementations only move bytes; encoding and key naming belong to
/// [`KvLayoutRepository`](super::KvLayoutRepository).
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Insert or replace the value for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    async fn delete(&self, key: &str) -> Result<(), SettingsError>;

    /// All keys starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError>;
}
