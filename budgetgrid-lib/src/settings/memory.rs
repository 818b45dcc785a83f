//! In-memory settings backend using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::SettingsBackend;
use crate::error::SettingsError;

/// A settings backend that lives only as long as the process.
///
/// Used for tests and for sessions without a settings database.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.store.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        let mut keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
