//! Layout repository over a key-value settings backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DefaultWidth, LayoutRepository, SettingsBackend, TableLayoutSettings};
use crate::error::SettingsError;

/// Stores layout records as JSON under an explicit key namespace.
///
/// User layouts live under `"{namespace}/layout/{table}"`, so one backend can
/// hold the layouts of many users. Default widths are shared by every
/// namespace on the backend and live under `"defaults/{table}"`.
///
/// # Example
///
/// ```
/// use budgetgrid_lib::settings::{KvLayoutRepository, MemoryBackend};
///
/// let repository = KvLayoutRepository::new(MemoryBackend::new(), "user:7");
/// assert_eq!(repository.layout_key("programs"), "user:7/layout/programs");
/// assert_eq!(repository.defaults_key("programs"), "defaults/programs");
/// ```
#[derive(Clone)]
pub struct KvLayoutRepository {
    backend: Arc<dyn SettingsBackend>,
    namespace: String,
}

impl KvLayoutRepository {
    pub fn new(backend: impl SettingsBackend + 'static, namespace: impl Into<String>) -> Self {
        Self::shared(Arc::new(backend), namespace)
    }

    /// Use a backend shared with other repositories.
    pub fn shared(backend: Arc<dyn SettingsBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn layout_key(&self, table_identifier: &str) -> String {
        format!("{}/layout/{}", self.namespace, table_identifier)
    }

    pub fn defaults_key(&self, table_identifier: &str) -> String {
        format!("defaults/{}", table_identifier)
    }

    /// Store default widths for a table (administrative seeding). They apply
    /// to every user of the backend.
    pub async fn set_default_widths(
        &self,
        table_identifier: &str,
        defaults: &HashMap<String, DefaultWidth>,
    ) -> Result<(), SettingsError> {
        let bytes = serde_json::to_vec(defaults).map_err(SettingsError::Serialization)?;
        self.backend
            .set_bytes(&self.defaults_key(table_identifier), bytes)
            .await
    }

    /// Table identifiers that have a saved layout in this namespace.
    pub async fn saved_tables(&self) -> Result<Vec<String>, SettingsError> {
        let prefix = format!("{}/layout/", self.namespace);
        Ok(self
            .backend
            .keys_with_prefix(&prefix)
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    /// Forget a saved layout so the next load seeds from the schema.
    pub async fn reset(&self, table_identifier: &str) -> Result<(), SettingsError> {
        self.backend.delete(&self.layout_key(table_identifier)).await
    }
}

#[async_trait]
impl LayoutRepository for KvLayoutRepository {
    async fn get_settings(
        &self,
        table_identifier: &str,
    ) -> Result<Option<TableLayoutSettings>, SettingsError> {
        match self.backend.get_bytes(&self.layout_key(table_identifier)).await? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(SettingsError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    async fn save_settings(
        &self,
        table_identifier: &str,
        settings: &TableLayoutSettings,
    ) -> Result<(), SettingsError> {
        let bytes = serde_json::to_vec(settings).map_err(SettingsError::Serialization)?;
        self.backend
            .set_bytes(&self.layout_key(table_identifier), bytes)
            .await
    }

    async fn get_default_widths(
        &self,
        table_identifier: &str,
    ) -> Result<HashMap<String, DefaultWidth>, SettingsError> {
        match self
            .backend
            .get_bytes(&self.defaults_key(table_identifier))
            .await?
        {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(SettingsError::Deserialization),
            None => Ok(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ColumnLayout, MemoryBackend};

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let backend: Arc<dyn SettingsBackend> = Arc::new(MemoryBackend::new());
        let alice = KvLayoutRepository::shared(backend.clone(), "user:alice");
        let bob = KvLayoutRepository::shared(backend, "user:bob");

        let mut settings = TableLayoutSettings::new("programs");
        settings.columns.push(ColumnLayout::new("name", 210.0, true));
        alice.save_settings("programs", &settings).await.unwrap();

        assert_eq!(alice.get_settings("programs").await.unwrap(), Some(settings));
        assert_eq!(bob.get_settings("programs").await.unwrap(), None);
        assert_eq!(alice.saved_tables().await.unwrap(), vec!["programs".to_string()]);
        assert!(bob.saved_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_widths_roundtrip() {
        let repository = KvLayoutRepository::new(MemoryBackend::new(), "admin");
        assert!(repository.get_default_widths("programs").await.unwrap().is_empty());

        let mut defaults = HashMap::new();
        defaults.insert("name".to_string(), DefaultWidth::width(240.0));
        repository.set_default_widths("programs", &defaults).await.unwrap();

        assert_eq!(repository.get_default_widths("programs").await.unwrap(), defaults);
    }

    #[tokio::test]
    async fn test_default_widths_are_shared_by_all_users() {
        let backend: Arc<dyn SettingsBackend> = Arc::new(MemoryBackend::new());
        let admin = KvLayoutRepository::shared(backend.clone(), "admin");
        let alice = KvLayoutRepository::shared(backend.clone(), "user:alice");
        let bob = KvLayoutRepository::shared(backend, "user:bob");

        let mut defaults = HashMap::new();
        defaults.insert("name".to_string(), DefaultWidth::width(240.0));
        admin.set_default_widths("programs", &defaults).await.unwrap();

        assert_eq!(alice.get_default_widths("programs").await.unwrap(), defaults);
        assert_eq!(bob.get_default_widths("programs").await.unwrap(), defaults);
        assert!(alice.get_default_widths("budgets").await.unwrap().is_empty());
        assert!(alice.saved_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_forgets_layout() {
        let repository = KvLayoutRepository::new(MemoryBackend::new(), "u");
        repository
            .save_settings("programs", &TableLayoutSettings::new("programs"))
            .await
            .unwrap();

        repository.reset("programs").await.unwrap();

        assert_eq!(repository.get_settings("programs").await.unwrap(), None);
    }
}
