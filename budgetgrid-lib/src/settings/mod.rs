//! Per-user, per-table layout persistence.
//!
//! A [`LayoutStore`] holds the live layout of one table instance. It loads a
//! [`TableLayoutSettings`] record through an injected [`LayoutRepository`],
//! reconciles it against the current schema, applies mutations locally and
//! mirrors them back with a debounced write.

mod backend;
mod config;
mod memory;
mod reconcile;
mod repository;
mod sqlite;
mod store;

pub use backend::SettingsBackend;
pub use config::LayoutConfig;
pub use memory::MemoryBackend;
pub use reconcile::{effective_columns, reconcile, resolve_schema};
pub use repository::KvLayoutRepository;
pub use sqlite::SqliteBackend;
pub use store::LayoutStore;

use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::error::SettingsError;

/// Persisted layout of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub field_key: String,
    /// `None` when absent or not a usable width.
    #[serde(default, deserialize_with = "positive_number")]
    pub width: Option<f64>,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
}

impl ColumnLayout {
    pub fn new(field_key: impl Into<String>, width: f64, is_visible: bool) -> Self {
        Self {
            field_key: field_key.into(),
            width: Some(width),
            is_visible,
        }
    }
}

/// The persisted layout record of one (user, table kind).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayoutSettings {
    pub table_identifier: String,
    /// Display order, with width and visibility per column.
    #[serde(default)]
    pub columns: Vec<ColumnLayout>,
    #[serde(default, deserialize_with = "positive_number_map")]
    pub custom_row_heights: BTreeMap<String, f64>,
}

impl TableLayoutSettings {
    pub fn new(table_identifier: impl Into<String>) -> Self {
        Self {
            table_identifier: table_identifier.into(),
            ..Default::default()
        }
    }

    pub fn column(&self, key: &str) -> Option<&ColumnLayout> {
        self.columns.iter().find(|c| c.field_key == key)
    }

    pub fn order(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.field_key.clone()).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_visible).count()
    }
}

/// Backend-level default width and bounds for a column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultWidth {
    #[serde(default, deserialize_with = "positive_number")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "positive_number")]
    pub min_width: Option<f64>,
    #[serde(default, deserialize_with = "positive_number")]
    pub max_width: Option<f64>,
}

impl DefaultWidth {
    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }
}

/// The persistence boundary a [`LayoutStore`] talks to.
#[async_trait]
pub trait LayoutRepository: Send + Sync {
    /// The saved layout for a table, if one exists.
    async fn get_settings(
        &self,
        table_identifier: &str,
    ) -> Result<Option<TableLayoutSettings>, SettingsError>;

    async fn save_settings(
        &self,
        table_identifier: &str,
        settings: &TableLayoutSettings,
    ) -> Result<(), SettingsError>;

    /// Fallback widths for first-run and schema-drift cases.
    async fn get_default_widths(
        &self,
        _table_identifier: &str,
    ) -> Result<HashMap<String, DefaultWidth>, SettingsError> {
        Ok(HashMap::new())
    }
}

// =============================================================================
// Lenient number decoding
//
// Layout records may be written by other clients. Zero, negative,
// non-finite and non-numeric values decode as absent.
// =============================================================================

fn visible_by_default() -> bool {
    true
}

fn usable(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite() && *n > 0.0)
}

fn positive_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(usable(&value))
}

fn positive_number_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| usable(&v).map(|n| (k, n)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_widths_decode_as_absent() {
        let json = r#"{
            "tableIdentifier": "programs",
            "columns": [
                {"fieldKey": "a", "width": 0, "isVisible": true},
                {"fieldKey": "b", "width": -20, "isVisible": false},
                {"fieldKey": "c", "width": "wide"},
                {"fieldKey": "d", "width": null},
                {"fieldKey": "e", "width": 140.5}
            ],
            "customRowHeights": {"r1": 60, "r2": "tall", "r3": 0}
        }"#;

        let settings: TableLayoutSettings = serde_json::from_str(json).unwrap();

        let widths: Vec<Option<f64>> = settings.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![None, None, None, None, Some(140.5)]);
        assert!(settings.column("c").unwrap().is_visible);
        assert!(!settings.column("b").unwrap().is_visible);
        assert_eq!(settings.custom_row_heights.len(), 1);
        assert_eq!(settings.custom_row_heights.get("r1"), Some(&60.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut settings = TableLayoutSettings::new("programs");
        settings.columns.push(ColumnLayout::new("name", 200.0, true));
        settings.custom_row_heights.insert("p1".into(), 82.0);

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"tableIdentifier\":\"programs\""));
        assert!(json.contains("\"fieldKey\":\"name\""));
        assert!(json.contains("\"isVisible\":true"));
        assert!(json.contains("\"customRowHeights\":{\"p1\":82.0}"));
    }
}
