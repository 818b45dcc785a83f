//! Live layout state of one table instance.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::reconcile::{default_width, effective_columns, reconcile, resolve_schema};
use super::{DefaultWidth, LayoutConfig, LayoutRepository, TableLayoutSettings};
use crate::error::SettingsError;
use crate::layout::{ColumnWidths, compute_widths};
use crate::schema::{EffectiveColumn, TableSchema};

/// Optimistic layout state with debounced write-back.
///
/// Every mutation changes local state immediately and schedules a save.
/// A mutation inside the debounce window replaces the pending save, so a
/// burst of edits is written once with the state at the time the timer
/// fires. Save failures are logged and dropped; local state stays
/// authoritative for the session.
///
/// Mutations return `false` and do nothing when layout editing is not
/// permitted, the key is unknown, the value is invalid, or nothing would
/// change.
///
/// # Example
///
/// ```ignore
/// let store = LayoutStore::load(repository, schema, "programs", true, LayoutConfig::default()).await;
/// store.update_width("name", 260.0);
/// store.flush().await?;
/// ```
pub struct LayoutStore {
    table_identifier: String,
    schema: TableSchema,
    defaults: HashMap<String, DefaultWidth>,
    can_edit: bool,
    config: LayoutConfig,
    repository: Arc<dyn LayoutRepository>,
    runtime: Handle,
    state: Arc<RwLock<TableLayoutSettings>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl LayoutStore {
    /// Load and reconcile the saved layout for `table_identifier`.
    ///
    /// Must be called from within a tokio runtime; the runtime is kept for
    /// scheduling writes. Read failures are logged and treated as if
    /// nothing was saved.
    pub async fn load(
        repository: Arc<dyn LayoutRepository>,
        schema: TableSchema,
        table_identifier: impl Into<String>,
        can_edit: bool,
        config: LayoutConfig,
    ) -> Self {
        let table_identifier = table_identifier.into();

        let defaults = match repository.get_default_widths(&table_identifier).await {
            Ok(defaults) => defaults,
            Err(e) => {
                warn!("failed to read default widths for '{}': {}", table_identifier, e);
                HashMap::new()
            }
        };
        let saved = match repository.get_settings(&table_identifier).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("failed to read layout for '{}': {}", table_identifier, e);
                None
            }
        };

        let schema = resolve_schema(&schema, &defaults);
        let settings = reconcile(&schema, &table_identifier, saved.as_ref(), &defaults);
        debug!(
            "loaded layout for '{}': {} columns, {} visible, {} custom row heights",
            table_identifier,
            settings.columns.len(),
            settings.visible_count(),
            settings.custom_row_heights.len()
        );

        Self {
            table_identifier,
            schema,
            defaults,
            can_edit,
            config,
            repository,
            runtime: Handle::current(),
            state: Arc::new(RwLock::new(settings)),
            pending: Mutex::new(None),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn table_identifier(&self) -> &str {
        &self.table_identifier
    }

    /// The schema with backend bounds applied.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn can_edit_layout(&self) -> bool {
        self.can_edit
    }

    /// Snapshot of the current layout record.
    pub fn settings(&self) -> TableLayoutSettings {
        self.read().clone()
    }

    pub fn column_order(&self) -> Vec<String> {
        self.read().order()
    }

    /// All columns in display order, hidden ones included.
    pub fn effective_columns(&self) -> Vec<EffectiveColumn> {
        effective_columns(&self.schema, &self.read(), &self.defaults)
    }

    pub fn visible_columns(&self) -> Vec<EffectiveColumn> {
        self.effective_columns()
            .into_iter()
            .filter(|c| c.is_visible)
            .collect()
    }

    /// Widths of the visible columns for a container.
    pub fn widths(&self, container_width: f64) -> ColumnWidths {
        compute_widths(&self.visible_columns(), container_width, &self.config.chrome)
    }

    pub fn custom_row_height(&self, row_id: &str) -> Option<f64> {
        self.read().custom_row_heights.get(row_id).copied()
    }

    /// Stored height of a row, or the configured default.
    pub fn row_height(&self, row_id: &str) -> f64 {
        self.custom_row_height(row_id)
            .unwrap_or(self.config.default_row_height)
    }

    /// Whether a write is scheduled and has not run yet.
    pub fn has_pending_write(&self) -> bool {
        self.pending
            .lock()
            .map(|p| p.as_ref().is_some_and(|task| !task.is_finished()))
            .unwrap_or(false)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn toggle_visibility(&self, key: &str) -> bool {
        let visible = match self.read().column(key) {
            Some(column) => column.is_visible,
            None => return false,
        };
        self.set_visibility(key, !visible)
    }

    /// Show or hide a column. Hiding the last visible column is refused.
    pub fn set_visibility(&self, key: &str, visible: bool) -> bool {
        self.mutate("set_visibility", |settings| {
            let visible_count = settings.visible_count();
            let Some(column) = settings.columns.iter_mut().find(|c| c.field_key == key) else {
                return false;
            };
            if column.is_visible == visible {
                return false;
            }
            if !visible && visible_count <= 1 {
                debug!("refusing to hide '{}': it is the last visible column", key);
                return false;
            }
            column.is_visible = visible;
            true
        })
    }

    /// Replace the column order. `order` must hold every schema key once.
    pub fn reorder(&self, order: &[String]) -> bool {
        if !self.schema.is_permutation(order) {
            debug!("rejecting reorder of '{}': not a permutation of the schema", self.table_identifier);
            return false;
        }
        self.mutate("reorder", |settings| {
            if settings.order() == order {
                return false;
            }
            let mut columns = std::mem::take(&mut settings.columns);
            settings.columns = order
                .iter()
                .filter_map(|key| {
                    let position = columns.iter().position(|c| &c.field_key == key)?;
                    Some(columns.swap_remove(position))
                })
                .collect();
            true
        })
    }

    /// Set a column width, clamped to the column's bounds.
    pub fn update_width(&self, key: &str, width: f64) -> bool {
        let Some(definition) = self.schema.column(key) else {
            return false;
        };
        if !width.is_finite() || width <= 0.0 {
            return false;
        }
        let width = definition.clamp_width(width);
        self.mutate("update_width", |settings| {
            let Some(column) = settings.columns.iter_mut().find(|c| c.field_key == key) else {
                return false;
            };
            if column.width == Some(width) {
                return false;
            }
            column.width = Some(width);
            true
        })
    }

    /// Set a row height, raised to the configured minimum.
    pub fn update_row_height(&self, row_id: &str, height: f64) -> bool {
        if !height.is_finite() {
            return false;
        }
        let height = height.max(self.config.min_row_height);
        self.mutate("update_row_height", |settings| {
            let previous = settings.custom_row_heights.insert(row_id.to_string(), height);
            previous != Some(height)
        })
    }

    /// Drop a row's custom height so it falls back to the default.
    pub fn reset_row_height(&self, row_id: &str) -> bool {
        self.mutate("reset_row_height", |settings| {
            settings.custom_row_heights.remove(row_id).is_some()
        })
    }

    /// Restore declaration order, default widths and full visibility.
    pub fn reset(&self) -> bool {
        let seeded = reconcile(&self.schema, &self.table_identifier, None, &self.defaults);
        self.mutate("reset", |settings| {
            if settings.columns == seeded.columns {
                return false;
            }
            settings.columns = seeded.columns;
            true
        })
    }

    /// Default width of a column, ignoring any user choice.
    pub fn default_width(&self, key: &str) -> Option<f64> {
        self.schema
            .column(key)
            .map(|def| default_width(def, &self.defaults))
    }

    // =========================================================================
    // Write-back
    // =========================================================================

    /// Cancel the pending write, if any, and save immediately.
    pub async fn flush(&self) -> Result<(), SettingsError> {
        let pending = self.pending.lock().ok().and_then(|mut p| p.take());
        let Some(task) = pending else {
            return Ok(());
        };
        if task.is_finished() {
            return Ok(());
        }
        task.abort();

        let snapshot = self.settings();
        debug!("flushing layout for '{}'", self.table_identifier);
        self.repository
            .save_settings(&self.table_identifier, &snapshot)
            .await
    }

    fn mutate(&self, action: &str, apply: impl FnOnce(&mut TableLayoutSettings) -> bool) -> bool {
        if !self.can_edit {
            debug!("{} ignored on '{}': layout editing not permitted", action, self.table_identifier);
            return false;
        }
        let applied = apply(&mut self.write());
        if applied {
            self.schedule_write();
        }
        applied
    }

    fn schedule_write(&self) {
        let repository = self.repository.clone();
        let state = self.state.clone();
        let table_identifier = self.table_identifier.clone();
        let delay = self.config.debounce;

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let snapshot = state.read().unwrap_or_else(PoisonError::into_inner).clone();
            match repository.save_settings(&table_identifier, &snapshot).await {
                Ok(()) => debug!("saved layout for '{}'", table_identifier),
                Err(e) => warn!("failed to save layout for '{}': {}", table_identifier, e),
            }
        });

        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.replace(task)
        {
            previous.abort();
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TableLayoutSettings> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableLayoutSettings> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDefinition;
    use crate::settings::{KvLayoutRepository, MemoryBackend};

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnDefinition::new("name", "Program").base_width(200.0),
            ColumnDefinition::new("owner", "Owner").base_width(120.0),
            ColumnDefinition::new("notes", "Notes").max_width(400.0),
        ])
        .unwrap()
    }

    async fn store(can_edit: bool) -> LayoutStore {
        let repository = Arc::new(KvLayoutRepository::new(MemoryBackend::new(), "u"));
        LayoutStore::load(repository, schema(), "programs", can_edit, LayoutConfig::default()).await
    }

    fn keys(order: &[&str]) -> Vec<String> {
        order.iter().map(|k| k.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_visible_column_stays() {
        let store = store(true).await;

        assert!(store.toggle_visibility("name"));
        assert!(store.toggle_visibility("owner"));
        assert!(!store.toggle_visibility("notes"));
        assert!(!store.set_visibility("notes", false));

        assert_eq!(store.visible_columns().len(), 1);
        assert!(store.toggle_visibility("name"));
        assert_eq!(store.visible_columns().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reorder_requires_permutation() {
        let store = store(true).await;

        assert!(!store.reorder(&keys(&["notes", "name"])));
        assert!(!store.reorder(&keys(&["notes", "name", "owner", "ghost"])));
        assert!(!store.reorder(&keys(&["name", "owner", "notes"])));
        assert!(store.reorder(&keys(&["notes", "name", "owner"])));

        assert_eq!(store.column_order(), keys(&["notes", "name", "owner"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_width_is_clamped() {
        let store = store(true).await;

        assert!(store.update_width("notes", 900.0));
        assert!(store.update_width("owner", 10.0));
        assert!(!store.update_width("ghost", 100.0));
        assert!(!store.update_width("name", f64::NAN));
        assert!(!store.update_width("name", -5.0));

        let settings = store.settings();
        assert_eq!(settings.column("notes").unwrap().width, Some(400.0));
        assert_eq!(settings.column("owner").unwrap().width, Some(80.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_row_height_floor_and_default() {
        let store = store(true).await;

        assert_eq!(store.row_height("r1"), 42.0);
        assert!(store.update_row_height("r1", 5.0));
        assert_eq!(store.row_height("r1"), 24.0);
        assert!(store.reset_row_height("r1"));
        assert_eq!(store.custom_row_height("r1"), None);
        assert!(!store.update_row_height("r1", f64::INFINITY));
    }

    #[tokio::test(start_paused = true)]
    async fn test_readonly_store_refuses_everything() {
        let store = store(false).await;
        let before = store.settings();

        assert!(!store.toggle_visibility("name"));
        assert!(!store.reorder(&keys(&["notes", "name", "owner"])));
        assert!(!store.update_width("name", 300.0));
        assert!(!store.update_row_height("r1", 80.0));
        assert!(!store.reset());

        assert_eq!(store.settings(), before);
        assert!(!store.has_pending_write());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_seeded_layout() {
        let store = store(true).await;
        let seeded = store.settings();

        store.update_width("name", 300.0);
        store.toggle_visibility("owner");
        store.update_row_height("r1", 90.0);
        assert!(store.reset());

        let settings = store.settings();
        assert_eq!(settings.columns, seeded.columns);
        assert_eq!(settings.custom_row_heights.get("r1"), Some(&90.0));
        assert!(!store.reset());
    }
}
