//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use budgetgrid_lib::error::SettingsError;
use budgetgrid_lib::model::{Money, Record};
use budgetgrid_lib::schema::{ColumnDefinition, ColumnType, TableSchema};
use budgetgrid_lib::settings::{DefaultWidth, LayoutConfig, LayoutRepository, LayoutStore, TableLayoutSettings};

/// Repository that keeps every save for inspection.
#[derive(Default)]
pub struct RecordingRepository {
    pub stored: Mutex<Option<TableLayoutSettings>>,
    pub saves: Mutex<Vec<TableLayoutSettings>>,
    pub defaults: HashMap<String, DefaultWidth>,
    pub fail_saves: AtomicBool,
    pub fail_reads: bool,
}

impl RecordingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_saved(settings: TableLayoutSettings) -> Arc<Self> {
        Arc::new(Self {
            stored: Mutex::new(Some(settings)),
            ..Default::default()
        })
    }

    pub fn failing_reads() -> Arc<Self> {
        Arc::new(Self {
            fail_reads: true,
            ..Default::default()
        })
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_save(&self) -> Option<TableLayoutSettings> {
        self.saves.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LayoutRepository for RecordingRepository {
    async fn get_settings(
        &self,
        _table_identifier: &str,
    ) -> Result<Option<TableLayoutSettings>, SettingsError> {
        if self.fail_reads {
            return Err(SettingsError::backend("settings service unavailable"));
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save_settings(
        &self,
        _table_identifier: &str,
        settings: &TableLayoutSettings,
    ) -> Result<(), SettingsError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SettingsError::backend("settings service unavailable"));
        }
        *self.stored.lock().unwrap() = Some(settings.clone());
        self.saves.lock().unwrap().push(settings.clone());
        Ok(())
    }

    async fn get_default_widths(
        &self,
        _table_identifier: &str,
    ) -> Result<HashMap<String, DefaultWidth>, SettingsError> {
        if self.fail_reads {
            return Err(SettingsError::backend("settings service unavailable"));
        }
        Ok(self.defaults.clone())
    }
}

pub fn programs_schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnDefinition::new("name", "Program").base_width(200.0).flex(2.0),
        ColumnDefinition::new("owner", "Owner").base_width(120.0),
        ColumnDefinition::new("allocated", "Allocated")
            .kind(ColumnType::Currency)
            .base_width(140.0),
        ColumnDefinition::new("status", "Status")
            .kind(ColumnType::Status)
            .base_width(100.0),
    ])
    .unwrap()
}

pub fn programs() -> Vec<Record> {
    vec![
        Record::new("p1")
            .set("name", "Rural roads")
            .set("owner", "Ada")
            .set("allocated", Money::from_units(1_500_000))
            .set("status", "Approved"),
        Record::new("p2")
            .set("name", "School meals")
            .set("owner", "")
            .set("allocated", Money::from_units(250_000))
            .set("status", "Pending"),
        Record::new("p3")
            .set("name", "Flood defences")
            .set("allocated", Money::from_units(-20_000))
            .set("status", "Overdue"),
    ]
}

pub async fn load_store(repository: Arc<RecordingRepository>, can_edit: bool) -> Arc<LayoutStore> {
    Arc::new(
        LayoutStore::load(
            repository,
            programs_schema(),
            "programs",
            can_edit,
            LayoutConfig::default(),
        )
        .await,
    )
}

pub fn keys(order: &[&str]) -> Vec<String> {
    order.iter().map(|k| k.to_string()).collect()
}
