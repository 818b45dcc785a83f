//! Merging a saved layout with the current schema.
//!
//! The schema may have gained or lost columns since a layout was saved.
//! Saved order survives only when it still names exactly the schema's
//! keys; otherwise declaration order wins so no column can vanish from
//! the table. Widths and visibility are kept per key either way.

use std::collections::BTreeMap;
use std::collections::HashMap;

use log::debug;

use super::{ColumnLayout, DefaultWidth, TableLayoutSettings};
use crate::schema::{ColumnDefinition, EffectiveColumn, TableSchema};

/// Tighten schema bounds with backend defaults where they agree.
pub fn resolve_schema(schema: &TableSchema, defaults: &HashMap<String, DefaultWidth>) -> TableSchema {
    schema.map_columns(|def| match defaults.get(&def.key) {
        Some(default) => tighten(def, default),
        None => def.clone(),
    })
}

fn tighten(def: &ColumnDefinition, default: &DefaultWidth) -> ColumnDefinition {
    let min = match (def.min_width, default.min_width) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };
    let max = match (def.max_width, default.max_width) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return def.clone();
        }
    }

    let mut def = def.clone();
    def.min_width = min;
    def.max_width = max;
    def
}

/// Width a column has when the user never chose one.
pub(crate) fn default_width(def: &ColumnDefinition, defaults: &HashMap<String, DefaultWidth>) -> f64 {
    let width = defaults
        .get(&def.key)
        .and_then(|d| d.width)
        .unwrap_or(def.base_width);
    def.clamp_width(width)
}

/// Reconcile a saved layout (if any) against `schema`.
///
/// The result holds every schema key exactly once, each with a width inside
/// its bounds, and at least one visible column. Reconciling the result again
/// returns it unchanged.
pub fn reconcile(
    schema: &TableSchema,
    table_identifier: &str,
    saved: Option<&TableLayoutSettings>,
    defaults: &HashMap<String, DefaultWidth>,
) -> TableLayoutSettings {
    let custom_row_heights: BTreeMap<String, f64> = saved
        .map(|s| {
            s.custom_row_heights
                .iter()
                .filter(|(_, h)| h.is_finite() && **h > 0.0)
                .map(|(k, h)| (k.clone(), *h))
                .collect()
        })
        .unwrap_or_default();

    let saved_columns = saved
        .map(|s| s.columns.as_slice())
        .filter(|columns| !columns.is_empty());

    let mut columns: Vec<ColumnLayout> = match saved_columns {
        None => {
            debug!("seeding layout for '{}' from schema defaults", table_identifier);
            schema
                .columns()
                .iter()
                .map(|def| ColumnLayout::new(&def.key, default_width(def, defaults), true))
                .collect()
        }
        Some(saved_columns) => {
            let mut by_key: HashMap<&str, &ColumnLayout> = HashMap::new();
            for column in saved_columns {
                by_key.entry(column.field_key.as_str()).or_insert(column);
            }

            let saved_order: Vec<String> =
                saved_columns.iter().map(|c| c.field_key.clone()).collect();
            let order: Vec<&ColumnDefinition> = if schema.is_permutation(&saved_order) {
                saved_order.iter().filter_map(|k| schema.column(k)).collect()
            } else {
                debug!(
                    "layout for '{}' does not match schema ({} saved, {} declared); using declaration order",
                    table_identifier,
                    saved_order.len(),
                    schema.len()
                );
                schema.columns().iter().collect()
            };

            order
                .into_iter()
                .map(|def| {
                    let stored = by_key.get(def.key.as_str());
                    let width = stored
                        .and_then(|c| c.width)
                        .map(|w| def.clamp_width(w))
                        .unwrap_or_else(|| default_width(def, defaults));
                    let visible = stored.is_none_or(|c| c.is_visible);
                    ColumnLayout::new(&def.key, width, visible)
                })
                .collect()
        }
    };

    if !columns.is_empty() && columns.iter().all(|c| !c.is_visible) {
        columns[0].is_visible = true;
    }

    TableLayoutSettings {
        table_identifier: table_identifier.to_string(),
        columns,
        custom_row_heights,
    }
}

/// Effective columns in display order, visible or not.
pub fn effective_columns(
    schema: &TableSchema,
    settings: &TableLayoutSettings,
    defaults: &HashMap<String, DefaultWidth>,
) -> Vec<EffectiveColumn> {
    settings
        .columns
        .iter()
        .filter_map(|layout| {
            let def = schema.column(&layout.field_key)?;
            let default = default_width(def, defaults);
            let width = layout.width.map(|w| def.clamp_width(w)).unwrap_or(default);
            Some(EffectiveColumn {
                definition: def.clone(),
                width,
                is_visible: layout.is_visible,
                user_sized: (width - default).abs() >= 0.5,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnDefinition::new("name", "Program").base_width(200.0),
            ColumnDefinition::new("allocated", "Allocated")
                .kind(ColumnType::Currency)
                .base_width(140.0)
                .max_width(300.0),
            ColumnDefinition::new("status", "Status").kind(ColumnType::Status).base_width(100.0),
        ])
        .unwrap()
    }

    fn saved(columns: Vec<ColumnLayout>) -> TableLayoutSettings {
        TableLayoutSettings {
            table_identifier: "programs".into(),
            columns,
            custom_row_heights: BTreeMap::new(),
        }
    }

    #[test]
    fn test_seeds_from_schema_when_nothing_saved() {
        let mut defaults = HashMap::new();
        defaults.insert("allocated".to_string(), DefaultWidth::width(180.0));

        let settings = reconcile(&schema(), "programs", None, &defaults);

        assert_eq!(settings.order(), vec!["name", "allocated", "status"]);
        assert_eq!(settings.column("name").unwrap().width, Some(200.0));
        assert_eq!(settings.column("allocated").unwrap().width, Some(180.0));
        assert!(settings.columns.iter().all(|c| c.is_visible));
    }

    #[test]
    fn test_empty_saved_list_is_seeded() {
        let empty = saved(vec![]);
        let settings = reconcile(&schema(), "programs", Some(&empty), &HashMap::new());
        assert_eq!(settings.order(), vec!["name", "allocated", "status"]);
    }

    #[test]
    fn test_saved_order_width_and_visibility_kept() {
        let record = saved(vec![
            ColumnLayout::new("status", 120.0, true),
            ColumnLayout::new("name", 260.0, true),
            ColumnLayout::new("allocated", 150.0, false),
        ]);

        let settings = reconcile(&schema(), "programs", Some(&record), &HashMap::new());

        assert_eq!(settings.order(), vec!["status", "name", "allocated"]);
        assert_eq!(settings.column("name").unwrap().width, Some(260.0));
        assert!(!settings.column("allocated").unwrap().is_visible);
    }

    #[test]
    fn test_missing_key_resets_order_but_keeps_values() {
        let record = saved(vec![
            ColumnLayout::new("status", 120.0, false),
            ColumnLayout::new("name", 260.0, true),
        ]);

        let settings = reconcile(&schema(), "programs", Some(&record), &HashMap::new());

        assert_eq!(settings.order(), vec!["name", "allocated", "status"]);
        assert_eq!(settings.column("name").unwrap().width, Some(260.0));
        assert!(!settings.column("status").unwrap().is_visible);
        assert_eq!(settings.column("allocated").unwrap().width, Some(140.0));
        assert!(settings.column("allocated").unwrap().is_visible);
    }

    #[test]
    fn test_extra_key_resets_order_and_is_dropped() {
        let record = saved(vec![
            ColumnLayout::new("status", 120.0, true),
            ColumnLayout::new("retired", 90.0, true),
            ColumnLayout::new("allocated", 150.0, true),
            ColumnLayout::new("name", 260.0, true),
        ]);

        let settings = reconcile(&schema(), "programs", Some(&record), &HashMap::new());

        assert_eq!(settings.order(), vec!["name", "allocated", "status"]);
        assert!(settings.column("retired").is_none());
    }

    #[test]
    fn test_invalid_width_falls_back_to_default_then_base() {
        let mut record = saved(vec![
            ColumnLayout::new("name", 200.0, true),
            ColumnLayout::new("allocated", 150.0, true),
            ColumnLayout::new("status", 100.0, true),
        ]);
        record.columns[1].width = None;
        record.columns[2].width = None;
        let mut defaults = HashMap::new();
        defaults.insert("allocated".to_string(), DefaultWidth::width(175.0));

        let settings = reconcile(&schema(), "programs", Some(&record), &defaults);

        assert_eq!(settings.column("allocated").unwrap().width, Some(175.0));
        assert_eq!(settings.column("status").unwrap().width, Some(100.0));
    }

    #[test]
    fn test_widths_clamped_into_bounds() {
        let record = saved(vec![
            ColumnLayout::new("name", 10.0, true),
            ColumnLayout::new("allocated", 900.0, true),
            ColumnLayout::new("status", 100.0, true),
        ]);

        let settings = reconcile(&schema(), "programs", Some(&record), &HashMap::new());

        assert_eq!(settings.column("name").unwrap().width, Some(80.0));
        assert_eq!(settings.column("allocated").unwrap().width, Some(300.0));
    }

    #[test]
    fn test_all_hidden_keeps_first_visible() {
        let record = saved(vec![
            ColumnLayout::new("status", 100.0, false),
            ColumnLayout::new("name", 200.0, false),
            ColumnLayout::new("allocated", 140.0, false),
        ]);

        let settings = reconcile(&schema(), "programs", Some(&record), &HashMap::new());

        assert!(settings.column("status").unwrap().is_visible);
        assert_eq!(settings.visible_count(), 1);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut record = saved(vec![
            ColumnLayout::new("allocated", 999.0, false),
            ColumnLayout::new("ghost", 20.0, true),
            ColumnLayout::new("name", 5.0, false),
        ]);
        record.custom_row_heights.insert("p1".into(), 80.0);
        record.custom_row_heights.insert("p2".into(), -4.0);
        let defaults = HashMap::new();

        let once = reconcile(&schema(), "programs", Some(&record), &defaults);
        let twice = reconcile(&schema(), "programs", Some(&once), &defaults);

        assert_eq!(once, twice);
        assert_eq!(once.custom_row_heights.len(), 1);
    }

    #[test]
    fn test_backend_bounds_tighten_schema() {
        let mut defaults = HashMap::new();
        defaults.insert(
            "name".to_string(),
            DefaultWidth::width(220.0).with_bounds(Some(150.0), Some(400.0)),
        );
        let resolved = resolve_schema(&schema(), &defaults);

        let name = resolved.column("name").unwrap();
        assert_eq!(name.min_width, Some(150.0));
        assert_eq!(name.max_width, Some(400.0));
        assert_eq!(resolved.column("status"), schema().column("status"));
    }

    #[test]
    fn test_effective_columns_flag_user_widths() {
        let record = saved(vec![
            ColumnLayout::new("name", 260.0, true),
            ColumnLayout::new("allocated", 140.0, true),
            ColumnLayout::new("status", 100.0, false),
        ]);
        let settings = reconcile(&schema(), "programs", Some(&record), &HashMap::new());

        let columns = effective_columns(&schema(), &settings, &HashMap::new());

        assert_eq!(columns.len(), 3);
        assert!(columns[0].user_sized);
        assert!(!columns[1].user_sized);
        assert!(!columns[2].is_visible);
    }
}
