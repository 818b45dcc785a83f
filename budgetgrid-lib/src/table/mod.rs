//! Table composition.
//!
//! [`DataTable`] ties a [`LayoutStore`], renderers, totals, selection and
//! the pointer controllers together and produces a [`GridView`]: a plain
//! description of what to draw for a given container width.

mod text;

pub use text::{TextRenderConfig, render_text};

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::interaction::{ColumnResize, DragReorder, EventResult, PointerEvent, RowResize};
use crate::layout::{ChromeWidths, compute_widths};
use crate::model::Record;
use crate::render::{Cell, TableRenderers, Tone};
use crate::schema::{Alignment, EffectiveColumn};
use crate::selection::{CheckState, Selection};
use crate::settings::LayoutStore;
use crate::totals::AggregationSpec;

/// Callback for row clicks and context menus.
pub type RowHandler = Arc<dyn Fn(&Record) + Send + Sync>;

/// A header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: u32,
    pub align: Alignment,
    /// Can be dragged to reorder columns.
    pub draggable: bool,
    /// Has a resize handle.
    pub resizable: bool,
    /// Is the source of the active drag.
    pub dragging: bool,
}

/// A body row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    /// 1-based position in the dataset.
    pub index: usize,
    pub height: f64,
    pub selected: bool,
    pub cells: Vec<Cell>,
}

/// Everything needed to draw a table at one container width.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub header: Vec<HeaderCell>,
    pub select_all: CheckState,
    pub rows: Vec<RowView>,
    /// Present when the table has aggregation specs.
    pub totals: Option<Vec<Cell>>,
    pub chrome: ChromeWidths,
    /// Chrome plus every column.
    pub content_width: u32,
    /// Content is wider than the container.
    pub overflow: bool,
}

impl GridView {
    /// Column keys with their computed widths, in display order.
    pub fn widths(&self) -> Vec<(&str, u32)> {
        self.header.iter().map(|h| (h.key.as_str(), h.width)).collect()
    }

    pub fn row(&self, id: &str) -> Option<&RowView> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// One table instance.
pub struct DataTable {
    store: Arc<LayoutStore>,
    renderers: TableRenderers,
    totals: Vec<AggregationSpec>,
    totals_label: String,
    records: Vec<Record>,
    selection: Selection,
    drag: DragReorder,
    row_resize: RowResize,
    column_resize: ColumnResize,
    on_click: Option<RowHandler>,
    on_context_menu: Option<RowHandler>,
}

impl DataTable {
    pub fn new(store: Arc<LayoutStore>) -> Self {
        Self {
            store,
            renderers: TableRenderers::default(),
            totals: Vec::new(),
            totals_label: "Total".to_string(),
            records: Vec::new(),
            selection: Selection::new(),
            drag: DragReorder::new(),
            row_resize: RowResize::new(),
            column_resize: ColumnResize::new(),
            on_click: None,
            on_context_menu: None,
        }
    }

    pub fn with_renderers(mut self, renderers: TableRenderers) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_totals(mut self, specs: Vec<AggregationSpec>) -> Self {
        self.totals = specs;
        self
    }

    /// Label shown in the first column of the totals row when that column
    /// has no aggregate. Default: `Total`
    pub fn with_totals_label(mut self, label: impl Into<String>) -> Self {
        self.totals_label = label.into();
        self
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn on_row_click(mut self, handler: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(handler));
        self
    }

    pub fn on_row_context_menu(mut self, handler: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_context_menu = Some(Arc::new(handler));
        self
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // =========================================================================
    // Dataset and selection
    // =========================================================================

    /// Replace the records, keeping the selection.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Forget selected ids that are no longer in the records.
    pub fn prune_selection(&mut self) {
        let ids: Vec<&str> = self.records.iter().map(Record::id).collect();
        self.selection.retain_visible(ids);
    }

    /// Load a different dataset. Clears the selection.
    pub fn replace_dataset(&mut self, records: Vec<Record>) {
        self.records = records;
        self.selection.clear();
    }

    fn record_ids(&self) -> Vec<&str> {
        self.records.iter().map(Record::id).collect()
    }

    pub fn select_all(&mut self, checked: bool) {
        let ids: Vec<&str> = self.records.iter().map(Record::id).collect();
        self.selection.select_all(checked, ids);
    }

    pub fn select_row(&mut self, id: &str, checked: bool) {
        self.selection.select_row(id, checked);
    }

    /// Extend the selection from the last toggled row to `id`.
    pub fn select_range(&mut self, id: &str, checked: bool) {
        let ordered: Vec<String> = self.records.iter().map(|r| r.id().to_string()).collect();
        self.selection.select_range(id, checked, &ordered);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.record_ids())
    }

    pub fn is_indeterminate(&self) -> bool {
        self.selection.is_indeterminate(&self.record_ids())
    }

    /// Selected records, in dataset order.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| self.selection.is_selected(r.id()))
            .collect()
    }

    // =========================================================================
    // Row handlers
    // =========================================================================

    /// Dispatch a click on row `id`. Returns whether a handler ran.
    pub fn click_row(&self, id: &str) -> bool {
        dispatch(self.on_click.as_ref(), &self.records, id)
    }

    pub fn context_menu_row(&self, id: &str) -> bool {
        dispatch(self.on_context_menu.as_ref(), &self.records, id)
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    pub fn drag_start(&mut self, index: usize) -> EventResult {
        self.drag.on_drag_start(index, &self.store)
    }

    pub fn drag_over(&self, event: &mut PointerEvent) -> EventResult {
        self.drag.on_drag_over(event)
    }

    pub fn drop_at(&mut self, target: usize) -> EventResult {
        self.drag.on_drop(target, &self.store)
    }

    pub fn drag_end(&mut self) {
        self.drag.on_drag_end();
    }

    pub fn start_row_resize(&mut self, event: &PointerEvent, row_id: &str) -> EventResult {
        self.row_resize.start(event, row_id, &self.store)
    }

    /// Begin resizing column `key` from the width it has in a view of
    /// `container_width`.
    pub fn start_column_resize(
        &mut self,
        event: &PointerEvent,
        key: &str,
        container_width: f64,
    ) -> EventResult {
        self.column_resize.cancel();
        let widths = compute_widths(
            &self.visible_columns(),
            container_width,
            &self.store.config().chrome,
        );
        let Some(rendered) = widths.get(key) else {
            return EventResult::Ignored;
        };
        self.column_resize
            .start(event, key, f64::from(rendered), &self.store)
    }

    /// Feed a pointer move to whichever resize is active.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        match self.row_resize.pointer_move(event) {
            EventResult::Ignored => self.column_resize.pointer_move(event),
            handled => handled,
        }
    }

    /// Release the pointer, ending any active gesture.
    pub fn pointer_up(&mut self) -> EventResult {
        let row = self.row_resize.pointer_up(&self.store);
        let column = self.column_resize.pointer_up(&self.store);
        self.drag.on_drag_end();
        if row.is_handled() || column.is_handled() {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    fn visible_columns(&self) -> Vec<EffectiveColumn> {
        let mut columns = self.store.visible_columns();
        for column in &mut columns {
            if let Some(width) = self.column_resize.preview_width(column.key()) {
                column.width = width;
                column.user_sized = true;
            }
        }
        columns
    }

    fn row_height(&self, id: &str) -> f64 {
        self.row_resize
            .preview_height(id)
            .unwrap_or_else(|| self.store.row_height(id))
    }

    pub fn view(&self, container_width: f64) -> GridView {
        let columns = self.visible_columns();
        let chrome = self.store.config().chrome;
        let widths = compute_widths(&columns, container_width, &chrome);
        let editable = self.store.can_edit_layout();
        let dragged = self.drag.dragged();

        let header: Vec<HeaderCell> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| HeaderCell {
                key: c.key().to_string(),
                label: c.definition.label.clone(),
                width: widths.get(c.key()).unwrap_or(0),
                align: c.definition.align,
                draggable: editable,
                resizable: editable,
                dragging: dragged == Some(i),
            })
            .collect();

        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| RowView {
                id: record.id().to_string(),
                index: i + 1,
                height: self.row_height(record.id()),
                selected: self.selection.is_selected(record.id()),
                cells: columns
                    .iter()
                    .map(|c| self.renderers.render(record, &c.definition))
                    .collect(),
            })
            .collect();

        let totals = (!self.totals.is_empty()).then(|| self.totals_row(&columns));
        let content_width = chrome.total().round() as u32 + widths.total();

        debug!(
            "view of '{}' at {}px: {} columns, {} rows, content {}px",
            self.store.table_identifier(),
            container_width,
            header.len(),
            self.records.len(),
            content_width
        );

        GridView {
            header,
            select_all: self.selection.check_state(&self.record_ids()),
            rows,
            totals,
            chrome,
            content_width,
            overflow: widths.overflow() || f64::from(content_width) > container_width,
        }
    }

    fn totals_row(&self, columns: &[EffectiveColumn]) -> Vec<Cell> {
        let specs: HashMap<&str, &AggregationSpec> = self
            .totals
            .iter()
            .map(|s| (s.column_key.as_str(), s))
            .collect();
        let config = self.renderers.config();

        columns
            .iter()
            .enumerate()
            .map(|(i, column)| match specs.get(column.key()) {
                Some(spec) => {
                    let value = spec.compute(&self.records);
                    Cell::new(spec.format(value, config), column.definition.align)
                }
                None if i == 0 => Cell::new(&self.totals_label, Alignment::Left),
                None => Cell::new("", column.definition.align).tone(Tone::Muted),
            })
            .collect()
    }
}

fn dispatch(handler: Option<&RowHandler>, records: &[Record], id: &str) -> bool {
    let (Some(handler), Some(record)) = (handler, records.iter().find(|r| r.id() == id)) else {
        return false;
    };
    handler(record);
    true
}
