//! Column reordering by dragging header cells.

use log::debug;

use super::{EventResult, PointerEvent};
use crate::settings::LayoutStore;

/// Drag-and-drop reordering of the displayed columns.
///
/// Indices address visible columns. Hidden columns keep their slots in the
/// full order, so dropping never moves a hidden column.
#[derive(Debug, Clone, Default)]
pub struct DragReorder {
    dragged: Option<usize>,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible index of the header being dragged.
    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn on_drag_start(&mut self, index: usize, store: &LayoutStore) -> EventResult {
        if !store.can_edit_layout() || index >= store.visible_columns().len() {
            return EventResult::Ignored;
        }
        self.dragged = Some(index);
        EventResult::StartDrag
    }

    /// Accept the pointer as a drop target while a drag is active.
    pub fn on_drag_over(&self, event: &mut PointerEvent) -> EventResult {
        if self.dragged.is_none() {
            return EventResult::Ignored;
        }
        event.prevent_default();
        EventResult::Consumed
    }

    /// Move the dragged column to `target` and persist the new order.
    pub fn on_drop(&mut self, target: usize, store: &LayoutStore) -> EventResult {
        let Some(dragged) = self.dragged.take() else {
            return EventResult::Ignored;
        };
        if dragged == target {
            return EventResult::Consumed;
        }

        let columns = store.effective_columns();
        let slots: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible)
            .map(|(i, _)| i)
            .collect();
        if dragged >= slots.len() || target >= slots.len() {
            return EventResult::Ignored;
        }

        let mut visible: Vec<String> = slots
            .iter()
            .map(|&i| columns[i].key().to_string())
            .collect();
        let moved = visible.remove(dragged);
        visible.insert(target, moved);

        let mut order: Vec<String> = columns.iter().map(|c| c.key().to_string()).collect();
        for (slot, key) in slots.into_iter().zip(visible) {
            order[slot] = key;
        }

        debug!("moving column {} to {}", dragged, target);
        store.reorder(&order);
        EventResult::Consumed
    }

    /// End the gesture without dropping.
    pub fn on_drag_end(&mut self) {
        self.dragged = None;
    }

    pub fn cancel(&mut self) {
        self.on_drag_end();
    }
}
