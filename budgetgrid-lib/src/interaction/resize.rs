//! Row and column resizing by pointer drag.

use super::{EventResult, PointerEvent};
use crate::settings::LayoutStore;

/// An active resize: what is being resized and how far it has moved.
#[derive(Debug, Clone, PartialEq)]
struct Gesture {
    target: String,
    origin: f64,
    start: f64,
    current: f64,
}

/// Vertical resizing of a single row.
///
/// Moves update a live preview only. The height is persisted once, when
/// the pointer is released.
#[derive(Debug, Clone, Default)]
pub struct RowResize {
    active: Option<Gesture>,
    min_height: f64,
}

impl RowResize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin resizing `row_id` from its current height.
    pub fn start(&mut self, event: &PointerEvent, row_id: &str, store: &LayoutStore) -> EventResult {
        if !store.can_edit_layout() {
            return EventResult::Ignored;
        }
        let height = store.row_height(row_id);
        self.min_height = store.config().min_row_height;
        self.active = Some(Gesture {
            target: row_id.to_string(),
            origin: event.y,
            start: height,
            current: height,
        });
        EventResult::StartDrag
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        let Some(gesture) = self.active.as_mut() else {
            return EventResult::Ignored;
        };
        gesture.current = (gesture.start + event.y - gesture.origin).max(self.min_height);
        EventResult::Consumed
    }

    /// Finish the gesture and persist the final height.
    pub fn pointer_up(&mut self, store: &LayoutStore) -> EventResult {
        let Some(gesture) = self.active.take() else {
            return EventResult::Ignored;
        };
        if gesture.current != gesture.start {
            store.update_row_height(&gesture.target, gesture.current);
        }
        EventResult::Consumed
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Live height of `row_id` while it is being resized.
    pub fn preview_height(&self, row_id: &str) -> Option<f64> {
        self.active
            .as_ref()
            .filter(|g| g.target == row_id)
            .map(|g| g.current)
    }
}

/// Horizontal resizing of a single column.
///
/// Widths stay inside the column bounds during the gesture and are
/// persisted once on release.
#[derive(Debug, Clone, Default)]
pub struct ColumnResize {
    active: Option<Gesture>,
    bounds: (f64, f64),
}

impl ColumnResize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin resizing column `key` from `rendered_width`, the width it is
    /// drawn at right now.
    pub fn start(
        &mut self,
        event: &PointerEvent,
        key: &str,
        rendered_width: f64,
        store: &LayoutStore,
    ) -> EventResult {
        if !store.can_edit_layout() {
            return EventResult::Ignored;
        }
        let Some(column) = store
            .effective_columns()
            .into_iter()
            .find(|c| c.key() == key && c.is_visible)
        else {
            return EventResult::Ignored;
        };
        let (min, max) = (column.min_width(), column.max_width());
        let width = rendered_width.clamp(min, max);
        self.bounds = (min, max);
        self.active = Some(Gesture {
            target: key.to_string(),
            origin: event.x,
            start: width,
            current: width,
        });
        EventResult::StartDrag
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        let Some(gesture) = self.active.as_mut() else {
            return EventResult::Ignored;
        };
        let (min, max) = self.bounds;
        gesture.current = (gesture.start + event.x - gesture.origin).clamp(min, max);
        EventResult::Consumed
    }

    /// Finish the gesture and persist the final width.
    pub fn pointer_up(&mut self, store: &LayoutStore) -> EventResult {
        let Some(gesture) = self.active.take() else {
            return EventResult::Ignored;
        };
        if gesture.current != gesture.start {
            store.update_width(&gesture.target, gesture.current);
        }
        EventResult::Consumed
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Live width of `key` while it is being resized.
    pub fn preview_width(&self, key: &str) -> Option<f64> {
        self.active
            .as_ref()
            .filter(|g| g.target == key)
            .map(|g| g.current)
    }
}
