//! Pointer gestures that change a table's layout.
//!
//! Controllers track their own gesture state between begin, move and end
//! calls and go through the [`LayoutStore`](crate::settings::LayoutStore)
//! for every change, so the layout permission gate applies to them too.
//! None of them starts a gesture when layout editing is not permitted.

mod drag;
mod resize;

pub use drag::DragReorder;
pub use resize::{ColumnResize, RowResize};

/// Result of handling a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
    /// Event started a gesture on this controller.
    StartDrag,
}

impl EventResult {
    /// Check if the event was handled (consumed or started a gesture).
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

/// A pointer position in table pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    default_prevented: bool,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            default_prevented: false,
        }
    }

    /// Mark the event as handled so the host accepts a drop here.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
