//! Width calculator: distributes a container's width among visible columns.
//!
//! Fixed chrome (selection checkbox, row index, actions) is reserved first.
//! The remaining width is shared by flex weight, with each column held
//! inside its `[min, max]` bounds. User-sized columns keep their width
//! while it fits and shrink toward their minimums when it does not. When
//! the minimums do not fit, every column gets its minimum and the caller
//! scrolls horizontally.

use crate::schema::EffectiveColumn;

/// Widths of the fixed, non-data columns of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeWidths {
    pub selection: f64,
    pub row_index: f64,
    pub actions: f64,
}

impl Default for ChromeWidths {
    fn default() -> Self {
        Self {
            selection: 40.0,
            row_index: 40.0,
            actions: 20.0,
        }
    }
}

impl ChromeWidths {
    /// No chrome at all.
    pub fn none() -> Self {
        Self {
            selection: 0.0,
            row_index: 0.0,
            actions: 0.0,
        }
    }

    pub fn with_selection(mut self, width: f64) -> Self {
        self.selection = width;
        self
    }

    pub fn with_row_index(mut self, width: f64) -> Self {
        self.row_index = width;
        self
    }

    pub fn with_actions(mut self, width: f64) -> Self {
        self.actions = width;
        self
    }

    pub fn total(&self) -> f64 {
        self.selection.max(0.0) + self.row_index.max(0.0) + self.actions.max(0.0)
    }
}

/// Pixel widths keyed by column, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: Vec<(String, u32)>,
    /// The minimums did not fit; content is wider than the container.
    overflow: bool,
}

impl ColumnWidths {
    pub fn get(&self, key: &str) -> Option<u32> {
        self.widths
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.widths.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of all column widths.
    pub fn total(&self) -> u32 {
        self.widths.iter().map(|(_, w)| *w).sum()
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }
}

/// Integer pixel bounds and flex weight of one column.
#[derive(Debug, Clone, Copy)]
struct Slot {
    min: f64,
    max: f64,
    flex: f64,
    /// Fixed at a width (user-sized, or frozen by a bound).
    pinned: Option<f64>,
    user_sized: bool,
}

impl Slot {
    fn new(column: &EffectiveColumn) -> Self {
        let min = column.min_width().ceil();
        let max = column.max_width().floor().max(min);
        let pinned = column
            .user_sized
            .then(|| column.width.round().clamp(min, max));
        Self {
            min,
            max,
            flex: column.definition.flex_weight,
            pinned,
            user_sized: column.user_sized,
        }
    }
}

/// Compute pixel widths for `columns` (visible, in display order) inside
/// `container_width`.
///
/// Widths are whole pixels. The space left after chrome is floored, so a
/// fractional container sums to `floor(container_width - chrome)`.
///
/// # Example
///
/// ```
/// use budgetgrid_lib::layout::{compute_widths, ChromeWidths};
/// use budgetgrid_lib::schema::{ColumnDefinition, ColumnType, EffectiveColumn};
///
/// let column = |key: &str, flex: f64, kind| EffectiveColumn {
///     definition: ColumnDefinition::new(key, key).kind(kind).flex(flex).min_width(60.0),
///     width: 150.0,
///     is_visible: true,
///     user_sized: false,
/// };
/// let columns = [column("a", 2.0, ColumnType::Text), column("b", 1.0, ColumnType::Number)];
///
/// let widths = compute_widths(&columns, 300.0, &ChromeWidths::default());
/// assert_eq!(widths.get("a"), Some(133));
/// assert_eq!(widths.get("b"), Some(67));
/// ```
pub fn compute_widths(
    columns: &[EffectiveColumn],
    container_width: f64,
    chrome: &ChromeWidths,
) -> ColumnWidths {
    if columns.is_empty() {
        return ColumnWidths::default();
    }

    let available = (container_width - chrome.total()).max(0.0).floor();
    let mut slots: Vec<Slot> = columns.iter().map(Slot::new).collect();

    let min_required: f64 = slots.iter().map(|s| s.min).sum();

    if available <= min_required {
        let widths = columns
            .iter()
            .zip(&slots)
            .map(|(c, s)| (c.key().to_string(), s.min as u32))
            .collect();
        return ColumnWidths {
            widths,
            overflow: available < min_required,
        };
    }

    let fixed: f64 = slots.iter().map(|s| s.pinned.unwrap_or(s.min)).sum();
    let ideal = if fixed > available {
        squeeze(&slots, available)
    } else {
        distribute(&mut slots, available)
    };
    let mut rounded: Vec<f64> = ideal
        .iter()
        .zip(&slots)
        .map(|(w, s)| w.round().clamp(s.min, s.max))
        .collect();

    // Rounding remainder goes to the first column that can take it,
    // trying columns the user has not sized first.
    let mut remainder = available - rounded.iter().sum::<f64>();
    let order = (0..slots.len())
        .filter(|&i| !slots[i].user_sized)
        .chain((0..slots.len()).filter(|&i| slots[i].user_sized));
    for i in order {
        if remainder == 0.0 {
            break;
        }
        let (width, slot) = (&mut rounded[i], &slots[i]);
        let room = if remainder > 0.0 {
            (slot.max - *width).min(remainder)
        } else {
            -(*width - slot.min).min(-remainder)
        };
        *width += room;
        remainder -= room;
    }

    let widths = columns
        .iter()
        .zip(rounded)
        .map(|(c, w)| (c.key().to_string(), w as u32))
        .collect();
    ColumnWidths {
        widths,
        overflow: false,
    }
}

/// User widths that no longer fit: free columns take their minimum and
/// user-sized columns give up their excess over the minimum in proportion.
fn squeeze(slots: &[Slot], available: f64) -> Vec<f64> {
    let mins: f64 = slots.iter().map(|s| s.min).sum();
    let excess: f64 = slots
        .iter()
        .filter_map(|s| s.pinned.map(|p| p - s.min))
        .sum();
    let keep = if excess > 0.0 {
        ((available - mins) / excess).clamp(0.0, 1.0)
    } else {
        0.0
    };
    slots
        .iter()
        .map(|s| match s.pinned {
            Some(width) => s.min + (width - s.min) * keep,
            None => s.min,
        })
        .collect()
}

/// Share `available` by flex weight, freezing columns at the bound they
/// violate until every share fits. Returns unrounded widths.
fn distribute(slots: &mut [Slot], available: f64) -> Vec<f64> {
    loop {
        let free_space = available
            - slots
                .iter()
                .filter_map(|s| s.pinned)
                .sum::<f64>();
        let flex_total: f64 = slots
            .iter()
            .filter(|s| s.pinned.is_none())
            .map(|s| s.flex)
            .sum();

        if slots.iter().all(|s| s.pinned.is_some()) {
            break;
        }
        if flex_total <= 0.0 {
            for slot in slots.iter_mut().filter(|s| s.pinned.is_none()) {
                slot.pinned = Some(slot.min);
            }
            break;
        }

        let per_unit = free_space.max(0.0) / flex_total;
        let mut under = 0.0;
        let mut over = 0.0;
        for slot in slots.iter().filter(|s| s.pinned.is_none()) {
            let share = slot.flex * per_unit;
            if share < slot.min {
                under += slot.min - share;
            } else if share > slot.max {
                over += share - slot.max;
            }
        }

        if under == 0.0 && over == 0.0 {
            for slot in slots.iter_mut().filter(|s| s.pinned.is_none()) {
                slot.pinned = Some(slot.flex * per_unit);
            }
            break;
        }

        // Freeze only the dominant kind of violation, then redistribute.
        for slot in slots.iter_mut().filter(|s| s.pinned.is_none()) {
            let share = slot.flex * per_unit;
            if under >= over && share < slot.min {
                slot.pinned = Some(slot.min);
            } else if over > under && share > slot.max {
                slot.pinned = Some(slot.max);
            }
        }
    }

    slots.iter().map(|s| s.pinned.unwrap_or(s.min)).collect()
}
