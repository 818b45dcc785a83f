//! Row selection keyed by record id.
//!
//! Selection survives dataset changes: ids that disappear stay selected
//! until the caller clears or prunes them, and the header flags only count
//! ids that are currently visible.

use std::collections::HashSet;

/// Tri-state value of the select-all checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckState {
    #[default]
    Unchecked,
    Indeterminate,
    Checked,
}

/// Selected record ids.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
    /// Last row toggled by the user, start of a range selection.
    anchor: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect every id in `ids`.
    ///
    /// Deselecting clears the whole selection, including ids that are not
    /// currently visible.
    pub fn select_all<'a>(&mut self, checked: bool, ids: impl IntoIterator<Item = &'a str>) {
        if checked {
            self.selected.extend(ids.into_iter().map(str::to_string));
        } else {
            self.clear();
        }
    }

    pub fn select_row(&mut self, id: &str, checked: bool) {
        if checked {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
        self.anchor = Some(id.to_string());
    }

    /// Set every row between the anchor and `id` (inclusive) to `checked`.
    ///
    /// `ordered_ids` is the displayed row order. Without an anchor, or when
    /// either end is not displayed, only `id` changes.
    pub fn select_range(&mut self, id: &str, checked: bool, ordered_ids: &[String]) {
        let anchor = self.anchor.as_deref().unwrap_or(id);
        let from = ordered_ids.iter().position(|i| i == anchor);
        let to = ordered_ids.iter().position(|i| i == id);

        let (Some(from), Some(to)) = (from, to) else {
            self.select_row(id, checked);
            return;
        };

        for row in &ordered_ids[from.min(to)..=from.max(to)] {
            if checked {
                self.selected.insert(row.clone());
            } else {
                self.selected.remove(row);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Drop selected ids that are not in `visible_ids`.
    pub fn retain_visible<'a>(&mut self, visible_ids: impl IntoIterator<Item = &'a str>) {
        let visible: HashSet<&str> = visible_ids.into_iter().collect();
        self.selected.retain(|id| visible.contains(id.as_str()));
        if self
            .anchor
            .as_deref()
            .is_some_and(|anchor| !visible.contains(anchor))
        {
            self.anchor = None;
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn visible_selected(&self, visible_ids: &[&str]) -> usize {
        visible_ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|id| self.selected.contains(**id))
            .count()
    }

    /// At least one row is displayed and every displayed row is selected.
    pub fn is_all_selected(&self, visible_ids: &[&str]) -> bool {
        let total = visible_ids.iter().collect::<HashSet<_>>().len();
        total > 0 && self.visible_selected(visible_ids) == total
    }

    /// Some, but not all, displayed rows are selected.
    pub fn is_indeterminate(&self, visible_ids: &[&str]) -> bool {
        let total = visible_ids.iter().collect::<HashSet<_>>().len();
        let selected = self.visible_selected(visible_ids);
        selected > 0 && selected < total
    }

    pub fn check_state(&self, visible_ids: &[&str]) -> CheckState {
        if self.is_all_selected(visible_ids) {
            CheckState::Checked
        } else if self.is_indeterminate(visible_ids) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 3] = ["p1", "p2", "p3"];

    #[test]
    fn test_flags_follow_selection() {
        let mut selection = Selection::new();
        assert_eq!(selection.check_state(&ROWS), CheckState::Unchecked);

        selection.select_row("p2", true);
        assert!(selection.is_indeterminate(&ROWS));
        assert!(!selection.is_all_selected(&ROWS));

        selection.select_all(true, ROWS);
        assert!(selection.is_all_selected(&ROWS));
        assert_eq!(selection.check_state(&ROWS), CheckState::Checked);

        selection.select_row("p1", false);
        assert_eq!(selection.check_state(&ROWS), CheckState::Indeterminate);

        selection.select_all(false, ROWS);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_dataset_is_never_all_selected() {
        let mut selection = Selection::new();
        selection.select_row("p1", true);

        assert!(!selection.is_all_selected(&[]));
        assert!(!selection.is_indeterminate(&[]));
    }

    #[test]
    fn test_stale_ids_do_not_count() {
        let mut selection = Selection::new();
        selection.select_all(true, ROWS);

        let shrunk = ["p1", "p3"];
        assert!(selection.is_all_selected(&shrunk));
        assert_eq!(selection.len(), 3);

        let grown = ["p1", "p2", "p3", "p4"];
        assert!(selection.is_indeterminate(&grown));

        selection.retain_visible(shrunk);
        assert_eq!(selection.selected_ids(), vec!["p1", "p3"]);
    }

    #[test]
    fn test_range_from_anchor() {
        let ordered: Vec<String> = ["p1", "p2", "p3", "p4", "p5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut selection = Selection::new();

        selection.select_row("p4", true);
        selection.select_range("p2", true, &ordered);
        assert_eq!(selection.selected_ids(), vec!["p2", "p3", "p4"]);

        selection.select_range("p3", false, &ordered);
        assert_eq!(selection.selected_ids(), vec!["p2"]);

        selection.select_range("ghost", true, &ordered);
        assert!(selection.is_selected("ghost"));
    }
}
