//! Plain-text rendering of a [`GridView`] for terminals.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use super::GridView;
use crate::render::Cell;
use crate::schema::Alignment;
use crate::selection::CheckState;

/// How pixel widths map onto terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderConfig {
    /// Pixels per terminal column. Default: 8
    pub px_per_char: f64,
    /// Pixels per terminal line; taller rows get extra blank lines.
    /// Default: 42
    pub px_per_line: f64,
    /// Draw the selection checkboxes. Default: true
    pub show_selection: bool,
    /// Draw the row index column. Default: true
    pub show_index: bool,
}

impl Default for TextRenderConfig {
    fn default() -> Self {
        Self {
            px_per_char: 8.0,
            px_per_line: 42.0,
            show_selection: true,
            show_index: true,
        }
    }
}

impl TextRenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_px_per_char(mut self, px: f64) -> Self {
        self.px_per_char = px;
        self
    }

    pub fn with_px_per_line(mut self, px: f64) -> Self {
        self.px_per_line = px;
        self
    }

    pub fn with_selection(mut self, show: bool) -> Self {
        self.show_selection = show;
        self
    }

    pub fn with_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    fn chars(&self, px: f64) -> usize {
        if self.px_per_char <= 0.0 {
            return 1;
        }
        ((px / self.px_per_char).floor() as usize).max(1)
    }

    fn lines(&self, px: f64) -> usize {
        if self.px_per_line <= 0.0 {
            return 1;
        }
        ((px / self.px_per_line).round() as usize).max(1)
    }
}

/// Render `view` as lines of text: header, rule, rows, then totals.
pub fn render_text(view: &GridView, config: &TextRenderConfig) -> String {
    let widths: Vec<usize> = view
        .header
        .iter()
        .map(|h| config.chars(f64::from(h.width)))
        .collect();
    let index_width = config.chars(view.chrome.row_index).max(digits(view.rows.len()));

    let mut lines = Vec::new();

    let mut header = prefix(config, checkbox(view.select_all), "#", index_width);
    for (cell, width) in view.header.iter().zip(&widths) {
        header.push_str(&fit(&cell.label, *width, cell.align));
        header.push(' ');
    }
    lines.push(header.trim_end().to_string());

    let rule_width = display_width(&lines[0]);
    lines.push("-".repeat(rule_width));

    for row in &view.rows {
        let check = if row.selected { "[x]" } else { "[ ]" };
        let mut line = prefix(config, check, &row.index.to_string(), index_width);
        push_cells(&mut line, &row.cells, &widths);
        lines.push(line.trim_end().to_string());
        for _ in 1..config.lines(row.height) {
            lines.push(String::new());
        }
    }

    if let Some(totals) = &view.totals {
        lines.push("-".repeat(rule_width));
        let mut line = prefix(config, "", "", index_width);
        push_cells(&mut line, totals, &widths);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

fn prefix(config: &TextRenderConfig, check: &str, index: &str, index_width: usize) -> String {
    let mut out = String::new();
    if config.show_selection {
        out.push_str(&fit(check, 3, Alignment::Left));
        out.push(' ');
    }
    if config.show_index {
        out.push_str(&fit(index, index_width, Alignment::Right));
        out.push(' ');
    }
    out
}

fn push_cells(line: &mut String, cells: &[Cell], widths: &[usize]) {
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&fit(&cell.text, *width, cell.align));
        line.push(' ');
    }
}

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
        CheckState::Unchecked => "[ ]",
    }
}

fn digits(n: usize) -> usize {
    n.max(1).to_string().len()
}

pub(crate) fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate with an ellipsis to at most `max_width` cells.
pub(crate) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Truncate and pad `s` to exactly `width` cells.
pub(crate) fn fit(s: &str, width: usize, align: Alignment) -> String {
    let text = truncate_to_width(s, width);
    let gap = width.saturating_sub(display_width(&text));
    let left = match align {
        Alignment::Left => 0,
        Alignment::Center => gap / 2,
        Alignment::Right => gap,
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5, Alignment::Left), "abc  ");
        assert_eq!(fit("abc", 5, Alignment::Right), "  abc");
        assert_eq!(fit("abc", 6, Alignment::Center), " abc  ");
        assert_eq!(fit("abcdef", 4, Alignment::Left), "abc…");
        assert_eq!(fit("", 0, Alignment::Left), "");
    }

    #[test]
    fn test_wide_characters() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert_eq!(display_width(&fit("日本語", 5, Alignment::Left)), 5);
    }
}
