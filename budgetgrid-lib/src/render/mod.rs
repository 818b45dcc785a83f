//! Cell rendering.
//!
//! Every column type has a default renderer. A table can replace the
//! renderer of any type; lookup checks the table's overrides first, then
//! the defaults.

mod format;

pub use format::{format_currency, format_currency_decimal, format_decimal, format_number, format_percentage};

use std::collections::HashMap;
use std::fmt::{self, Write};
use std::sync::Arc;

use chrono::DateTime;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::{Record, Value};
use crate::schema::{Alignment, ColumnDefinition, ColumnType};

/// Text shown for empty values.
pub const PLACEHOLDER: &str = "-";

/// Date format used when the configured one is not a valid chrono format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic hint for how a cell should stand out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    #[default]
    Normal,
    Muted,
    Positive,
    Warning,
    Negative,
}

/// A rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub align: Alignment,
    pub tone: Tone,
}

impl Cell {
    pub fn new(text: impl Into<String>, align: Alignment) -> Self {
        Self {
            text: text.into(),
            align,
            tone: Tone::Normal,
        }
    }

    /// The muted placeholder shown for empty values.
    pub fn empty(align: Alignment) -> Self {
        Self::new(PLACEHOLDER, align).tone(Tone::Muted)
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

/// Formatting options for the default renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Default: `$`
    pub currency_symbol: String,
    /// Default: 2
    pub currency_decimals: u32,
    /// Default: `,`. `None` disables grouping.
    pub thousands_separator: Option<char>,
    /// Default: `.`
    pub decimal_separator: char,
    /// chrono format string. Default: `%Y-%m-%d`. An invalid format renders
    /// with the default instead.
    pub date_format: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            thousands_separator: Some(','),
            decimal_separator: '.',
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(mut self, symbol: impl Into<String>, decimals: u32) -> Self {
        self.currency_symbol = symbol.into();
        self.currency_decimals = decimals;
        self
    }

    pub fn with_separators(mut self, thousands: Option<char>, decimal: char) -> Self {
        self.thousands_separator = thousands;
        self.decimal_separator = decimal;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

/// A cell renderer.
pub type CellRenderFn = Arc<dyn Fn(&Record, &ColumnDefinition, &RenderConfig) -> Cell + Send + Sync>;

/// Renderers per column type.
#[derive(Clone)]
pub struct RendererRegistry {
    renderers: HashMap<ColumnType, CellRenderFn>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        let mut renderers: HashMap<ColumnType, CellRenderFn> = HashMap::new();
        renderers.insert(ColumnType::Text, Arc::new(render_text));
        renderers.insert(ColumnType::Number, Arc::new(render_number));
        renderers.insert(ColumnType::Date, Arc::new(render_date));
        renderers.insert(ColumnType::Status, Arc::new(render_status));
        renderers.insert(ColumnType::Currency, Arc::new(render_currency));
        renderers.insert(ColumnType::Percentage, Arc::new(render_percentage));
        renderers.insert(ColumnType::Custom, Arc::new(render_raw));
        Self { renderers }
    }
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default renderer of a type.
    pub fn register(&mut self, kind: ColumnType, renderer: CellRenderFn) {
        self.renderers.insert(kind, renderer);
    }

    pub fn get(&self, kind: ColumnType) -> Option<&CellRenderFn> {
        self.renderers.get(&kind)
    }

    pub fn render(&self, record: &Record, column: &ColumnDefinition, config: &RenderConfig) -> Cell {
        match self.get(column.kind) {
            Some(renderer) => renderer(record, column, config),
            None => render_raw(record, column, config),
        }
    }
}

/// The renderers of one table: its overrides on top of shared defaults.
#[derive(Clone, Default)]
pub struct TableRenderers {
    defaults: Arc<RendererRegistry>,
    overrides: HashMap<ColumnType, CellRenderFn>,
    config: RenderConfig,
}

impl TableRenderers {
    pub fn new(defaults: Arc<RendererRegistry>) -> Self {
        Self {
            defaults,
            overrides: HashMap::new(),
            config: RenderConfig::default(),
        }
    }

    pub fn with_override(
        mut self,
        kind: ColumnType,
        renderer: impl Fn(&Record, &ColumnDefinition, &RenderConfig) -> Cell + Send + Sync + 'static,
    ) -> Self {
        self.overrides.insert(kind, Arc::new(renderer));
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render with the table override for the column's type, else the default.
    pub fn render(&self, record: &Record, column: &ColumnDefinition) -> Cell {
        match self.overrides.get(&column.kind) {
            Some(renderer) => renderer(record, column, &self.config),
            None => self.defaults.render(record, column, &self.config),
        }
    }
}

// =============================================================================
// Default renderers
// =============================================================================

/// The column's value, or `None` when missing or blank.
fn present<'a>(record: &'a Record, column: &ColumnDefinition) -> Option<&'a Value> {
    record.get(&column.key).filter(|v| !v.is_blank())
}

/// Raw value, or the placeholder when empty.
pub fn render_raw(record: &Record, column: &ColumnDefinition, _config: &RenderConfig) -> Cell {
    match present(record, column) {
        Some(value) => Cell::new(value.to_string(), column.align),
        None => Cell::empty(column.align),
    }
}

pub fn render_text(record: &Record, column: &ColumnDefinition, config: &RenderConfig) -> Cell {
    render_raw(record, column, config)
}

pub fn render_number(record: &Record, column: &ColumnDefinition, config: &RenderConfig) -> Cell {
    let Some(value) = present(record, column) else {
        return Cell::empty(column.align);
    };
    match value.as_decimal() {
        Some(d) => Cell::new(format_decimal(d, 2, true, config), column.align),
        None => Cell::new(value.to_string(), column.align),
    }
}

pub fn render_date(record: &Record, column: &ColumnDefinition, config: &RenderConfig) -> Cell {
    let Some(value) = present(record, column) else {
        return Cell::empty(column.align);
    };
    let text = match value {
        Value::DateTime(dt) => format_date(config, |f| dt.format(f)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                format_date(config, |f| dt.format(f))
            } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                format_date(config, |f| date.format(f))
            } else {
                s.to_string()
            }
        }
        other => other.to_string(),
    };
    Cell::new(text, column.align)
}

fn format_date<'a, D: fmt::Display>(
    config: &'a RenderConfig,
    format: impl Fn(&'a str) -> D,
) -> String {
    let mut text = String::new();
    if write!(text, "{}", format(&config.date_format)).is_ok() {
        return text;
    }
    format(DEFAULT_DATE_FORMAT).to_string()
}

/// Tone for a workflow status label.
pub fn status_tone(label: &str) -> Tone {
    let normalized = label.trim().to_lowercase().replace(['_', '-'], " ");
    match normalized.as_str() {
        "completed" | "complete" | "approved" | "active" | "paid" | "done" => Tone::Positive,
        "pending" | "draft" | "in progress" | "submitted" | "under review" => Tone::Warning,
        "cancelled" | "canceled" | "rejected" | "overdue" | "failed" => Tone::Negative,
        "inactive" | "archived" | "closed" => Tone::Muted,
        _ => Tone::Normal,
    }
}

pub fn render_status(record: &Record, column: &ColumnDefinition, _config: &RenderConfig) -> Cell {
    match present(record, column) {
        Some(value) => {
            let label = value.to_string();
            let tone = status_tone(&label);
            Cell::new(label, column.align).tone(tone)
        }
        None => Cell::empty(column.align),
    }
}

pub fn render_currency(record: &Record, column: &ColumnDefinition, config: &RenderConfig) -> Cell {
    let Some(value) = present(record, column) else {
        return Cell::empty(column.align);
    };
    match value.as_decimal() {
        Some(d) => {
            let cell = Cell::new(format_currency_decimal(d, config), column.align);
            if d < Decimal::ZERO { cell.tone(Tone::Negative) } else { cell }
        }
        None => Cell::new(value.to_string(), column.align),
    }
}

pub fn render_percentage(record: &Record, column: &ColumnDefinition, config: &RenderConfig) -> Cell {
    let Some(value) = present(record, column) else {
        return Cell::empty(column.align);
    };
    match value.as_decimal() {
        Some(d) => {
            let cell = Cell::new(format!("{}%", format_decimal(d, 1, false, config)), column.align);
            if d > Decimal::ONE_HUNDRED { cell.tone(Tone::Warning) } else { cell }
        }
        None => Cell::new(value.to_string(), column.align),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn record() -> Record {
        Record::new("p1")
            .set("name", "Rural roads")
            .set("blank", "   ")
            .set("nothing", Value::Null)
            .set("allocated", Decimal::new(-125050, 2))
            .set("spent_pct", 104.25)
            .set("state", "In_Progress")
            .set("starts", "2024-03-01")
            .set("updated", Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap())
            .set("count", 1234567i64)
    }

    fn render(kind: ColumnType, key: &str) -> Cell {
        let column = ColumnDefinition::new(key, key).kind(kind);
        RendererRegistry::default().render(&record(), &column, &RenderConfig::default())
    }

    #[test]
    fn test_empty_values_render_muted_placeholder() {
        for kind in ColumnType::ALL {
            for key in ["blank", "nothing", "missing"] {
                let cell = render(kind, key);
                assert_eq!(cell.text, PLACEHOLDER, "{:?} {}", kind, key);
                assert_eq!(cell.tone, Tone::Muted);
            }
        }
    }

    #[test]
    fn test_type_defaults() {
        assert_eq!(render(ColumnType::Text, "name").text, "Rural roads");
        assert_eq!(render(ColumnType::Number, "count").text, "1,234,567");

        let money = render(ColumnType::Currency, "allocated");
        assert_eq!(money.text, "-$1,250.50");
        assert_eq!(money.tone, Tone::Negative);
        assert_eq!(money.align, Alignment::Right);

        let pct = render(ColumnType::Percentage, "spent_pct");
        assert_eq!(pct.text, "104.3%");
        assert_eq!(pct.tone, Tone::Warning);

        let status = render(ColumnType::Status, "state");
        assert_eq!(status.text, "In_Progress");
        assert_eq!(status.tone, Tone::Warning);
        assert_eq!(status.align, Alignment::Center);

        assert_eq!(render(ColumnType::Date, "starts").text, "2024-03-01");
        assert_eq!(render(ColumnType::Date, "updated").text, "2024-05-17");
        assert_eq!(render(ColumnType::Date, "name").text, "Rural roads");
        assert_eq!(render(ColumnType::Custom, "count").text, "1234567");
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let column = ColumnDefinition::new("updated", "Updated").kind(ColumnType::Date);
        let registry = RendererRegistry::default();

        let custom = RenderConfig::new().with_date_format("%d/%m/%Y");
        assert_eq!(registry.render(&record(), &column, &custom).text, "17/05/2024");

        let broken = RenderConfig::new().with_date_format("%Q %Y");
        assert_eq!(registry.render(&record(), &column, &broken).text, "2024-05-17");
        let starts = ColumnDefinition::new("starts", "Starts").kind(ColumnType::Date);
        assert_eq!(registry.render(&record(), &starts, &broken).text, "2024-03-01");
    }

    #[test]
    fn test_table_override_wins_over_default() {
        let renderers = TableRenderers::new(Arc::new(RendererRegistry::default()))
            .with_override(ColumnType::Status, |record, column, _| {
                Cell::new(format!("[{}]", record.get(&column.key).map(|v| v.to_string()).unwrap_or_default()), column.align)
            });

        let status = ColumnDefinition::new("state", "State").kind(ColumnType::Status);
        let name = ColumnDefinition::new("name", "Name");

        assert_eq!(renderers.render(&record(), &status).text, "[In_Progress]");
        assert_eq!(renderers.render(&record(), &name).text, "Rural roads");
    }

    #[test]
    fn test_status_keywords() {
        assert_eq!(status_tone("Approved"), Tone::Positive);
        assert_eq!(status_tone("in-progress"), Tone::Warning);
        assert_eq!(status_tone(" OVERDUE "), Tone::Negative);
        assert_eq!(status_tone("Proposed"), Tone::Normal);
    }
}
