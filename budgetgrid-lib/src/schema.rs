//! Column schema: the static declaration of a table kind.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::SchemaError;

// =============================================================================
// Column type and alignment
// =============================================================================

/// What a column holds. Drives the default renderer and minimum width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Status,
    Currency,
    Percentage,
    Custom,
}

impl ColumnType {
    pub const ALL: [ColumnType; 7] = [
        ColumnType::Text,
        ColumnType::Number,
        ColumnType::Date,
        ColumnType::Status,
        ColumnType::Currency,
        ColumnType::Percentage,
        ColumnType::Custom,
    ];

    /// Narrowest width, in pixels, at which values of this type stay legible.
    pub fn default_min_width(self) -> f64 {
        match self {
            ColumnType::Text => 80.0,
            ColumnType::Number => 60.0,
            ColumnType::Date => 90.0,
            ColumnType::Status => 80.0,
            ColumnType::Currency => 90.0,
            ColumnType::Percentage => 60.0,
            ColumnType::Custom => 50.0,
        }
    }

    /// Alignment used when a column does not set one.
    pub fn default_align(self) -> Alignment {
        match self {
            ColumnType::Number | ColumnType::Currency | ColumnType::Percentage => Alignment::Right,
            ColumnType::Status => Alignment::Center,
            _ => Alignment::Left,
        }
    }
}

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

// =============================================================================
// ColumnDefinition
// =============================================================================

/// A declared column.
///
/// # Examples
///
/// ```
/// use budgetgrid_lib::schema::{ColumnDefinition, ColumnType};
///
/// let name = ColumnDefinition::new("name", "Program").flex(3.0).min_width(160.0);
/// let budget = ColumnDefinition::new("allocated", "Allocated")
///     .kind(ColumnType::Currency)
///     .base_width(140.0);
/// assert_eq!(budget.effective_min_width(), 90.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Unique within the table; also the record field key.
    pub key: String,
    pub label: String,
    pub kind: ColumnType,
    pub align: Alignment,
    /// Width used when nothing else is known.
    pub base_width: f64,
    /// Relative share of the available width.
    pub flex_weight: f64,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
}

impl ColumnDefinition {
    /// A text column with base width 150 and flex weight 1.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnType::Text,
            align: Alignment::Left,
            base_width: 150.0,
            flex_weight: 1.0,
            min_width: None,
            max_width: None,
        }
    }

    /// Set the column type. Also resets alignment to the type's default.
    pub fn kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self.align = kind.default_align();
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn base_width(mut self, width: f64) -> Self {
        self.base_width = width;
        self
    }

    pub fn flex(mut self, weight: f64) -> Self {
        self.flex_weight = weight;
        self
    }

    pub fn min_width(mut self, width: f64) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn max_width(mut self, width: f64) -> Self {
        self.max_width = Some(width);
        self
    }

    /// `max(min_width, type default)`, never above `max_width`.
    pub fn effective_min_width(&self) -> f64 {
        let min = self
            .min_width
            .unwrap_or(0.0)
            .max(self.kind.default_min_width());
        match self.max_width {
            Some(max) => min.min(max),
            None => min,
        }
    }

    pub fn effective_max_width(&self) -> f64 {
        self.max_width.unwrap_or(f64::INFINITY)
    }

    /// Clamp a width into this column's bounds.
    pub fn clamp_width(&self, width: f64) -> f64 {
        width.clamp(self.effective_min_width(), self.effective_max_width())
    }

    fn validate(&self, position: usize) -> Result<(), SchemaError> {
        if self.key.trim().is_empty() {
            return Err(SchemaError::EmptyKey { position });
        }
        let min = self.min_width.unwrap_or(0.0);
        let max = self.max_width.unwrap_or(f64::MAX);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(SchemaError::InvalidBounds {
                key: self.key.clone(),
                min,
                max,
            });
        }
        if !self.base_width.is_finite() || self.base_width <= 0.0 {
            return Err(SchemaError::InvalidBaseWidth {
                key: self.key.clone(),
                width: self.base_width,
            });
        }
        if !self.flex_weight.is_finite() || self.flex_weight < 0.0 {
            return Err(SchemaError::InvalidFlex {
                key: self.key.clone(),
                weight: self.flex_weight,
            });
        }
        Ok(())
    }
}

// =============================================================================
// TableSchema
// =============================================================================

/// The ordered, validated column list of one table kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    /// Validate and build a schema. Declaration order is the default order.
    pub fn new(columns: Vec<ColumnDefinition>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for (position, column) in columns.iter().enumerate() {
            column.validate(position)?;
            if !seen.insert(column.key.as_str()) {
                return Err(SchemaError::DuplicateKey {
                    key: column.key.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.column(key).is_some()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Same keys and order, with each definition adjusted by `f`.
    pub(crate) fn map_columns(&self, f: impl FnMut(&ColumnDefinition) -> ColumnDefinition) -> Self {
        Self {
            columns: self.columns.iter().map(f).collect(),
        }
    }

    /// True when `order` holds every schema key exactly once and nothing else.
    pub fn is_permutation(&self, order: &[String]) -> bool {
        if order.len() != self.columns.len() {
            return false;
        }
        let mut seen = HashSet::new();
        order
            .iter()
            .all(|key| self.contains(key) && seen.insert(key.as_str()))
    }
}

// =============================================================================
// EffectiveColumn
// =============================================================================

/// A declared column with its resolved runtime layout.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveColumn {
    pub definition: ColumnDefinition,
    /// Resolved width in pixels, within the column bounds.
    pub width: f64,
    pub is_visible: bool,
    /// The width was chosen by the user rather than resolved from defaults.
    pub user_sized: bool,
}

impl EffectiveColumn {
    pub fn key(&self) -> &str {
        &self.definition.key
    }

    pub fn min_width(&self) -> f64 {
        self.definition.effective_min_width()
    }

    pub fn max_width(&self) -> f64 {
        self.definition.effective_max_width()
    }
}
