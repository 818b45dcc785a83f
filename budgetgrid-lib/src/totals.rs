//! Totals row aggregation.
//!
//! Aggregates are raw numbers. Formatting for display is a separate,
//! optional step per column.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::Record;
use crate::render::{RenderConfig, format_currency, format_number, format_percentage};

/// Aggregation over every record in the list.
pub type AggregateFn = Arc<dyn Fn(&[Record]) -> f64 + Send + Sync>;

/// Display formatting for an aggregate.
pub type TotalFormatFn = Arc<dyn Fn(f64, &RenderConfig) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregator {
    /// Sum of numeric values. Anything else counts as zero.
    Sum,
    /// Sum divided by the number of records, or 0 without records.
    Avg,
    /// Records whose value is present, not null and not an empty string.
    Count,
    /// A caller-supplied function over the full record list.
    Custom,
}

/// How one column of the totals row is computed and shown.
#[derive(Clone)]
pub struct AggregationSpec {
    pub column_key: String,
    pub aggregator: Aggregator,
    pub custom: Option<AggregateFn>,
    pub formatter: Option<TotalFormatFn>,
}

impl fmt::Debug for AggregationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationSpec")
            .field("column_key", &self.column_key)
            .field("aggregator", &self.aggregator)
            .field("custom", &self.custom.is_some())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl AggregationSpec {
    pub fn new(column_key: impl Into<String>, aggregator: Aggregator) -> Self {
        Self {
            column_key: column_key.into(),
            aggregator,
            custom: None,
            formatter: None,
        }
    }

    pub fn sum(column_key: impl Into<String>) -> Self {
        Self::new(column_key, Aggregator::Sum)
    }

    pub fn avg(column_key: impl Into<String>) -> Self {
        Self::new(column_key, Aggregator::Avg)
    }

    pub fn count(column_key: impl Into<String>) -> Self {
        Self::new(column_key, Aggregator::Count)
    }

    pub fn custom(
        column_key: impl Into<String>,
        f: impl Fn(&[Record]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let mut spec = Self::new(column_key, Aggregator::Custom);
        spec.custom = Some(Arc::new(f));
        spec
    }

    pub fn with_formatter(
        mut self,
        f: impl Fn(f64, &RenderConfig) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }

    pub fn currency(self) -> Self {
        self.with_formatter(format_currency)
    }

    pub fn percentage(self) -> Self {
        self.with_formatter(format_percentage)
    }

    pub fn compute(&self, records: &[Record]) -> f64 {
        let key = self.column_key.as_str();
        match self.aggregator {
            Aggregator::Sum => sum(records, key),
            Aggregator::Avg if records.is_empty() => 0.0,
            Aggregator::Avg => sum(records, key) / records.len() as f64,
            Aggregator::Count => records
                .iter()
                .filter(|r| match r.get(key) {
                    Some(value) => !value.is_null() && value.as_str() != Some(""),
                    None => false,
                })
                .count() as f64,
            Aggregator::Custom => self.custom.as_ref().map_or(0.0, |f| f(records)),
        }
    }

    /// Display text for an aggregate, plain number format by default.
    pub fn format(&self, value: f64, config: &RenderConfig) -> String {
        match &self.formatter {
            Some(f) => f(value, config),
            None => format_number(value, config),
        }
    }
}

fn sum(records: &[Record], key: &str) -> f64 {
    records.iter().filter_map(|r| r.number(key)).sum()
}

/// Compute every spec, keyed by column.
pub fn compute_all(records: &[Record], specs: &[AggregationSpec]) -> HashMap<String, f64> {
    specs
        .iter()
        .map(|spec| (spec.column_key.clone(), spec.compute(records)))
        .collect()
}
