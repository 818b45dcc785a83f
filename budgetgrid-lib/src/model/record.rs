//! Dynamic domain record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::Money;
use super::Value;
use crate::error::FieldError;

/// A domain record (program, activity, budget line) shown as a table row.
///
/// The id is the stable identity used for selection and row heights. Field
/// values are looked up by column key.
///
/// # Example
///
/// ```
/// use budgetgrid_lib::model::Record;
///
/// let record = Record::new("prog-01")
///     .set("name", "Clean water")
///     .set("allocated", 1_200_000i64);
///
/// assert_eq!(record.get_string("name").unwrap(), Some("Clean water"));
/// assert_eq!(record.number("allocated"), Some(1_200_000.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    id: String,
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Numeric view of a field; `None` when missing or not numeric.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Err when the field is missing or holds another type.
    // Ok(None) only when the field exists and is Value::Null.
    // =========================================================================

    fn typed<'a, T>(
        &'a self,
        field: &str,
        expected: &'static str,
        pick: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.id, field)),
            Some(Value::Null) => Ok(None),
            Some(value) => match pick(value) {
                Some(v) => Ok(Some(v)),
                None => Err(FieldError::type_mismatch(
                    &self.id,
                    field,
                    expected,
                    value.type_name(),
                )),
            },
        }
    }

    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        self.typed(field, "string", |v| match v {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        self.typed(field, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Gets an i64, widening `Int`.
    pub fn get_long(&self, field: &str) -> Result<Option<i64>, FieldError> {
        self.typed(field, "long", |v| match v {
            Value::Long(n) => Some(*n),
            Value::Int(n) => Some(i64::from(*n)),
            _ => None,
        })
    }

    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        self.typed(field, "float", |v| match v {
            Value::Float(n) => Some(*n),
            _ => None,
        })
    }

    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        self.typed(field, "decimal", |v| match v {
            Value::Decimal(d) => Some(*d),
            _ => None,
        })
    }

    pub fn get_money(&self, field: &str) -> Result<Option<Money>, FieldError> {
        self.typed(field, "money", |v| match v {
            Value::Money(m) => Some(*m),
            _ => None,
        })
    }

    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.typed(field, "datetime", |v| match v {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        })
    }
}
