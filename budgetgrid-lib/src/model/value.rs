//! Value enum for dynamic field values

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

use super::Money;

/// A typed field value held by a [`Record`](super::Record).
///
/// Deserialization is untagged, so JSON input maps onto the primitive
/// variants (`Null`, `Bool`, `Int`, `Long`, `Float`, `String`). `Decimal`,
/// `Money` and `DateTime` are produced by callers that know the field type.
///
/// # Example
///
/// ```
/// use budgetgrid_lib::model::Value;
///
/// let program = Value::from("Rural roads");
/// let ceiling = Value::from(4_500_000i64);
/// assert_eq!(ceiling.as_f64(), Some(4_500_000.0));
/// assert!(Value::from("  ").is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f64),
    String(String),
    Decimal(Decimal),
    Money(Money),
    DateTime(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or a string with nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value. Strings are never numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) if n.is_finite() => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            Value::Money(m) => Some(m.to_f64()),
            _ => None,
        }
    }

    /// Exact decimal view of a numeric value.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Long(n) => Some(Decimal::from(*n)),
            Value::Float(n) => Decimal::from_f64(*n),
            Value::Decimal(d) => Some(*d),
            Value::Money(m) => Some(m.value()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Decimal(_) => "decimal",
            Value::Money(_) => "money",
            Value::DateTime(_) => "datetime",
        }
    }
}

/// Raw textual form, as shown by the fallback renderer.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Money(m) => write!(f, "{}", m),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Money> for Value {
    fn from(v: Money) -> Self {
        Value::Money(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_variants() {
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from(Decimal::new(125, 1)).as_f64(), Some(12.5));
        assert_eq!(Value::from(Money::from_units(40)).as_f64(), Some(40.0));
        assert_eq!(Value::from("12").as_f64(), None);
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_blank() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(Value::from(" \t").is_blank());
        assert!(!Value::from(0).is_blank());
    }

    #[test]
    fn test_deserialize_primitives() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 7, 5000000000, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(7),
                Value::Long(5_000_000_000),
                Value::Float(1.5),
                Value::String("x".into()),
            ]
        );
    }
}
