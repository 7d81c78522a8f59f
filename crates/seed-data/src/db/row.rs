//! Column values and rows handed to a [`Repository`](super::Repository).

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use time::{Date, OffsetDateTime};

use super::schema::Table;

/// A typed column value.
///
/// Nullable variants carry their SQL type even when empty so Postgres
/// receives a correctly typed `NULL` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(Option<String>),
    Int(Option<i64>),
    Float(Option<f64>),
    /// Exact amounts (`NUMERIC` columns), used for money.
    Decimal(Option<Decimal>),
    Bool(bool),
    Timestamp(Option<OffsetDateTime>),
    Date(Option<Date>),
    Json(JsonValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Text(None)
                | Value::Int(None)
                | Value::Float(None)
                | Value::Decimal(None)
                | Value::Timestamp(None)
                | Value::Date(None)
        ) || matches!(self, Value::Json(JsonValue::Null))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => *v,
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => *v,
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(v) => *v,
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => v.as_deref(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(Some(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(Some(v))
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        Value::Text(v.map(str::to_string))
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(Some(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(Some(i64::from(v)))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(Some(i64::from(v)))
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        Value::Int(v)
    }
}

impl From<Option<u32>> for Value {
    fn from(v: Option<u32>) -> Self {
        Value::Int(v.map(i64::from))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(Some(v))
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(Some(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(v: OffsetDateTime) -> Self {
        Value::Timestamp(Some(v))
    }
}

impl From<Option<OffsetDateTime>> for Value {
    fn from(v: Option<OffsetDateTime>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Value::Date(Some(v))
    }
}

impl From<Option<Date>> for Value {
    fn from(v: Option<Date>) -> Self {
        Value::Date(v)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        Value::Json(v)
    }
}

/// What happens when a row with the same natural key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Overwrite the non-key columns ("update or create").
    #[default]
    Overwrite,
    /// Leave the existing row untouched ("first or create").
    Keep,
}

/// One row destined for a table, keyed by the table's natural key.
#[derive(Debug, Clone)]
pub struct Row {
    pub table: Table,
    pub values: Vec<(&'static str, Value)>,
    pub on_conflict: OnConflict,
}

impl Row {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            values: Vec::new(),
            on_conflict: OnConflict::Overwrite,
        }
    }

    /// Adds a column value.
    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Keeps an existing row instead of overwriting it.
    pub fn keep_existing(mut self) -> Self {
        self.on_conflict = OnConflict::Keep;
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Values of the natural-key columns, in key order.
    ///
    /// Returns `None` when a key column is missing or null.
    pub fn key_values(&self) -> Option<Vec<&Value>> {
        self.table
            .natural_key()
            .iter()
            .map(|column| self.get(column).filter(|v| !v.is_null()))
            .collect()
    }
}
