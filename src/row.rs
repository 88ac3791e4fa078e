//! Result materialization: reading fetched rows through a projection plan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ast::Value;
use crate::compile::convert::convert;
use crate::compile::{FieldSource, ProjectionPlan};
use crate::entity::EntityDescriptor;
use crate::error::{RelqError, RelqResult};

/// Provider-agnostic view of one fetched row.
pub trait RowCursor {
    /// Ordinal of a result column by name, if present.
    fn ordinal(&self, name: &str) -> Option<usize>;
    fn is_null(&self, ordinal: usize) -> bool;
    fn value(&self, ordinal: usize) -> Value;
}

/// An ordered bag of named values produced for one result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Value by position, for positional shapes.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sole value of a single-field record.
    pub fn single(&self) -> Option<&Value> {
        match self.entries.as_slice() {
            [(_, v)] => Some(v),
            _ => None,
        }
    }

    fn require(&self, name: &str, target: &'static str) -> RelqResult<&Value> {
        self.get(name)
            .ok_or_else(|| RelqError::conversion(name, "<absent>", target))
    }

    pub fn int(&self, name: &str) -> RelqResult<i64> {
        Ok(self.opt_int(name)?.unwrap_or_default())
    }

    pub fn opt_int(&self, name: &str) -> RelqResult<Option<i64>> {
        match self.require(name, "INT")? {
            Value::Null => Ok(None),
            Value::Int(n) => Ok(Some(*n)),
            other => Err(RelqError::conversion(name, other.to_string(), "INT")),
        }
    }

    pub fn text(&self, name: &str) -> RelqResult<String> {
        Ok(self.opt_text(name)?.unwrap_or_default())
    }

    pub fn opt_text(&self, name: &str) -> RelqResult<Option<String>> {
        match self.require(name, "TEXT")? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(RelqError::conversion(name, other.to_string(), "TEXT")),
        }
    }

    pub fn bool(&self, name: &str) -> RelqResult<bool> {
        match self.require(name, "BOOL")? {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            other => Err(RelqError::conversion(name, other.to_string(), "BOOL")),
        }
    }

    pub fn float(&self, name: &str) -> RelqResult<f64> {
        match self.require(name, "FLOAT")? {
            Value::Null => Ok(0.0),
            Value::Float(n) => Ok(*n),
            Value::Int(n) => Ok(*n as f64),
            other => Err(RelqError::conversion(name, other.to_string(), "FLOAT")),
        }
    }

    pub fn uuid(&self, name: &str) -> RelqResult<Uuid> {
        match self.require(name, "UUID")? {
            Value::Null => Ok(Uuid::nil()),
            Value::Uuid(u) => Ok(*u),
            other => Err(RelqError::conversion(name, other.to_string(), "UUID")),
        }
    }

    pub fn timestamp(&self, name: &str) -> RelqResult<Option<DateTime<Utc>>> {
        match self.require(name, "TIMESTAMP")? {
            Value::Null => Ok(None),
            Value::Timestamp(t) => Ok(Some(*t)),
            other => Err(RelqError::conversion(name, other.to_string(), "TIMESTAMP")),
        }
    }

    pub fn decimal(&self, name: &str) -> RelqResult<Decimal> {
        match self.require(name, "DECIMAL")? {
            Value::Null => Ok(Decimal::ZERO),
            Value::Decimal(d) => Ok(*d),
            Value::Int(n) => Ok(Decimal::from(*n)),
            other => Err(RelqError::conversion(name, other.to_string(), "DECIMAL")),
        }
    }
}

/// A result type constructible from a [`Record`].
pub trait Materialize: Sized {
    fn materialize(record: &Record) -> RelqResult<Self>;
}

fn single_value<'r>(record: &'r Record, target: &'static str) -> RelqResult<&'r Value> {
    record
        .single()
        .ok_or_else(|| RelqError::conversion("<scalar>", "<absent>", target))
}

impl Materialize for i64 {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "INT")? {
            Value::Null => Ok(0),
            Value::Int(n) => Ok(*n),
            other => Err(RelqError::conversion("<scalar>", other.to_string(), "INT")),
        }
    }
}

impl Materialize for f64 {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "FLOAT")? {
            Value::Null => Ok(0.0),
            Value::Float(n) => Ok(*n),
            Value::Int(n) => Ok(*n as f64),
            other => Err(RelqError::conversion("<scalar>", other.to_string(), "FLOAT")),
        }
    }
}

impl Materialize for bool {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "BOOL")? {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            other => Err(RelqError::conversion("<scalar>", other.to_string(), "BOOL")),
        }
    }
}

impl Materialize for String {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "TEXT")? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.clone()),
            other => Err(RelqError::conversion("<scalar>", other.to_string(), "TEXT")),
        }
    }
}

impl Materialize for Uuid {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "UUID")? {
            Value::Null => Ok(Uuid::nil()),
            Value::Uuid(u) => Ok(*u),
            other => Err(RelqError::conversion("<scalar>", other.to_string(), "UUID")),
        }
    }
}

/// Timestamps have no default to stand in for NULL, so a NULL value is a
/// `ConversionError` here; nullable columns materialize through
/// `Option<DateTime<Utc>>` instead.
impl Materialize for DateTime<Utc> {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "TIMESTAMP")? {
            Value::Timestamp(t) => Ok(*t),
            other => Err(RelqError::conversion(
                "<scalar>",
                other.to_string(),
                "TIMESTAMP",
            )),
        }
    }
}

impl<T: Materialize> Materialize for Option<T> {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match record.single() {
            Some(Value::Null) => Ok(None),
            _ => T::materialize(record).map(Some),
        }
    }
}

impl Materialize for Decimal {
    fn materialize(record: &Record) -> RelqResult<Self> {
        match single_value(record, "DECIMAL")? {
            Value::Null => Ok(Decimal::ZERO),
            Value::Decimal(d) => Ok(*d),
            Value::Int(n) => Ok(Decimal::from(*n)),
            Value::Float(n) => Decimal::try_from(*n).map_err(|_| {
                RelqError::conversion("<scalar>", n.to_string(), "DECIMAL")
            }),
            other => Err(RelqError::conversion(
                "<scalar>",
                other.to_string(),
                "DECIMAL",
            )),
        }
    }
}

impl Materialize for Record {
    fn materialize(record: &Record) -> RelqResult<Self> {
        Ok(record.clone())
    }
}

/// Build the record for one row under a projection plan.
///
/// An all-fixed plan never touches the cursor: every field is filled from
/// the predicate values collected at compile time. Otherwise fixed fields
/// are filled verbatim and the rest read back by alias (scalar plans read
/// by column name). A missing or NULL result column yields `Value::Null`
/// and the per-field conversion decides what that means.
pub fn read_row<T: Materialize>(row: &dyn RowCursor, plan: &ProjectionPlan) -> RelqResult<T> {
    let mut record = Record::default();
    for field in &plan.fields {
        let value = match &field.source {
            FieldSource::Fixed(value) => convert(&field.target, value.clone(), field.kind)?,
            FieldSource::Column(name) => {
                let fetched = match row.ordinal(name) {
                    Some(ordinal) if !row.is_null(ordinal) => row.value(ordinal),
                    _ => Value::Null,
                };
                convert(&field.target, fetched, field.kind)?
            }
        };
        record.push(field.target.clone(), value);
    }
    T::materialize(&record)
}

/// Build the record for one row of a full-entity SELECT: every descriptor
/// column read by column name, keyed by field name.
pub fn read_entity(row: &dyn RowCursor, entity: &EntityDescriptor) -> RelqResult<Record> {
    let mut record = Record::default();
    for column in &entity.columns {
        let fetched = match row.ordinal(&column.column) {
            Some(ordinal) if !row.is_null(ordinal) => row.value(ordinal),
            _ => Value::Null,
        };
        record.push(column.field.clone(), convert(&column.field, fetched, column.kind)?);
    }
    Ok(record)
}
