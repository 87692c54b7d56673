//! Bound parameter values.
//!
//! Parameters are kept as a closed enum rather than `Arc<dyn ToSql>` so an
//! assembled statement can be inspected (and compared in tests) before it is
//! handed to a client.

use bytes::BytesMut;
use chrono::NaiveDate;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A single bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `text` / `varchar`
    Text(String),
    /// `integer`
    Int(i32),
    /// `bigint`
    BigInt(i64),
    /// `double precision`
    Float(f64),
    /// `date`
    Date(NaiveDate),
    /// SQL `NULL`
    Null,
}

impl Value {
    /// Short type name, used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int(_) => "integer",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "double precision",
            Value::Date(_) => "date",
            Value::Null => "null",
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Text(v) => v.to_sql(ty, out),
            Value::Int(v) => v.to_sql(ty, out),
            Value::BigInt(v) => v.to_sql(ty, out),
            Value::Float(v) => v.to_sql(ty, out),
            Value::Date(v) => v.to_sql(ty, out),
            Value::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <NaiveDate as ToSql>::accepts(ty)
    }

    // The type check has to run against the variant actually held, not the
    // union accepted above.
    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => v.to_sql_checked(ty, out),
            Value::BigInt(v) => v.to_sql_checked(ty, out),
            Value::Float(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Null => Ok(IsNull::Yes),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An ordered parameter vector. Index `i` (0-based) binds placeholder `$i+1`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Create an empty list with room for `n` parameters.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            params: Vec::with_capacity(n),
        }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.params.push(value.into());
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Borrow the values in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.params
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    /// Consume the list, returning the values in placeholder order.
    pub fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

impl From<Vec<Value>> for ParamList {
    fn from(params: Vec<Value>) -> Self {
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert_eq!(params.push("%Lis%"), 1);
        assert_eq!(params.push(5000_i32), 2);
        assert_eq!(params.push(10_i64), 3);
        assert_eq!(
            params.values(),
            &[
                Value::Text("%Lis%".into()),
                Value::Int(5000),
                Value::BigInt(10)
            ]
        );
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(3_i32)), Value::Int(3));
    }

    #[test]
    fn accepts_only_matching_variant() {
        let mut out = BytesMut::new();
        assert!(Value::Int(1).to_sql_checked(&Type::INT4, &mut out).is_ok());
        assert!(Value::Int(1).to_sql_checked(&Type::INT8, &mut out).is_err());
        assert!(Value::Float(4.5).to_sql_checked(&Type::FLOAT8, &mut out).is_ok());
        assert!(Value::Text("x".into()).to_sql_checked(&Type::INT4, &mut out).is_err());
    }

    #[test]
    fn null_binds_for_any_type() {
        let mut out = BytesMut::new();
        assert!(matches!(
            Value::Null.to_sql_checked(&Type::TEXT, &mut out),
            Ok(IsNull::Yes)
        ));
    }
}
