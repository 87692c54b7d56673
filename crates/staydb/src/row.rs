//! Row mapping traits and utilities

use crate::error::{StayError, StayResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// # Example
///
/// ```ignore
/// use staydb::{FromRow, RowExt, StayResult};
///
/// struct CityCount {
///     city: String,
///     total: i64,
/// }
///
/// impl FromRow for CityCount {
///     fn from_row(row: &tokio_postgres::Row) -> StayResult<Self> {
///         Ok(Self {
///             city: row.try_get_column("city")?,
///             total: row.try_get_column("total")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> StayResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning StayError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> StayResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> StayResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| StayError::decode(column, e.to_string()))
    }
}
