//! Filtered property search.
//!
//! A search is built in two pure steps and then executed:
//!
//! 1. [`accumulate`] turns [`FilterCriteria`] into [`PredicateFragment`]s,
//!    each a condition with one `$N` placeholder and its bound value.
//! 2. [`assemble`] joins the fragments into one statement over the
//!    rating-aggregated property table, adds ordering and `LIMIT`, and returns
//!    an [`AssembledQuery`].
//!
//! User input only ever travels as bound parameters; the statement text is
//! built from fixed column names and operators.
//!
//! # Example
//!
//! ```ignore
//! use staydb::search::{FilterCriteria, search_properties};
//!
//! let criteria = FilterCriteria::new().city("Lis").price_range(50, 100);
//! let rows = search_properties(&pool, &criteria, Some(20)).await?;
//! ```

mod assemble;
mod criteria;
mod predicate;

#[cfg(test)]
mod tests;

pub use assemble::{
    AssembledQuery, DEFAULT_LIMIT, PROPERTY_SEARCH_PREFIX, assemble, resolve_limit,
};
pub use criteria::FilterCriteria;
pub use predicate::{PredicateFragment, accumulate};

use crate::client::GenericClient;
use crate::error::StayResult;
use crate::row::FromRow;
use tokio_postgres::Row;

/// Build the search statement for `criteria` without executing it.
pub fn build_property_search(
    criteria: &FilterCriteria,
    limit: Option<i64>,
) -> StayResult<AssembledQuery> {
    let fragments = accumulate(criteria)?;
    let fragment_count = fragments.len();
    let assembled = assemble(fragments, limit)?;
    tracing::debug!(
        target: "staydb::search",
        fragments = fragment_count,
        param_count = assembled.params().len(),
        "assembled property search"
    );
    Ok(assembled)
}

/// Search properties and return the rows unmodified.
///
/// Invalid criteria or limits fail before anything is sent to `conn`.
pub async fn search_properties(
    conn: &impl GenericClient,
    criteria: &FilterCriteria,
    limit: Option<i64>,
) -> StayResult<Vec<Row>> {
    build_property_search(criteria, limit)?.fetch_all(conn).await
}

/// Search properties and map every row to `T`.
pub async fn search_properties_as<T: FromRow>(
    conn: &impl GenericClient,
    criteria: &FilterCriteria,
    limit: Option<i64>,
) -> StayResult<Vec<T>> {
    build_property_search(criteria, limit)?
        .fetch_all_as(conn)
        .await
}
