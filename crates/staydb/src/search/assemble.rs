use super::predicate::{COST_COLUMN, PredicateFragment};
use crate::client::GenericClient;
use crate::error::{StayError, StayResult};
use crate::placeholder::placeholders;
use crate::query::Query;
use crate::row::FromRow;
use crate::value::{ParamList, Value};
use tokio_postgres::Row;

/// Result limit used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Properties joined with their mean review rating.
///
/// This is an inner join: a property without reviews has no
/// `property_avg_rating` row and never appears in search results. The average
/// is cast to `float8` so it binds and decodes as `f64`.
pub const PROPERTY_SEARCH_PREFIX: &str = "WITH property_avg_rating AS (
  SELECT property_id,
         AVG(rating)::float8 AS average_rating
    FROM property_reviews
   GROUP BY property_id
)
SELECT p.*, ar.average_rating
  FROM properties p
  JOIN property_avg_rating ar ON p.id = ar.property_id";

/// A complete search statement and its parameter vector.
///
/// Parameter `i` (0-based) is the value of placeholder `$i+1`.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct AssembledQuery {
    sql: String,
    params: ParamList,
}

impl AssembledQuery {
    /// The statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound values in placeholder order.
    pub fn params(&self) -> &[Value] {
        self.params.values()
    }

    /// Split into statement text and values.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params.into_vec())
    }

    /// Convert into a [`Query`] tagged `properties.search`.
    pub fn into_query(self) -> Query {
        Query::from_parts(self.sql, self.params).tag("properties.search")
    }

    /// Execute the search and return its rows unmodified.
    pub async fn fetch_all(self, conn: &impl GenericClient) -> StayResult<Vec<Row>> {
        self.into_query().fetch_all(conn).await
    }

    /// Execute the search and map every row to `T`.
    pub async fn fetch_all_as<T: FromRow>(self, conn: &impl GenericClient) -> StayResult<Vec<T>> {
        self.into_query().fetch_all_as(conn).await
    }
}

/// Apply the default to a caller-supplied limit and reject non-positive ones.
pub fn resolve_limit(limit: Option<i64>) -> StayResult<i64> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(n) if n > 0 => Ok(n),
        Some(n) => Err(StayError::InvalidLimit(n)),
    }
}

/// Build the property search statement.
///
/// The first fragment is introduced by `WHERE` and the rest by `AND`; with no
/// fragments there is no `WHERE` clause at all. Results are ordered by
/// `cost_per_night` and capped by `LIMIT`, whose placeholder comes right after
/// the last fragment's.
///
/// Fails with [`StayError::InvalidLimit`] for a non-positive limit, and with
/// [`StayError::InvalidCriteria`] when a fragment does not reference exactly
/// the placeholder matching its position.
pub fn assemble(
    fragments: Vec<PredicateFragment>,
    limit: Option<i64>,
) -> StayResult<AssembledQuery> {
    let limit = resolve_limit(limit)?;

    for (i, fragment) in fragments.iter().enumerate() {
        let expected = i + 1;
        if placeholders(fragment.condition()) != [expected] {
            return Err(StayError::invalid_criteria(format!(
                "fragment {expected} (`{}`) must reference exactly ${expected}",
                fragment.condition()
            )));
        }
    }

    let mut sql = String::with_capacity(
        PROPERTY_SEARCH_PREFIX.len()
            + fragments
                .iter()
                .map(|f| f.condition().len() + 8)
                .sum::<usize>()
            + 48,
    );
    sql.push_str(PROPERTY_SEARCH_PREFIX);

    let mut params = ParamList::with_capacity(fragments.len() + 1);
    for (i, fragment) in fragments.into_iter().enumerate() {
        let (condition, value) = fragment.into_parts();
        sql.push_str(if i == 0 { "\n WHERE " } else { "\n   AND " });
        sql.push_str(&condition);
        params.push(value);
    }

    let limit_index = params.push(limit);
    sql.push_str(&format!(
        "\n ORDER BY {COST_COLUMN}\n LIMIT ${limit_index}"
    ));

    Ok(AssembledQuery { sql, params })
}
