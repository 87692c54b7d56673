//! Lightweight query wrapper for hand-written SQL

use crate::client::GenericClient;
use crate::error::{StayError, StayResult};
use crate::placeholder::max_placeholder;
use crate::row::FromRow;
use crate::value::{ParamList, Value};
use tokio_postgres::Row;

/// A pre-numbered SQL statement (`$1, $2, ...`) with its bound values.
///
/// # Example
///
/// ```ignore
/// use staydb::query;
///
/// let user: Option<User> = query("SELECT * FROM users WHERE id = $1")
///     .bind(user_id)
///     .tag("users.by_id")
///     .fetch_opt_as(&client)
///     .await?;
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Query {
    sql: String,
    params: ParamList,
    tag: Option<String>,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: ParamList::new(),
        tag: None,
    }
}

impl Query {
    pub(crate) fn from_parts(sql: String, params: ParamList) -> Self {
        Self {
            sql,
            params,
            tag: None,
        }
    }

    /// Bind the next parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value);
        self
    }

    /// Associate a tag for monitoring/observability.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound values in placeholder order.
    pub fn params(&self) -> &[Value] {
        self.params.values()
    }

    /// Check that every placeholder has a value and every value a placeholder.
    pub fn validate(&self) -> StayResult<()> {
        let highest = max_placeholder(&self.sql);
        if highest != self.params.len() {
            let params_len = self.params.len();
            return Err(StayError::Validation(format!(
                "Query: highest placeholder(${highest}) != params({params_len})"
            )));
        }
        Ok(())
    }

    /// Execute the query and return all rows
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> StayResult<Vec<Row>> {
        self.validate()?;
        let params = self.params.as_refs();
        match self.tag.as_deref() {
            Some(tag) => conn.query_tagged(tag, &self.sql, &params).await,
            None => conn.query(&self.sql, &params).await,
        }
    }

    /// Execute the query and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> StayResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return the first row, or `NotFound`
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> StayResult<Row> {
        self.validate()?;
        let params = self.params.as_refs();
        match self.tag.as_deref() {
            Some(tag) => conn.query_one_tagged(tag, &self.sql, &params).await,
            None => conn.query_one(&self.sql, &params).await,
        }
    }

    /// Execute the query and return the first row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> StayResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> StayResult<Option<Row>> {
        self.validate()?;
        let params = self.params.as_refs();
        match self.tag.as_deref() {
            Some(tag) => conn.query_opt_tagged(tag, &self.sql, &params).await,
            None => conn.query_opt(&self.sql, &params).await,
        }
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> StayResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the query and return the number of affected rows
    pub async fn execute(&self, conn: &impl GenericClient) -> StayResult<u64> {
        self.validate()?;
        let params = self.params.as_refs();
        match self.tag.as_deref() {
            Some(tag) => conn.execute_tagged(tag, &self.sql, &params).await,
            None => conn.execute(&self.sql, &params).await,
        }
    }
}
