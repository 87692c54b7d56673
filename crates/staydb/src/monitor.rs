//! SQL logging through `tracing`.
//!
//! [`TracingClient`] wraps any [`GenericClient`] and emits one event per
//! statement on the `staydb.sql` target: the tag, parameter count, elapsed
//! time, and (truncated) statement text. Parameter values are never logged.
//!
//! ```rust,ignore
//! let client = TracingClient::new(pool)
//!     .with_slow_query_threshold(Duration::from_millis(200));
//! let store = Store::new(client);
//! ```

use crate::client::GenericClient;
use crate::config::StoreConfig;
use crate::error::StayResult;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

const DEFAULT_MAX_SQL_LENGTH: usize = 200;

/// A client wrapper that logs every statement it executes.
///
/// Successful statements log at `debug`. Failures, and statements slower than
/// the configured threshold, log at `warn`.
#[derive(Debug, Clone)]
pub struct TracingClient<C> {
    client: C,
    slow_query_threshold: Option<Duration>,
    max_sql_length: Option<usize>,
}

impl<C: GenericClient> TracingClient<C> {
    /// Wrap `client` with no slow-query threshold.
    pub fn new(client: C) -> Self {
        Self {
            client,
            slow_query_threshold: None,
            max_sql_length: Some(DEFAULT_MAX_SQL_LENGTH),
        }
    }

    /// Wrap `client` using the threshold from `config`.
    pub fn from_config(client: C, config: &StoreConfig) -> Self {
        Self {
            slow_query_threshold: config.slow_query_threshold(),
            ..Self::new(client)
        }
    }

    /// Log statements slower than `threshold` at `warn`.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Set maximum SQL length (in bytes) to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn display_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }

    async fn observe<T, F>(
        &self,
        tag: Option<&str>,
        sql: &str,
        param_count: usize,
        future: F,
    ) -> StayResult<T>
    where
        F: Future<Output = StayResult<T>> + Send,
    {
        let start = Instant::now();
        let result = future.await;
        let elapsed = start.elapsed();

        let tag = tag.unwrap_or("-");
        let sql = self.display_sql(sql);
        match &result {
            Err(error) => tracing::warn!(
                target: "staydb.sql",
                tag,
                param_count,
                elapsed_ms = elapsed.as_millis() as u64,
                %error,
                sql = %sql,
                "statement failed"
            ),
            Ok(_) if self.slow_query_threshold.is_some_and(|t| elapsed > t) => tracing::warn!(
                target: "staydb.sql",
                tag,
                param_count,
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %sql,
                "slow statement"
            ),
            Ok(_) => tracing::debug!(
                target: "staydb.sql",
                tag,
                param_count,
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %sql,
                "statement executed"
            ),
        }
        result
    }
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StayResult<Vec<Row>> {
        self.observe(None, sql, params.len(), self.client.query(sql, params))
            .await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StayResult<Vec<Row>> {
        self.observe(
            Some(tag),
            sql,
            params.len(),
            self.client.query_tagged(tag, sql, params),
        )
        .await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StayResult<u64> {
        self.observe(None, sql, params.len(), self.client.execute(sql, params))
            .await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StayResult<u64> {
        self.observe(
            Some(tag),
            sql,
            params.len(),
            self.client.execute_tagged(tag, sql, params),
        )
        .await
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
