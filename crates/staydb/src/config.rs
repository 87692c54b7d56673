//! Connection and store settings.

use crate::error::{StayError, StayResult};
use crate::search::DEFAULT_LIMIT;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Settings for connecting to the store.
///
/// Load them from the environment with [`StoreConfig::from_env`] or from a
/// TOML document with [`StoreConfig::from_toml_str`]:
///
/// ```toml
/// host = "localhost"
/// port = 5432
/// user = "vagrant"
/// password = "123"
/// database = "lightbnb"
/// max_pool_size = 8
/// ```
#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    pub database: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
    /// Limit applied to list queries when the caller supplies none.
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    /// Statements slower than this are logged at `warn`.
    #[serde(default)]
    pub slow_query_threshold_ms: Option<u64>,
}

fn default_port() -> u16 {
    5432
}

fn default_max_pool_size() -> usize {
    16
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("max_pool_size", &self.max_pool_size)
            .field("default_limit", &self.default_limit)
            .field("slow_query_threshold_ms", &self.slow_query_threshold_ms)
            .finish()
    }
}

impl StoreConfig {
    /// Read `PG_HOST`, `PG_PORT`, `PG_USER`, `PG_PASSWORD`, `PG_DATABASE`, and
    /// optionally `PG_POOL_MAX_SIZE`, after loading `.env` if one exists.
    pub fn from_env() -> StayResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from a variable lookup (`PG_*` names, as in [`from_env`](Self::from_env)).
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> StayResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StayError::config(format!("{key} is not set")))
        };
        let parsed = |key: &str| -> StayResult<Option<u64>> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(|v| {
                    v.parse()
                        .map_err(|_| StayError::config(format!("{key}: expected a number, got {v:?}")))
                })
                .transpose()
        };

        let port = match parsed("PG_PORT")? {
            Some(p) => u16::try_from(p)
                .map_err(|_| StayError::config(format!("PG_PORT out of range: {p}")))?,
            None => default_port(),
        };
        let max_pool_size = match parsed("PG_POOL_MAX_SIZE")? {
            Some(n) => usize::try_from(n)
                .map_err(|_| StayError::config(format!("PG_POOL_MAX_SIZE out of range: {n}")))?,
            None => default_max_pool_size(),
        };

        let config = Self {
            host: required("PG_HOST")?,
            port,
            user: required("PG_USER")?,
            password: lookup("PG_PASSWORD"),
            database: required("PG_DATABASE")?,
            max_pool_size,
            default_limit: DEFAULT_LIMIT,
            slow_query_threshold_ms: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> StayResult<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| StayError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> StayResult<()> {
        if self.max_pool_size == 0 {
            return Err(StayError::config("max_pool_size must be at least 1"));
        }
        if self.default_limit <= 0 {
            return Err(StayError::config(format!(
                "default_limit must be positive, got {}",
                self.default_limit
            )));
        }
        Ok(())
    }

    /// Slow statement threshold, if configured.
    pub fn slow_query_threshold(&self) -> Option<Duration> {
        self.slow_query_threshold_ms.map(Duration::from_millis)
    }

    /// Connection settings for `tokio-postgres`.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(&self.database);
        if let Some(password) = &self.password {
            pg.password(password);
        }
        pg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_pg_variables() {
        let config = StoreConfig::from_vars(vars(&[
            ("PG_HOST", "db.internal"),
            ("PG_PORT", "6543"),
            ("PG_USER", "vagrant"),
            ("PG_PASSWORD", "123"),
            ("PG_DATABASE", "lightbnb"),
        ]))
        .unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.password.as_deref(), Some("123"));
        assert_eq!(config.max_pool_size, 16);
        assert_eq!(config.default_limit, 10);
    }

    #[test]
    fn missing_host_is_a_config_error() {
        let err = StoreConfig::from_vars(vars(&[("PG_USER", "u"), ("PG_DATABASE", "d")]))
            .unwrap_err();
        assert!(matches!(err, StayError::Config(ref m) if m.contains("PG_HOST")));
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let err = StoreConfig::from_vars(vars(&[
            ("PG_HOST", "h"),
            ("PG_PORT", "70000"),
            ("PG_USER", "u"),
            ("PG_DATABASE", "d"),
        ]))
        .unwrap_err();
        assert!(matches!(err, StayError::Config(_)));
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
            host = "localhost"
            user = "vagrant"
            database = "lightbnb"
            slow_query_threshold_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 5432);
        assert_eq!(config.password, None);
        assert_eq!(config.slow_query_threshold(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn toml_rejects_non_positive_default_limit() {
        let err = StoreConfig::from_toml_str(
            r#"
            host = "localhost"
            user = "vagrant"
            database = "lightbnb"
            default_limit = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, StayError::Config(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let config = StoreConfig::from_vars(vars(&[
            ("PG_HOST", "h"),
            ("PG_USER", "u"),
            ("PG_PASSWORD", "hunter2"),
            ("PG_DATABASE", "d"),
        ]))
        .unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }
}
