//! Connection pool utilities

use crate::config::StoreConfig;
use crate::error::{StayError, StayResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a connection pool from [`StoreConfig`] without TLS.
///
/// # Example
///
/// ```ignore
/// let pool = staydb::create_pool(&StoreConfig::from_env()?)?;
/// let store = Store::new(pool);
/// ```
pub fn create_pool(config: &StoreConfig) -> StayResult<Pool> {
    create_pool_with_manager_config(
        config.to_pg_config(),
        NoTls,
        default_manager_config(),
        |builder| builder.max_size(config.max_pool_size),
    )
}

/// Create a connection pool from a database URL.
pub fn create_pool_from_url(database_url: &str, max_size: usize) -> StayResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| StayError::Connection(e.to_string()))?;
    create_pool_with_manager_config(pg_config, NoTls, default_manager_config(), |builder| {
        builder.max_size(max_size)
    })
}

/// Create a connection pool with a TLS connector and injected pool tuning.
pub fn create_pool_with_manager_config<T>(
    pg_config: tokio_postgres::Config,
    tls: T,
    manager_config: ManagerConfig,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> StayResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let mgr = Manager::from_config(pg_config, tls, manager_config);
    configure_pool(Pool::builder(mgr))
        .build()
        .map_err(|e| StayError::Pool(e.to_string()))
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}
