//! # staydb
//!
//! PostgreSQL data access for a vacation-rental store.
//!
//! ## Features
//!
//! - **Filtered property search**: optional criteria become a parameterized
//!   statement over properties joined with their average review rating
//! - **Bound parameters only**: user input never appears in statement text
//! - **Injected execution**: a [`Store`] runs on whatever [`GenericClient`] it
//!   is given (a pool, a connection, a transaction, or a [`TracingClient`])
//! - **Type-safe mapping**: Row → Struct via the [`FromRow`] trait
//!
//! ## Property search
//!
//! ```ignore
//! use staydb::{FilterCriteria, Store, StoreConfig, TracingClient, create_pool};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::new(TracingClient::from_config(create_pool(&config)?, &config));
//!
//! let criteria = FilterCriteria::new()
//!     .city("Van")
//!     .price_range(50, 150)
//!     .minimum_rating(4.0);
//!
//! for listing in store.search_listings(&criteria, Some(20)).await? {
//!     println!("{} {:.2}", listing.property.title, listing.cost_per_night_in_units());
//! }
//! ```
//!
//! The statement can also be built without a database:
//!
//! ```ignore
//! let assembled = staydb::search::build_property_search(&criteria, None)?;
//! println!("{}", assembled.sql());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod placeholder;
pub mod query;
pub mod row;
pub mod search;
pub mod store;
pub mod value;

#[cfg(feature = "pool")]
pub mod pool;

pub use client::GenericClient;
pub use config::StoreConfig;
pub use error::{StayError, StayResult};
pub use model::{NewProperty, NewUser, Property, PropertyListing, Reservation, User};
pub use monitor::TracingClient;
pub use placeholder::placeholders;
pub use query::{Query, query};
pub use row::{FromRow, RowExt};
pub use search::{
    AssembledQuery, FilterCriteria, PredicateFragment, accumulate, assemble,
    build_property_search, search_properties, search_properties_as,
};
pub use store::Store;
pub use value::{ParamList, Value};

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_url, create_pool_with_manager_config};

// Re-export tokio_postgres for convenience
pub use tokio_postgres;
