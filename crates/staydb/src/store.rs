//! Repository over an injected [`GenericClient`].

use crate::client::GenericClient;
use crate::config::StoreConfig;
use crate::error::StayResult;
use crate::model::{NewProperty, NewUser, Property, PropertyListing, Reservation, User};
use crate::query::query;
use crate::row::FromRow;
use crate::search::{DEFAULT_LIMIT, FilterCriteria, build_property_search, resolve_limit};
use tokio_postgres::Row;

const USER_BY_EMAIL: &str = "SELECT * FROM users WHERE email = $1";

const USER_BY_ID: &str = "SELECT * FROM users WHERE id = $1";

const INSERT_USER: &str = "INSERT INTO users (name, email, password)
VALUES ($1, $2, $3)
RETURNING *";

const RESERVATIONS_BY_GUEST: &str = "WITH property_avg_rating AS (
  SELECT property_id,
         AVG(rating)::float8 AS average_rating
    FROM property_reviews
   GROUP BY property_id
)
SELECT r.id AS reservation_id,
       r.guest_id,
       r.start_date,
       r.end_date,
       p.id AS property_id,
       p.title,
       p.city,
       p.thumbnail_photo_url,
       p.cost_per_night,
       ar.average_rating
  FROM reservations r
  JOIN properties p ON p.id = r.property_id
  LEFT JOIN property_avg_rating ar ON p.id = ar.property_id
 WHERE r.guest_id = $1
 ORDER BY r.start_date
 LIMIT $2";

const INSERT_PROPERTY: &str = "INSERT INTO properties (
  owner_id,
  title,
  description,
  thumbnail_photo_url,
  cover_photo_url,
  cost_per_night,
  country,
  street,
  city,
  province,
  post_code,
  parking_spaces,
  number_of_bathrooms,
  number_of_bedrooms
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
RETURNING *";

/// Data access for users, reservations, and properties.
///
/// The store owns whatever executes its statements: a pool, a single
/// connection, a transaction, or a [`TracingClient`](crate::TracingClient)
/// around any of them. Nothing is shared through globals.
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::from_env()?;
/// let store = Store::from_config(staydb::create_pool(&config)?, &config)?;
///
/// let user = store.get_user_with_email("Alice@Example.com").await?;
/// let rows = store
///     .get_all_properties(&FilterCriteria::new().city("Lis"), None)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Store<C> {
    client: C,
    default_limit: i64,
}

impl<C: GenericClient> Store<C> {
    /// Create a store over `client`.
    pub fn new(client: C) -> Self {
        Self {
            client,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Create a store over `client` using the default limit from `config`.
    pub fn from_config(client: C, config: &StoreConfig) -> StayResult<Self> {
        Self::new(client).with_default_limit(config.default_limit)
    }

    /// Override the limit applied when a caller passes `None`.
    pub fn with_default_limit(mut self, limit: i64) -> StayResult<Self> {
        self.default_limit = resolve_limit(Some(limit))?;
        Ok(self)
    }

    /// The limit applied when a caller passes `None`.
    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }

    /// Borrow the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Take back the underlying client.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn limit_or_default(&self, limit: Option<i64>) -> StayResult<i64> {
        resolve_limit(Some(limit.unwrap_or(self.default_limit)))
    }

    // ==================== Users ====================

    /// Look up a user by email. The email is matched lower-cased.
    pub async fn get_user_with_email(&self, email: &str) -> StayResult<Option<User>> {
        query(USER_BY_EMAIL)
            .bind(email.to_lowercase())
            .tag("users.by_email")
            .fetch_opt_as(&self.client)
            .await
    }

    /// Look up a user by id.
    pub async fn get_user_with_id(&self, id: i32) -> StayResult<Option<User>> {
        query(USER_BY_ID)
            .bind(id)
            .tag("users.by_id")
            .fetch_opt_as(&self.client)
            .await
    }

    /// Insert a user and return the stored row.
    pub async fn add_user(&self, user: &NewUser) -> StayResult<User> {
        query(INSERT_USER)
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password.as_str())
            .tag("users.insert")
            .fetch_one_as(&self.client)
            .await
    }

    // ==================== Reservations ====================

    /// A guest's reservations, earliest start date first.
    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: Option<i64>,
    ) -> StayResult<Vec<Reservation>> {
        let limit = self.limit_or_default(limit)?;
        query(RESERVATIONS_BY_GUEST)
            .bind(guest_id)
            .bind(limit)
            .tag("reservations.by_guest")
            .fetch_all_as(&self.client)
            .await
    }

    // ==================== Properties ====================

    /// Search properties and return the rows unmodified.
    ///
    /// See [`search`](crate::search) for how `criteria` becomes SQL.
    pub async fn get_all_properties(
        &self,
        criteria: &FilterCriteria,
        limit: Option<i64>,
    ) -> StayResult<Vec<Row>> {
        let limit = self.limit_or_default(limit)?;
        build_property_search(criteria, Some(limit))?
            .fetch_all(&self.client)
            .await
    }

    /// Search properties and map each row to `T`.
    pub async fn get_all_properties_as<T: FromRow>(
        &self,
        criteria: &FilterCriteria,
        limit: Option<i64>,
    ) -> StayResult<Vec<T>> {
        let limit = self.limit_or_default(limit)?;
        build_property_search(criteria, Some(limit))?
            .fetch_all_as(&self.client)
            .await
    }

    /// Search properties as [`PropertyListing`]s.
    pub async fn search_listings(
        &self,
        criteria: &FilterCriteria,
        limit: Option<i64>,
    ) -> StayResult<Vec<PropertyListing>> {
        self.get_all_properties_as(criteria, limit).await
    }

    /// Insert a property and return the stored row.
    pub async fn add_property(&self, property: &NewProperty) -> StayResult<Property> {
        query(INSERT_PROPERTY)
            .bind(property.owner_id)
            .bind(property.title.as_str())
            .bind(property.description.as_deref())
            .bind(property.thumbnail_photo_url.as_str())
            .bind(property.cover_photo_url.as_str())
            .bind(property.cost_per_night)
            .bind(property.country.as_str())
            .bind(property.street.as_str())
            .bind(property.city.as_str())
            .bind(property.province.as_str())
            .bind(property.post_code.as_str())
            .bind(property.parking_spaces)
            .bind(property.number_of_bathrooms)
            .bind(property.number_of_bedrooms)
            .tag("properties.insert")
            .fetch_one_as(&self.client)
            .await
    }
}
