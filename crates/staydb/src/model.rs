//! Row types for users, properties, and reservations.

use crate::error::StayResult;
use crate::row::{FromRow, RowExt};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A row of `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored as supplied; hashing belongs to the authentication layer.
    #[serde(skip_serializing)]
    pub password: String,
}

impl FromRow for User {
    fn from_row(row: &Row) -> StayResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            email: row.try_get_column("email")?,
            password: row.try_get_column("password")?,
        })
    }
}

/// Input for [`Store::add_user`](crate::Store::add_user).
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A row of `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Hundredths of the currency unit.
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

impl FromRow for Property {
    fn from_row(row: &Row) -> StayResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            owner_id: row.try_get_column("owner_id")?,
            title: row.try_get_column("title")?,
            description: row.try_get_column("description")?,
            thumbnail_photo_url: row.try_get_column("thumbnail_photo_url")?,
            cover_photo_url: row.try_get_column("cover_photo_url")?,
            cost_per_night: row.try_get_column("cost_per_night")?,
            parking_spaces: row.try_get_column("parking_spaces")?,
            number_of_bathrooms: row.try_get_column("number_of_bathrooms")?,
            number_of_bedrooms: row.try_get_column("number_of_bedrooms")?,
            country: row.try_get_column("country")?,
            street: row.try_get_column("street")?,
            city: row.try_get_column("city")?,
            province: row.try_get_column("province")?,
            post_code: row.try_get_column("post_code")?,
            active: row.try_get_column("active")?,
        })
    }
}

/// Input for [`Store::add_property`](crate::Store::add_property).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Hundredths of the currency unit.
    pub cost_per_night: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// A property search result: the property plus its average review rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: f64,
}

impl PropertyListing {
    /// Nightly price in whole currency units (`cost_per_night / 100`).
    pub fn cost_per_night_in_units(&self) -> f64 {
        f64::from(self.property.cost_per_night) / 100.0
    }
}

impl FromRow for PropertyListing {
    fn from_row(row: &Row) -> StayResult<Self> {
        Ok(Self {
            property: Property::from_row(row)?,
            average_rating: row.try_get_column("average_rating")?,
        })
    }
}

/// A guest's reservation together with the reserved property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub reservation_id: i32,
    pub guest_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub property_id: i32,
    pub title: String,
    pub city: String,
    pub thumbnail_photo_url: String,
    /// Hundredths of the currency unit.
    pub cost_per_night: i32,
    /// `None` when the property has no reviews yet.
    pub average_rating: Option<f64>,
}

impl FromRow for Reservation {
    fn from_row(row: &Row) -> StayResult<Self> {
        Ok(Self {
            reservation_id: row.try_get_column("reservation_id")?,
            guest_id: row.try_get_column("guest_id")?,
            start_date: row.try_get_column("start_date")?,
            end_date: row.try_get_column("end_date")?,
            property_id: row.try_get_column("property_id")?,
            title: row.try_get_column("title")?,
            city: row.try_get_column("city")?,
            thumbnail_photo_url: row.try_get_column("thumbnail_photo_url")?,
            cost_per_night: row.try_get_column("cost_per_night")?,
            average_rating: row.try_get_column("average_rating")?,
        })
    }
}
