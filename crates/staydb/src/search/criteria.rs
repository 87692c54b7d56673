use crate::error::{StayError, StayResult};
use serde::{Deserialize, Serialize};

/// Optional filters for a property search.
///
/// A field that is `None` places no constraint. A field that is `Some` always
/// constrains the search, including zero values: `minimum_rating: Some(0.0)`
/// still emits `average_rating >= $n`.
///
/// Prices are whole currency units; they are converted to hundredths (the
/// unit stored in `cost_per_night`) when the search is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the property's city.
    pub city: Option<String>,
    /// Owner (user) id.
    pub owner_id: Option<i32>,
    /// Inclusive lower bound on the nightly price.
    pub minimum_price_per_night: Option<i32>,
    /// Inclusive upper bound on the nightly price.
    pub maximum_price_per_night: Option<i32>,
    /// Inclusive lower bound on the average review rating.
    pub minimum_rating: Option<f64>,
}

impl FilterCriteria {
    /// Criteria with every field absent (matches every rated property).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to cities containing `city` (case-insensitive).
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Restrict to properties owned by `owner_id`.
    pub fn owner_id(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Set the inclusive minimum nightly price, in whole units.
    pub fn minimum_price_per_night(mut self, price: i32) -> Self {
        self.minimum_price_per_night = Some(price);
        self
    }

    /// Set the inclusive maximum nightly price, in whole units.
    pub fn maximum_price_per_night(mut self, price: i32) -> Self {
        self.maximum_price_per_night = Some(price);
        self
    }

    /// Set both nightly price bounds, in whole units.
    pub fn price_range(self, minimum: i32, maximum: i32) -> Self {
        self.minimum_price_per_night(minimum)
            .maximum_price_per_night(maximum)
    }

    /// Set the inclusive minimum average rating.
    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Number of fields that will contribute a predicate.
    pub fn present_count(&self) -> usize {
        [
            self.city.is_some(),
            self.owner_id.is_some(),
            self.minimum_price_per_night.is_some(),
            self.maximum_price_per_night.is_some(),
            self.minimum_rating.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Decode criteria from a JSON object.
    ///
    /// Values must already have the field's type (`"owner_id": 7`, not
    /// `"owner_id": "7"`). Unknown keys are ignored; `null` means absent.
    pub fn from_json(value: &serde_json::Value) -> StayResult<Self> {
        let criteria: Self = serde_json::from_value(value.clone())
            .map_err(|e| StayError::invalid_criteria(e.to_string()))?;
        criteria.validate()?;
        Ok(criteria)
    }

    /// Decode criteria from string pairs, as found in a query string or a
    /// submitted search form.
    ///
    /// Empty values are treated as "not supplied", since forms submit every
    /// field whether or not the user filled it in. Unknown keys are ignored;
    /// a repeated key keeps its last value.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> StayResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "city" => criteria.city = Some(value.to_string()),
                "owner_id" => criteria.owner_id = Some(parse_field(key, value)?),
                "minimum_price_per_night" => {
                    criteria.minimum_price_per_night = Some(parse_field(key, value)?);
                }
                "maximum_price_per_night" => {
                    criteria.maximum_price_per_night = Some(parse_field(key, value)?);
                }
                "minimum_rating" => criteria.minimum_rating = Some(parse_field(key, value)?),
                _ => {}
            }
        }
        criteria.validate()?;
        Ok(criteria)
    }

    /// Reject values no search can be built from.
    pub fn validate(&self) -> StayResult<()> {
        if let Some(price) = self.minimum_price_per_night {
            to_storage_units("minimum_price_per_night", price)?;
        }
        if let Some(price) = self.maximum_price_per_night {
            to_storage_units("maximum_price_per_night", price)?;
        }
        if let Some(rating) = self.minimum_rating {
            check_rating(rating)?;
        }
        Ok(())
    }
}

/// Convert whole currency units to hundredths.
pub(crate) fn to_storage_units(field: &str, price: i32) -> StayResult<i32> {
    if price < 0 {
        return Err(StayError::invalid_criteria(format!(
            "{field} must not be negative, got {price}"
        )));
    }
    price.checked_mul(100).ok_or_else(|| {
        StayError::invalid_criteria(format!("{field} is too large, got {price}"))
    })
}

pub(crate) fn check_rating(rating: f64) -> StayResult<f64> {
    if rating.is_finite() {
        Ok(rating)
    } else {
        Err(StayError::invalid_criteria(format!(
            "minimum_rating must be a finite number, got {rating}"
        )))
    }
}

fn parse_field<T: std::str::FromStr>(key: &str, value: &str) -> StayResult<T> {
    value.parse().map_err(|_| {
        StayError::invalid_criteria(format!(
            "{key}: expected {}, got {value:?}",
            std::any::type_name::<T>()
        ))
    })
}
