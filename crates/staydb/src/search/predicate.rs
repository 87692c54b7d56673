use super::criteria::{FilterCriteria, check_rating, to_storage_units};
use crate::error::StayResult;
use crate::value::Value;

pub(crate) const CITY_COLUMN: &str = "city";
pub(crate) const OWNER_COLUMN: &str = "owner_id";
pub(crate) const COST_COLUMN: &str = "cost_per_night";
pub(crate) const RATING_COLUMN: &str = "average_rating";

/// One search condition and the value its placeholder binds.
///
/// The condition text holds exactly one placeholder, and the values are never
/// part of the text.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateFragment {
    condition: String,
    value: Value,
}

impl PredicateFragment {
    /// Create a fragment from a condition such as `"city ILIKE $1"`.
    ///
    /// [`assemble`](super::assemble) rejects a fragment whose placeholder does
    /// not match its position.
    pub fn new(condition: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            condition: condition.into(),
            value: value.into(),
        }
    }

    /// The condition text, e.g. `cost_per_night >= $2`.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// The bound value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn into_parts(self) -> (String, Value) {
        (self.condition, self.value)
    }
}

/// Numbers placeholders in emission order, starting at `$1`.
#[derive(Default)]
struct Accumulator {
    fragments: Vec<PredicateFragment>,
}

impl Accumulator {
    fn push(&mut self, column: &str, operator: &str, value: impl Into<Value>) {
        let index = self.fragments.len() + 1;
        self.fragments.push(PredicateFragment::new(
            format!("{column} {operator} ${index}"),
            value,
        ));
    }
}

/// Turn criteria into search fragments.
///
/// Fields are visited in a fixed order (`city`, `owner_id`, minimum price,
/// maximum price, `minimum_rating`) and each present field emits exactly one
/// fragment, so the same criteria always produce the same fragments.
pub fn accumulate(criteria: &FilterCriteria) -> StayResult<Vec<PredicateFragment>> {
    let mut acc = Accumulator::default();

    if let Some(city) = &criteria.city {
        acc.push(CITY_COLUMN, "ILIKE", format!("%{city}%"));
    }
    if let Some(owner_id) = criteria.owner_id {
        acc.push(OWNER_COLUMN, "=", owner_id);
    }
    if let Some(price) = criteria.minimum_price_per_night {
        acc.push(
            COST_COLUMN,
            ">=",
            to_storage_units("minimum_price_per_night", price)?,
        );
    }
    if let Some(price) = criteria.maximum_price_per_night {
        acc.push(
            COST_COLUMN,
            "<=",
            to_storage_units("maximum_price_per_night", price)?,
        );
    }
    if let Some(rating) = criteria.minimum_rating {
        acc.push(RATING_COLUMN, ">=", check_rating(rating)?);
    }

    Ok(acc.fragments)
}
