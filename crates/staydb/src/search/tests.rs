use super::*;
use crate::error::StayError;
use crate::placeholder::placeholders;
use crate::value::Value;

fn build(criteria: &FilterCriteria, limit: Option<i64>) -> AssembledQuery {
    assemble(accumulate(criteria).unwrap(), limit).unwrap()
}

/// Criteria with the fields selected by the low five bits of `mask` present.
fn criteria_for_mask(mask: u8) -> FilterCriteria {
    let mut c = FilterCriteria::new();
    if mask & 0b00001 != 0 {
        c = c.city("Lis");
    }
    if mask & 0b00010 != 0 {
        c = c.owner_id(42);
    }
    if mask & 0b00100 != 0 {
        c = c.minimum_price_per_night(50);
    }
    if mask & 0b01000 != 0 {
        c = c.maximum_price_per_night(100);
    }
    if mask & 0b10000 != 0 {
        c = c.minimum_rating(4.0);
    }
    c
}

#[test]
fn prefix_has_no_placeholders() {
    assert!(placeholders(PROPERTY_SEARCH_PREFIX).is_empty());
}

#[test]
fn no_criteria_has_no_where_clause() {
    let q = build(&FilterCriteria::new(), Some(10));

    assert!(!q.sql().contains("WHERE"));
    assert!(q.sql().starts_with(PROPERTY_SEARCH_PREFIX));
    assert!(q.sql().ends_with("\n ORDER BY cost_per_night\n LIMIT $1"));
    assert_eq!(q.params(), &[Value::BigInt(10)]);
}

#[test]
fn missing_limit_defaults_to_ten() {
    let q = build(&FilterCriteria::new(), None);
    assert_eq!(q.params(), &[Value::BigInt(DEFAULT_LIMIT)]);
    assert_eq!(DEFAULT_LIMIT, 10);
}

#[test]
fn city_is_wrapped_in_wildcards() {
    let criteria = FilterCriteria::new().city("Lis");
    let fragments = accumulate(&criteria).unwrap();

    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].condition(), "city ILIKE $1");
    assert_eq!(fragments[0].value(), &Value::Text("%Lis%".into()));

    let q = assemble(fragments, None).unwrap();
    assert_eq!(
        q.params(),
        &[Value::Text("%Lis%".into()), Value::BigInt(10)]
    );
    assert!(q.sql().contains("\n WHERE city ILIKE $1\n ORDER BY"));
}

#[test]
fn price_bounds_are_converted_to_hundredths() {
    let criteria = FilterCriteria::new().price_range(50, 100);
    let fragments = accumulate(&criteria).unwrap();

    let conditions: Vec<&str> = fragments.iter().map(|f| f.condition()).collect();
    assert_eq!(
        conditions,
        ["cost_per_night >= $1", "cost_per_night <= $2"]
    );

    let q = assemble(fragments, Some(5)).unwrap();
    assert_eq!(
        q.params(),
        &[Value::Int(5000), Value::Int(10000), Value::BigInt(5)]
    );
    assert!(q.sql().ends_with("LIMIT $3"));
}

#[test]
fn owner_and_rating_are_joined_with_and() {
    let criteria = FilterCriteria::new().owner_id(42).minimum_rating(4.0);
    let q = build(&criteria, None);

    assert!(
        q.sql()
            .contains("\n WHERE owner_id = $1\n   AND average_rating >= $2\n"),
        "{}",
        q.sql()
    );
    assert_eq!(
        q.params(),
        &[Value::Int(42), Value::Float(4.0), Value::BigInt(10)]
    );
}

#[test]
fn all_fields_follow_the_fixed_order() {
    let q = build(&criteria_for_mask(0b11111), Some(3));

    assert!(q.sql().contains(
        "\n WHERE city ILIKE $1\
         \n   AND owner_id = $2\
         \n   AND cost_per_night >= $3\
         \n   AND cost_per_night <= $4\
         \n   AND average_rating >= $5\
         \n ORDER BY cost_per_night\
         \n LIMIT $6"
    ));
    assert_eq!(
        q.params(),
        &[
            Value::Text("%Lis%".into()),
            Value::Int(42),
            Value::Int(5000),
            Value::Int(10000),
            Value::Float(4.0),
            Value::BigInt(3),
        ]
    );
}

#[test]
fn every_subset_keeps_placeholders_and_params_aligned() {
    for mask in 0u8..32 {
        let criteria = criteria_for_mask(mask);
        let k = mask.count_ones() as usize;
        assert_eq!(criteria.present_count(), k);

        let fragments = accumulate(&criteria).unwrap();
        assert_eq!(fragments.len(), k, "mask {mask:05b}");
        let fragment_values: Vec<Value> = fragments.iter().map(|f| f.value().clone()).collect();

        let q = assemble(fragments, Some(7)).unwrap();
        let expected: Vec<usize> = (1..=k + 1).collect();
        assert_eq!(placeholders(q.sql()), expected, "mask {mask:05b}");
        assert_eq!(q.params().len(), k + 1, "mask {mask:05b}");
        assert_eq!(&q.params()[..k], fragment_values.as_slice());
        assert_eq!(q.params()[k], Value::BigInt(7));
        assert_eq!(q.sql().contains("WHERE"), k > 0, "mask {mask:05b}");
        assert_eq!(q.sql().matches(" AND ").count(), k.saturating_sub(1));
    }
}

#[test]
fn accumulate_is_idempotent() {
    let criteria = criteria_for_mask(0b10101);
    assert_eq!(
        accumulate(&criteria).unwrap(),
        accumulate(&criteria).unwrap()
    );
}

#[test]
fn zero_values_still_constrain() {
    let criteria = FilterCriteria::new()
        .minimum_price_per_night(0)
        .minimum_rating(0.0);
    let q = build(&criteria, None);

    assert_eq!(
        q.params(),
        &[Value::Int(0), Value::Float(0.0), Value::BigInt(10)]
    );
}

#[test]
fn empty_city_is_present() {
    let fragments = accumulate(&FilterCriteria::new().city("")).unwrap();
    assert_eq!(fragments[0].value(), &Value::Text("%%".into()));
}

#[test]
fn user_input_never_reaches_statement_text() {
    let criteria = FilterCriteria::new().city("x'; DROP TABLE properties; --");
    let q = build(&criteria, None);

    assert!(!q.sql().contains("DROP"));
    assert_eq!(
        q.params()[0],
        Value::Text("%x'; DROP TABLE properties; --%".into())
    );
}

#[test]
fn non_positive_limit_is_rejected() {
    for limit in [0, -1, i64::MIN] {
        let err = assemble(Vec::new(), Some(limit)).unwrap_err();
        assert!(matches!(err, StayError::InvalidLimit(n) if n == limit));
    }
}

#[test]
fn resolve_limit_keeps_positive_values() {
    assert_eq!(resolve_limit(Some(1)).unwrap(), 1);
    assert_eq!(resolve_limit(None).unwrap(), DEFAULT_LIMIT);
}

#[test]
fn negative_price_is_invalid_criteria() {
    let err = accumulate(&FilterCriteria::new().minimum_price_per_night(-1)).unwrap_err();
    assert!(matches!(err, StayError::InvalidCriteria(_)));
}

#[test]
fn price_overflowing_storage_unit_is_invalid_criteria() {
    let err = accumulate(&FilterCriteria::new().maximum_price_per_night(i32::MAX)).unwrap_err();
    assert!(matches!(err, StayError::InvalidCriteria(_)));
}

#[test]
fn non_finite_rating_is_invalid_criteria() {
    for rating in [f64::NAN, f64::INFINITY] {
        let err = accumulate(&FilterCriteria::new().minimum_rating(rating)).unwrap_err();
        assert!(matches!(err, StayError::InvalidCriteria(_)));
    }
}

#[test]
fn assemble_rejects_misnumbered_fragments() {
    let skipped = vec![PredicateFragment::new("city ILIKE $2", "%x%")];
    assert!(matches!(
        assemble(skipped, None),
        Err(StayError::InvalidCriteria(_))
    ));

    let missing = vec![PredicateFragment::new("city IS NOT NULL", Value::Null)];
    assert!(matches!(
        assemble(missing, None),
        Err(StayError::InvalidCriteria(_))
    ));

    let doubled = vec![PredicateFragment::new("cost_per_night BETWEEN $1 AND $1", 1_i32)];
    assert!(matches!(
        assemble(doubled, None),
        Err(StayError::InvalidCriteria(_))
    ));
}

#[test]
fn assemble_accepts_hand_built_fragments() {
    let fragments = vec![
        PredicateFragment::new("province = $1", "Ontario"),
        PredicateFragment::new("number_of_bedrooms >= $2", 3_i32),
    ];
    let q = assemble(fragments, Some(2)).unwrap();
    assert_eq!(placeholders(q.sql()), vec![1, 2, 3]);
}

#[test]
fn into_query_carries_statement_and_params() {
    let q = build(&FilterCriteria::new().city("Lis"), None);
    let expected_sql = q.sql().to_string();
    let query = q.into_query();

    assert_eq!(query.sql(), expected_sql);
    assert_eq!(query.params().len(), 2);
    assert!(query.validate().is_ok());
}

#[test]
fn query_pairs_skip_empty_form_fields() {
    let criteria = FilterCriteria::from_query_pairs([
        ("city", "Vancouver"),
        ("owner_id", ""),
        ("minimum_price_per_night", " 50 "),
        ("maximum_price_per_night", ""),
        ("minimum_rating", "3.5"),
        ("page", "2"),
    ])
    .unwrap();

    assert_eq!(
        criteria,
        FilterCriteria::new()
            .city("Vancouver")
            .minimum_price_per_night(50)
            .minimum_rating(3.5)
    );
}

#[test]
fn query_pairs_reject_unparseable_numbers() {
    let err = FilterCriteria::from_query_pairs([("owner_id", "abc")]).unwrap_err();
    assert!(matches!(err, StayError::InvalidCriteria(ref m) if m.contains("owner_id")));

    let err = FilterCriteria::from_query_pairs([("minimum_price_per_night", "-5")]).unwrap_err();
    assert!(matches!(err, StayError::InvalidCriteria(_)));
}

#[test]
fn json_decoding_is_strict_about_types() {
    let criteria = FilterCriteria::from_json(&serde_json::json!({
        "city": "Lis",
        "owner_id": null,
        "minimum_rating": 4,
        "sort": "price"
    }))
    .unwrap();
    assert_eq!(criteria, FilterCriteria::new().city("Lis").minimum_rating(4.0));

    let err = FilterCriteria::from_json(&serde_json::json!({ "owner_id": "42" })).unwrap_err();
    assert!(matches!(err, StayError::InvalidCriteria(_)));

    let err = FilterCriteria::from_json(&serde_json::json!({ "maximum_price_per_night": -1 }))
        .unwrap_err();
    assert!(matches!(err, StayError::InvalidCriteria(_)));
}

#[test]
fn build_property_search_runs_both_steps() {
    let q = build_property_search(&FilterCriteria::new().owner_id(7), Some(4)).unwrap();
    assert_eq!(q.params(), &[Value::Int(7), Value::BigInt(4)]);

    assert!(matches!(
        build_property_search(&FilterCriteria::new(), Some(0)),
        Err(StayError::InvalidLimit(0))
    ));
}
