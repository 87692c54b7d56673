//! Build and run a property search from `key=value` arguments.
//!
//! Run with:
//!   cargo run --example property_search -p staydb -- city=Van minimum_rating=4 limit=5
//!
//! The statement is always printed. It is executed only when the `PG_*`
//! connection variables are set (directly or through `.env`).

use anyhow::Context;
use staydb::{FilterCriteria, Store, StoreConfig, TracingClient, create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut limit = None;
    let mut pairs = Vec::new();
    for arg in std::env::args().skip(1) {
        let (key, value) = arg
            .split_once('=')
            .with_context(|| format!("expected key=value, got {arg:?}"))?;
        if key == "limit" {
            limit = Some(value.parse::<i64>().context("limit must be an integer")?);
        } else {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    let criteria = FilterCriteria::from_query_pairs(pairs)?;

    let assembled = staydb::build_property_search(&criteria, limit)?;
    println!("{}", assembled.sql());
    for (i, value) in assembled.params().iter().enumerate() {
        println!("  ${} = {:?}", i + 1, value);
    }

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("not connecting: {e}");
            return Ok(());
        }
    };

    let client = TracingClient::from_config(create_pool(&config)?, &config);
    let store = Store::from_config(client, &config)?;
    let listings = store.search_listings(&criteria, limit).await?;
    println!("\n{} result(s)", listings.len());
    for listing in &listings {
        println!(
            "#{:<4} {:<40} {:>8.2}/night  rating {:.2}  {}",
            listing.property.id,
            listing.property.title,
            listing.cost_per_night_in_units(),
            listing.average_rating,
            listing.property.city,
        );
    }
    Ok(())
}
