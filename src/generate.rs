use crate::data::{
    Transaction, MAX_PRICE, MIN_PRICE, PRICE_DIGITS, PRODUCT_CATALOG_SIZE, STORE_LOCATIONS,
};
use chrono::{DateTime, Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;
use uuid::{Builder, Uuid};

/// Generates `count` synthetic transactions dated within the year preceding `now`.
///
/// Randomness and time are both injected so that a seeded `rng` and a fixed
/// `now` always give back the same records.
pub(crate) fn generate<R: Rng>(count: usize, rng: &mut R, now: DateTime<Utc>) -> Vec<Transaction> {
    (0..count).map(|_| random_transaction(rng, now)).collect()
}

fn random_transaction<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Transaction {
    Transaction {
        order_id: random_id(rng),
        customer_id: random_id(rng),
        product_id: format!("prod_{}", rng.gen_range(1..=PRODUCT_CATALOG_SIZE)),
        price: random_price(rng),
        timestamp: now - random_age(rng),
        store_location: random_store(rng),
    }
}

fn random_store<R: Rng>(rng: &mut R) -> &'static str {
    // STORE_LOCATIONS is a non-empty const, `choose` never yields None
    STORE_LOCATIONS
        .choose(rng)
        .copied()
        .unwrap_or(STORE_LOCATIONS[0])
}

fn random_id<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

fn random_price<R: Rng>(rng: &mut R) -> Decimal {
    let cents = (rng.gen_range(MIN_PRICE..=MAX_PRICE) * 100.0).round() as i64;
    Decimal::new(cents, PRICE_DIGITS)
}

fn random_age<R: Rng>(rng: &mut R) -> Duration {
    Duration::days(rng.gen_range(0..=365))
        + Duration::hours(rng.gen_range(0..=23))
        + Duration::minutes(rng.gen_range(0..=59))
}
