use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Fractional digits kept on every price.
pub const PRICE_DIGITS: u32 = 2;
pub const MIN_PRICE: f64 = 10.0;
pub const MAX_PRICE: f64 = 500.0;

/// Products are named `prod_1` up to `prod_{PRODUCT_CATALOG_SIZE}`.
pub const PRODUCT_CATALOG_SIZE: u32 = 100;

pub const STORE_LOCATIONS: [&str; 10] = [
    "New York",
    "London",
    "Tokyo",
    "Paris",
    "Singapore",
    "Sydney",
    "Dubai",
    "Hong Kong",
    "Shanghai",
    "Los Angeles",
];

/// One synthetic sales event. Every field is always populated, there is
/// no optional data in a generated transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub store_location: &'static str,
}

/// Row of `revenue_by_store.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoreRevenue {
    pub store_location: String,
    pub total_revenue: Decimal,
}

/// Row of `top_products.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProductSales {
    pub product_id: String,
    pub sales_count: u64,
}

/// Row of `monthly_sales.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MonthlySales {
    pub sale_year: i32,
    pub sale_month: u32,
    pub monthly_revenue: Decimal,
}

/// The three summary tables computed from one batch of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Aggregates {
    pub revenue_by_store: Vec<StoreRevenue>,
    pub top_products: Vec<ProductSales>,
    pub monthly_sales: Vec<MonthlySales>,
}

/// A persisted table: its file name and the exact header it is written with.
pub(crate) trait Table: Serialize + serde::de::DeserializeOwned {
    const FILE_NAME: &'static str;
    const COLUMNS: &'static [&'static str];
}

impl Table for StoreRevenue {
    const FILE_NAME: &'static str = "revenue_by_store.csv";
    const COLUMNS: &'static [&'static str] = &["store_location", "total_revenue"];
}

impl Table for ProductSales {
    const FILE_NAME: &'static str = "top_products.csv";
    const COLUMNS: &'static [&'static str] = &["product_id", "sales_count"];
}

impl Table for MonthlySales {
    const FILE_NAME: &'static str = "monthly_sales.csv";
    const COLUMNS: &'static [&'static str] = &["sale_year", "sale_month", "monthly_revenue"];
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("No transactions to aggregate")]
    EmptyInput,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Result file {0} not found")]
    MissingFile(PathBuf),
    #[error("Unexpected columns in {path} (expected {expected:?}, found {found:?})")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
}
