use crate::data::{Aggregates, Error, MonthlySales, ProductSales, StoreRevenue, Transaction};
use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// How many rows `top_products` keeps.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Computes the three summary tables over one batch of transactions.
///
/// An empty batch has no most recent year to report monthly sales for, so it
/// is rejected with `Error::EmptyInput` rather than producing a partial result.
pub(crate) fn aggregate(records: &[Transaction]) -> Result<Aggregates, Error> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }
    tracing::info!("Analyzing revenue by store...");
    let revenue_by_store = revenue_by_store(records);
    tracing::info!("Analyzing top products...");
    let top_products = top_products(records);
    tracing::info!("Analyzing monthly sales trend...");
    let monthly_sales = monthly_sales(records)?;
    Ok(Aggregates {
        revenue_by_store,
        top_products,
        monthly_sales,
    })
}

/// Total revenue per store, highest first. Stores with equal revenue keep
/// the order in which they were first seen.
pub(crate) fn revenue_by_store(records: &[Transaction]) -> Vec<StoreRevenue> {
    let mut rows: Vec<StoreRevenue> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for tx in records {
        let i = *index.entry(tx.store_location).or_insert_with(|| {
            rows.push(StoreRevenue {
                store_location: tx.store_location.to_owned(),
                total_revenue: Decimal::ZERO,
            });
            rows.len() - 1
        });
        rows[i].total_revenue += tx.price;
    }
    // stable: ties stay in first-encounter order
    rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    rows
}

/// The `TOP_PRODUCTS_LIMIT` products sold most often, most sold first.
pub(crate) fn top_products(records: &[Transaction]) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for tx in records {
        let i = *index.entry(tx.product_id.as_str()).or_insert_with(|| {
            rows.push(ProductSales {
                product_id: tx.product_id.clone(),
                sales_count: 0,
            });
            rows.len() - 1
        });
        rows[i].sales_count += 1;
    }
    rows.sort_by(|a, b| b.sales_count.cmp(&a.sales_count));
    rows.truncate(TOP_PRODUCTS_LIMIT);
    rows
}

/// Revenue per calendar month (UTC) of the most recent year in the batch,
/// in month order.
pub(crate) fn monthly_sales(records: &[Transaction]) -> Result<Vec<MonthlySales>, Error> {
    let year = records
        .iter()
        .map(|tx| tx.timestamp.year())
        .max()
        .ok_or(Error::EmptyInput)?;
    let mut months: BTreeMap<u32, Decimal> = BTreeMap::new();
    for tx in records.iter().filter(|tx| tx.timestamp.year() == year) {
        *months.entry(tx.timestamp.month()).or_default() += tx.price;
    }
    Ok(months
        .into_iter()
        .map(|(sale_month, monthly_revenue)| MonthlySales {
            sale_year: year,
            sale_month,
            monthly_revenue,
        })
        .collect())
}
