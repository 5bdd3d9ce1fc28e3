use crate::{
    data::{Aggregates, Error, StoreRevenue},
    read::load_results,
    write::write_table,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use std::{io::Write, path::Path};

/// Widest bar drawn by the text charts, in characters.
const BAR_WIDTH: usize = 40;

/// Terminal rendition of the persisted tables: KPIs, bar charts and the raw
/// data.
#[derive(Debug)]
pub(crate) struct Dashboard {
    tables: Aggregates,
}

impl Dashboard {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            tables: load_results(dir)?,
        })
    }

    pub fn total_revenue(&self) -> Decimal {
        self.tables
            .revenue_by_store
            .iter()
            .map(|row| row.total_revenue)
            .sum()
    }

    /// Store with the highest revenue; the first one listed wins a tie.
    pub fn top_store(&self) -> Option<&StoreRevenue> {
        self.tables
            .revenue_by_store
            .iter()
            .reduce(|best, row| {
                if row.total_revenue > best.total_revenue {
                    row
                } else {
                    best
                }
            })
    }

    pub fn render<W: Write>(&self, mut out: W) -> Result<(), anyhow::Error> {
        let tables = &self.tables;
        writeln!(out, "Sales Analysis Dashboard")?;
        writeln!(out)?;
        writeln!(out, "== Key Performance Indicators")?;
        writeln!(out, "Total Revenue:        {}", money(self.total_revenue()))?;
        if let Some(top) = self.top_store() {
            writeln!(
                out,
                "Top Performing Store: {} ({})",
                top.store_location,
                money(top.total_revenue)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "== Total Revenue by Store Location")?;
        let bars: Vec<_> = tables
            .revenue_by_store
            .iter()
            .map(|row| (row.store_location.clone(), row.total_revenue, money(row.total_revenue)))
            .collect();
        draw_bars(&mut out, &bars)?;

        writeln!(out)?;
        writeln!(out, "== Top 10 Best-Selling Products")?;
        let bars: Vec<_> = tables
            .top_products
            .iter()
            .map(|row| {
                (
                    row.product_id.clone(),
                    Decimal::from(row.sales_count),
                    row.sales_count.to_string(),
                )
            })
            .collect();
        draw_bars(&mut out, &bars)?;

        writeln!(out)?;
        writeln!(out, "== Monthly Sales Trend for the Last Year")?;
        let bars: Vec<_> = tables
            .monthly_sales
            .iter()
            .map(|row| {
                (
                    format!("{}-{:02}", row.sale_year, row.sale_month),
                    row.monthly_revenue,
                    money(row.monthly_revenue),
                )
            })
            .collect();
        draw_bars(&mut out, &bars)?;

        writeln!(out)?;
        writeln!(out, "== Raw Data Tables")?;
        write_table(&mut out, &tables.revenue_by_store)?;
        writeln!(out)?;
        write_table(&mut out, &tables.top_products)?;
        writeln!(out)?;
        write_table(&mut out, &tables.monthly_sales)?;
        Ok(())
    }
}

/// Loads and renders the dashboard for `dir`. Missing result files are not an
/// error here: the user is told to run the pipeline first.
pub(crate) fn show<W: Write>(dir: &Path, mut out: W) -> Result<(), anyhow::Error> {
    match Dashboard::load(dir) {
        Ok(dashboard) => dashboard.render(out),
        Err(Error::MissingFile(path)) => {
            tracing::warn!(path = %path.display(), "result file missing");
            writeln!(
                out,
                "Could not load data: {} was not found. Please run the pipeline first (`sales run`) to generate the results.",
                path.display()
            )?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// One horizontal bar per `(label, value, caption)`, scaled to the largest value.
fn draw_bars<W: Write>(out: &mut W, bars: &[(String, Decimal, String)]) -> std::io::Result<()> {
    let max = bars
        .iter()
        .map(|(_, value, _)| *value)
        .max()
        .unwrap_or_default();
    let label_width = bars.iter().map(|(label, ..)| label.len()).max().unwrap_or(0);
    for (label, value, caption) in bars {
        let len = if max > Decimal::ZERO {
            (*value * Decimal::from(BAR_WIDTH) / max)
                .round()
                .to_usize()
                .unwrap_or(0)
        } else {
            0
        };
        writeln!(
            out,
            "{label:<label_width$} | {} {caption}",
            "#".repeat(len)
        )?;
    }
    Ok(())
}

/// `$1,234,567.89`
fn money(amount: Decimal) -> String {
    let text = amount.round_dp(2).abs().to_string();
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let mut grouped = String::new();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac:0<2}")
}

#[cfg(test)]
mod tests {
    use super::{money, show, Dashboard};
    use crate::{
        data::{Aggregates, MonthlySales, ProductSales, StoreRevenue},
        write::persist_aggregates,
    };
    use rust_decimal_macros::dec;

    fn persisted() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let aggregates = Aggregates {
            revenue_by_store: vec![
                StoreRevenue {
                    store_location: "Singapore".into(),
                    total_revenue: dec!(2000.00),
                },
                StoreRevenue {
                    store_location: "Los Angeles".into(),
                    total_revenue: dec!(1000.50),
                },
            ],
            top_products: vec![
                ProductSales {
                    product_id: "prod_7".into(),
                    sales_count: 4,
                },
                ProductSales {
                    product_id: "prod_8".into(),
                    sales_count: 2,
                },
            ],
            monthly_sales: vec![MonthlySales {
                sale_year: 2024,
                sale_month: 3,
                monthly_revenue: dec!(3000.50),
            }],
        };
        persist_aggregates(tmp.path(), &aggregates).unwrap();
        tmp
    }

    #[test]
    fn test_money() {
        assert_eq!(money(dec!(0)), "$0.00");
        assert_eq!(money(dec!(999.5)), "$999.50");
        assert_eq!(money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(money(dec!(-1000)), "-$1,000.00");
        // half to even on the cent carries into a new digit group
        assert_eq!(money(dec!(999999.995)), "$1,000,000.00");
        assert_eq!(money(dec!(0.125)), "$0.12");
    }

    #[test]
    fn test_kpis() {
        let tmp = persisted();
        let dashboard = Dashboard::load(tmp.path()).unwrap();
        assert_eq!(dashboard.total_revenue(), dec!(3000.50));
        assert_eq!(dashboard.top_store().unwrap().store_location, "Singapore");
    }

    #[test]
    fn test_render() {
        let tmp = persisted();
        let mut out = Vec::new();
        show(tmp.path(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total Revenue:        $3,000.50"));
        assert!(text.contains("Top Performing Store: Singapore ($2,000.00)"));
        assert!(text.contains(&format!("Singapore   | {} $2,000.00", "#".repeat(40))));
        assert!(text.contains(&format!("prod_8 | {} 2", "#".repeat(20))));
        assert!(text.contains("2024-03 |"));
        assert!(text.contains("product_id,sales_count\nprod_7,4\nprod_8,2\n"));
    }

    #[test]
    fn test_missing_results_degrade_to_message() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        show(tmp.path(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Could not load data"));
        assert!(text.contains("run the pipeline first"));
    }

    #[test]
    fn test_schema_mismatch_is_an_error() {
        let tmp = persisted();
        std::fs::write(
            tmp.path().join("top_products.csv"),
            "Product_ID,count\nprod_1,3\n",
        )
        .unwrap();
        assert!(show(tmp.path(), Vec::new()).is_err());
    }
}
