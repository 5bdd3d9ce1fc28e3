use crate::data::{Aggregates, Error, Table};
use std::path::Path;

/// Simple CSV importer for a persisted table. The header must match
/// `T::COLUMNS` exactly; anything else is reported as a schema mismatch
/// instead of being guessed at.
///
/// `source` only labels errors, the data comes from `reader`.
pub(crate) fn read_table<R: std::io::Read, T: Table>(
    reader: R,
    source: &Path,
) -> Result<Vec<T>, Error> {
    let csv_err = |e| Error::Csv {
        path: source.to_owned(),
        source: e,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let found: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_owned)
        .collect();
    if found != T::COLUMNS {
        return Err(Error::SchemaMismatch {
            path: source.to_owned(),
            expected: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }
    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Reads `dir/T::FILE_NAME`; an absent file is `Error::MissingFile`.
pub(crate) fn load_table<T: Table>(dir: &Path) -> Result<Vec<T>, Error> {
    let path = dir.join(T::FILE_NAME);
    let file = std::fs::File::open(&path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Error::MissingFile(path.clone()),
        _ => Error::Io {
            path: path.clone(),
            source,
        },
    })?;
    read_table(file, &path)
}

/// Loads the three tables written by `persist_aggregates`.
pub(crate) fn load_results(dir: &Path) -> Result<Aggregates, Error> {
    Ok(Aggregates {
        revenue_by_store: load_table(dir)?,
        top_products: load_table(dir)?,
        monthly_sales: load_table(dir)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{load_results, read_table};
    use crate::{
        compute::aggregate,
        data::{Error, MonthlySales, StoreRevenue},
        generate::generate,
        write::persist_aggregates,
    };
    use chrono::Utc;
    use rand::{rngs::StdRng, SeedableRng};
    use rust_decimal_macros::dec;
    use std::path::Path;

    #[test]
    fn read_revenue() {
        let csv = b"\
store_location, total_revenue
Hong Kong,      1234.5
Dubai,          99.99
";
        let rows: Vec<StoreRevenue> = read_table(&csv[..], Path::new("memory")).unwrap();
        assert_eq!(
            rows,
            [
                StoreRevenue {
                    store_location: "Hong Kong".into(),
                    total_revenue: dec!(1234.50),
                },
                StoreRevenue {
                    store_location: "Dubai".into(),
                    total_revenue: dec!(99.99),
                },
            ]
        )
    }

    #[test]
    fn read_rejects_unexpected_columns() {
        let csv = b"SALE_YEAR,sale_month,monthly_revenue\n2024,1,10.00\n";
        match read_table::<_, MonthlySales>(&csv[..], Path::new("memory")) {
            Err(Error::SchemaMismatch { found, .. }) => {
                assert_eq!(found, ["SALE_YEAR", "sale_month", "monthly_revenue"])
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn read_rejects_bad_values() {
        let csv = b"sale_year,sale_month,monthly_revenue\n2024,January,10.00\n";
        assert!(matches!(
            read_table::<_, MonthlySales>(&csv[..], Path::new("memory")),
            Err(Error::Csv { .. })
        ));
    }

    #[test]
    fn load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        match load_results(tmp.path()) {
            Err(Error::MissingFile(path)) => {
                assert_eq!(path, tmp.path().join("revenue_by_store.csv"))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn persisted_tables_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let records = generate(1000, &mut StdRng::seed_from_u64(99), Utc::now());
        let aggregates = aggregate(&records).unwrap();
        persist_aggregates(tmp.path(), &aggregates).unwrap();
        assert_eq!(load_results(tmp.path()).unwrap(), aggregates);
    }
}
