use crate::data::{Aggregates, Error, Table};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Basic CSV exporter for one table. The header is always written, even
/// for a table without rows.
pub(crate) fn write_table<W: std::io::Write, T: Table>(
    writer: W,
    rows: &[T],
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(T::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `rows` to `dir/T::FILE_NAME`, replacing any previous file.
///
/// Rows go to a temporary file in the same directory which is renamed over
/// the target only once fully written, so a failure leaves the previous file
/// as it was and no partial file behind.
pub(crate) fn persist_table<T: Table>(dir: &Path, rows: &[T]) -> Result<PathBuf, Error> {
    let path = dir.join(T::FILE_NAME);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    write_table(&mut tmp, rows).map_err(|source| Error::Csv {
        path: path.clone(),
        source,
    })?;
    tmp.as_file().sync_all().map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    tmp.persist(&path).map_err(|e| Error::Io {
        path: path.clone(),
        source: e.error,
    })?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Saved {}", T::FILE_NAME);
    Ok(path)
}

/// Creates `dir` if needed and writes all three tables into it.
pub(crate) fn persist_aggregates(dir: &Path, aggregates: &Aggregates) -> Result<(), Error> {
    std::fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_owned(),
        source,
    })?;
    persist_table(dir, &aggregates.revenue_by_store)?;
    persist_table(dir, &aggregates.top_products)?;
    persist_table(dir, &aggregates.monthly_sales)?;
    Ok(())
}
