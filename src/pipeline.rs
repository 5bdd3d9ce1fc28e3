use crate::{
    compute::aggregate,
    data::{Aggregates, Error},
    generate::generate,
    write::persist_aggregates,
};
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

pub const DEFAULT_ROWS: usize = 1_000_000;
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunConfig {
    pub rows: usize,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub results_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: None,
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
        }
    }
}

/// Generates, aggregates and persists one batch of transactions, returning
/// the tables that were written.
pub(crate) fn run(config: &RunConfig) -> Result<Aggregates, Error> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(rows = config.rows, "Generating synthetic sales transactions...");
    let records = generate(config.rows, &mut rng, Utc::now());
    let aggregates = aggregate(&records)?;
    persist_aggregates(&config.results_dir, &aggregates)?;
    tracing::info!(dir = %config.results_dir.display(), "Successfully generated all result files");
    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::{run, RunConfig};
    use crate::{data::Error, read::load_results};

    #[test]
    fn test_run() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RunConfig {
            rows: 1000,
            seed: Some(5),
            results_dir: tmp.path().join("results"),
        };
        let aggregates = run(&config).unwrap();
        assert_eq!(load_results(&config.results_dir).unwrap(), aggregates);
    }

    #[test]
    fn test_run_without_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RunConfig {
            rows: 0,
            seed: Some(5),
            results_dir: tmp.path().join("results"),
        };
        assert!(matches!(run(&config), Err(Error::EmptyInput)));
        assert!(!config.results_dir.exists());
    }
}
