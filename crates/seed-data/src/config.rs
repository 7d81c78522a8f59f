//! Configuration for seeding runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name of the country reference resource.
pub const COUNTRIES_CSV: &str = "countries_complete.csv";

/// File name of the language test reference resource.
pub const LANGUAGE_TESTS_CSV: &str = "language_tests.csv";

/// Configuration for seeding operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Directory holding the CSV resources.
    pub data_dir: PathBuf,

    /// Seed for the demo value generator. Same seed, same demo data.
    pub rng_seed: u64,

    /// Number of generated sample customers on top of the fixed demo accounts.
    pub sample_user_count: usize,

    /// Ledger entries generated per wallet (range).
    pub transactions_per_wallet: (usize, usize),

    /// Whether to load demo content (sample users, applications, tickets,
    /// ledgers). Reference data is always loaded.
    pub include_demo: bool,

    /// Progress is logged every `batch_size` rows.
    pub batch_size: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            rng_seed: 20240101,
            sample_user_count: 12,
            transactions_per_wallet: (3, 8),
            include_demo: true,
            batch_size: 50,
        }
    }
}

impl SeedConfig {
    pub fn countries_csv(&self) -> PathBuf {
        self.data_dir.join(COUNTRIES_CSV)
    }

    pub fn language_tests_csv(&self) -> PathBuf {
        self.data_dir.join(LANGUAGE_TESTS_CSV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resources_exist() {
        let config = SeedConfig::default();
        assert!(config.countries_csv().exists());
        assert!(config.language_tests_csv().exists());
    }
}
