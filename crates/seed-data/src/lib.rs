//! Reference and demo data seeding for the BideshGomon platform.
//!
//! This crate fills a fresh database with the reference data the platform
//! needs (countries, currencies, languages, degrees, visa types, content) and
//! optional demo content (sample customers, wallet ledgers, applications,
//! support tickets).
//!
//! Every run is idempotent: rows are matched on their natural key and
//! updated in place, so reseeding an existing database converges to the same
//! state instead of duplicating it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let pool = bidesh::database::connect(&database_url).await?;
//! let seeder = Seeder::new(Arc::new(PgRepository::new(pool)));
//! let config = SeedConfig::default();
//!
//! let plan = SeedPlan::standard();
//! plan.validate()?;
//! let summary = plan.run(&seeder, &config).await?;
//! println!("{} rows written", summary.totals().written());
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;
pub mod loaders;
pub mod sources;

pub use db::SeedError;

// Re-export core types from the platform crate
pub use bidesh::models::{Gender, RoleSlug};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{LoaderRun, SeedPlan, SeedSummary};
    pub use crate::config::SeedConfig;
    pub use crate::db::{
        LoadReport, MemoryRepository, PgRepository, Repository, Row, SeedError, Seeder, Table,
        Value,
    };
    pub use crate::generators::{LedgerGenerator, UserGenerator};
    pub use crate::loaders::{Loader, SeedContext};
    pub use crate::sources::CsvTable;
    pub use crate::{Gender, RoleSlug};
}
