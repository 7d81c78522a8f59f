//! Seed loaders.
//!
//! A loader turns literal data (or a CSV resource) into rows. Reference
//! loaders have no parents; dependent loaders resolve parents by natural key
//! first and skip, with a warning, any child whose parent is missing.
//!
//! Every loader declares the tables it [`requires`](Loader::requires) and
//! [`provides`](Loader::provides) so a [`SeedPlan`](crate::builders::SeedPlan)
//! can check its order before running.

use std::path::PathBuf;

use async_trait::async_trait;
use rand::rngs::StdRng;
use time::OffsetDateTime;
use tracing::warn;

use crate::config::SeedConfig;
use crate::db::{LoadReport, SeedError, Seeder, Table};
use crate::generators::demo::loader_rng;
use crate::sources::CsvTable;

pub mod accounts;
pub mod agencies;
pub mod blog;
pub mod content;
pub mod education;
pub mod geography;
pub mod support;
pub mod taxonomy;
pub mod visas;
pub mod wallets;

/// Shared state handed to each loader.
pub struct SeedContext<'a> {
    pub seeder: &'a Seeder,
    pub config: &'a SeedConfig,
    /// Reference instant for every "N days ago" value in a run.
    pub now: OffsetDateTime,
    rng: StdRng,
}

impl<'a> SeedContext<'a> {
    pub fn new(seeder: &'a Seeder, config: &'a SeedConfig) -> Self {
        Self {
            seeder,
            config,
            now: OffsetDateTime::now_utc(),
            rng: loader_rng(config.rng_seed, ""),
        }
    }

    /// Switches the random stream to the one owned by `loader`.
    pub fn enter(&mut self, loader: &str) {
        self.rng = loader_rng(self.config.rng_seed, loader);
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// One seeding step.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Name used on the command line and in logs.
    fn name(&self) -> &'static str;

    /// Tables that must be populated before this loader runs.
    fn requires(&self) -> &'static [Table] {
        &[]
    }

    /// Tables this loader writes.
    fn provides(&self) -> &'static [Table];

    /// Demo loaders produce sample content rather than reference data.
    fn is_demo(&self) -> bool {
        false
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError>;
}

/// Opens a loader's CSV resource.
///
/// A missing file is reported and yields `None` so the loader can return an
/// empty report instead of failing the run.
pub(crate) fn open_csv(loader: &str, path: PathBuf) -> Result<Option<CsvTable>, SeedError> {
    match CsvTable::load_file(&path) {
        Ok(csv) => Ok(Some(csv)),
        Err(SeedError::MissingResource(path)) => {
            warn!("{loader}: resource {} not found, skipping", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Every loader, in canonical dependency order.
pub fn all() -> Vec<Box<dyn Loader>> {
    vec![
        // Reference tables
        Box::new(geography::CountriesLoader),
        Box::new(geography::CurrenciesLoader),
        Box::new(education::DegreesLoader),
        Box::new(education::LanguagesLoader),
        Box::new(education::LanguageTestsLoader),
        Box::new(geography::CitiesLoader),
        Box::new(taxonomy::AgencyTypesLoader),
        Box::new(education::InstitutionTypesLoader),
        Box::new(taxonomy::RelationshipTypesLoader),
        Box::new(taxonomy::SkillsLoader),
        Box::new(content::SettingsLoader),
        Box::new(content::EmailTemplatesLoader),
        Box::new(content::MenusLoader),
        Box::new(content::SeoSettingsLoader),
        Box::new(content::AdsLoader),
        Box::new(blog::BlogTaxonomyLoader),
        // Accounts
        Box::new(accounts::RolesLoader),
        Box::new(accounts::UsersLoader),
        Box::new(accounts::SampleUsersLoader),
        // Feature tables
        Box::new(agencies::AgenciesLoader),
        Box::new(education::UniversitiesLoader),
        Box::new(education::CoursesLoader),
        Box::new(visas::RequiredDocumentsLoader),
        Box::new(visas::VisaTypesLoader),
        Box::new(visas::TouristVisasLoader),
        Box::new(blog::BlogPostsLoader),
        Box::new(support::TranslationsLoader),
        // Demo activity
        Box::new(wallets::WalletTransactionsLoader),
        Box::new(visas::VisaApplicationsLoader),
        Box::new(visas::ServiceApplicationsLoader),
        Box::new(support::SupportTicketsLoader),
    ]
}
