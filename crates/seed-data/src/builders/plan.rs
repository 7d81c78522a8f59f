//! Ordered, validated seeding runs.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::SeedConfig;
use crate::db::{LoadReport, SeedError, Seeder, Table};
use crate::loaders::{self, Loader, SeedContext};

/// Outcome of one loader within a run.
#[derive(Debug, Clone)]
pub struct LoaderRun {
    pub name: &'static str,
    pub report: LoadReport,
    /// Wall-clock time spent in the loader (milliseconds).
    pub elapsed_ms: u64,
}

/// Result of [`SeedPlan::run`].
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    pub runs: Vec<LoaderRun>,
    /// Total time spent seeding (milliseconds).
    pub total_time_ms: u64,
}

impl SeedSummary {
    /// Row counts summed over every loader.
    pub fn totals(&self) -> LoadReport {
        let mut total = LoadReport::default();
        for run in &self.runs {
            total += run.report;
        }
        total
    }

    /// Loaders whose resource file was absent.
    pub fn missing_resources(&self) -> Vec<&'static str> {
        self.runs
            .iter()
            .filter(|r| r.report.missing_resource)
            .map(|r| r.name)
            .collect()
    }
}

/// A sequence of loaders with declared inputs and outputs.
///
/// # Example
///
/// ```rust,ignore
/// let plan = SeedPlan::standard();
/// plan.validate()?;
/// let summary = plan.with_dependencies("courses")?.run(&seeder, &config).await?;
/// ```
pub struct SeedPlan {
    loaders: Vec<Box<dyn Loader>>,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self::standard()
    }
}

impl SeedPlan {
    pub fn new(loaders: Vec<Box<dyn Loader>>) -> Self {
        Self { loaders }
    }

    /// Every loader, reference data first.
    pub fn standard() -> Self {
        Self::new(loaders::all())
    }

    pub fn loaders(&self) -> &[Box<dyn Loader>] {
        &self.loaders
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Drops loaders that only produce demo content.
    pub fn without_demo(mut self) -> Self {
        self.loaders.retain(|l| !l.is_demo());
        self
    }

    /// Checks that every table a loader requires is provided by an earlier
    /// loader.
    pub fn validate(&self) -> Result<(), SeedError> {
        let mut provided: HashSet<Table> = HashSet::new();
        for loader in &self.loaders {
            if let Some(table) = loader
                .requires()
                .iter()
                .find(|table| !provided.contains(table))
            {
                return Err(SeedError::OrderViolation {
                    loader: loader.name(),
                    table: *table,
                });
            }
            provided.extend(loader.provides());
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize, SeedError> {
        self.loaders
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| SeedError::UnknownLoader(name.to_string()))
    }

    /// Keeps only the named loader.
    pub fn only(mut self, name: &str) -> Result<Self, SeedError> {
        let index = self.position(name)?;
        let loader = self.loaders.swap_remove(index);
        Ok(Self::new(vec![loader]))
    }

    /// Keeps the named loader and every earlier loader it transitively
    /// depends on, in their original order.
    pub fn with_dependencies(self, name: &str) -> Result<Self, SeedError> {
        let index = self.position(name)?;

        let mut needed: HashSet<Table> =
            self.loaders[index].requires().iter().copied().collect();
        let mut keep = vec![false; self.loaders.len()];
        keep[index] = true;

        for i in (0..index).rev() {
            let loader = &self.loaders[i];
            if loader.provides().iter().any(|t| needed.contains(t)) {
                keep[i] = true;
                needed.extend(loader.requires());
            }
        }

        let loaders = self
            .loaders
            .into_iter()
            .zip(keep)
            .filter_map(|(loader, keep)| keep.then_some(loader))
            .collect();
        Ok(Self::new(loaders))
    }

    /// Tables written by this plan, children before parents.
    pub fn tables_in_clear_order(&self) -> Vec<Table> {
        let mut seen = HashSet::new();
        self.loaders
            .iter()
            .rev()
            .flat_map(|l| l.provides().iter().rev().copied())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Runs every loader in order.
    ///
    /// Demo loaders are left out when `config.include_demo` is off. Missing
    /// resources and missing parents are reported and skipped; any other
    /// error stops the run.
    pub async fn run(
        &self,
        seeder: &Seeder,
        config: &SeedConfig,
    ) -> Result<SeedSummary, SeedError> {
        let start = Instant::now();
        let mut ctx = SeedContext::new(seeder, config);
        let mut summary = SeedSummary::default();

        for loader in &self.loaders {
            if loader.is_demo() && !config.include_demo {
                debug!("Skipping demo loader {}", loader.name());
                continue;
            }
            info!("==> {}", loader.name());
            let loader_start = Instant::now();
            ctx.enter(loader.name());

            let report = loader.load(&mut ctx).await?;
            if report.skipped > 0 {
                warn!("{}: skipped {} records", loader.name(), report.skipped);
            }

            summary.runs.push(LoaderRun {
                name: loader.name(),
                report,
                elapsed_ms: loader_start.elapsed().as_millis() as u64,
            });
        }

        summary.total_time_ms = start.elapsed().as_millis() as u64;
        Ok(summary)
    }

    /// Deletes everything this plan writes.
    pub async fn clear(&self, seeder: &Seeder) -> Result<(), SeedError> {
        seeder.clear_all(&self.tables_in_clear_order()).await
    }
}
