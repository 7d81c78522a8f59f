//! Database seeding utilities.

use std::ops::AddAssign;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::repository::{Repository, Upserted};
use super::row::{Row, Value};
use super::schema::Table;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Platform error: {0}")]
    Platform(#[from] bidesh::PlatformError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing resource: {}", .0.display())]
    MissingResource(PathBuf),
    #[error("Invalid resource {}: {reason}", .path.display())]
    InvalidResource { path: PathBuf, reason: String },
    #[error("Constraint violation on {table}: {message}")]
    Constraint { table: Table, message: String },
    #[error("Row for {table} is missing natural key ({key})")]
    MissingKey { table: Table, key: String },
    #[error("Loader '{loader}' requires {table}, which no earlier loader provides")]
    OrderViolation { loader: &'static str, table: Table },
    #[error("Unknown loader '{0}'")]
    UnknownLoader(String),
}

/// Row counts produced by one loader run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows inserted.
    pub created: usize,
    /// Rows that already existed (overwritten or kept).
    pub updated: usize,
    /// Records skipped because a parent or required field was missing.
    pub skipped: usize,
    /// Set when the loader's resource file was absent.
    pub missing_resource: bool,
}

impl LoadReport {
    pub fn missing_resource() -> Self {
        Self {
            missing_resource: true,
            ..Self::default()
        }
    }

    /// Records the outcome of one upsert.
    pub fn record(&mut self, upserted: Upserted) {
        if upserted.created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Rows written, whether new or existing.
    pub fn written(&self) -> usize {
        self.created + self.updated
    }
}

impl AddAssign for LoadReport {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.missing_resource |= other.missing_resource;
    }
}

/// Writes rows through a [`Repository`] with progress reporting.
#[derive(Clone)]
pub struct Seeder {
    repo: Arc<dyn Repository>,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder over the given repository.
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            repo,
            batch_size: 50,
        }
    }

    /// Sets how often progress is logged for large tables.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Upserts a single row.
    pub async fn upsert(&self, row: &Row) -> Result<Upserted, SeedError> {
        self.repo.upsert(row).await
    }

    /// Upserts every row, logging progress every batch.
    pub async fn seed_rows(&self, label: &str, rows: &[Row]) -> Result<LoadReport, SeedError> {
        info!("Seeding {} {label}...", rows.len());

        let mut report = LoadReport::default();
        for (i, row) in rows.iter().enumerate() {
            report.record(self.repo.upsert(row).await?);

            if (i + 1) % self.batch_size == 0 && i + 1 < rows.len() {
                info!("  Seeded {}/{} {label}", i + 1, rows.len());
            }
        }

        info!(
            "Seeded {label}: {} created, {} updated",
            report.created, report.updated
        );
        Ok(report)
    }

    /// Truncates the table and reloads it from `rows` in one transaction.
    pub async fn replace_rows(
        &self,
        label: &str,
        table: Table,
        rows: &[Row],
    ) -> Result<LoadReport, SeedError> {
        info!(
            "Reseeding {label}: truncating {table} and inserting {} rows",
            rows.len()
        );

        let created = self.repo.replace_all(table, rows).await?;

        info!("Reseeded {created} {label}");
        Ok(LoadReport {
            created,
            ..LoadReport::default()
        })
    }

    /// Resolves a parent's surrogate id by natural key.
    pub async fn find_id(
        &self,
        table: Table,
        column: &'static str,
        value: impl Into<Value>,
    ) -> Result<Option<i64>, SeedError> {
        self.repo.find_id(table, &[(column, value.into())]).await
    }

    /// Resolves a surrogate id by a composite natural key.
    pub async fn find_id_by(
        &self,
        table: Table,
        filters: &[(&'static str, Value)],
    ) -> Result<Option<i64>, SeedError> {
        self.repo.find_id(table, filters).await
    }

    /// Like [`find_id`](Self::find_id) but logs a warning when nothing matches.
    ///
    /// Dependent loaders use this to skip children whose parent is absent.
    pub async fn require_id(
        &self,
        loader: &str,
        table: Table,
        column: &'static str,
        value: &str,
    ) -> Result<Option<i64>, SeedError> {
        let id = self.find_id(table, column, value).await?;
        if id.is_none() {
            warn!(
                "{loader}: no {table} row with {column} = '{value}', skipping dependent rows"
            );
        }
        Ok(id)
    }

    pub async fn count(&self, table: Table) -> Result<i64, SeedError> {
        self.repo.count(table).await
    }

    /// Clears the given tables, in order.
    ///
    /// **WARNING**: This deletes all data from the tables. Use with caution.
    pub async fn clear_all(&self, tables: &[Table]) -> Result<(), SeedError> {
        info!("Clearing {} tables...", tables.len());

        for table in tables {
            self.repo.clear(*table).await?;
        }

        info!("All data cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRepository;

    #[tokio::test]
    async fn test_seed_rows_counts_created_then_updated() {
        let seeder = Seeder::new(Arc::new(MemoryRepository::new())).with_batch_size(1);
        let rows = vec![
            Row::new(Table::BlogTags).set("slug", "visa").set("name", "Visa"),
            Row::new(Table::BlogTags).set("slug", "ielts").set("name", "IELTS"),
        ];

        let first = seeder.seed_rows("tags", &rows).await.unwrap();
        let second = seeder.seed_rows("tags", &rows).await.unwrap();

        assert_eq!(first.created, 2);
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(seeder.count(Table::BlogTags).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_replace_rows_reports_distinct_rows() {
        let seeder = Seeder::new(Arc::new(MemoryRepository::new()));
        let country = |name: &str| {
            Row::new(Table::Countries)
                .set("iso2", "BD")
                .set("iso3", "BGD")
                .set("name", name)
        };
        let rows = vec![country("Bangladesh"), country("Bangladesh (dup)")];

        let report = seeder
            .replace_rows("countries", Table::Countries, &rows)
            .await
            .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(seeder.count(Table::Countries).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_require_id_missing_parent() {
        let seeder = Seeder::new(Arc::new(MemoryRepository::new()));
        let id = seeder
            .require_id("cities", Table::Countries, "iso2", "BD")
            .await
            .unwrap();
        assert!(id.is_none());
    }

    #[test]
    fn test_report_accumulates() {
        let mut total = LoadReport::default();
        total += LoadReport {
            created: 2,
            updated: 1,
            skipped: 1,
            missing_resource: false,
        };
        total += LoadReport::missing_resource();

        assert_eq!(total.written(), 3);
        assert_eq!(total.skipped, 1);
        assert!(total.missing_resource);
    }
}
