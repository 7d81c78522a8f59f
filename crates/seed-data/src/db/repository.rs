//! The storage seam every loader writes through.

use async_trait::async_trait;

use super::row::{Row, Value};
use super::schema::Table;
use super::seeder::SeedError;

/// Outcome of a single upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    /// Surrogate id of the inserted or matched row.
    pub id: i64,
    /// `true` when a new row was inserted.
    pub created: bool,
}

/// Minimal persistence contract needed for seeding.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts the row, or resolves a natural-key conflict according to
    /// [`Row::on_conflict`](super::Row). Returns the surrogate id either way.
    async fn upsert(&self, row: &Row) -> Result<Upserted, SeedError>;

    /// Looks up a surrogate id by column values, all of which must match.
    async fn find_id(
        &self,
        table: Table,
        filters: &[(&'static str, Value)],
    ) -> Result<Option<i64>, SeedError>;

    /// Empties the table and reinserts `rows` in one transaction. Ids restart
    /// from 1. References from other tables are checked once the new rows are
    /// in, and any that dangle undo the whole replacement.
    ///
    /// Returns the number of distinct rows stored.
    async fn replace_all(&self, table: Table, rows: &[Row]) -> Result<usize, SeedError>;

    /// Number of rows in the table.
    async fn count(&self, table: Table) -> Result<i64, SeedError>;

    /// Deletes every row in the table.
    async fn clear(&self, table: Table) -> Result<(), SeedError>;
}
