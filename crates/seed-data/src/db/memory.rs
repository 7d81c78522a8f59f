//! In-process repository used for dry runs and tests.
//!
//! Enforces the same natural-key uniqueness and foreign keys as the
//! migrations so loader behaviour can be checked without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::repository::{Repository, Upserted};
use super::row::{OnConflict, Row, Value};
use super::schema::Table;
use super::seeder::SeedError;

#[derive(Debug, Default)]
struct MemoryTable {
    next_id: i64,
    rows: Vec<StoredRow>,
}

#[derive(Debug, Clone)]
struct StoredRow {
    id: i64,
    values: HashMap<&'static str, Value>,
}

impl MemoryTable {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn position_by_key(&self, table: Table, row: &Row) -> Option<usize> {
        let key = row.key_values()?;
        self.rows.iter().position(|stored| {
            table
                .natural_key()
                .iter()
                .zip(&key)
                .all(|(column, value)| stored.values.get(column) == Some(*value))
        })
    }

    fn contains_id(&self, id: i64) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: Mutex<HashMap<Table, MemoryTable>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a column value of the row with the given id.
    pub fn value(&self, table: Table, id: i64, column: &str) -> Option<Value> {
        let tables = self.lock();
        tables
            .get(&table)?
            .rows
            .iter()
            .find(|r| r.id == id)?
            .values
            .get(column)
            .cloned()
    }

    /// Returns every stored value of one column, in insertion order.
    pub fn column(&self, table: Table, column: &str) -> Vec<Value> {
        let tables = self.lock();
        tables
            .get(&table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter_map(|r| r.values.get(column).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Table, MemoryTable>> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_foreign_keys(
        tables: &HashMap<Table, MemoryTable>,
        row: &Row,
        pending_id: Option<i64>,
    ) -> Result<(), SeedError> {
        for (column, parent) in row.table.foreign_keys() {
            let Some(id) = row.get(column).and_then(Value::as_int) else {
                continue;
            };
            // A row may reference itself (menus.parent_id).
            let self_reference = *parent == row.table && pending_id == Some(id);
            let exists = tables.get(parent).is_some_and(|t| t.contains_id(id));
            if !exists && !self_reference {
                return Err(SeedError::Constraint {
                    table: row.table,
                    message: format!(
                        "{column} = {id} does not reference an existing row in {parent}"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Fails if a row in another table points at an id `parent` no longer
    /// holds. Mirrors the deferred check Postgres runs at commit.
    fn check_references_to(
        tables: &HashMap<Table, MemoryTable>,
        parent: Table,
    ) -> Result<(), SeedError> {
        for child in Table::ALL {
            for (column, _) in child.foreign_keys().iter().filter(|(_, p)| *p == parent) {
                let Some(rows) = tables.get(&child).map(|t| &t.rows) else {
                    continue;
                };
                let dangling = rows
                    .iter()
                    .filter_map(|r| r.values.get(column).and_then(Value::as_int))
                    .find(|id| !tables.get(&parent).is_some_and(|t| t.contains_id(*id)));
                if let Some(id) = dangling {
                    return Err(SeedError::Constraint {
                        table: child,
                        message: format!(
                            "{column} = {id} does not reference an existing row in {parent}"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    fn upsert_locked(
        tables: &mut HashMap<Table, MemoryTable>,
        row: &Row,
    ) -> Result<Upserted, SeedError> {
        if row.key_values().is_none() {
            return Err(SeedError::MissingKey {
                table: row.table,
                key: row.table.natural_key().join(", "),
            });
        }

        let existing = tables
            .get(&row.table)
            .and_then(|t| t.position_by_key(row.table, row));

        match existing {
            Some(index) => {
                let id = tables[&row.table].rows[index].id;
                if row.on_conflict == OnConflict::Overwrite {
                    Self::check_foreign_keys(tables, row, Some(id))?;
                    if let Some(table) = tables.get_mut(&row.table) {
                        let stored = &mut table.rows[index];
                        for (column, value) in &row.values {
                            stored.values.insert(column, value.clone());
                        }
                    }
                }
                Ok(Upserted { id, created: false })
            }
            None => {
                let next = tables.get(&row.table).map_or(1, |t| t.next_id + 1);
                Self::check_foreign_keys(tables, row, Some(next))?;
                let table = tables.entry(row.table).or_default();
                let id = table.allocate_id();
                table.rows.push(StoredRow {
                    id,
                    values: row.values.iter().cloned().collect(),
                });
                Ok(Upserted { id, created: true })
            }
        }
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn upsert(&self, row: &Row) -> Result<Upserted, SeedError> {
        let mut tables = self.lock();
        Self::upsert_locked(&mut tables, row)
    }

    async fn find_id(
        &self,
        table: Table,
        filters: &[(&'static str, Value)],
    ) -> Result<Option<i64>, SeedError> {
        let tables = self.lock();
        Ok(tables.get(&table).and_then(|t| {
            t.rows
                .iter()
                .find(|r| {
                    filters
                        .iter()
                        .all(|(column, value)| r.values.get(column) == Some(value))
                })
                .map(|r| r.id)
        }))
    }

    async fn replace_all(&self, table: Table, rows: &[Row]) -> Result<usize, SeedError> {
        let mut tables = self.lock();
        let previous = tables.insert(table, MemoryTable::default());

        let result = rows
            .iter()
            .try_for_each(|row| Self::upsert_locked(&mut tables, row).map(|_| ()))
            .and_then(|()| Self::check_references_to(&tables, table));

        if let Err(e) = result {
            // All or nothing, like the Postgres transaction.
            match previous {
                Some(previous) => tables.insert(table, previous),
                None => tables.remove(&table),
            };
            return Err(e);
        }

        Ok(tables.get(&table).map_or(0, |t| t.rows.len()))
    }

    async fn count(&self, table: Table) -> Result<i64, SeedError> {
        let tables = self.lock();
        Ok(tables.get(&table).map_or(0, |t| t.rows.len() as i64))
    }

    async fn clear(&self, table: Table) -> Result<(), SeedError> {
        let mut tables = self.lock();
        if let Some(t) = tables.get_mut(&table) {
            t.rows.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(iso2: &str, name: &str) -> Row {
        Row::new(Table::Countries)
            .set("iso2", iso2)
            .set("iso3", format!("{iso2}X"))
            .set("name", name)
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = MemoryRepository::new();

        let first = repo.upsert(&country("BD", "Bangladesh")).await.unwrap();
        let second = repo.upsert(&country("BD", "Bangladesh")).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_and_keep() {
        let repo = MemoryRepository::new();
        let id = repo.upsert(&country("BD", "Bangladesh")).await.unwrap().id;

        repo.upsert(&country("BD", "People's Republic of Bangladesh"))
            .await
            .unwrap();
        assert_eq!(
            repo.value(Table::Countries, id, "name"),
            Some(Value::from("People's Republic of Bangladesh"))
        );

        repo.upsert(&country("BD", "Ignored").keep_existing())
            .await
            .unwrap();
        assert_eq!(
            repo.value(Table::Countries, id, "name"),
            Some(Value::from("People's Republic of Bangladesh"))
        );
    }

    #[tokio::test]
    async fn test_foreign_key_enforced() {
        let repo = MemoryRepository::new();
        let city = Row::new(Table::Cities)
            .set("country_id", 42_i64)
            .set("name", "Nowhere");

        let err = repo.upsert(&city).await.unwrap_err();
        assert!(matches!(
            err,
            SeedError::Constraint {
                table: Table::Cities,
                ..
            }
        ));
        assert_eq!(repo.count(Table::Cities).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_null_foreign_key_is_allowed() {
        let repo = MemoryRepository::new();
        let menu = Row::new(Table::Menus)
            .set("slug", "home")
            .set("parent_id", None::<i64>);

        assert!(repo.upsert(&menu).await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_all_restarts_ids() {
        let repo = MemoryRepository::new();
        repo.upsert(&country("BD", "Bangladesh")).await.unwrap();
        repo.upsert(&country("IN", "India")).await.unwrap();

        let replaced = repo
            .replace_all(Table::Countries, &[country("NP", "Nepal")])
            .await
            .unwrap();

        assert_eq!(replaced, 1);
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 1);
        let id = repo
            .find_id(Table::Countries, &[("iso2", Value::from("NP"))])
            .await
            .unwrap();
        assert_eq!(id, Some(1));
    }

    #[tokio::test]
    async fn test_replace_all_rolls_back_on_error() {
        let repo = MemoryRepository::new();
        repo.upsert(&country("BD", "Bangladesh")).await.unwrap();

        let bad = Row::new(Table::Countries).set("name", "No key");
        assert!(repo.replace_all(Table::Countries, &[bad]).await.is_err());
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_all_rejects_dangling_children() {
        let repo = MemoryRepository::new();
        repo.upsert(&country("BD", "Bangladesh")).await.unwrap();
        let india = repo.upsert(&country("IN", "India")).await.unwrap().id;
        let city = Row::new(Table::Cities)
            .set("country_id", india)
            .set("name", "Delhi");
        repo.upsert(&city).await.unwrap();

        let err = repo
            .replace_all(Table::Countries, &[country("NP", "Nepal")])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SeedError::Constraint {
                table: Table::Cities,
                ..
            }
        ));
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 2);
        let kept = repo
            .find_id(Table::Countries, &[("iso2", Value::from("IN"))])
            .await
            .unwrap();
        assert_eq!(kept, Some(india));
    }

    #[tokio::test]
    async fn test_replace_all_keeps_children_of_surviving_ids() {
        let repo = MemoryRepository::new();
        let bangladesh = repo.upsert(&country("BD", "Bangladesh")).await.unwrap().id;
        let city = Row::new(Table::Cities)
            .set("country_id", bangladesh)
            .set("name", "Dhaka");
        repo.upsert(&city).await.unwrap();

        let rows = [country("BD", "Bangladesh"), country("IN", "India")];
        assert_eq!(repo.replace_all(Table::Countries, &rows).await.unwrap(), 2);
        assert_eq!(repo.count(Table::Cities).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_all_counts_collapsed_keys_once() {
        let repo = MemoryRepository::new();
        let rows = [country("BD", "Bangladesh"), country("BD", "Bangladesh")];

        assert_eq!(repo.replace_all(Table::Countries, &rows).await.unwrap(), 1);
    }
}
