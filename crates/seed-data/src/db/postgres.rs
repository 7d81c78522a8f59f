//! Postgres-backed repository.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};
use tracing::debug;

use super::repository::{Repository, Upserted};
use super::row::{OnConflict, Row, Value};
use super::schema::Table;
use super::seeder::SeedError;

/// Writes seed rows with `INSERT ... ON CONFLICT` on each table's natural key.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &Value) {
    match value {
        Value::Text(v) => builder.push_bind(v.clone()),
        Value::Int(v) => builder.push_bind(*v),
        Value::Float(v) => builder.push_bind(*v),
        Value::Decimal(v) => builder.push_bind(*v),
        Value::Bool(v) => builder.push_bind(*v),
        Value::Timestamp(v) => builder.push_bind(*v),
        Value::Date(v) => builder.push_bind(*v),
        Value::Json(v) => builder.push_bind(Json(v.clone())),
    };
}

/// Builds the upsert statement for a row.
///
/// `RETURNING (xmax = 0)` is true only for freshly inserted tuples.
fn build_upsert(row: &Row) -> Result<QueryBuilder<'static, Postgres>, SeedError> {
    if row.key_values().is_none() {
        return Err(SeedError::MissingKey {
            table: row.table,
            key: row.table.natural_key().join(", "),
        });
    }

    let key = row.table.natural_key();
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", row.table));

    let mut columns = builder.separated(", ");
    for (column, _) in &row.values {
        columns.push(*column);
    }
    builder.push(") VALUES (");
    for (i, (_, value)) in row.values.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(format!(") ON CONFLICT ({}) DO UPDATE SET ", key.join(", ")));

    match row.on_conflict {
        OnConflict::Overwrite => {
            for (column, _) in row.values.iter().filter(|(c, _)| !key.contains(c)) {
                builder.push(format!("{column} = EXCLUDED.{column}, "));
            }
            builder.push("updated_at = NOW()");
        }
        // A no-op assignment so RETURNING still yields the existing id.
        OnConflict::Keep => {
            builder.push(format!("{0} = EXCLUDED.{0}", key[0]));
        }
    }

    builder.push(" RETURNING id, (xmax = 0) AS created");
    Ok(builder)
}

fn build_find(table: Table, filters: &[(&'static str, Value)]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT id FROM {table} WHERE "));
    for (i, (column, value)) in filters.iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        builder.push(format!("{column} = "));
        push_value(&mut builder, value);
    }
    builder.push(" ORDER BY id LIMIT 1");
    builder
}

/// Maps integrity violations to [`SeedError::Constraint`].
fn map_db_error(table: Table, err: sqlx::Error) -> SeedError {
    if let sqlx::Error::Database(db_err) = &err
        && (db_err.is_foreign_key_violation() || db_err.is_unique_violation())
    {
        return SeedError::Constraint {
            table,
            message: db_err.message().to_string(),
        };
    }
    SeedError::Database(err)
}

#[async_trait]
impl Repository for PgRepository {
    async fn upsert(&self, row: &Row) -> Result<Upserted, SeedError> {
        let mut builder = build_upsert(row)?;
        let (id, created): (i64, bool) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(row.table, e))?;

        Ok(Upserted { id, created })
    }

    async fn find_id(
        &self,
        table: Table,
        filters: &[(&'static str, Value)],
    ) -> Result<Option<i64>, SeedError> {
        let mut builder = build_find(table, filters);

        let id: Option<(i64,)> = builder.build_query_as().fetch_optional(&self.pool).await?;
        Ok(id.map(|(id,)| id))
    }

    async fn replace_all(&self, table: Table, rows: &[Row]) -> Result<usize, SeedError> {
        debug!("Replacing all rows in {table}");

        let mut tx = self.pool.begin().await?;

        // References to this table are DEFERRABLE, so they are checked at
        // commit against the new rows.
        sqlx::query("SET CONSTRAINTS ALL DEFERRED")
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query("SELECT setval(pg_get_serial_sequence($1, 'id'), 1, false)")
            .bind(table.as_str())
            .execute(&mut *tx)
            .await?;

        // Rows sharing a natural key collapse into one.
        let mut ids = HashSet::new();
        for row in rows {
            let mut builder = build_upsert(row)?;
            let (id, _): (i64, bool) = builder
                .build_query_as()
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_db_error(table, e))?;
            ids.insert(id);
        }

        tx.commit().await.map_err(|e| map_db_error(table, e))?;

        Ok(ids.len())
    }

    async fn count(&self, table: Table) -> Result<i64, SeedError> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn clear(&self, table: Table) -> Result<(), SeedError> {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_statement() {
        let row = Row::new(Table::Roles)
            .set("slug", "admin")
            .set("name", "Administrator");
        let builder = build_upsert(&row).unwrap();
        let sql = builder.sql();

        let insert = "INSERT INTO roles (slug, name) VALUES ($1, $2)";
        let update = "ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name, updated_at = NOW()";
        assert!(sql.starts_with(insert));
        assert!(sql.contains(update));
        assert!(sql.ends_with("RETURNING id, (xmax = 0) AS created"));
    }

    #[test]
    fn test_keep_statement_does_not_touch_values() {
        let row = Row::new(Table::Users)
            .set("email", "admin@bgplatform.com")
            .set("password", "hash")
            .keep_existing();
        let builder = build_upsert(&row).unwrap();

        assert!(builder.sql().contains("DO UPDATE SET email = EXCLUDED.email RETURNING"));
        assert!(!builder.sql().contains("password = EXCLUDED"));
    }

    #[test]
    fn test_composite_key() {
        let row = Row::new(Table::Cities)
            .set("country_id", 1_i64)
            .set("name", "Dhaka")
            .set("timezone", "Asia/Dhaka");
        let builder = build_upsert(&row).unwrap();

        assert!(builder.sql().contains("ON CONFLICT (country_id, name)"));
    }

    #[test]
    fn test_find_by_composite_key() {
        let builder = build_find(
            Table::VisaTypes,
            &[
                ("country_id", Value::from(3_i64)),
                ("slug", Value::from("student-visa")),
            ],
        );

        assert_eq!(
            builder.sql(),
            "SELECT id FROM visa_types WHERE country_id = $1 AND slug = $2 ORDER BY id LIMIT 1"
        );
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let row = Row::new(Table::Roles).set("name", "Nameless");
        assert!(matches!(
            build_upsert(&row),
            Err(SeedError::MissingKey { .. })
        ));
    }
}
