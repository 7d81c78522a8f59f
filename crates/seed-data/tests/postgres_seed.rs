//! Integration tests for seeding a real Postgres database.
//!
//! To run these tests, you need:
//! 1. A PostgreSQL database the tests may wipe
//! 2. DATABASE_URL environment variable set
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p seed-data --test postgres_seed`
//!
//! Note: the tests clear every seeded table before and after they run. Do not
//! point them at a database whose data you want to keep. The reseed test also
//! creates a `bidesh_seed_app` role without superuser rights, so the
//! connecting user needs CREATEROLE; it skips otherwise.

use std::env;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tokio::sync::Mutex;

use bidesh::auth::{hash_password, verify_password};
use bidesh::database;
use seed_data::builders::SeedPlan;
use seed_data::config::SeedConfig;
use seed_data::db::{PgRepository, Repository, Row, SeedError, Seeder, Table};

/// Both tests wipe the same tables.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

const CREATE_APP_ROLE: &str = r#"
DO $$
BEGIN
    IF NOT EXISTS (SELECT FROM pg_roles WHERE rolname = 'bidesh_seed_app') THEN
        CREATE ROLE bidesh_seed_app NOSUPERUSER NOLOGIN;
    END IF;
END
$$
"#;

const APP_GRANTS: [&str; 3] = [
    "GRANT USAGE ON SCHEMA public TO bidesh_seed_app",
    "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO bidesh_seed_app",
    "GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA public TO bidesh_seed_app",
];

fn database_url() -> Option<String> {
    match env::var("DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            None
        }
    }
}

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = database_url()?;

    match database::connect(&database_url, 2).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

async fn table_counts(seeder: &Seeder) -> Vec<(Table, i64)> {
    let mut counts = Vec::new();
    for table in Table::ALL {
        counts.push((table, seeder.count(table).await.expect("count failed")));
    }
    counts
}

/// Seeds an empty database twice, with an admin account created beforehand
/// by hand, and checks nothing is duplicated or clobbered.
#[tokio::test]
async fn test_full_seed_is_idempotent() {
    let _guard = DB_LOCK.lock().await;
    let Some(pool) = get_test_pool().await else {
        return;
    };
    database::migrate(&pool).await.expect("Failed to migrate");

    let seeder = Seeder::new(Arc::new(PgRepository::new(pool.clone())));
    let config = SeedConfig {
        sample_user_count: 4,
        ..SeedConfig::default()
    };
    let plan = SeedPlan::standard();
    plan.validate().expect("standard plan is misordered");
    plan.clear(&seeder).await.expect("Failed to clear");

    // An administrator who already chose a password.
    SeedPlan::standard()
        .only("roles")
        .unwrap()
        .run(&seeder, &config)
        .await
        .expect("Failed to seed roles");
    let own_hash = hash_password("my-own-secret").unwrap();
    sqlx::query(
        r#"
        INSERT INTO users (name, email, password, role_id)
        SELECT 'Existing Admin', 'admin@bgplatform.com', $1, id FROM roles WHERE slug = 'admin'
        "#,
    )
    .bind(&own_hash)
    .execute(&pool)
    .await
    .expect("Failed to create admin");

    let first = plan.run(&seeder, &config).await.expect("first run failed");
    let after_first = table_counts(&seeder).await;
    let second = plan.run(&seeder, &config).await.expect("second run failed");
    let after_second = table_counts(&seeder).await;

    assert!(first.missing_resources().is_empty());
    assert_eq!(first.totals().skipped, 0);
    assert_eq!(second.totals().skipped, 0);
    assert_eq!(after_first, after_second);
    for (table, count) in &after_first {
        assert!(*count > 0, "{table} is empty after a full run");
    }

    let (password,): (String,) =
        sqlx::query_as("SELECT password FROM users WHERE email = 'admin@bgplatform.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(verify_password("my-own-secret", &password).unwrap());

    let (profiles, wallets): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM user_profiles p JOIN users u ON u.id = p.user_id
             WHERE u.email = 'admin@bgplatform.com'),
            (SELECT COUNT(*) FROM wallets w JOIN users u ON u.id = w.user_id
             WHERE u.email = 'admin@bgplatform.com')
        "#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((profiles, wallets), (1, 1));

    plan.clear(&seeder).await.expect("Failed to clean up");
}

/// Creates a role without superuser rights that may read and write every
/// seeded table.
async fn create_app_role(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(CREATE_APP_ROLE).await?;
    for grant in APP_GRANTS {
        pool.execute(grant).await?;
    }
    Ok(())
}

/// A single-connection pool whose session runs as the app role.
async fn app_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET ROLE bidesh_seed_app").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Reseeds countries as an ordinary application role, then checks that a
/// reseed which would orphan cities is rolled back.
#[tokio::test]
async fn test_countries_reseed_without_superuser() {
    let _guard = DB_LOCK.lock().await;
    let Some(database_url) = database_url() else {
        return;
    };
    let Some(pool) = get_test_pool().await else {
        return;
    };
    database::migrate(&pool).await.expect("Failed to migrate");
    let admin = Seeder::new(Arc::new(PgRepository::new(pool.clone())));
    SeedPlan::standard()
        .clear(&admin)
        .await
        .expect("Failed to clear");

    if let Err(e) = create_app_role(&pool).await {
        eprintln!("Skipping test: cannot create bidesh_seed_app: {e}");
        return;
    }
    let app = app_pool(&database_url)
        .await
        .expect("Failed to connect as app role");

    let (superuser,): (String,) = sqlx::query_as("SELECT current_setting('is_superuser')")
        .fetch_one(&app)
        .await
        .unwrap();
    assert_eq!(superuser, "off");
    let replica = sqlx::query("SET session_replication_role = replica")
        .execute(&app)
        .await;
    assert!(replica.is_err());

    let repo = Arc::new(PgRepository::new(app.clone()));
    let seeder = Seeder::new(repo.clone());
    let config = SeedConfig::default();
    let plan = SeedPlan::standard()
        .with_dependencies("cities")
        .expect("cities loader is missing");

    let first = plan.run(&seeder, &config).await.expect("first run failed");
    let countries = seeder.count(Table::Countries).await.unwrap();
    let cities = seeder.count(Table::Cities).await.unwrap();
    plan.run(&seeder, &config).await.expect("second run failed");

    assert_eq!(countries, first.runs[0].report.created as i64);
    assert_eq!(seeder.count(Table::Countries).await.unwrap(), countries);
    assert_eq!(seeder.count(Table::Cities).await.unwrap(), cities);
    assert!(cities > 0);

    // Cities outside Bangladesh would lose their country.
    let bangladesh = Row::new(Table::Countries)
        .set("iso2", "BD")
        .set("iso3", "BGD")
        .set("name", "Bangladesh");
    let result = repo.replace_all(Table::Countries, &[bangladesh]).await;
    assert!(matches!(result, Err(SeedError::Constraint { .. })));
    assert_eq!(seeder.count(Table::Countries).await.unwrap(), countries);

    SeedPlan::standard()
        .clear(&admin)
        .await
        .expect("Failed to clean up");
}
