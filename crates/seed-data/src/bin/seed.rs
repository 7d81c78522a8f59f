//! Seed script - loads reference data and demo content
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed
//! cargo run -p seed-data --bin seed -- --only courses --with-deps
//! cargo run -p seed-data --bin seed -- --dry-run --no-demo
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bidesh::database::{self, DEFAULT_DATABASE_URL};
use seed_data::builders::SeedPlan;
use seed_data::config::SeedConfig;
use seed_data::db::{MemoryRepository, PgRepository, Repository, Seeder};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Seed the BideshGomon database")]
struct Args {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Directory holding the CSV resources
    #[arg(long, env = "SEED_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Seed for generated demo values
    #[arg(long, env = "SEED_RNG_SEED")]
    rng_seed: Option<u64>,

    /// Generated sample customers on top of the fixed demo accounts
    #[arg(long)]
    sample_users: Option<usize>,

    /// Log progress every N rows
    #[arg(long)]
    batch_size: Option<usize>,

    /// Run a single loader
    #[arg(long, value_name = "LOADER")]
    only: Option<String>,

    /// With --only, also run the loaders it depends on
    #[arg(long, requires = "only")]
    with_deps: bool,

    /// Clear every seeded table before loading
    #[arg(long)]
    fresh: bool,

    /// Seed an in-memory store instead of the database
    #[arg(long)]
    dry_run: bool,

    /// Skip sample users, ledgers, applications and tickets
    #[arg(long)]
    no_demo: bool,

    /// List loaders in run order and exit
    #[arg(long)]
    list: bool,

    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

impl Args {
    fn config(&self) -> SeedConfig {
        let mut config = SeedConfig {
            include_demo: !self.no_demo,
            ..SeedConfig::default()
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(seed) = self.rng_seed {
            config.rng_seed = seed;
        }
        if let Some(count) = self.sample_users {
            config.sample_user_count = count;
        }
        if let Some(size) = self.batch_size {
            config.batch_size = size.max(1);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();

    // Refuse to write anything if the loader order is broken.
    let standard = SeedPlan::standard();
    standard.validate()?;

    if args.list {
        for loader in standard.loaders() {
            let marker = if loader.is_demo() { " (demo)" } else { "" };
            println!("{}{marker}", loader.name());
        }
        return Ok(());
    }

    let mut plan = SeedPlan::standard();
    if !config.include_demo {
        plan = plan.without_demo();
    }
    if let Some(name) = &args.only {
        plan = if args.with_deps {
            plan.with_dependencies(name)?
        } else {
            plan.only(name)?
        };
    }

    let repo: Arc<dyn Repository> = if args.dry_run {
        tracing::info!("Dry run: seeding an in-memory store");
        Arc::new(MemoryRepository::new())
    } else {
        let pool = database::connect(&args.database_url, args.max_connections).await?;
        tracing::info!("Connected to database");
        database::migrate(&pool).await?;
        Arc::new(PgRepository::new(pool))
    };
    let seeder = Seeder::new(repo).with_batch_size(config.batch_size);

    if args.fresh {
        standard.clear(&seeder).await?;
    }

    let summary = plan.run(&seeder, &config).await?;

    // Summary output
    tracing::info!("Seed completed in {} ms", summary.total_time_ms);
    for run in &summary.runs {
        tracing::info!(
            "  {:<22} created {:>4}  updated {:>4}  skipped {:>3}  ({} ms)",
            run.name,
            run.report.created,
            run.report.updated,
            run.report.skipped,
            run.elapsed_ms
        );
    }
    let totals = summary.totals();
    tracing::info!(
        "  Total: {} created, {} updated, {} skipped",
        totals.created,
        totals.updated,
        totals.skipped
    );
    for name in summary.missing_resources() {
        tracing::warn!("  {name}: resource file missing, nothing loaded");
    }

    Ok(())
}
