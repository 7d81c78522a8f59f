//! Database integration for seeding.
//!
//! Loaders build [`Row`]s and hand them to the [`Seeder`], which writes them
//! through a [`Repository`]: [`PgRepository`] against Postgres, or
//! [`MemoryRepository`] for dry runs and tests.

mod memory;
mod postgres;
mod repository;
mod row;
mod schema;
mod seeder;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use repository::{Repository, Upserted};
pub use row::{OnConflict, Row, Value};
pub use schema::Table;
pub use seeder::{LoadReport, SeedError, Seeder};
