//! Seeding plans.
//!
//! A [`SeedPlan`] holds loaders in dependency order. It can be validated,
//! narrowed to one loader (with or without its dependencies), run, or cleared.

mod plan;

pub use plan::{LoaderRun, SeedPlan, SeedSummary};
