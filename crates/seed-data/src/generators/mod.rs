//! Generators for demo data.
//!
//! - [`UserGenerator`]: sample customers with demographics
//! - [`LedgerGenerator`]: wallet histories with a running balance
//! - [`demo`]: ratings, counters, and dates used for presentation

pub mod demo;
pub mod ledger;
pub mod user;

pub use ledger::{GeneratedTransaction, LedgerGenConfig, LedgerGenerator};
pub use user::{GeneratedUser, UserGenConfig, UserGenerator};
