//! Platform core for BideshGomon.
//!
//! Holds what the application and its tooling share: the database schema
//! (embedded migrations), the domain enums stored as strings, and password
//! hashing.

pub mod auth;
pub mod database;
pub mod errors;
pub mod models;

pub use errors::PlatformError;
