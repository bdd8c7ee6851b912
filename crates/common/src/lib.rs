//! Shared building blocks for the CloudVote service: configuration, errors,
//! the MySQL pool and its lifecycle, and vote persistence.

pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod pool;
pub mod schema;
pub mod types;
pub mod votes;
