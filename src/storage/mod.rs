//! Storage module for SQLite database operations
//!
//! This module provides:
//! - Database open and schema bootstrap
//! - The connection-scoped transaction helper
//! - The repository holding all project SQL

pub mod db;
pub mod project_repo;

pub use db::{open_database, Database};
pub use project_repo::ProjectRepo;
