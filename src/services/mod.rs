//! Services module for business logic
//!
//! This module contains the thin service layer the shell talks to.

pub mod project_service;

pub use project_service::ProjectService;
