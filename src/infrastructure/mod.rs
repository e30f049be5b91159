//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite variable store
//! - Storage: In-memory variable store and channel roster
//! - Adapters: Platform integrations (console)

pub mod adapters;
pub mod config;
pub mod database;
pub mod storage;
