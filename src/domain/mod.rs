//! Domain layer - Core types with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message)
//! - Traits: Abstractions for collaborators (Transport, VariableStore, Roster)

pub mod entities;
pub mod traits;
