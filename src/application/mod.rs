//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Bot: the shared handle plugins and adapters talk to
//! - Services: message history and the variable filter
//! - Messaging: message parsing, plugin dispatch, help routing
//! - Errors: Domain-specific errors

pub mod bot;
pub mod errors;
pub mod messaging;
pub mod services;

pub use bot::Bot;
