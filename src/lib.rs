//! whisker-bot - chat bot routing core
//!
//! Layers follow the usual split:
//! - Domain: entities and the traits external collaborators implement
//! - Application: dispatcher, help router, variable filter, message history
//! - Infrastructure: config, stores, roster, console adapter
//! - Plugins: the plugin contract, registry and bundled plugins

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

pub use application::Bot;
pub use domain::entities::{Message, User};
pub use plugins::{Plugin, PluginRegistry};
