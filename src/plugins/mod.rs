//! Plugin system for whisker-bot
//!
//! Plugins form an ordered chain; the first one to claim an input stops
//! dispatch for it.

pub mod registry;
pub mod responder;
pub mod trait_def;

pub use registry::PluginRegistry;
pub use responder::{ResponderPlugin, ResponderRule};
pub use trait_def::Plugin;
