//! Plugin registry - ordered plugin chain plus name lookup

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::application::errors::PluginError;
use crate::plugins::trait_def::Plugin;

/// Help topics answered by the bot itself; plugins may not shadow them.
pub const RESERVED_TOPICS: [&str; 2] = ["about", "variables"];

/// Holds every plugin in dispatch order
///
/// `ordering` and `plugins` always carry the same names. The registry is
/// filled once at startup and only read afterwards.
#[derive(Default)]
pub struct PluginRegistry {
    ordering: Vec<String>,
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin at the end of the chain
    ///
    /// Names must be single lowercase words, since help topics are matched
    /// against lowercased tokens.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), PluginError> {
        let name = plugin.name().to_string();

        if RESERVED_TOPICS.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
            return Err(PluginError::Reserved(name));
        }
        if name.is_empty() || name.contains(char::is_whitespace) || name != name.to_lowercase() {
            return Err(PluginError::InvalidName(name));
        }
        if self.plugins.contains_key(&name) {
            return Err(PluginError::Duplicate(name));
        }

        info!("Registering plugin: {}", name);
        self.ordering.push(name.clone());
        self.plugins.insert(name, Arc::new(plugin));
        Ok(())
    }

    /// Builder-style registration
    pub fn with_plugin<P: Plugin + 'static>(mut self, plugin: P) -> Result<Self, PluginError> {
        self.register(plugin)?;
        Ok(self)
    }

    /// Get a plugin by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(name)
    }

    /// Plugin names in registration order
    pub fn names(&self) -> &[String] {
        &self.ordering
    }

    /// Plugins in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.ordering.iter().filter_map(|name| self.plugins.get(name))
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.ordering.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordering.is_empty()
    }
}
