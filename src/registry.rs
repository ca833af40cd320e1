//! Owner identity → [`Configuration`] map.
//!
//! A process that hosts several components keeps one `Registry` and hands
//! each component its entry. The registry owns the configurations for as
//! long as the caller keeps it; there is no process-wide state.

use std::collections::HashMap;

use tracing::debug;

use crate::builder::ConfigurationBuilder;
use crate::config::Configuration;

#[derive(Debug, Default)]
pub struct Registry {
    configurations: HashMap<String, Configuration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The owner's configuration, built on first use.
    ///
    /// `build` receives a builder preset for `owner` and is only called when
    /// the owner has no entry yet. Later calls return the existing entry
    /// unchanged.
    ///
    /// ```ignore
    /// let config = registry.entry("Acme::NetServer", |b| b.strict(true));
    /// config.configure(None, &schema)?;
    /// ```
    pub fn entry(
        &mut self,
        owner: &str,
        build: impl FnOnce(ConfigurationBuilder) -> ConfigurationBuilder,
    ) -> &mut Configuration {
        self.configurations
            .entry(owner.to_string())
            .or_insert_with(|| {
                debug!(owner, "registering configuration");
                build(Configuration::builder(owner)).build()
            })
    }

    /// Register a configuration built elsewhere, replacing any previous entry
    /// for the same owner. Returns the replaced one.
    pub fn insert(&mut self, config: Configuration) -> Option<Configuration> {
        self.configurations.insert(config.owner().to_string(), config)
    }

    pub fn get(&self, owner: &str) -> Option<&Configuration> {
        self.configurations.get(owner)
    }

    pub fn get_mut(&mut self, owner: &str) -> Option<&mut Configuration> {
        self.configurations.get_mut(owner)
    }

    pub fn remove(&mut self, owner: &str) -> Option<Configuration> {
        self.configurations.remove(owner)
    }

    /// Registered owner identities, sorted.
    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = self.configurations.keys().map(String::as_str).collect();
        owners.sort_unstable();
        owners
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl;
    use crate::fixtures::test::SharedOutput;
    use crate::schema::Schema;
    use crate::types::BaseLocation;
    use serde_yaml::Value;
    use tempfile::TempDir;

    #[test]
    fn entry_builds_once() {
        let mut registry = Registry::new();
        registry.entry("Acme::NetServer", |b| b.strict(true));
        let again = registry.entry("Acme::NetServer", |b| b.strict(false));
        assert!(again.options().strict);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn owners_are_isolated() {
        let dir = TempDir::new().unwrap();
        let mut registry = Registry::new();
        for owner in ["Acme::NetServer", "Acme::Worker"] {
            let base = BaseLocation::Path(dir.path().to_path_buf());
            let config = registry.entry(owner, |b| {
                b.base(base)
                    .assume_default(true)
                    .prompter(SharedOutput::prompter("").0)
            });
            config
                .declare(&Schema::new().item("name", decl![owner]))
                .unwrap();
        }

        let server = registry.get_mut("Acme::NetServer").unwrap();
        assert_eq!(server.get("name").unwrap(), &Value::from("Acme::NetServer"));
        let worker = registry.get_mut("Acme::Worker").unwrap();
        assert_eq!(worker.get("name").unwrap(), &Value::from("Acme::Worker"));

        assert!(dir.path().join("config/net_server.yml").exists());
        assert!(dir.path().join("config/worker.yml").exists());
    }

    #[test]
    fn insert_get_remove() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        let previous = registry.insert(Configuration::builder("Tool").build());
        assert!(previous.is_none());
        assert!(registry.get("Tool").is_some());
        assert!(registry.get("Other").is_none());

        let removed = registry.remove("Tool").unwrap();
        assert_eq!(removed.owner(), "Tool");
        assert!(registry.is_empty());
    }

    #[test]
    fn owners_sorted() {
        let mut registry = Registry::new();
        registry.entry("b", |b| b);
        registry.entry("a", |b| b);
        assert_eq!(registry.owners(), vec!["a", "b"]);
    }
}
