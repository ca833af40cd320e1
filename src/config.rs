//! One owner's configuration: schema tree, resolved values, and the
//! load-or-elicit state machine.
//!
//! ```text
//! NotLoaded ──load, document present──────────────▶ Loaded
//!     │
//!     └──load, document absent──▶ Eliciting ──save──▶ Loaded
//! ```
//!
//! `Loaded` is terminal. Declaring more schema afterwards extends the tree
//! but does not reset the values.
//!
//! Access (`get`, `set`, `unset`) on a configuration that is not loaded
//! triggers the load when `read_immediately` is set, and fails with
//! [`AskfigError::NotLoaded`] otherwise. Writes therefore never land on a
//! tree that has not been reconciled with the document on disk.

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::builder::ConfigurationBuilder;
use crate::coerce::coerce;
use crate::elicit;
use crate::error::AskfigError;
use crate::file::{self, OwnerPaths};
use crate::merge::merge_trees;
use crate::ops::{self, ConfigResult};
use crate::persist;
use crate::prompt::Prompter;
use crate::schema::{self, ConfigTree, Schema};
use crate::types::{ConfigAction, Options, render_value};
use crate::validate;

pub struct Configuration {
    owner: String,
    options: Options,
    tree: ConfigTree,
    values: Mapping,
    loaded: bool,
    prompter: Box<dyn Prompter + Send>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("owner", &self.owner)
            .field("options", &self.options)
            .field("tree", &self.tree)
            .field("values", &self.values)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    pub fn builder(owner: &str) -> ConfigurationBuilder {
        ConfigurationBuilder::new(owner)
    }

    pub(crate) fn from_parts(
        owner: String,
        options: Options,
        prompter: Box<dyn Prompter + Send>,
    ) -> Self {
        Configuration {
            owner,
            options,
            tree: ConfigTree::new(),
            values: Mapping::new(),
            loaded: false,
            prompter,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// The resolved values as they stand, without triggering a load.
    pub fn values(&self) -> &Mapping {
        &self.values
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the options. Takes effect for every later operation.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Storage namespace name: the configured one or one derived from the owner.
    pub fn configuration_root(&self) -> String {
        self.options
            .configuration_root
            .clone()
            .unwrap_or_else(|| file::default_root(&self.owner))
    }

    fn paths(&self) -> Result<OwnerPaths, AskfigError> {
        let base = file::resolve_base_dir(&self.options.base, &self.configuration_root())?;
        Ok(OwnerPaths::new(base, &self.owner, self.options.format))
    }

    pub fn config_file_path(&self) -> Result<PathBuf, AskfigError> {
        Ok(self.paths()?.config_file())
    }

    pub fn config_dir(&self) -> Result<PathBuf, AskfigError> {
        Ok(self.paths()?.config_dir())
    }

    pub fn data_dir(&self) -> Result<PathBuf, AskfigError> {
        Ok(self.paths()?.data_dir())
    }

    pub fn log_dir(&self) -> Result<PathBuf, AskfigError> {
        Ok(self.paths()?.log_dir())
    }

    /// Compile `schema` and merge it into the tree. Colliding keys take the
    /// new declaration; sections present on both sides merge recursively.
    ///
    /// Nothing is merged if any declaration in `schema` is invalid.
    pub fn declare(&mut self, schema: &Schema) -> Result<(), AskfigError> {
        let compiled = schema::compile(&self.owner, schema)?;
        let tree = std::mem::take(&mut self.tree);
        self.tree = merge_trees(tree, compiled);
        debug!(owner = %self.owner, "declared schema");
        Ok(())
    }

    /// Apply `options` (if given), declare `schema`, and load when
    /// `read_immediately` is set.
    pub fn configure(
        &mut self,
        options: Option<Options>,
        schema: &Schema,
    ) -> Result<(), AskfigError> {
        if let Some(options) = options {
            self.options = options;
        }
        self.declare(schema)?;
        if self.options.read_immediately {
            self.load()?;
        }
        Ok(())
    }

    /// Load the persisted document, or elicit and persist when there is none.
    /// A no-op once loaded.
    pub fn load(&mut self) -> Result<(), AskfigError> {
        if self.loaded {
            return Ok(());
        }
        let path = self.config_file_path()?;
        match persist::read_document(&path, self.options.format)? {
            Some(values) => {
                self.check_unknown_keys(&values, &path)?;
                info!(owner = %self.owner, path = %path.display(), "loaded configuration");
                self.values = values;
            }
            None => {
                info!(owner = %self.owner, path = %path.display(), "no configuration found; asking");
                self.values = elicit::elicit(
                    &self.tree,
                    self.prompter.as_mut(),
                    self.options.assume_default,
                )?;
                self.write_values()?;
            }
        }
        self.loaded = true;
        Ok(())
    }

    fn check_unknown_keys(
        &self,
        values: &Mapping,
        path: &std::path::Path,
    ) -> Result<(), AskfigError> {
        let unknown = validate::unknown_keys(&self.tree, values);
        if unknown.is_empty() {
            return Ok(());
        }
        if self.options.strict {
            return Err(AskfigError::UnknownKeys(
                unknown
                    .into_iter()
                    .map(|key| AskfigError::UnknownKey {
                        key,
                        path: path.to_path_buf(),
                    })
                    .collect(),
            ));
        }
        for key in unknown {
            warn!(owner = %self.owner, key = %key, path = %path.display(), "undeclared key in config file");
        }
        Ok(())
    }

    /// Write the resolved values to the document.
    ///
    /// Fails with [`AskfigError::NotLoaded`] before the configuration has
    /// been loaded, so an unread document is never overwritten.
    pub fn save(&self) -> Result<(), AskfigError> {
        if !self.loaded {
            return Err(AskfigError::NotLoaded(self.owner.clone()));
        }
        self.write_values()
    }

    fn write_values(&self) -> Result<(), AskfigError> {
        let path = self.config_file_path()?;
        persist::write_document(&path, &self.values, self.options.format)
    }

    fn ensure_loaded(&mut self) -> Result<(), AskfigError> {
        if self.loaded {
            return Ok(());
        }
        if !self.options.read_immediately {
            return Err(AskfigError::NotLoaded(self.owner.clone()));
        }
        self.load()
    }

    /// Resolved value (or nested mapping) at a dotted key.
    pub fn get(&mut self, key: &str) -> Result<&Value, AskfigError> {
        self.ensure_loaded()?;
        ops::table_get(&self.values, key).ok_or_else(|| AskfigError::KeyNotFound(key.into()))
    }

    /// The resolved values deserialized into `T`.
    ///
    /// Items left unset (see `assume_default`) are absent, so `T` should
    /// give them `Option` fields or serde defaults.
    pub fn deserialize<T: DeserializeOwned>(&mut self) -> Result<T, AskfigError> {
        self.ensure_loaded()?;
        serde_yaml::from_value(Value::Mapping(self.values.clone())).map_err(|e| {
            AskfigError::ParseError {
                path: self.config_file_path().unwrap_or_default(),
                reason: e.to_string(),
            }
        })
    }

    /// Write a value at a dotted key. Persists when `write_immediately` is
    /// set and the value changed.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), AskfigError> {
        self.ensure_loaded()?;
        let value = value.into();
        let previous = ops::table_set(&mut self.values, key, value.clone())?;
        if previous.as_ref() != Some(&value) && self.options.write_immediately {
            self.save()?;
        }
        Ok(())
    }

    /// Parse `raw` as the declared item's type, check it against the item's
    /// choices and validator, then [`set`](Self::set) it.
    pub fn set_raw(&mut self, key: &str, raw: &str) -> Result<Value, AskfigError> {
        let item = schema::find_item(&self.tree, key)
            .ok_or_else(|| AskfigError::KeyNotFound(key.into()))?;
        let invalid = |reason: String| AskfigError::InvalidValue {
            key: key.into(),
            reason,
        };

        let value = coerce(raw, &item.value_type).map_err(invalid)?;
        if let Some(choices) = &item.choices
            && !choices.contains(&value)
        {
            let listed: Vec<String> = choices.iter().map(render_value).collect();
            return Err(invalid(format!("must be one of: {}", listed.join(", "))));
        }
        if !item.accepts(&value) {
            let reason = match item.range {
                Some(bound) => format!("{} is outside {bound}", render_value(&value)),
                None => format!("{} is not accepted", render_value(&value)),
            };
            return Err(invalid(reason));
        }

        self.set(key, value.clone())?;
        Ok(value)
    }

    /// Remove the value at a dotted key.
    pub fn unset(&mut self, key: &str) -> Result<Value, AskfigError> {
        self.ensure_loaded()?;
        let removed = ops::table_remove(&mut self.values, key)
            .ok_or_else(|| AskfigError::KeyNotFound(key.into()))?;
        if self.options.write_immediately {
            self.save()?;
        }
        Ok(removed)
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(&mut self, action: &ConfigAction) -> Result<(), AskfigError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (list / get / set / unset / path).
    pub fn handle(&mut self, action: &ConfigAction) -> Result<ConfigResult, AskfigError> {
        match action {
            ConfigAction::List => {
                self.ensure_loaded()?;
                Ok(ConfigResult::Listing {
                    entries: ops::list_values(&self.values),
                })
            }
            ConfigAction::Get { key } => {
                let value = render_value(self.get(key)?);
                let doc = schema::find_item(&self.tree, key).map(|item| item.question.clone());
                Ok(ConfigResult::KeyValue {
                    key: key.clone(),
                    value,
                    doc,
                })
            }
            ConfigAction::Set { key, value } => {
                let value = self.set_raw(key, value)?;
                Ok(ConfigResult::ValueSet {
                    key: key.clone(),
                    value: render_value(&value),
                })
            }
            ConfigAction::Unset { key } => {
                self.unset(key)?;
                Ok(ConfigResult::ValueUnset { key: key.clone() })
            }
            ConfigAction::Path => Ok(ConfigResult::Path(self.config_file_path()?)),
        }
    }
}
