//! Clap adapter for askfig.
//!
//! This module is the **optional integration layer** between the
//! framework-agnostic [`Configuration`](crate::Configuration) and the
//! [clap](https://docs.rs/clap) CLI parser. It is compiled only when the
//! `clap` Cargo feature is enabled (on by default).
//!
//! [`ConfigArgs`] and [`ConfigSubcommand`] embed into an application's
//! `#[derive(Parser)]` struct and give it `config list|get|set|unset|path`
//! subcommands. [`ConfigArgs::into_action()`] is the only bridge to the core:
//! it turns parsed arguments into a [`ConfigAction`](crate::ConfigAction),
//! which [`Configuration::handle()`](crate::Configuration::handle) executes.
//!
//! Applications using another parser construct
//! [`ConfigAction`](crate::ConfigAction) values directly.

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args for the `config` subcommand group.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
///
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all resolved configuration key-value pairs.
    List,
    /// Show the resolved value and question for a config key.
    Get {
        /// Dotted key path (e.g. "db.host").
        key: String,
    },
    /// Validate and persist a configuration value.
    Set {
        /// Dotted key path (e.g. "db.host").
        key: String,
        /// Value to set, parsed as the item's declared type.
        value: String,
    },
    /// Remove a configuration value from the document.
    Unset {
        /// Dotted key path (e.g. "db.host").
        key: String,
    },
    /// Print the location of the configuration document.
    Path,
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) and explicit `config list` both map to
    /// `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
            Some(ConfigSubcommand::Set { key, value }) => ConfigAction::Set { key, value },
            Some(ConfigSubcommand::Unset { key }) => ConfigAction::Unset { key },
            Some(ConfigSubcommand::Path) => ConfigAction::Path,
        }
    }
}
