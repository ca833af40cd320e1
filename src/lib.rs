//! First-run configuration for command-line tools and daemons. Declare what
//! you need, and askfig either loads it or asks for it.
//!
//! A component declares a nested set of named options, each with a type and
//! optionally a default, a list of choices, a range, and a validator. The
//! first time a value is read, askfig looks for the component's persisted
//! document. If it exists, values come from there. If it does not, the
//! operator is asked for every option at the terminal, and the answers are
//! written out so the next run starts silently.
//!
//! ```ignore
//! use askfig::{Configuration, Schema, ValueType, decl};
//!
//! let schema = Schema::new()
//!     .item("port", decl![1..65535, "port number"])
//!     .item("color", decl![["red", "green", "blue"], "pick one"])
//!     .item("enabled", decl![true, "enable?"])
//!     .section("db", Schema::new().item("host", decl!["localhost"]));
//!
//! let mut config = Configuration::builder("Acme::NetServer").build();
//! config.configure(None, &schema)?;
//! let port = config.get("port")?;
//! ```
//!
//! On a fresh machine the `configure` call asks:
//!
//! ```text
//! pick one
//!   1) red
//!   2) green
//!   3) blue
//! Choice: 2
//! Acme::NetServer requests a text [localhost]:
//! enable? [Y/n]
//! port number (1..65535): 70000
//! 70000 is outside 1..65535
//! port number (1..65535): 8080
//! ```
//!
//! and writes `~/.acme/config/net_server.yml`.
//!
//! # Declarations
//!
//! A leaf is an ordered list of [`Decl`] elements, usually written with the
//! [`decl!`] macro. The **first** element decides what kind of item it is:
//!
//! | First element            | Item                                     |
//! |--------------------------|------------------------------------------|
//! | `["a", "b"]`, `vec![..]` | choice list, typed by its first member    |
//! | `1..65535`, `0.0..=1.0`  | ranged number, typed by the lower end     |
//! | `true` / `false`         | boolean with that default                 |
//! | `ValueType::Text`        | typed item with no default                |
//! | any other value          | item with that default, typed by it       |
//!
//! The **second** element, when it is text, is the question shown to the
//! operator. Anything after that is classified by shape and the first of
//! each kind wins: a validator, a choice list, a range, a default, an
//! explicit type. See the [`schema`] module for the full rules.
//!
//! Declarations are checked when they are declared, never when they are
//! asked: a default that is not of the item's type fails
//! [`declare`](Configuration::declare) with the dotted key of the offending
//! item, before anything is prompted.
//!
//! # Where things live
//!
//! Every owner has a storage namespace (`configuration_root`) and a basename:
//!
//! ```text
//! ~/.acme/config/net_server.yml     persisted document
//! ~/.acme/data/net_server/          config.data_dir()
//! ~/.acme/log/net_server/           config.log_dir()
//! ```
//!
//! The basename is the owner identity without its leading namespace segment,
//! snake-cased (`Acme::NetServer` → `net_server`). The namespace defaults to
//! the leading segment (`acme`). On Windows the dotted directory lives under
//! the roaming application-data folder instead of the home directory.
//! [`BaseLocation::Path`] points the whole namespace somewhere explicit,
//! which is what tests and system-wide installs want.
//!
//! The document is the resolved value tree serialized directly: YAML by
//! default, TOML with [`DocumentFormat::Toml`]. Edit it by hand freely.
//!
//! # Lifecycle
//!
//! ```text
//! NotLoaded ──document present──────────────▶ Loaded
//!     └──────document absent──▶ Eliciting ──save──▶ Loaded
//! ```
//!
//! - **`read_immediately`** (default on): the first `get`, `set` or `unset`
//!   loads or elicits. Off: those calls fail with
//!   [`NotLoaded`](AskfigError::NotLoaded) until you call
//!   [`load`](Configuration::load) yourself.
//! - **`write_immediately`** (default on): every write that changes a value
//!   rewrites the document. Off: call [`save`](Configuration::save).
//! - **`assume_default`**: never prompt. Items take their default; items
//!   without one are left out and reading them is
//!   [`KeyNotFound`](AskfigError::KeyNotFound).
//! - **`strict`**: keys in the document that the schema does not declare
//!   fail the load instead of being logged and kept.
//!
//! Declaring more schema after loading extends the tree but keeps the
//! loaded values; new items are not asked for until the document is gone.
//!
//! # Several components in one process
//!
//! [`Registry`] maps owner identities to their configurations, building each
//! on first use. It is an ordinary value; keep it wherever the rest of your
//! application state lives.
//!
//! # Prompting
//!
//! Elicitation talks to the operator through the [`Prompter`] trait. The
//! default [`TerminalPrompter`] reads lines from stdin and writes to stdout;
//! supply your own through
//! [`ConfigurationBuilder::prompter`] for GUIs or scripted installs.
//! Coercion, validation and re-asking stay in askfig; a prompter only asks.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`ConfigArgs`] adds
//! `config list|get|set|unset|path` subcommands to an existing clap parser.
//! [`into_action()`](ConfigArgs::into_action) turns them into a
//! [`ConfigAction`], which [`Configuration::handle`] executes. `config set`
//! parses the value as the item's declared type and runs its validator
//! before anything is written.
//!
//! To use askfig without clap:
//!
//! ```toml
//! askfig = { version = "...", default-features = false }
//! ```
//!
//! # Logging
//!
//! askfig emits [`tracing`](https://docs.rs/tracing) events: `info` when a
//! document is loaded or elicitation starts, `warn` for undeclared keys in
//! lenient mode, `debug` for document reads and writes. Install any
//! subscriber to see them.
//!
//! # Error handling
//!
//! All fallible operations return [`AskfigError`]. See the [`error`] module
//! for the full set.

pub mod error;
pub mod schema;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod config;
mod elicit;
mod file;
pub(crate) mod merge;
mod ops;
mod persist;
mod prompt;
mod registry;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::ConfigurationBuilder;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use config::Configuration;
pub use error::AskfigError;
pub use file::home_or_app_data;
pub use ops::ConfigResult;
pub use prompt::{Prompter, TerminalPrompter};
pub use registry::Registry;
pub use schema::{ConfigNode, ConfigTree, Decl, Declaration, ItemDescriptor, Schema};
pub use types::{
    BaseLocation, Bound, BoundValue, ConfigAction, DocumentFormat, Options, Validator, ValueType,
};

pub use serde_yaml::{Mapping, Value};
