//! Schema for the askfig demo application.
//!
//! Two top-level items and two nested sections, covering every declaration
//! shape: choices, ranges, booleans, typed items without a default, plain
//! defaults, and a custom validator.
//!
//! | Key                      | Declared as                                  |
//! |--------------------------|----------------------------------------------|
//! | `name`                   | text default                                 |
//! | `verbose`                | boolean default                              |
//! | `server.host`            | text default                                 |
//! | `server.port`            | integer range `1..=65535`                    |
//! | `server.max_connections` | integer default with an even-number validator |
//! | `display.color`          | choice list                                  |
//! | `display.format`         | choice list with a default                   |
//! | `display.motto`          | text, no default                             |

use askfig::{Decl, Schema, ValueType, decl};
use serde::Deserialize;

pub fn demo_schema() -> Schema {
    Schema::new()
        .item("name", decl!["askfig-demo", "Application name"])
        .item("verbose", decl![false, "Enable verbose output?"])
        .section(
            "server",
            Schema::new()
                .item("host", decl!["127.0.0.1", "Server host"])
                .item("port", decl![1..=65535, "Server port", 8080])
                .item(
                    "max_connections",
                    decl![
                        100,
                        "Maximum concurrent connections (even)",
                        Decl::validator(|v| v.as_i64().is_some_and(|n| n > 0 && n % 2 == 0))
                    ],
                ),
        )
        .section(
            "display",
            Schema::new()
                .item(
                    "color",
                    decl![
                        ["red", "green", "yellow", "blue", "magenta", "cyan"],
                        "Output color",
                        "yellow"
                    ],
                )
                .item("format", decl![["table", "plain"], "Output format", "table"])
                .item("motto", decl![ValueType::Text, "A motto for the banner"]),
        )
}

/// Typed view of the resolved values.
#[derive(Debug, Deserialize)]
pub struct DemoSettings {
    pub name: String,
    pub verbose: bool,
    pub server: ServerSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct DisplaySettings {
    pub color: String,
    pub format: String,
    /// Absent when the demo runs with `--defaults`.
    #[serde(default)]
    pub motto: Option<String>,
}
