//! # askfig demo application
//!
//! A sample CLI tool that shows how to integrate askfig into a real
//! application. This is **not** a real app; it exists to demonstrate and
//! manually verify askfig's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example askfig_demo -- echo
//! cargo run --example askfig_demo -- config list
//! ```
//!
//! The first run asks for every setting and writes
//! `~/.askfig_demo/config/askfig_demo.yml`. Later runs read it silently.
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                              |
//! |--------------------------|-----------------------------------------------------------------|
//! | First-run elicitation    | `cargo run --example askfig_demo -- echo`                        |
//! | Defaults, no prompting   | `cargo run --example askfig_demo -- --defaults echo`             |
//! | Explicit base directory  | `cargo run --example askfig_demo -- --base /tmp/demo echo`       |
//! | TOML documents           | `cargo run --example askfig_demo -- --toml echo`                 |
//! | Strict mode              | Add a stray key to the document, then run with `--strict`        |
//! | `config get`             | `cargo run --example askfig_demo -- config get server.port`      |
//! | `config set`             | `cargo run --example askfig_demo -- config set server.port 9000` |
//! | Validation on set        | `cargo run --example askfig_demo -- config set server.port 0`    |
//! | `config unset`           | `cargo run --example askfig_demo -- config unset display.motto`  |
//! | `config path`            | `cargo run --example askfig_demo -- config path`                 |
//! | Logging                  | `RUST_LOG=askfig=debug cargo run --example askfig_demo -- echo`  |

mod schema;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use askfig::{BaseLocation, ConfigArgs, Configuration, DocumentFormat, Registry};

use schema::{DemoSettings, demo_schema};

const OWNER: &str = "AskfigDemo";

/// askfig demo, a sample CLI app for showcasing askfig integration.
#[derive(Parser, Debug)]
#[command(name = "askfig-demo")]
struct Cli {
    /// Never prompt: take declared defaults.
    #[arg(long, global = true)]
    defaults: bool,

    /// Keep configuration under this directory instead of the home directory.
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Store the document as TOML instead of YAML.
    #[arg(long, global = true)]
    toml: bool,

    /// Fail on undeclared keys in the document.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print resolved configuration values (colored by display.color).
    Echo,
    /// Inspect and edit the configuration (list, get, set, unset, path).
    Config(ConfigArgs),
}

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn echo(settings: &DemoSettings) {
    let color = ansi_color_code(&settings.display.color);
    if settings.verbose {
        println!("{color}[verbose] Resolved configuration for {:?}{RESET}", settings.name);
    }
    if let Some(motto) = &settings.display.motto {
        println!("{color}{motto}{RESET}");
    }

    let entries = [
        ("name", settings.name.clone()),
        ("server.host", settings.server.host.clone()),
        ("server.port", settings.server.port.to_string()),
        ("server.max_connections", settings.server.max_connections.to_string()),
        ("display.color", settings.display.color.clone()),
        ("display.format", settings.display.format.clone()),
    ];

    if settings.display.format == "plain" {
        for (key, value) in &entries {
            println!("{key}={value}");
        }
    } else {
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in &entries {
            println!("{color}{key:<width$}{RESET}  {value}");
        }
    }
}

fn configure(cli: &Cli, registry: &mut Registry) -> Result<(), askfig::AskfigError> {
    let base = cli.base.clone();
    let config: &mut Configuration = registry.entry(OWNER, |b| {
        let b = b
            .assume_default(cli.defaults)
            .strict(cli.strict)
            .format(if cli.toml {
                DocumentFormat::Toml
            } else {
                DocumentFormat::Yaml
            });
        match base {
            Some(path) => b.base(BaseLocation::Path(path)),
            None => b,
        }
    });
    config.declare(&demo_schema())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut registry = Registry::new();
    if let Err(e) = configure(&cli, &mut registry) {
        eprintln!("Invalid schema:\n{e}");
        std::process::exit(1);
    }
    let Some(config) = registry.get_mut(OWNER) else {
        unreachable!("registered above");
    };

    match cli.command {
        Commands::Echo => {
            let settings: DemoSettings = config.deserialize().unwrap_or_else(|e| {
                eprintln!("Failed to load config:\n{e}");
                std::process::exit(1);
            });
            echo(&settings);
        }
        Commands::Config(args) => {
            let action = args.into_action();
            config.handle_and_print(&action).unwrap_or_else(|e| {
                eprintln!("Config error:\n{e}");
                std::process::exit(1);
            });
        }
    }
}
