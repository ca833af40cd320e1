//! Path resolution for an owner's persisted document and directories.
//!
//! Layout under the storage namespace directory (`base`):
//!
//! ```text
//! <base>/config/<basename>.<ext>   persisted document
//! <base>/data/<basename>/          owner data directory
//! <base>/log/<basename>/           owner log directory
//! ```
//!
//! With [`BaseLocation::Platform`], `base` is `<home-or-appdata>/.<root>`:
//! the roaming application-data directory on Windows, the user home
//! directory elsewhere. Nothing here touches the filesystem; directories are
//! created by whoever writes into them.

use std::path::PathBuf;

use heck::ToSnakeCase;

use crate::error::AskfigError;
use crate::types::{BaseLocation, DocumentFormat};

const NAMESPACE_SEPARATORS: [&str; 3] = ["::", ".", "/"];

/// The per-user directory that storage namespaces live under.
///
/// Returns `None` if the platform reports no home directory.
pub fn home_or_app_data() -> Option<PathBuf> {
    if cfg!(windows) {
        let base = directories::BaseDirs::new()?;
        Some(base.data_dir().to_path_buf())
    } else {
        let user = directories::UserDirs::new()?;
        Some(user.home_dir().to_path_buf())
    }
}

/// Split `Acme::NetServer` into `(Some("Acme"), "NetServer")`.
fn split_namespace(owner: &str) -> (Option<&str>, &str) {
    NAMESPACE_SEPARATORS
        .iter()
        .filter_map(|sep| owner.find(sep).map(|i| (i, sep.len())))
        .min_by_key(|(i, _)| *i)
        .map(|(i, len)| (Some(&owner[..i]), &owner[i + len..]))
        .unwrap_or((None, owner))
}

/// Storage basename: the owner identity without its leading namespace
/// segment, as lowercase words joined by underscores.
///
/// `Acme::NetServer` → `net_server`, `Acme::Net::Server` → `net_server`,
/// `HttpClient` → `http_client`.
pub fn owner_basename(owner: &str) -> String {
    let (_, rest) = split_namespace(owner);
    let rest = if rest.is_empty() { owner } else { rest };
    rest.to_snake_case()
}

/// Storage namespace used when none is configured: the owner's leading
/// namespace segment, or the basename for owners without one.
pub fn default_root(owner: &str) -> String {
    match split_namespace(owner) {
        (Some(ns), _) if !ns.is_empty() => ns.to_snake_case(),
        _ => owner_basename(owner),
    }
}

/// Resolve the storage namespace directory.
pub fn resolve_base_dir(base: &BaseLocation, root: &str) -> Result<PathBuf, AskfigError> {
    match base {
        BaseLocation::Platform => {
            let home = home_or_app_data().ok_or(AskfigError::NoHomeDirectory)?;
            Ok(home.join(format!(".{root}")))
        }
        BaseLocation::Path(p) => Ok(p.clone()),
    }
}

/// Resolved locations for one owner.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerPaths {
    pub base: PathBuf,
    pub basename: String,
    pub format: DocumentFormat,
}

impl OwnerPaths {
    pub fn new(base: PathBuf, owner: &str, format: DocumentFormat) -> Self {
        OwnerPaths {
            base,
            basename: owner_basename(owner),
            format,
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base.join("config")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir()
            .join(format!("{}.{}", self.basename, self.format.extension()))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base.join("data").join(&self.basename)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base.join("log").join(&self.basename)
    }
}
