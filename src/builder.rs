use crate::config::Configuration;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::types::{BaseLocation, DocumentFormat, Options};

/// Builder for one owner's [`Configuration`].
///
/// Every setter maps onto a field of [`Options`]; anything not set keeps its
/// default. Building never touches the filesystem. Declare a schema and call
/// [`load`](Configuration::load) (or just read a value) to resolve it.
///
/// ```ignore
/// let mut config = Configuration::builder("Acme::NetServer")
///     .format(DocumentFormat::Toml)
///     .strict(true)
///     .build();
/// config.declare(&schema)?;
/// let port = config.get("port")?;
/// ```
pub struct ConfigurationBuilder {
    owner: String,
    options: Options,
    prompter: Option<Box<dyn Prompter + Send>>,
}

impl ConfigurationBuilder {
    pub(crate) fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            options: Options::default(),
            prompter: None,
        }
    }

    /// Replace all options at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Load (or elicit) on first access (default: `true`).
    ///
    /// When disabled, reads and writes before an explicit
    /// [`load`](Configuration::load) fail with
    /// [`NotLoaded`](crate::AskfigError::NotLoaded).
    pub fn read_immediately(mut self, enabled: bool) -> Self {
        self.options.read_immediately = enabled;
        self
    }

    /// Persist after every write that changes a value (default: `true`).
    pub fn write_immediately(mut self, enabled: bool) -> Self {
        self.options.write_immediately = enabled;
        self
    }

    /// Override the storage namespace name (default: derived from the owner,
    /// `Acme::NetServer` → `acme`).
    pub fn configuration_root(mut self, root: &str) -> Self {
        self.options.configuration_root = Some(root.to_string());
        self
    }

    /// Never prompt. Items take their defaults; items without one stay unset.
    pub fn assume_default(mut self, enabled: bool) -> Self {
        self.options.assume_default = enabled;
        self
    }

    /// Where the storage namespace directory lives (default: under the user's
    /// home, or application data on Windows).
    pub fn base(mut self, base: BaseLocation) -> Self {
        self.options.base = base;
        self
    }

    /// Document codec (default: YAML).
    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.options.format = format;
        self
    }

    /// Reject documents with undeclared keys instead of warning (default: `false`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Use `prompter` for elicitation instead of the terminal.
    pub fn prompter(mut self, prompter: impl Prompter + Send + 'static) -> Self {
        self.prompter = Some(Box::new(prompter));
        self
    }

    pub fn build(self) -> Configuration {
        let prompter = self
            .prompter
            .unwrap_or_else(|| Box::new(TerminalPrompter::stdio()));
        Configuration::from_parts(self.owner, self.options, prompter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::SharedOutput;

    #[test]
    fn defaults() {
        let config = Configuration::builder("Acme::NetServer").build();
        assert_eq!(config.owner(), "Acme::NetServer");
        assert_eq!(config.options(), &Options::default());
        assert!(!config.is_loaded());
        assert!(config.tree().is_empty());
    }

    #[test]
    fn setters_reach_options() {
        let config = Configuration::builder("Tool")
            .read_immediately(false)
            .write_immediately(false)
            .configuration_root("shared")
            .assume_default(true)
            .base(BaseLocation::Path("/srv/tool".into()))
            .format(DocumentFormat::Toml)
            .strict(true)
            .prompter(SharedOutput::prompter("").0)
            .build();
        let o = config.options();
        assert!(!o.read_immediately);
        assert!(!o.write_immediately);
        assert_eq!(o.configuration_root.as_deref(), Some("shared"));
        assert!(o.assume_default);
        assert_eq!(o.base, BaseLocation::Path("/srv/tool".into()));
        assert_eq!(o.format, DocumentFormat::Toml);
        assert!(o.strict);
    }

    #[test]
    fn later_setters_refine_whole_options() {
        let config = Configuration::builder("Tool")
            .options(Options {
                strict: true,
                ..Options::default()
            })
            .assume_default(true)
            .build();
        assert!(config.options().strict);
        assert!(config.options().assume_default);
    }

    #[test]
    fn file_path_follows_options() {
        let config = Configuration::builder("Acme::NetServer")
            .base(BaseLocation::Path("/srv/acme".into()))
            .format(DocumentFormat::Toml)
            .build();
        assert_eq!(
            config.config_file_path().unwrap(),
            std::path::PathBuf::from("/srv/acme/config/net_server.toml")
        );
    }
}
