//! Configuration management for nbfix
//!
//! Hierarchical configuration with discovery and precedence: CLI > file > defaults.
//! The file is `.nbfix/config.toml`, found by walking up from the working directory
//! (stopping at a repository root), or named explicitly with `--config`.
//!
//! ```toml
//! [defaults]
//! verbose = false
//! indent = 1
//!
//! [backup]
//! label = "bak"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nbfix_utils::error::ConfigError;
use nbfix_utils::paths::{DEFAULT_BACKUP_LABEL, is_valid_backup_label};

/// Directory holding the config file
pub const CONFIG_DIR: &str = ".nbfix";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Largest accepted indent width
pub const MAX_INDENT: usize = 16;

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub indent: Option<usize>,
    pub backup_label: Option<String>,
}

/// Where an effective configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::ConfigFile(path) => write!(f, "config file ({})", path.display()),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Defaults {
    verbose: Option<bool>,
    indent: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BackupSection {
    label: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<Defaults>,
    backup: Option<BackupSection>,
}

/// Effective configuration for one nbfix invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Debug-level logging
    pub verbose: bool,
    /// Indent width forced on the output; `None` keeps the notebook's own layout
    pub indent: Option<usize>,
    /// Label used in backup names: `<file>.<label>-<timestamp>`
    pub backup_label: String,
    source_attribution: HashMap<&'static str, ConfigSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            indent: None,
            backup_label: DEFAULT_BACKUP_LABEL.to_string(),
            source_attribution: HashMap::from([
                ("verbose", ConfigSource::Defaults),
                ("indent", ConfigSource::Defaults),
                ("backup.label", ConfigSource::Defaults),
            ]),
        }
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| {
            ConfigError::InvalidFile(format!("Failed to get current directory: {e}"))
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// Path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            tracing::debug!(path = %path.display(), "Loading config file");
            let file_config = Self::load_config_file(path)?;
            let source = ConfigSource::ConfigFile(path.clone());

            if let Some(defaults) = file_config.defaults {
                if let Some(verbose) = defaults.verbose {
                    config.verbose = verbose;
                    config.source_attribution.insert("verbose", source.clone());
                }
                if let Some(indent) = defaults.indent {
                    config.indent = Some(indent);
                    config.source_attribution.insert("indent", source.clone());
                }
            }
            if let Some(label) = file_config.backup.and_then(|b| b.label) {
                config.backup_label = label;
                config.source_attribution.insert("backup.label", source);
            }
        }

        if let Some(verbose) = cli_args.verbose {
            config.verbose = verbose;
            config.source_attribution.insert("verbose", ConfigSource::Cli);
        }
        if let Some(indent) = cli_args.indent {
            config.indent = Some(indent);
            config.source_attribution.insert("indent", ConfigSource::Cli);
        }
        if let Some(label) = &cli_args.backup_label {
            config.backup_label = label.clone();
            config
                .source_attribution
                .insert("backup.label", ConfigSource::Cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Walk upward from `start_dir` looking for `.nbfix/config.toml`.
    ///
    /// Stops at the filesystem root or at the first repository root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }
            current = dir.parent();
        }

        None
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidFile(format!("Failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(indent) = self.indent
            && indent > MAX_INDENT
        {
            return Err(ConfigError::InvalidValue {
                key: "indent".to_string(),
                value: indent.to_string(),
            });
        }
        if !is_valid_backup_label(&self.backup_label) {
            return Err(ConfigError::InvalidValue {
                key: "backup.label".to_string(),
                value: self.backup_label.clone(),
            });
        }
        Ok(())
    }

    /// Source of an effective value (`"verbose"`, `"indent"`, `"backup.label"`)
    #[must_use]
    pub fn source_of(&self, key: &str) -> Option<&ConfigSource> {
        self.source_attribution.get(key)
    }
}
