use std::fmt;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type with rich context and user-friendly reporting.
///
/// Every failure of a repair maps onto one of these variants:
///
/// | Variant | Meaning | Target file |
/// |---------|---------|-------------|
/// | `NotFound` | Input missing or unreadable | untouched |
/// | `Parse` | Input is not notebook JSON | untouched |
/// | `Backup` | Backup could not be created or verified | untouched |
/// | `Write` | Repaired notebook could not be written | restored from backup when possible |
/// | `Restore` | Restore after a failed write also failed | backup holds the original |
/// | `Config` | Configuration file or CLI value invalid | untouched |
///
/// Use [`display_for_user()`](Self::display_for_user) for operator-facing output and
/// [`to_exit_code()`](Self::to_exit_code) for the CLI status. Library code returns
/// `NbfixError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NbfixError {
    #[error("Notebook not found or unreadable: {path}: {reason}")]
    NotFound { path: String, reason: String },

    #[error("Invalid notebook JSON in {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Failed to create backup {backup} of {path}: {reason}")]
    Backup {
        path: String,
        backup: String,
        reason: String,
    },

    #[error("Failed to write repaired notebook {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Failed to restore {path} from backup {backup}: {reason}")]
    Restore {
        path: String,
        backup: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Backup,
    Write,
    Recovery,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Backup => write!(f, "Backup"),
            Self::Write => write!(f, "Write"),
            Self::Recovery => write!(f, "Recovery"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [defaults] and [backup] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } => Some(
                "nbfix searches for .nbfix/config.toml starting from the current directory upward."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Remove unknown keys; only [defaults] and [backup] are recognized".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "indent" => vec!["Use an indent width between 0 and 16".to_string()],
                "backup.label" => vec![
                    "Use a short label of letters, digits, '-' or '_' (e.g. 'bak')".to_string(),
                ],
                _ => vec!["Remove the option to use the default value".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Omit --config to use discovery or built-in defaults".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl UserFriendlyError for NbfixError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { path, reason } => {
                format!("Cannot read notebook '{path}': {reason}")
            }
            Self::Parse { path, reason } => {
                format!("Notebook '{path}' is not valid JSON: {reason}")
            }
            Self::Backup {
                path,
                backup,
                reason,
            } => format!("Could not back up '{path}' to '{backup}': {reason}"),
            Self::Write { path, reason } => {
                format!("Could not write repaired notebook '{path}': {reason}")
            }
            Self::Restore {
                path,
                backup,
                reason,
            } => format!("Could not restore '{path}' from '{backup}': {reason}"),
            Self::Config(err) => err.user_message(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } | Self::Parse { .. } => {
                Some("The notebook was not modified and no backup was created.".to_string())
            }
            Self::Backup { .. } => Some(
                "nbfix never overwrites a notebook without a verified backup, so the file was left untouched."
                    .to_string(),
            ),
            Self::Write { .. } => Some(
                "A backup of the original notebook was written before the rewrite and has been kept."
                    .to_string(),
            ),
            Self::Restore { backup, .. } => Some(format!(
                "The notebook may be incomplete. The original content is preserved in '{backup}'."
            )),
            Self::Config(err) => err.context(),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { .. } => vec![
                "Check that the path is correct and points to an .ipynb file".to_string(),
                "Ensure you have read permission on the file".to_string(),
            ],
            Self::Parse { .. } => vec![
                "Open the notebook in Jupyter to confirm it loads".to_string(),
                "Resolve any merge conflict markers left in the file".to_string(),
            ],
            Self::Backup { .. } => vec![
                "Ensure the notebook's directory is writable".to_string(),
                "Check that the disk is not full".to_string(),
            ],
            Self::Write { .. } => vec![
                "Ensure the notebook file is writable and not locked by another program"
                    .to_string(),
                "Re-run nbfix once the file is writable".to_string(),
            ],
            Self::Restore { path, backup, .. } => vec![format!(
                "Copy '{backup}' over '{path}' by hand before editing further"
            )],
            Self::Config(err) => err.suggestions(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::Parse { .. } => ErrorCategory::Input,
            Self::Backup { .. } => ErrorCategory::Backup,
            Self::Write { .. } => ErrorCategory::Write,
            Self::Restore { .. } => ErrorCategory::Recovery,
            Self::Config(_) => ErrorCategory::Configuration,
        }
    }
}

impl NbfixError {
    /// Get a user-friendly error message with context and actionable suggestions
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code.
    ///
    /// Configuration problems are argument errors; every repair failure is `FAILURE`.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            _ => ExitCode::FAILURE,
        }
    }

    /// Stable machine-readable kind, used in `--json` output
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "parse",
            Self::Backup { .. } => "backup",
            Self::Write { .. } => "write",
            Self::Restore { .. } => "restore",
            Self::Config(_) => "config",
        }
    }
}
