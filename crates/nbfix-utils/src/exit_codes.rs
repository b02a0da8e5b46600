//! Exit code constants for nbfix.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Notebook repaired, or nothing to repair |
//! | 1 | `FAILURE` | Load, backup, write, or restore failed |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `ISSUES_FOUND` | `--check` found malformed widget metadata |

/// Exit codes matching the documented exit code table.
///
/// The numeric values are part of the public API and will not change in 1.x releases.
///
/// # Example
///
/// ```rust
/// use nbfix_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::FAILURE, ExitCode::from_i32(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - the notebook is renderable (repaired or already clean)
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Failure - any failed terminal state of a repair
    pub const FAILURE: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid or missing command-line arguments or config
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Check mode found malformed metadata that a repair would remove
    pub const ISSUES_FOUND: ExitCode = ExitCode(3);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
