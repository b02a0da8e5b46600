//! nbfix - repair Jupyter notebooks whose widget metadata breaks rendering
//!
//! GitHub and nbviewer refuse to render notebooks whose `metadata.widgets` lacks a `state`
//! key. nbfix removes those entries, at notebook level and in every cell, and leaves
//! everything else byte-for-byte as it was.
//!
//! nbfix can be used in two ways:
//! - **CLI**: `nbfix analysis.ipynb`
//! - **Library**: drive [`RepairTransaction`] or call [`repair`] on an in-memory [`Notebook`]
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Repair in place; the original is kept as analysis.ipynb.bak-<timestamp>
//! nbfix analysis.ipynb
//!
//! # Only report (exit 3 when malformed metadata is present)
//! nbfix --check analysis.ipynb
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use nbfix::{Notebook, repair};
//!
//! let mut notebook = Notebook::parse(r#"{"cells": [], "metadata": {"widgets": {"w1": {}}}}"#)?;
//! let report = repair(&mut notebook);
//! assert_eq!(report.len(), 1);
//! assert!(notebook.metadata().is_some_and(|m| !m.contains_key("widgets")));
//! # Ok::<(), nbfix::NbfixError>(())
//! ```
//!
//! # Safety model
//!
//! [`RepairTransaction::process`] never writes a notebook before a verified, byte-identical
//! backup exists next to it, restores the original from that backup when the write fails,
//! and never deletes backups.
//!
//! # Stable Public API
//!
//! - [`Notebook`], [`repair`], [`RemovalReport`]: in-memory repair
//! - [`RepairTransaction`], [`RepairOptions`], [`Outcome`]: file repair with backup
//! - [`Config`], [`CliArgs`]: configuration discovery
//! - [`NbfixError`], [`ExitCode`]: errors and CLI status
//! - [`emit_jcs`]: JCS canonical JSON emission used by `--json`
//!
//! Internal modules are accessible via module paths but are marked `#[doc(hidden)]`.

pub use nbfix_engine::{
    Notebook, Outcome, OutcomeSummary, RemovalReport, RemovalSite, RepairMode, RepairOptions,
    RepairTransaction, process, repair,
};

/// Configuration with precedence CLI > config file > defaults.
pub use nbfix_config::{CliArgs, Config, ConfigSource};

/// Library-level error type.
///
/// Library code returns `NbfixError` and does NOT call `std::process::exit()`.
pub use nbfix_utils::error::NbfixError;

/// Exit codes: 0 success, 1 failure, 2 usage or configuration, 3 check found issues.
pub use nbfix_utils::exit_codes::ExitCode;

pub use nbfix_utils::canonicalization::emit_jcs;

pub use nbfix_utils::error::{ErrorCategory, UserFriendlyError};

#[doc(hidden)]
pub use nbfix_utils::{atomic_write, canonicalization, error, exit_codes, logging, paths};

#[doc(hidden)]
pub use nbfix_engine::{notebook, store, transaction, widgets};

#[doc(hidden)]
pub use nbfix_config as config;

#[doc(hidden)]
pub mod cli;
