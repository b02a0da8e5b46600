//! CLI argument definitions
//!
//! nbfix takes exactly one notebook path; everything else is an optional flag.

use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// nbfix - strip malformed ipywidgets metadata from Jupyter notebooks
#[derive(Parser, Debug)]
#[command(name = "nbfix")]
#[command(about = "Remove malformed widget metadata so GitHub and nbviewer can render a notebook")]
#[command(long_about = r#"
nbfix removes `metadata.widgets` entries that lack the `state` key renderers require,
at notebook level and in every cell. Nothing else in the notebook changes.

Before the notebook is rewritten, a byte-identical backup is written next to it as
<file>.bak-<YYYYMMDD_HHMMSS>. If the rewrite fails, the original is restored from that
backup. Backups are never deleted.

EXAMPLES:
  # Repair a notebook in place
  nbfix analysis.ipynb

  # Report malformed metadata without writing (exit 3 if any is found)
  nbfix --check analysis.ipynb

  # Machine-readable outcome
  nbfix --json analysis.ipynb

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .nbfix/config.toml
  Use --config to specify an explicit config file path

EXIT STATUS:
  0  repaired, or nothing to repair
  1  repair failed (the notebook is unchanged or restored from backup)
  2  invalid arguments or configuration
  3  --check found malformed metadata
"#)]
#[command(version)]
pub struct Cli {
    /// Notebook (.ipynb) to repair
    #[arg(value_name = "NOTEBOOK")]
    pub notebook: Utf8PathBuf,

    /// Report malformed metadata without modifying the notebook
    #[arg(long)]
    pub check: bool,

    /// Emit the outcome as canonical JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Indent width for the rewritten notebook (default: keep the notebook's own)
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Label used in backup names: <file>.<label>-<timestamp>
    #[arg(long, value_name = "LABEL")]
    pub backup_label: Option<String>,
}

/// Build the clap command, for help rendering and argument tests.
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}
