//! CLI tests module
//!
//! Argument parsing and outcome rendering. Binary-level behaviour is covered in
//! `tests/test_cli.rs`.

use super::report::{render_stderr, render_stdout};
use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use nbfix_engine::{
    MalformedShape, Notebook, Outcome, Removal, RemovalReport, RemovalSite, repair,
};
use nbfix_utils::error::NbfixError;

fn report_with_cell_removal() -> RemovalReport {
    let mut notebook = Notebook::parse(
        r#"{"cells": [{"id": "c1", "metadata": {"widgets": {}}}], "metadata": {}}"#,
    )
    .unwrap();
    repair(&mut notebook)
}

#[test]
fn test_parse_minimal() {
    let cli = Cli::try_parse_from(["nbfix", "nb.ipynb"]).unwrap();
    assert_eq!(cli.notebook, Utf8PathBuf::from("nb.ipynb"));
    assert!(!cli.check);
    assert!(!cli.json);
    assert!(!cli.verbose);
    assert_eq!(cli.indent, None);
}

#[test]
fn test_parse_all_flags() {
    let cli = Cli::try_parse_from([
        "nbfix",
        "--check",
        "--json",
        "-v",
        "--config",
        "cfg.toml",
        "--indent",
        "2",
        "--backup-label",
        "orig",
        "nb.ipynb",
    ])
    .unwrap();
    assert!(cli.check && cli.json && cli.verbose);
    assert_eq!(cli.indent, Some(2));
    assert_eq!(cli.backup_label.as_deref(), Some("orig"));
    assert_eq!(cli.config.unwrap().to_str(), Some("cfg.toml"));
}

#[test]
fn test_positional_count_is_exactly_one() {
    let none = Cli::try_parse_from(["nbfix"]).unwrap_err();
    assert_eq!(none.exit_code(), 2);

    let two = Cli::try_parse_from(["nbfix", "a.ipynb", "b.ipynb"]).unwrap_err();
    assert_eq!(two.exit_code(), 2);
}

#[test]
fn test_build_cli_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn test_render_no_change() {
    let text = render_stdout(Utf8Path::new("nb.ipynb"), &Outcome::DoneNoChange);
    assert_eq!(text, "✓ No malformed widget metadata found in nb.ipynb\n");
    assert!(render_stderr(Utf8Path::new("nb.ipynb"), &Outcome::DoneNoChange).is_empty());
}

#[test]
fn test_render_changed_lists_removals_and_backup() {
    let outcome = Outcome::DoneChanged {
        report: report_with_cell_removal(),
        backup: Utf8PathBuf::from("nb.ipynb.bak-20260101_000000"),
        original_blake3_first8: "0123abcd".to_string(),
        warnings: vec![],
    };

    let text = render_stdout(Utf8Path::new("nb.ipynb"), &outcome);

    assert!(text.contains(
        "  - Removed malformed widgets metadata at cell 0 (id c1) (mapping is empty)\n"
    ));
    assert!(text.contains("✓ Backup written to nb.ipynb.bak-20260101_000000 (blake3 0123abcd)"));
    assert!(text.ends_with("✓ Repaired nb.ipynb: removed 1 malformed widgets entry\n"));
}

#[test]
fn test_render_would_change() {
    let outcome = Outcome::WouldChange {
        report: report_with_cell_removal(),
    };
    let text = render_stdout(Utf8Path::new("nb.ipynb"), &outcome);
    assert!(text.contains("Would remove widgets metadata at cell 0 (id c1)"));
    assert!(text.contains("run without --check to repair"));
}

#[test]
fn test_render_failures_go_to_stderr() {
    let path = Utf8Path::new("nb.ipynb");
    let restored = Outcome::FailedRestored {
        error: NbfixError::Write {
            path: "nb.ipynb".to_string(),
            reason: "disk full".to_string(),
        },
        backup: Utf8PathBuf::from("nb.ipynb.bak-x"),
    };

    assert!(render_stdout(path, &restored).is_empty());
    let text = render_stderr(path, &restored);
    assert!(text.starts_with("Error: Could not write repaired notebook"));
    assert!(text.contains("✓ Restored nb.ipynb from backup nb.ipynb.bak-x"));
}

#[test]
fn test_render_unrestored_names_backup() {
    let outcome = Outcome::FailedUnrestored {
        error: NbfixError::Write {
            path: "nb.ipynb".to_string(),
            reason: "disk full".to_string(),
        },
        restore_error: NbfixError::Restore {
            path: "nb.ipynb".to_string(),
            backup: "nb.ipynb.bak-x".to_string(),
            reason: "I/O error".to_string(),
        },
        backup: Utf8PathBuf::from("nb.ipynb.bak-x"),
    };
    let text = render_stderr(Utf8Path::new("nb.ipynb"), &outcome);
    assert!(text.contains("Could not restore 'nb.ipynb' from 'nb.ipynb.bak-x'"));
    assert!(text.ends_with("the original content is in nb.ipynb.bak-x\n"));
    assert!(!text.contains("was restored"));
    assert!(!text.contains("✓ Restored"));
}

#[test]
fn test_removal_types_are_reexported() {
    let removal = Removal {
        site: RemovalSite::Document,
        shape: MalformedShape::NotAMapping,
    };
    assert_eq!(
        removal.to_string(),
        "Removed malformed widgets metadata at notebook level (value is not a mapping)"
    );
}
