//! Human-readable rendering of repair outcomes
//!
//! Success lines go to stdout, failures to stderr; `run` decides where each block is printed.

use camino::Utf8Path;
use nbfix_engine::Outcome;

/// Text printed to stdout for an outcome.
pub(crate) fn render_stdout(path: &Utf8Path, outcome: &Outcome) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::DoneNoChange => {
            out.push_str(&format!("✓ No malformed widget metadata found in {path}\n"));
        }
        Outcome::DoneChanged {
            report,
            backup,
            original_blake3_first8,
            warnings,
        } => {
            for removal in report {
                out.push_str(&format!("  - {removal}\n"));
            }
            out.push_str(&format!(
                "✓ Backup written to {backup} (blake3 {original_blake3_first8})\n"
            ));
            for warning in warnings {
                out.push_str(&format!("⚠ {warning}\n"));
            }
            out.push_str(&format!(
                "✓ Repaired {path}: removed {} malformed widgets entr{}\n",
                report.len(),
                if report.len() == 1 { "y" } else { "ies" }
            ));
        }
        Outcome::WouldChange { report } => {
            for removal in report {
                out.push_str(&format!(
                    "  - Would remove widgets metadata at {} ({})\n",
                    removal.site, removal.shape
                ));
            }
            out.push_str(&format!(
                "✗ {path} has {} malformed widgets entr{}; run without --check to repair\n",
                report.len(),
                if report.len() == 1 { "y" } else { "ies" }
            ));
        }
        Outcome::FailedNoChange { .. }
        | Outcome::FailedRestored { .. }
        | Outcome::FailedUnrestored { .. } => {}
    }
    out
}

/// Text printed to stderr for an outcome.
pub(crate) fn render_stderr(path: &Utf8Path, outcome: &Outcome) -> String {
    match outcome {
        Outcome::FailedNoChange { error } => error.display_for_user(),
        Outcome::FailedRestored { error, backup } => format!(
            "{}\n✓ Restored {path} from backup {backup}\n",
            error.display_for_user()
        ),
        Outcome::FailedUnrestored {
            error,
            restore_error,
            backup,
        } => format!(
            "{}\n{}\n✗ {path} could not be restored; the original content is in {backup}\n",
            error.display_for_user(),
            restore_error.display_for_user()
        ),
        _ => String::new(),
    }
}
