//! Backup path naming
//!
//! A backup sits next to the notebook it protects: `<notebook>.<label>-<YYYYMMDD_HHMMSS>`.
//! When two runs land in the same second, `-1`, `-2`, ... is appended so an existing backup is
//! never overwritten.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;

/// Timestamp suffix format for backup files
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default label between the notebook name and the timestamp
pub const DEFAULT_BACKUP_LABEL: &str = "bak";

/// Upper bound on collision suffixes tried before giving up
pub const MAX_BACKUP_COLLISIONS: u32 = 100;

/// Backup path for `original` taken at `timestamp`
#[must_use]
pub fn backup_path(original: &Utf8Path, label: &str, timestamp: NaiveDateTime) -> Utf8PathBuf {
    Utf8PathBuf::from(format!(
        "{original}.{label}-{}",
        timestamp.format(BACKUP_TIMESTAMP_FORMAT)
    ))
}

/// Backup paths to try in order: the plain name first, then numbered variants.
pub fn backup_candidates(
    original: &Utf8Path,
    label: &str,
    timestamp: NaiveDateTime,
) -> impl Iterator<Item = Utf8PathBuf> {
    let base = backup_path(original, label, timestamp);
    std::iter::once(base.clone()).chain(
        (1..=MAX_BACKUP_COLLISIONS).map(move |n| Utf8PathBuf::from(format!("{base}-{n}"))),
    )
}

/// A label must stay inside the file name: ASCII letters, digits, `-` and `_` only.
#[must_use]
pub fn is_valid_backup_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 32
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
