//! Atomic file replacement
//!
//! Content is written to a temporary file next to the target, fsynced, and renamed over the
//! target. Readers observe either the old or the new notebook, never a torn one. When the rename
//! crosses filesystems the content is copied into a second temporary file on the target's
//! filesystem and persisted from there.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

#[cfg(target_os = "windows")]
use std::{thread, time::Duration};

/// Result of an atomic write operation
#[derive(Debug, Clone, Default)]
pub struct AtomicWriteResult {
    /// Number of rename retries that occurred (Windows only)
    pub rename_retry_count: u32,
    /// Whether cross-filesystem fallback was used
    pub used_cross_filesystem_fallback: bool,
    /// Any warnings generated during the operation
    pub warnings: Vec<String>,
}

/// Atomically replace `path` with `content`, byte for byte.
///
/// Unlike text-oriented writers no line-ending normalization happens here; the caller owns the
/// exact bytes.
pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<AtomicWriteResult> {
    let mut result = AtomicWriteResult::default();

    let temp_dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(temp_dir)
        .with_context(|| format!("Failed to create temporary file in: {temp_dir}"))?;

    temp_file
        .write_all(content)
        .context("Failed to write content to temporary file")?;
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;

    let temp_path = temp_file.path().to_path_buf();

    match atomic_rename(temp_file, path.as_std_path()) {
        Ok(retry_count) => {
            result.rename_retry_count = retry_count;
            if retry_count > 0 {
                result.warnings.push(format!(
                    "Rename required {retry_count} retries due to transient filesystem locks"
                ));
            }
        }
        Err(e) if is_cross_filesystem_error(&e) => {
            result.used_cross_filesystem_fallback = true;
            result
                .warnings
                .push("Used cross-filesystem fallback (copy→fsync→replace)".to_string());
            cross_filesystem_copy_from_path(&temp_path, path)?;
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to atomically write file: {path}"));
        }
    }

    Ok(result)
}

/// Rename with bounded exponential backoff (≤ 250ms total) for transient sharing violations.
#[cfg(target_os = "windows")]
fn atomic_rename(mut temp_file: NamedTempFile, target: &Path) -> Result<u32> {
    use std::io::ErrorKind;

    const MAX_RETRIES: u32 = 5;
    const INITIAL_DELAY_MS: u64 = 10;
    const MAX_TOTAL_DELAY_MS: u64 = 250;

    let mut retry_count = 0;
    let mut total_delay_ms = 0;

    loop {
        match temp_file.persist(target) {
            Ok(_) => return Ok(retry_count),
            Err(persist_error) => {
                let retryable = matches!(
                    persist_error.error.kind(),
                    ErrorKind::PermissionDenied | ErrorKind::Other
                );
                let delay_ms = INITIAL_DELAY_MS * 2_u64.pow(retry_count);
                if !retryable
                    || retry_count >= MAX_RETRIES
                    || total_delay_ms + delay_ms > MAX_TOTAL_DELAY_MS
                {
                    return Err(anyhow::anyhow!(persist_error.error));
                }

                thread::sleep(Duration::from_millis(delay_ms));
                total_delay_ms += delay_ms;
                retry_count += 1;
                temp_file = persist_error.file;
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn atomic_rename(temp_file: NamedTempFile, target: &Path) -> Result<u32> {
    temp_file
        .persist(target)
        .map(|_| 0)
        .map_err(|e| anyhow::anyhow!(e.error))
}

#[cfg(unix)]
fn is_cross_filesystem_error(err: &anyhow::Error) -> bool {
    const EXDEV: i32 = 18;
    err.downcast_ref::<std::io::Error>()
        .and_then(std::io::Error::raw_os_error)
        .is_some_and(|code| code == EXDEV)
}

#[cfg(not(unix))]
fn is_cross_filesystem_error(_err: &anyhow::Error) -> bool {
    false
}

fn cross_filesystem_copy_from_path(temp_path: &Path, target: &Utf8Path) -> Result<()> {
    let content =
        fs::read(temp_path).context("Failed to read temporary file for cross-filesystem copy")?;

    let target_dir = match target.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut target_temp = NamedTempFile::new_in(target_dir)
        .with_context(|| format!("Failed to create temp file in target directory: {target_dir}"))?;

    target_temp
        .write_all(&content)
        .context("Failed to write content during cross-filesystem copy")?;
    target_temp
        .as_file()
        .sync_all()
        .context("Failed to fsync during cross-filesystem copy")?;
    target_temp
        .persist(target.as_std_path())
        .map_err(|e| anyhow::anyhow!(e.error))
        .context("Failed to persist during cross-filesystem copy")?;

    let _ = fs::remove_file(temp_path);

    Ok(())
}
