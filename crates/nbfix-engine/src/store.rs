//! File access used by the repair transaction
//!
//! The transaction talks to the filesystem only through [`NotebookStore`], so every failure
//! path can be exercised with an injected store.

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use std::fs;
use std::io::Write;

use nbfix_utils::atomic_write::write_bytes_atomic;

/// Filesystem operations a repair needs.
pub trait NotebookStore {
    /// Read the whole file.
    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Copy `original` to `backup` verbatim. Must fail rather than overwrite an existing file.
    fn create_backup(&self, original: &Utf8Path, backup: &Utf8Path) -> Result<()>;

    /// Replace `path` with `contents`. Returns non-fatal warnings.
    fn replace(&self, path: &Utf8Path, contents: &[u8]) -> Result<Vec<String>>;

    /// Put the backup's content back at `original`.
    fn restore(&self, backup: &Utf8Path, original: &Utf8Path) -> Result<()>;
}

/// [`NotebookStore`] over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl NotebookStore for LocalStore {
    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read {path}"))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn create_backup(&self, original: &Utf8Path, backup: &Utf8Path) -> Result<()> {
        let mut source =
            fs::File::open(original).with_context(|| format!("Failed to open {original}"))?;
        let mut target = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(backup)
            .with_context(|| format!("Failed to create {backup}"))?;

        std::io::copy(&mut source, &mut target)
            .with_context(|| format!("Failed to copy {original} to {backup}"))?;
        target.flush()?;
        target
            .sync_all()
            .with_context(|| format!("Failed to fsync {backup}"))?;

        if let Ok(metadata) = fs::metadata(original) {
            // Best effort, like `cp -p`; content is what matters
            let _ = fs::set_permissions(backup, metadata.permissions());
        }
        Ok(())
    }

    fn replace(&self, path: &Utf8Path, contents: &[u8]) -> Result<Vec<String>> {
        let original_permissions = fs::metadata(path)
            .with_context(|| format!("Failed to get file metadata: {path}"))?
            .permissions();
        if original_permissions.readonly() {
            bail!("{path} is read-only");
        }

        let write_result = write_bytes_atomic(path, contents)?;
        let mut warnings = write_result.warnings;

        if let Err(e) = fs::set_permissions(path, original_permissions) {
            warnings.push(format!("Failed to preserve file permissions: {e}"));
        }
        Ok(warnings)
    }

    fn restore(&self, backup: &Utf8Path, original: &Utf8Path) -> Result<()> {
        let contents = fs::read(backup).with_context(|| format!("Failed to read {backup}"))?;
        let permissions = fs::metadata(original).ok().map(|m| m.permissions());

        if let Err(atomic_err) = write_bytes_atomic(original, &contents) {
            tracing::warn!(error = %atomic_err, "Atomic restore failed, copying in place");
            fs::write(original, &contents)
                .with_context(|| format!("Failed to copy {backup} over {original}"))?;
        }
        if let Some(permissions) = permissions {
            let _ = fs::set_permissions(original, permissions);
        }
        Ok(())
    }
}
