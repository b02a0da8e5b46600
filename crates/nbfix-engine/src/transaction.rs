//! Backup-then-write repair transaction
//!
//! One call to [`RepairTransaction::process`] drives a notebook through an explicit state
//! machine:
//!
//! ```text
//! Start ──read/parse──▶ Loaded ──repair──▶ Repaired ──backup──▶ BackedUp ──write──▶ Written
//!   │                     │  │                │                    │                  │
//!   ▼                     ▼  ▼                ▼                    ▼                  ▼
//! FailedNoChange  DoneNoChange WouldChange  FailedNoChange     Restoring         DoneChanged
//!                                                               │       │
//!                                                               ▼       ▼
//!                                                  FailedRestored   FailedUnrestored
//! ```
//!
//! The target file is never written before a verified backup exists, and a failed write is
//! always followed by a restore attempt. Backups are never deleted.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use serde::Serialize;

use nbfix_utils::error::NbfixError;
use nbfix_utils::exit_codes::ExitCode;
use nbfix_utils::logging::repair_span;
use nbfix_utils::paths::{DEFAULT_BACKUP_LABEL, backup_candidates};

use crate::notebook::Notebook;
use crate::repair::{RemovalReport, repair};
use crate::store::{LocalStore, NotebookStore};

/// Whether a transaction may write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairMode {
    /// Back up and rewrite the notebook when something is removed
    #[default]
    Apply,
    /// Report what would be removed without touching the filesystem
    Check,
}

impl std::fmt::Display for RepairMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apply => write!(f, "apply"),
            Self::Check => write!(f, "check"),
        }
    }
}

/// Knobs for one transaction
#[derive(Debug, Clone)]
pub struct RepairOptions {
    pub mode: RepairMode,
    /// Label in `<file>.<label>-<timestamp>`
    pub backup_label: String,
    /// Indent width forced on the rewritten file; `None` keeps the detected layout
    pub indent: Option<usize>,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            mode: RepairMode::Apply,
            backup_label: DEFAULT_BACKUP_LABEL.to_string(),
            indent: None,
        }
    }
}

/// Terminal state of a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing malformed; nothing written
    DoneNoChange,
    /// Malformed metadata removed; backup kept at `backup`
    DoneChanged {
        report: RemovalReport,
        backup: Utf8PathBuf,
        /// First 8 hex chars of the original file's BLAKE3 digest
        original_blake3_first8: String,
        warnings: Vec<String>,
    },
    /// Check mode: these removals would be made
    WouldChange { report: RemovalReport },
    /// Failed before anything destructive happened
    FailedNoChange { error: NbfixError },
    /// Write failed; original content restored from `backup`
    FailedRestored {
        error: NbfixError,
        backup: Utf8PathBuf,
    },
    /// Write failed and so did the restore; `backup` holds the original content
    FailedUnrestored {
        error: NbfixError,
        restore_error: NbfixError,
        backup: Utf8PathBuf,
    },
}

impl Outcome {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::DoneNoChange | Self::DoneChanged { .. } => ExitCode::SUCCESS,
            Self::WouldChange { .. } => ExitCode::ISSUES_FOUND,
            Self::FailedNoChange { .. }
            | Self::FailedRestored { .. }
            | Self::FailedUnrestored { .. } => ExitCode::FAILURE,
        }
    }

    /// Stable snake_case name of the terminal state
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::DoneNoChange => "done_no_change",
            Self::DoneChanged { .. } => "done_changed",
            Self::WouldChange { .. } => "would_change",
            Self::FailedNoChange { .. } => "failed_no_change",
            Self::FailedRestored { .. } => "failed_restored",
            Self::FailedUnrestored { .. } => "failed_unrestored",
        }
    }

    /// Removals made (or, in check mode, that would be made)
    #[must_use]
    pub fn report(&self) -> Option<&RemovalReport> {
        match self {
            Self::DoneChanged { report, .. } | Self::WouldChange { report } => Some(report),
            _ => None,
        }
    }

    #[must_use]
    pub fn backup(&self) -> Option<&Utf8Path> {
        match self {
            Self::DoneChanged { backup, .. }
            | Self::FailedRestored { backup, .. }
            | Self::FailedUnrestored { backup, .. } => Some(backup),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&NbfixError> {
        match self {
            Self::FailedNoChange { error }
            | Self::FailedRestored { error, .. }
            | Self::FailedUnrestored { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Serializable summary for machine-readable output
    #[must_use]
    pub fn summary(&self, path: &Utf8Path) -> OutcomeSummary {
        let error_summary = |e: &NbfixError| ErrorSummary {
            kind: e.kind(),
            message: e.to_string(),
        };
        OutcomeSummary {
            path: path.to_string(),
            state: self.state_name(),
            exit_code: self.exit_code().as_i32(),
            removals: self.report().cloned().unwrap_or_default(),
            backup: self.backup().map(Utf8Path::to_string),
            original_blake3_first8: match self {
                Self::DoneChanged {
                    original_blake3_first8,
                    ..
                } => Some(original_blake3_first8.clone()),
                _ => None,
            },
            restored: matches!(self, Self::FailedRestored { .. }),
            error: self.error().map(error_summary),
            restore_error: match self {
                Self::FailedUnrestored { restore_error, .. } => Some(error_summary(restore_error)),
                _ => None,
            },
            warnings: match self {
                Self::DoneChanged { warnings, .. } => warnings.clone(),
                _ => Vec::new(),
            },
        }
    }
}

/// Machine-readable form of an [`Outcome`]
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub path: String,
    pub state: &'static str,
    pub exit_code: i32,
    pub removals: RemovalReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_blake3_first8: Option<String>,
    pub restored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_error: Option<ErrorSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
    pub kind: &'static str,
    pub message: String,
}

/// Intermediate and terminal states of one transaction
#[derive(Debug)]
enum TxState {
    Start,
    Loaded {
        original: Vec<u8>,
        notebook: Notebook,
    },
    Repaired {
        original: Vec<u8>,
        notebook: Notebook,
        report: RemovalReport,
    },
    BackedUp {
        notebook: Notebook,
        report: RemovalReport,
        backup: Utf8PathBuf,
        digest: blake3::Hash,
    },
    Written {
        report: RemovalReport,
        backup: Utf8PathBuf,
        digest: blake3::Hash,
        warnings: Vec<String>,
    },
    Restoring {
        error: NbfixError,
        backup: Utf8PathBuf,
    },
    Done(Outcome),
}

impl TxState {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Loaded { .. } => "loaded",
            Self::Repaired { .. } => "repaired",
            Self::BackedUp { .. } => "backed_up",
            Self::Written { .. } => "written",
            Self::Restoring { .. } => "restoring",
            Self::Done(outcome) => outcome.state_name(),
        }
    }
}

type Clock = Box<dyn Fn() -> NaiveDateTime>;

/// Repairs one notebook per [`process`](Self::process) call.
pub struct RepairTransaction<S: NotebookStore = LocalStore> {
    store: S,
    options: RepairOptions,
    clock: Clock,
}

impl RepairTransaction<LocalStore> {
    /// Transaction over the local filesystem using local wall-clock time for backup names.
    #[must_use]
    pub fn new(options: RepairOptions) -> Self {
        Self::with_store(LocalStore, options)
    }
}

impl<S: NotebookStore> RepairTransaction<S> {
    #[must_use]
    pub fn with_store(store: S, options: RepairOptions) -> Self {
        Self {
            store,
            options,
            clock: Box::new(|| chrono::Local::now().naive_local()),
        }
    }

    /// Use `clock` for backup timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn options(&self) -> &RepairOptions {
        &self.options
    }

    /// Run the transaction for `path` to a terminal state.
    pub fn process(&self, path: &Utf8Path) -> Outcome {
        let span = repair_span(path.as_str(), &self.options.mode.to_string());
        let _guard = span.enter();

        let mut state = TxState::Start;
        loop {
            state = match self.step(path, state) {
                TxState::Done(outcome) => {
                    tracing::debug!(state = outcome.state_name(), "Repair finished");
                    return outcome;
                }
                next => {
                    tracing::debug!(state = next.name(), "Repair state");
                    next
                }
            };
        }
    }

    /// Advance exactly one transition.
    fn step(&self, path: &Utf8Path, state: TxState) -> TxState {
        match state {
            TxState::Start => self.load(path),

            TxState::Loaded {
                original,
                mut notebook,
            } => {
                let report = repair(&mut notebook);
                if report.is_empty() {
                    TxState::Done(Outcome::DoneNoChange)
                } else if self.options.mode == RepairMode::Check {
                    TxState::Done(Outcome::WouldChange { report })
                } else {
                    TxState::Repaired {
                        original,
                        notebook,
                        report,
                    }
                }
            }

            TxState::Repaired {
                original,
                notebook,
                report,
            } => match self.back_up(path, &original) {
                Ok((backup, digest)) => TxState::BackedUp {
                    notebook,
                    report,
                    backup,
                    digest,
                },
                Err(error) => TxState::Done(Outcome::FailedNoChange { error }),
            },

            TxState::BackedUp {
                notebook,
                report,
                backup,
                digest,
            } => match self.write(path, &notebook) {
                Ok(warnings) => TxState::Written {
                    report,
                    backup,
                    digest,
                    warnings,
                },
                Err(error) => {
                    tracing::error!(%error, "Write failed, restoring from backup");
                    TxState::Restoring { error, backup }
                }
            },

            TxState::Written {
                report,
                backup,
                digest,
                warnings,
            } => TxState::Done(Outcome::DoneChanged {
                report,
                backup,
                original_blake3_first8: digest.to_hex()[..8].to_string(),
                warnings,
            }),

            TxState::Restoring { error, backup } => match self.store.restore(&backup, path) {
                Ok(()) => {
                    tracing::warn!(backup = %backup, "Restored original from backup");
                    TxState::Done(Outcome::FailedRestored { error, backup })
                }
                Err(e) => {
                    tracing::error!(backup = %backup, error = %e, "Restore from backup failed");
                    let restore_error = NbfixError::Restore {
                        path: path.to_string(),
                        backup: backup.to_string(),
                        reason: format!("{e:#}"),
                    };
                    TxState::Done(Outcome::FailedUnrestored {
                        error,
                        restore_error,
                        backup,
                    })
                }
            },

            done @ TxState::Done(_) => done,
        }
    }

    fn load(&self, path: &Utf8Path) -> TxState {
        let original = match self.store.read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = NbfixError::NotFound {
                    path: path.to_string(),
                    reason: format!("{e:#}"),
                };
                return TxState::Done(Outcome::FailedNoChange { error });
            }
        };

        match Notebook::from_bytes(&original, path.as_str()) {
            Ok(mut notebook) => {
                if let Some(width) = self.options.indent {
                    notebook.layout_mut().set_indent_width(width);
                }
                TxState::Loaded { original, notebook }
            }
            Err(error) => TxState::Done(Outcome::FailedNoChange { error }),
        }
    }

    /// Create a backup that does not collide with any existing file and check its digest.
    fn back_up(
        &self,
        path: &Utf8Path,
        original: &[u8],
    ) -> Result<(Utf8PathBuf, blake3::Hash), NbfixError> {
        let timestamp = (self.clock)();
        let backup = backup_candidates(path, &self.options.backup_label, timestamp)
            .find(|candidate| !self.store.exists(candidate))
            .ok_or_else(|| NbfixError::Backup {
                path: path.to_string(),
                backup: format!("{path}.{}-*", self.options.backup_label),
                reason: "every candidate backup name is already taken".to_string(),
            })?;

        let backup_error = |reason: String| NbfixError::Backup {
            path: path.to_string(),
            backup: backup.to_string(),
            reason,
        };

        self.store
            .create_backup(path, &backup)
            .map_err(|e| backup_error(format!("{e:#}")))?;

        let expected = blake3::hash(original);
        let copied = self
            .store
            .read(&backup)
            .map_err(|e| backup_error(format!("cannot read back backup: {e:#}")))?;
        if blake3::hash(&copied) != expected {
            return Err(backup_error(
                "backup content differs from the notebook that was repaired".to_string(),
            ));
        }

        tracing::info!(backup = %backup, "Created backup");
        Ok((backup, expected))
    }

    fn write(&self, path: &Utf8Path, notebook: &Notebook) -> Result<Vec<String>, NbfixError> {
        let write_error = |reason: String| NbfixError::Write {
            path: path.to_string(),
            reason,
        };
        let text = notebook
            .serialize()
            .map_err(|e| write_error(format!("serialization failed: {e}")))?;
        let warnings = self
            .store
            .replace(path, text.as_bytes())
            .map_err(|e| write_error(format!("{e:#}")))?;
        for warning in &warnings {
            tracing::warn!(%warning, "Write warning");
        }
        Ok(warnings)
    }
}

/// Repair `path` in place with default options and report the exit status.
pub fn process(path: &Utf8Path) -> ExitCode {
    RepairTransaction::new(RepairOptions::default())
        .process(path)
        .exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use chrono::NaiveDate;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    const PATH: &str = "nb.ipynb";
    const BACKUP: &str = "nb.ipynb.bak-20260102_030405";

    const MALFORMED: &str = "{\n \"cells\": [],\n \"metadata\": {\n  \"widgets\": {\n   \"abc123\": {}\n  }\n }\n}\n";
    const REPAIRED: &str = "{\n \"cells\": [],\n \"metadata\": {}\n}\n";

    /// In-memory store with switchable faults.
    #[derive(Default)]
    struct MemoryStore {
        files: RefCell<BTreeMap<String, Vec<u8>>>,
        fail_backup: Cell<bool>,
        corrupt_backup: Cell<bool>,
        fail_replace: Cell<bool>,
        fail_restore: Cell<bool>,
        partial_write: Cell<bool>,
    }

    impl MemoryStore {
        fn with_file(path: &str, contents: &str) -> Self {
            let store = Self::default();
            store
                .files
                .borrow_mut()
                .insert(path.to_string(), contents.as_bytes().to_vec());
            store
        }

        fn get(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(path)
                .map(|b| String::from_utf8(b.clone()).unwrap())
        }

        fn file_count(&self) -> usize {
            self.files.borrow().len()
        }
    }

    impl NotebookStore for MemoryStore {
        fn read(&self, path: &Utf8Path) -> Result<Vec<u8>> {
            match self.files.borrow().get(path.as_str()) {
                Some(bytes) => Ok(bytes.clone()),
                None => bail!("No such file or directory"),
            }
        }

        fn exists(&self, path: &Utf8Path) -> bool {
            self.files.borrow().contains_key(path.as_str())
        }

        fn create_backup(&self, original: &Utf8Path, backup: &Utf8Path) -> Result<()> {
            if self.fail_backup.get() {
                bail!("Permission denied");
            }
            let mut bytes = self.read(original)?;
            if self.corrupt_backup.get() {
                bytes.truncate(1);
            }
            let mut files = self.files.borrow_mut();
            if files.contains_key(backup.as_str()) {
                bail!("File exists");
            }
            files.insert(backup.to_string(), bytes);
            Ok(())
        }

        fn replace(&self, path: &Utf8Path, contents: &[u8]) -> Result<Vec<String>> {
            if self.partial_write.get() {
                self.files
                    .borrow_mut()
                    .insert(path.to_string(), contents[..contents.len() / 2].to_vec());
                bail!("No space left on device");
            }
            if self.fail_replace.get() {
                bail!("Read-only file system");
            }
            self.files
                .borrow_mut()
                .insert(path.to_string(), contents.to_vec());
            Ok(Vec::new())
        }

        fn restore(&self, backup: &Utf8Path, original: &Utf8Path) -> Result<()> {
            if self.fail_restore.get() {
                bail!("Input/output error");
            }
            let bytes = self.read(backup)?;
            self.files
                .borrow_mut()
                .insert(original.to_string(), bytes);
            Ok(())
        }
    }

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    fn transaction(store: MemoryStore, mode: RepairMode) -> RepairTransaction<MemoryStore> {
        let options = RepairOptions {
            mode,
            ..RepairOptions::default()
        };
        RepairTransaction::with_store(store, options).with_clock(fixed_clock)
    }

    #[test]
    fn test_repair_writes_file_and_keeps_backup() {
        let tx = transaction(MemoryStore::with_file(PATH, MALFORMED), RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert_eq!(outcome.exit_code(), ExitCode::SUCCESS);
        assert_eq!(outcome.state_name(), "done_changed");
        assert_eq!(outcome.backup(), Some(Utf8Path::new(BACKUP)));
        assert_eq!(outcome.report().unwrap().len(), 1);
        assert_eq!(tx.store().get(PATH).unwrap(), REPAIRED);
        assert_eq!(tx.store().get(BACKUP).unwrap(), MALFORMED);
    }

    #[test]
    fn test_reports_original_digest_prefix() {
        let tx = transaction(MemoryStore::with_file(PATH, MALFORMED), RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        let expected = blake3::hash(MALFORMED.as_bytes()).to_hex()[..8].to_string();
        match outcome {
            Outcome::DoneChanged {
                original_blake3_first8,
                ..
            } => assert_eq!(original_blake3_first8, expected),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_clean_notebook_writes_nothing() {
        let tx = transaction(MemoryStore::with_file(PATH, REPAIRED), RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert_eq!(outcome, Outcome::DoneNoChange);
        assert_eq!(outcome.exit_code(), ExitCode::SUCCESS);
        assert_eq!(tx.store().file_count(), 1);
    }

    #[test]
    fn test_check_mode_never_writes() {
        let tx = transaction(MemoryStore::with_file(PATH, MALFORMED), RepairMode::Check);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert_eq!(outcome.state_name(), "would_change");
        assert_eq!(outcome.exit_code(), ExitCode::ISSUES_FOUND);
        assert_eq!(tx.store().get(PATH).unwrap(), MALFORMED);
        assert_eq!(tx.store().file_count(), 1);
    }

    #[test]
    fn test_missing_file_fails_without_change() {
        let tx = transaction(MemoryStore::default(), RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert!(matches!(
            outcome,
            Outcome::FailedNoChange {
                error: NbfixError::NotFound { .. }
            }
        ));
        assert_eq!(outcome.exit_code(), ExitCode::FAILURE);
        assert_eq!(tx.store().file_count(), 0);
    }

    #[test]
    fn test_invalid_json_fails_without_change() {
        let tx = transaction(MemoryStore::with_file(PATH, "{\"cells\": "), RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert!(matches!(
            outcome.error(),
            Some(NbfixError::Parse { path, .. }) if path == PATH
        ));
        assert_eq!(tx.store().file_count(), 1);
    }

    #[test]
    fn test_backup_failure_leaves_original_untouched() {
        let store = MemoryStore::with_file(PATH, MALFORMED);
        store.fail_backup.set(true);
        let tx = transaction(store, RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert!(matches!(
            outcome.error(),
            Some(NbfixError::Backup { backup, .. }) if backup == BACKUP
        ));
        assert_eq!(outcome.exit_code(), ExitCode::FAILURE);
        assert_eq!(tx.store().get(PATH).unwrap(), MALFORMED);
    }

    #[test]
    fn test_backup_digest_mismatch_aborts_before_write() {
        let store = MemoryStore::with_file(PATH, MALFORMED);
        store.corrupt_backup.set(true);
        let tx = transaction(store, RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert!(matches!(outcome, Outcome::FailedNoChange { .. }));
        assert_eq!(tx.store().get(PATH).unwrap(), MALFORMED);
    }

    #[test]
    fn test_existing_backup_name_gets_counter() {
        let store = MemoryStore::with_file(PATH, MALFORMED);
        store
            .files
            .borrow_mut()
            .insert(BACKUP.to_string(), b"earlier run".to_vec());
        let tx = transaction(store, RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        let numbered = format!("{BACKUP}-1");
        assert_eq!(outcome.backup().map(Utf8Path::as_str), Some(numbered.as_str()));
        assert_eq!(tx.store().get(BACKUP).unwrap(), "earlier run");
        assert_eq!(tx.store().get(&numbered).unwrap(), MALFORMED);
    }

    #[test]
    fn test_write_failure_restores_original() {
        let store = MemoryStore::with_file(PATH, MALFORMED);
        store.partial_write.set(true);
        let tx = transaction(store, RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        assert!(matches!(
            outcome,
            Outcome::FailedRestored {
                error: NbfixError::Write { .. },
                ..
            }
        ));
        assert_eq!(outcome.exit_code(), ExitCode::FAILURE);
        assert_eq!(tx.store().get(PATH).unwrap(), MALFORMED);
        assert_eq!(tx.store().get(BACKUP).unwrap(), MALFORMED);
    }

    #[test]
    fn test_restore_failure_is_reported_with_backup() {
        let store = MemoryStore::with_file(PATH, MALFORMED);
        store.fail_replace.set(true);
        store.fail_restore.set(true);
        let tx = transaction(store, RepairMode::Apply);

        let outcome = tx.process(Utf8Path::new(PATH));

        match &outcome {
            Outcome::FailedUnrestored {
                error,
                restore_error,
                backup,
            } => {
                assert!(matches!(error, NbfixError::Write { .. }));
                assert!(matches!(restore_error, NbfixError::Restore { .. }));
                assert_eq!(backup.as_str(), BACKUP);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(outcome.exit_code(), ExitCode::FAILURE);
        assert_eq!(tx.store().get(BACKUP).unwrap(), MALFORMED);
    }

    #[test]
    fn test_step_from_done_is_stable() {
        let tx = transaction(MemoryStore::default(), RepairMode::Apply);
        let state = tx.step(Utf8Path::new(PATH), TxState::Done(Outcome::DoneNoChange));
        assert!(matches!(state, TxState::Done(Outcome::DoneNoChange)));
    }

    #[test]
    fn test_step_sequence_names() {
        let tx = transaction(MemoryStore::with_file(PATH, MALFORMED), RepairMode::Apply);
        let path = Utf8Path::new(PATH);

        let mut names = Vec::new();
        let mut state = TxState::Start;
        while !matches!(state, TxState::Done(_)) {
            state = tx.step(path, state);
            names.push(state.name());
        }

        assert_eq!(
            names,
            ["loaded", "repaired", "backed_up", "written", "done_changed"]
        );
    }

    #[test]
    fn test_indent_override_applies_to_written_file() {
        let options = RepairOptions {
            indent: Some(2),
            ..RepairOptions::default()
        };
        let tx = RepairTransaction::with_store(MemoryStore::with_file(PATH, MALFORMED), options)
            .with_clock(fixed_clock);

        tx.process(Utf8Path::new(PATH));

        assert_eq!(
            tx.store().get(PATH).unwrap(),
            "{\n  \"cells\": [],\n  \"metadata\": {}\n}\n"
        );
    }

    #[test]
    fn test_summary_fields() {
        let tx = transaction(MemoryStore::with_file(PATH, MALFORMED), RepairMode::Apply);
        let outcome = tx.process(Utf8Path::new(PATH));

        let summary = outcome.summary(Utf8Path::new(PATH));

        assert_eq!(summary.state, "done_changed");
        assert_eq!(summary.exit_code, 0);
        assert_eq!(summary.removals.len(), 1);
        assert_eq!(summary.backup.as_deref(), Some(BACKUP));
        assert!(!summary.restored);
        assert!(summary.error.is_none());
    }
}
