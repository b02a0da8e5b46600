//! Notebook repair engine for nbfix
//!
//! - [`notebook`]: load and serialize `.ipynb` JSON, preserving key order and layout
//! - [`widgets`]: classify `metadata.widgets` values
//! - [`repair`]: strip malformed widget metadata and report the removals
//! - [`transaction`]: backup-then-write state machine with restore on failure
//! - [`store`]: filesystem seam used by the transaction

pub mod notebook;
pub mod repair;
pub mod store;
pub mod transaction;
pub mod widgets;

pub use notebook::{Layout, LineEnding, Notebook};
pub use repair::{Removal, RemovalReport, RemovalSite, repair};
pub use store::{LocalStore, NotebookStore};
pub use transaction::{
    ErrorSummary, Outcome, OutcomeSummary, RepairMode, RepairOptions, RepairTransaction, process,
};
pub use widgets::{MalformedShape, classify, is_well_formed};
