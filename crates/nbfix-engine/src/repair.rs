//! Removal of malformed widget metadata
//!
//! [`repair`] checks the document-level `metadata.widgets` and then each cell's, in cell
//! order, deleting every entry [`classify`] rejects. Nothing else in the notebook is touched.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::notebook::Notebook;
use crate::widgets::{MalformedShape, WIDGETS_KEY, classify};

/// Where a `widgets` entry was removed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RemovalSite {
    Document,
    Cell {
        /// Zero-based position in `cells`
        index: usize,
        /// nbformat 4.5+ cell id, when present
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl std::fmt::Display for RemovalSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => write!(f, "notebook level"),
            Self::Cell { index, id: Some(id) } => write!(f, "cell {index} (id {id})"),
            Self::Cell { index, id: None } => write!(f, "cell {index}"),
        }
    }
}

/// One removed `widgets` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub site: RemovalSite,
    pub shape: MalformedShape,
}

impl std::fmt::Display for Removal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Removed malformed widgets metadata at {} ({})",
            self.site, self.shape
        )
    }
}

/// Ordered record of everything [`repair`] removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RemovalReport {
    removals: Vec<Removal>,
}

impl RemovalReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    #[must_use]
    pub fn removals(&self) -> &[Removal] {
        &self.removals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Removal> {
        self.removals.iter()
    }

    /// Whether the document-level entry was removed
    #[must_use]
    pub fn removed_at_document_level(&self) -> bool {
        self.removals
            .iter()
            .any(|r| r.site == RemovalSite::Document)
    }

    /// Indices of cells whose entry was removed, in cell order
    #[must_use]
    pub fn cell_indices(&self) -> Vec<usize> {
        self.removals
            .iter()
            .filter_map(|r| match r.site {
                RemovalSite::Cell { index, .. } => Some(index),
                RemovalSite::Document => None,
            })
            .collect()
    }

    fn push(&mut self, site: RemovalSite, shape: MalformedShape) {
        let removal = Removal { site, shape };
        tracing::info!(site = %removal.site, shape = %removal.shape, "Removing malformed widgets metadata");
        self.removals.push(removal);
    }
}

impl<'a> IntoIterator for &'a RemovalReport {
    type Item = &'a Removal;
    type IntoIter = std::slice::Iter<'a, Removal>;

    fn into_iter(self) -> Self::IntoIter {
        self.removals.iter()
    }
}

/// Remove every malformed `widgets` entry from `notebook` and report what was removed.
///
/// An empty report means the notebook already renders; running `repair` again on a
/// repaired notebook always yields an empty report.
pub fn repair(notebook: &mut Notebook) -> RemovalReport {
    let mut report = RemovalReport::default();

    if let Some(shape) = notebook.metadata_mut().and_then(strip_malformed_widgets) {
        report.push(RemovalSite::Document, shape);
    }

    if let Some(cells) = notebook.cells_mut() {
        for (index, cell) in cells.iter_mut().enumerate() {
            let Some(cell) = cell.as_object_mut() else {
                continue;
            };
            let id = cell.get("id").and_then(Value::as_str).map(str::to_owned);
            if let Some(shape) = cell
                .get_mut("metadata")
                .and_then(Value::as_object_mut)
                .and_then(strip_malformed_widgets)
            {
                report.push(RemovalSite::Cell { index, id }, shape);
            }
        }
    }

    report
}

/// Delete `widgets` from one metadata mapping if it is malformed.
fn strip_malformed_widgets(metadata: &mut Map<String, Value>) -> Option<MalformedShape> {
    let shape = classify(metadata.get(WIDGETS_KEY)?)?;
    // shift_remove keeps the remaining keys in source order
    metadata.shift_remove(WIDGETS_KEY);
    Some(shape)
}
