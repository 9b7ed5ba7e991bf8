//! Persistence hook for finalized stroke lists.
//!
//! The core never stores anything durably itself. Whenever a page's strokes
//! change, the full updated list is handed to a [`PersistFn`].

use crate::pages::{PageNumber, PageRecord};
use crate::stroke::Stroke;
use std::collections::BTreeMap;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Persistence rejected: {0}")]
    Rejected(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Receives the full stroke list of a page after every change.
pub trait PersistFn {
    fn persist(&mut self, page: PageNumber, strokes: &[Stroke]) -> PersistResult<()>;
}

impl<F> PersistFn for F
where
    F: FnMut(PageNumber, &[Stroke]) -> PersistResult<()>,
{
    fn persist(&mut self, page: PageNumber, strokes: &[Stroke]) -> PersistResult<()> {
        self(page, strokes)
    }
}

/// In-memory sink for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    drawings: BTreeMap<PageNumber, Vec<Stroke>>,
    writes: usize,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last persisted list for a page, if the page was ever written.
    pub fn get(&self, page: PageNumber) -> Option<&[Stroke]> {
        self.drawings.get(&page).map(Vec::as_slice)
    }

    /// Number of persist calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Snapshot of everything stored, dropping empty pages.
    pub fn record(&self) -> PageRecord {
        PageRecord {
            drawings: self
                .drawings
                .iter()
                .filter(|(_, strokes)| !strokes.is_empty())
                .map(|(page, strokes)| (*page, strokes.clone()))
                .collect(),
        }
    }
}

impl PersistFn for MemoryStore {
    fn persist(&mut self, page: PageNumber, strokes: &[Stroke]) -> PersistResult<()> {
        self.writes += 1;
        self.drawings.insert(page, strokes.to_vec());
        Ok(())
    }
}
