//! Finalized strokes for every page, kept as an immutable snapshot.
//!
//! Every mutation builds a new map and swaps it in, so a renderer holding a
//! [`PageStrokeSet::snapshot`] never sees a half-applied change. Pages with no
//! strokes have no entry.

use crate::persist::PersistError;
use crate::stroke::Stroke;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Page number as used by the host document.
pub type PageNumber = u32;

/// Shared, read-only view of all pages.
pub type PageMap = BTreeMap<PageNumber, Arc<[Stroke]>>;

/// Finalized strokes keyed by page.
#[derive(Debug, Clone, Default)]
pub struct PageStrokeSet {
    pages: Arc<PageMap>,
}

impl PageStrokeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of every page.
    pub fn snapshot(&self) -> Arc<PageMap> {
        Arc::clone(&self.pages)
    }

    /// Strokes on a page, in paint order. Empty when the page has none.
    pub fn page(&self, page: PageNumber) -> &[Stroke] {
        self.pages.get(&page).map(|s| &s[..]).unwrap_or(&[])
    }

    /// Whether a page has an entry.
    pub fn contains_page(&self, page: PageNumber) -> bool {
        self.pages.contains_key(&page)
    }

    /// Number of pages with strokes.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Replace a page's strokes. An empty list removes the entry.
    pub fn replace_page(&mut self, page: PageNumber, strokes: Vec<Stroke>) {
        let mut next = PageMap::clone(&self.pages);
        if strokes.is_empty() {
            next.remove(&page);
        } else {
            next.insert(page, Arc::from(strokes));
        }
        self.pages = Arc::new(next);
    }

    /// Remove a page's strokes. Returns whether the page had any.
    pub fn clear_page(&mut self, page: PageNumber) -> bool {
        if !self.pages.contains_key(&page) {
            return false;
        }
        self.replace_page(page, Vec::new());
        true
    }

    /// Remove every page.
    pub fn clear_all(&mut self) {
        self.pages = Arc::new(PageMap::new());
    }

    /// Serialize as `{ "<page>": [stroke, ...] }`.
    pub fn to_json(&self) -> Result<String, PersistError> {
        let record: BTreeMap<PageNumber, &[Stroke]> =
            self.pages.iter().map(|(page, strokes)| (*page, &strokes[..])).collect();
        serde_json::to_string(&record).map_err(|e| PersistError::Serialization(e.to_string()))
    }

    /// Load from the JSON shape written by [`PageStrokeSet::to_json`].
    ///
    /// Pages stored with an empty list are dropped.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let record: BTreeMap<PageNumber, Vec<Stroke>> =
            serde_json::from_str(json).map_err(|e| PersistError::Serialization(e.to_string()))?;
        Ok(Self::from(record))
    }
}

impl From<BTreeMap<PageNumber, Vec<Stroke>>> for PageStrokeSet {
    fn from(record: BTreeMap<PageNumber, Vec<Stroke>>) -> Self {
        let pages = record
            .into_iter()
            .filter(|(_, strokes)| !strokes.is_empty())
            .map(|(page, strokes)| (page, Arc::from(strokes)))
            .collect();
        Self {
            pages: Arc::new(pages),
        }
    }
}

/// Serialized form used by hosts that embed the set in a larger record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRecord {
    pub drawings: BTreeMap<PageNumber, Vec<Stroke>>,
}

impl From<&PageStrokeSet> for PageRecord {
    fn from(set: &PageStrokeSet) -> Self {
        Self {
            drawings: set
                .pages
                .iter()
                .map(|(page, strokes)| (*page, strokes.to_vec()))
                .collect(),
        }
    }
}

impl From<PageRecord> for PageStrokeSet {
    fn from(record: PageRecord) -> Self {
        Self::from(record.drawings)
    }
}
