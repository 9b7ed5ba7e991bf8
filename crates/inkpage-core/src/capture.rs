//! Pointer-driven stroke capture for the displayed page.

use crate::config::EraseConfig;
use crate::erase::classify;
use crate::pages::{PageNumber, PageStrokeSet};
use crate::persist::{PersistError, PersistFn};
use crate::stroke::{PenStyle, Stroke, StrokeSegment, normalize};
use kurbo::{Point, Size};
use std::sync::Arc;
use thiserror::Error;

/// Capture errors.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to persist strokes: {0}")]
    Persist(#[from] PersistError),
}

/// State of the pointer sequence.
#[derive(Debug, Clone, Default)]
pub enum CaptureState {
    /// No pointer is down.
    #[default]
    Idle,
    /// A stroke is being drawn.
    Capturing {
        /// The in-progress stroke, normalized.
        stroke: Stroke,
    },
    /// The pointer was released and the stroke is being resolved.
    Finalizing,
}

/// What happened to a finished stroke.
#[derive(Debug, Clone)]
pub struct Finalized {
    /// Page the stroke was applied to.
    pub page: PageNumber,
    /// The page's strokes after the change.
    pub strokes: Arc<[Stroke]>,
    /// True when the stroke erased others and was discarded.
    pub was_erase: bool,
    /// Strokes removed by the erase.
    pub removed: Vec<Stroke>,
}

/// Owns the finalized strokes of every page and the stroke in progress.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    state: CaptureState,
    page: PageNumber,
    pages: PageStrokeSet,
    erase: EraseConfig,
}

impl StrokeCapture {
    /// Create a capture for page 1 with default erase thresholds.
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }

    /// Use custom erase thresholds.
    pub fn with_erase_config(mut self, erase: EraseConfig) -> Self {
        self.erase = erase;
        self
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, CaptureState::Capturing { .. })
    }

    /// The stroke in progress, if any.
    pub fn current(&self) -> Option<&Stroke> {
        match &self.state {
            CaptureState::Capturing { stroke } => Some(stroke),
            _ => None,
        }
    }

    /// Page new strokes are applied to.
    pub fn page(&self) -> PageNumber {
        self.page
    }

    /// Switch the displayed page. Any stroke in progress is discarded.
    pub fn set_page(&mut self, page: PageNumber) {
        if page != self.page {
            self.cancel();
            self.page = page;
        }
    }

    /// Finalized strokes of every page.
    pub fn pages(&self) -> &PageStrokeSet {
        &self.pages
    }

    /// Finalized strokes of the current page.
    pub fn strokes(&self) -> &[Stroke] {
        self.pages.page(self.page)
    }

    /// Install strokes loaded from storage for a page.
    pub fn load_page(&mut self, page: PageNumber, strokes: Vec<Stroke>) {
        log::debug!("loaded {} stroke(s) for page {}", strokes.len(), page);
        self.pages.replace_page(page, strokes);
    }

    /// Install a whole set loaded from storage.
    pub fn load_all(&mut self, pages: PageStrokeSet) {
        self.pages = pages;
    }

    /// Start a stroke at a canvas-pixel position.
    ///
    /// Returns false when the position cannot be normalized (empty canvas).
    pub fn begin(&mut self, canvas: Size, position: Point, style: PenStyle) -> bool {
        let Some(point) = normalize(position, canvas) else {
            log::warn!("ignoring pointer down on a {}x{} canvas", canvas.width, canvas.height);
            return false;
        };
        if let CaptureState::Capturing { stroke } = &self.state {
            log::warn!("discarding unfinished stroke {} on new pointer down", stroke.id());
        }
        self.state = CaptureState::Capturing {
            stroke: Stroke::new(point, style),
        };
        true
    }

    /// Append a sample and return the segment to paint for it.
    ///
    /// Does nothing while idle. Every sample is kept.
    pub fn extend(&mut self, canvas: Size, position: Point) -> Option<StrokeSegment> {
        let CaptureState::Capturing { stroke } = &mut self.state else {
            return None;
        };
        let point = normalize(position, canvas)?;
        stroke.add_point(point);
        stroke.last_segment()
    }

    /// Finish the stroke in progress and apply it to the current page.
    ///
    /// The in-memory page is updated before `persist` runs, so a persistence
    /// failure loses only the external copy. Does nothing while idle.
    pub fn end(&mut self, persist: &mut impl PersistFn) -> Result<Option<Finalized>, CaptureError> {
        let stroke = match std::mem::replace(&mut self.state, CaptureState::Finalizing) {
            CaptureState::Capturing { stroke } => stroke,
            other => {
                self.state = other;
                return Ok(None);
            }
        };

        log::debug!("finalizing stroke {} with {} point(s)", stroke.id(), stroke.len());
        let page = self.page;
        let resolution = classify(stroke, self.pages.page(page), &self.erase);
        self.pages.replace_page(page, resolution.strokes);

        let strokes: Arc<[Stroke]> = Arc::from(self.pages.page(page));
        let result = persist.persist(page, &strokes);
        self.state = CaptureState::Idle;

        if let Err(e) = result {
            log::warn!("persisting page {} failed: {}", page, e);
            return Err(e.into());
        }

        Ok(Some(Finalized {
            page,
            strokes,
            was_erase: resolution.was_erase,
            removed: resolution.removed,
        }))
    }

    /// Drop the stroke in progress without finalizing it.
    pub fn cancel(&mut self) {
        if let CaptureState::Capturing { stroke } = &self.state {
            log::debug!("cancelled stroke {}", stroke.id());
        }
        self.state = CaptureState::Idle;
    }

    /// Remove every stroke on the current page and persist the empty list.
    pub fn clear_page(&mut self, persist: &mut impl PersistFn) -> Result<(), CaptureError> {
        let page = self.page;
        if self.pages.clear_page(page) {
            log::info!("cleared page {}", page);
        }
        persist.persist(page, &[])?;
        Ok(())
    }

    /// Remove every stroke on every page, persisting each emptied page.
    pub fn clear_all(&mut self, persist: &mut impl PersistFn) -> Result<(), CaptureError> {
        let cleared: Vec<PageNumber> = self.pages.snapshot().keys().copied().collect();
        self.pages.clear_all();
        log::info!("cleared {} page(s)", cleared.len());
        for page in cleared {
            persist.persist(page, &[])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::zigzag;
    use crate::persist::{MemoryStore, PersistResult};

    const CANVAS: Size = Size::new(1000.0, 1000.0);

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn px(p: Point) -> Point {
        Point::new(p.x * CANVAS.width, p.y * CANVAS.height)
    }

    fn draw(capture: &mut StrokeCapture, points: &[Point], store: &mut MemoryStore) -> Option<Finalized> {
        let (first, rest) = points.split_first().unwrap();
        assert!(capture.begin(CANVAS, px(*first), PenStyle::default()));
        for p in rest {
            capture.extend(CANVAS, px(*p));
        }
        capture.end(store).unwrap()
    }

    fn horizontal() -> Vec<Point> {
        vec![Point::new(0.1, 0.5), Point::new(0.9, 0.5)]
    }

    #[test]
    fn test_extend_and_end_while_idle_are_noops() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        assert!(capture.extend(CANVAS, Point::new(1.0, 1.0)).is_none());
        assert!(capture.end(&mut store).unwrap().is_none());
        assert_eq!(store.writes(), 0);
        assert!(matches!(capture.state(), CaptureState::Idle));
    }

    #[test]
    fn test_points_are_normalized() {
        let mut capture = StrokeCapture::new();
        capture.begin(Size::new(200.0, 400.0), Point::new(50.0, 100.0), PenStyle::default());
        capture.extend(Size::new(200.0, 400.0), Point::new(100.0, 200.0));
        let stroke = capture.current().unwrap();
        assert_eq!(stroke.points, vec![Point::new(0.25, 0.25), Point::new(0.5, 0.5)]);
    }

    #[test]
    fn test_begin_on_empty_canvas_is_rejected() {
        let mut capture = StrokeCapture::new();
        assert!(!capture.begin(Size::ZERO, Point::new(1.0, 1.0), PenStyle::default()));
        assert!(!capture.is_capturing());
    }

    #[test]
    fn test_extend_returns_segments() {
        let mut capture = StrokeCapture::new();
        capture.begin(CANVAS, Point::new(0.0, 0.0), PenStyle::default());
        assert!(matches!(
            capture.extend(CANVAS, Point::new(10.0, 0.0)),
            Some(StrokeSegment::Line { .. })
        ));
        assert!(matches!(
            capture.extend(CANVAS, Point::new(20.0, 10.0)),
            Some(StrokeSegment::Quad { .. })
        ));
    }

    #[test]
    fn test_drawn_stroke_is_stored_and_persisted() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        let finalized = draw(&mut capture, &horizontal(), &mut store).unwrap();
        assert!(!finalized.was_erase);
        assert_eq!(finalized.strokes.len(), 1);
        assert_eq!(capture.strokes().len(), 1);
        assert_eq!(store.get(1).map(<[Stroke]>::len), Some(1));
        assert!(!capture.is_capturing());
    }

    #[test]
    fn test_scratch_erase_scenario() {
        init();
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        draw(&mut capture, &horizontal(), &mut store);

        let finalized = draw(&mut capture, &zigzag(0.5, 0.3, 0.7, 6, 5), &mut store).unwrap();
        assert!(finalized.was_erase);
        assert!(finalized.strokes.is_empty());
        assert!(!capture.pages().contains_page(1));
        assert_eq!(store.get(1), Some(&[][..]));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_single_point_stroke_is_stored() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        let finalized = draw(&mut capture, &[Point::new(0.5, 0.5)], &mut store).unwrap();
        assert_eq!(finalized.strokes.len(), 1);
        assert!(!finalized.strokes[0].is_paintable());
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let mut capture = StrokeCapture::new();
        let mut failing =
            |_: PageNumber, _: &[Stroke]| -> PersistResult<()> { Err(PersistError::Rejected("disk full".into())) };
        capture.begin(CANVAS, Point::new(100.0, 100.0), PenStyle::default());
        capture.extend(CANVAS, Point::new(200.0, 200.0));
        let result = capture.end(&mut failing);
        assert!(matches!(result, Err(CaptureError::Persist(_))));
        assert_eq!(capture.strokes().len(), 1);
        assert!(matches!(capture.state(), CaptureState::Idle));
    }

    #[test]
    fn test_pages_are_independent() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        draw(&mut capture, &horizontal(), &mut store);
        capture.set_page(2);
        draw(&mut capture, &horizontal(), &mut store);
        draw(&mut capture, &horizontal(), &mut store);
        assert_eq!(capture.pages().page(1).len(), 1);
        assert_eq!(capture.pages().page(2).len(), 2);
    }

    #[test]
    fn test_set_page_cancels_capture() {
        let mut capture = StrokeCapture::new();
        capture.begin(CANVAS, Point::new(1.0, 1.0), PenStyle::default());
        capture.set_page(4);
        assert!(!capture.is_capturing());
        assert_eq!(capture.page(), 4);
    }

    #[test]
    fn test_cancel_discards_stroke() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        capture.begin(CANVAS, Point::new(1.0, 1.0), PenStyle::default());
        capture.extend(CANVAS, Point::new(5.0, 5.0));
        capture.cancel();
        assert!(capture.end(&mut store).unwrap().is_none());
        assert!(capture.pages().is_empty());
    }

    #[test]
    fn test_clear_page_removes_entry() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        draw(&mut capture, &horizontal(), &mut store);
        capture.clear_page(&mut store).unwrap();
        assert!(!capture.pages().contains_page(1));
        assert_eq!(store.get(1), Some(&[][..]));
    }

    #[test]
    fn test_clear_all() {
        let mut capture = StrokeCapture::new();
        let mut store = MemoryStore::new();
        draw(&mut capture, &horizontal(), &mut store);
        capture.set_page(3);
        draw(&mut capture, &horizontal(), &mut store);
        capture.clear_all(&mut store).unwrap();
        assert!(capture.pages().is_empty());
        assert!(store.record().drawings.is_empty());
    }

    #[test]
    fn test_load_page() {
        let mut capture = StrokeCapture::new();
        let stroke = Stroke::from_points(horizontal(), PenStyle::default());
        capture.load_page(1, vec![stroke.clone()]);
        assert_eq!(capture.strokes(), &[stroke]);
        capture.load_page(1, Vec::new());
        assert!(!capture.pages().contains_page(1));
    }
}
