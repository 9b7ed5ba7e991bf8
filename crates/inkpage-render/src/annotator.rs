//! Annotation session: routes input into the viewport and stroke capture and
//! paints the results onto a surface.

use crate::renderer::{RenderError, Surface, paint_segment, paint_stroke, replay};
use inkpage_core::capture::{CaptureError, Finalized, StrokeCapture};
use inkpage_core::config::{ConfigError, InkConfig};
use inkpage_core::input::{DrawAction, InputAction, InputState, KeyEvent, PointerEvent};
use inkpage_core::pages::{PageNumber, PageStrokeSet};
use inkpage_core::persist::PersistFn;
use inkpage_core::stroke::{PenStyle, Stroke};
use inkpage_core::viewport::{Viewport, ZoomOutcome};
use kurbo::Point;
use thiserror::Error;

/// Errors from an annotation session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Drawing and navigation state for one displayed document.
pub struct Annotator<P: PersistFn> {
    viewport: Viewport,
    capture: StrokeCapture,
    input: InputState,
    pen: PenStyle,
    persist: P,
}

impl<P: PersistFn> Annotator<P> {
    /// Create a session from configuration.
    pub fn new(config: &InkConfig, persist: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            viewport: Viewport::new(config.viewport.clone())?,
            capture: StrokeCapture::new().with_erase_config(config.erase.clone()),
            input: InputState::new(),
            pen: config.pen,
            persist,
        })
    }

    /// Replace the viewport, e.g. one carrying a fit callback.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn pen(&self) -> PenStyle {
        self.pen
    }

    /// Style used for strokes started after this call.
    pub fn set_pen(&mut self, pen: PenStyle) {
        self.pen = pen;
    }

    pub fn persist(&self) -> &P {
        &self.persist
    }

    pub fn page(&self) -> PageNumber {
        self.capture.page()
    }

    /// Strokes on the current page.
    pub fn strokes(&self) -> &[Stroke] {
        self.capture.strokes()
    }

    /// Switch to another page and repaint it.
    pub fn show_page(&mut self, surface: &mut dyn Surface, page: PageNumber) -> SessionResult<()> {
        self.capture.set_page(page);
        self.repaint(surface)
    }

    /// Install strokes loaded from storage.
    pub fn load(&mut self, pages: PageStrokeSet) {
        self.capture.load_all(pages);
    }

    /// Repaint every stroke on the current page, then the stroke in
    /// progress on top.
    pub fn repaint(&mut self, surface: &mut dyn Surface) -> SessionResult<()> {
        replay(surface, self.capture.strokes())?;
        if let Some(stroke) = self.capture.current() {
            paint_stroke(surface, stroke)?;
        }
        Ok(())
    }

    /// Handle a pointer event in container coordinates.
    pub fn handle_pointer_event(&mut self, surface: &mut dyn Surface, event: PointerEvent) -> SessionResult<InputAction> {
        let action = self.input.handle_pointer_event(event, &mut self.viewport);
        self.apply(surface, action)?;
        Ok(action)
    }

    pub fn handle_key_event(&mut self, surface: &mut dyn Surface, event: KeyEvent) -> SessionResult<InputAction> {
        let action = self.input.handle_key_event(event, &mut self.viewport);
        self.apply(surface, action)?;
        Ok(action)
    }

    /// Remove every stroke on the current page.
    pub fn clear_page(&mut self, surface: &mut dyn Surface) -> SessionResult<()> {
        let result = self.capture.clear_page(&mut self.persist);
        self.repaint(surface)?;
        result.map_err(Into::into)
    }

    /// Remove every stroke on every page.
    pub fn clear_all(&mut self, surface: &mut dyn Surface) -> SessionResult<()> {
        let result = self.capture.clear_all(&mut self.persist);
        self.repaint(surface)?;
        result.map_err(Into::into)
    }

    /// Host teardown: drop the stroke in progress.
    pub fn cancel(&mut self) {
        self.capture.cancel();
    }

    fn apply(&mut self, surface: &mut dyn Surface, action: InputAction) -> SessionResult<()> {
        match action {
            InputAction::Draw(draw) => self.draw(surface, draw),
            InputAction::Zoomed(ZoomOutcome::Changed) | InputAction::Reset => self.repaint(surface),
            InputAction::Zoomed(ZoomOutcome::FitRequested) => {
                self.viewport.reset_to_fit();
                self.repaint(surface)
            }
            InputAction::Zoomed(ZoomOutcome::Unchanged) | InputAction::Panned | InputAction::Ignored => Ok(()),
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, action: DrawAction) -> SessionResult<()> {
        match action {
            DrawAction::Begin(screen) => {
                let position = self.canvas_position(screen);
                self.capture.begin(surface.pixel_size(), position, self.pen);
                Ok(())
            }
            DrawAction::Extend(screen) => {
                let position = self.canvas_position(screen);
                let Some(segment) = self.capture.extend(surface.pixel_size(), position) else {
                    return Ok(());
                };
                let pen = self.capture.current().map(|s| s.style).unwrap_or(self.pen);
                paint_segment(surface, &segment, &pen)?;
                Ok(())
            }
            DrawAction::End => match self.capture.end(&mut self.persist) {
                Ok(Some(finalized)) => self.finish(surface, &finalized),
                Ok(None) => Ok(()),
                Err(e) => {
                    // Memory already holds the resolved page.
                    self.repaint(surface)?;
                    Err(e.into())
                }
            },
            DrawAction::Cancel => {
                self.capture.cancel();
                self.repaint(surface)
            }
        }
    }

    fn finish(&mut self, surface: &mut dyn Surface, finalized: &Finalized) -> SessionResult<()> {
        if finalized.was_erase {
            log::info!(
                "erased {} stroke(s) on page {}",
                finalized.removed.len(),
                finalized.page
            );
            replay(surface, &finalized.strokes)?;
        }
        Ok(())
    }

    fn canvas_position(&self, screen: Point) -> Point {
        self.viewport.screen_to_content(screen)
    }
}
