//! Viewport module for cursor-anchored zoom and pan over a prerendered page.
//!
//! Content coordinates are pixels of the prerendered page raster (the canvas),
//! screen coordinates are pixels of the container showing it:
//! `screen = content * zoom + pan_offset`.

use crate::config::{ConfigError, ViewportConfig, ZoomFloor};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Map a wheel delta to a zoom direction (scrolling down zooms out).
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        }
    }
}

/// Result of a zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomOutcome {
    /// Zoom and pan were updated.
    Changed,
    /// Already at the bound in the requested direction.
    Unchanged,
    /// The step would have gone below fit zoom; the host was asked to reset.
    FitRequested,
}

/// Serializable snapshot of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_offset: Vec2,
}

/// Callback invoked when a zoom-out step hits the floor under
/// [`ZoomFloor::ResetToFit`].
pub type FitCallback = Box<dyn FnMut()>;

/// Tolerance for zoom comparisons; repeated steps of 0.1 drift off the bounds.
const ZOOM_EPSILON: f64 = 1e-9;

/// Viewport manages the zoom/pan transform for a displayed page.
pub struct Viewport {
    /// Current translation offset (pan) in screen pixels.
    pub(crate) offset: Vec2,
    /// Current zoom level.
    pub(crate) zoom: f64,
    /// Zoom at which the page fits its container; the lower bound.
    fit_zoom: f64,
    config: ViewportConfig,
    on_fit: Option<FitCallback>,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("offset", &self.offset)
            .field("zoom", &self.zoom)
            .field("fit_zoom", &self.fit_zoom)
            .field("config", &self.config)
            .field("on_fit", &self.on_fit.is_some())
            .finish()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let config = ViewportConfig::default();
        Self {
            offset: Vec2::ZERO,
            zoom: config.fit_zoom(),
            fit_zoom: config.fit_zoom(),
            config,
            on_fit: None,
        }
    }
}

impl Viewport {
    /// Create a viewport at fit zoom, rejecting settings that could make zoom
    /// reach zero.
    pub fn new(config: ViewportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fit_zoom = config.fit_zoom();
        Ok(Self {
            offset: Vec2::ZERO,
            zoom: fit_zoom,
            fit_zoom,
            config,
            on_fit: None,
        })
    }

    /// Register the reset-to-fit callback used by [`ZoomFloor::ResetToFit`].
    pub fn with_fit_callback(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_fit = Some(Box::new(callback));
        self
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset in screen pixels.
    pub fn pan_offset(&self) -> Vec2 {
        self.offset
    }

    /// Lower zoom bound.
    pub fn fit_zoom(&self) -> f64 {
        self.fit_zoom
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            zoom: self.zoom,
            pan_offset: self.offset,
        }
    }

    /// Restore a saved view. Zoom is clamped into the current bounds and a
    /// non-finite zoom falls back to fit.
    pub fn restore(&mut self, state: ViewportState) {
        self.zoom = if state.zoom.is_finite() {
            state.zoom.clamp(self.fit_zoom, self.config.max_zoom)
        } else {
            self.fit_zoom
        };
        self.offset = state.pan_offset;
    }

    /// Replace the fit zoom with a value measured from the container.
    ///
    /// The current zoom is re-clamped into the new bounds.
    pub fn set_fit_zoom(&mut self, fit_zoom: f64) -> Result<(), ConfigError> {
        if !fit_zoom.is_finite() || fit_zoom <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fit zoom must be positive, got {}",
                fit_zoom
            )));
        }
        if fit_zoom > self.config.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "fit zoom {} exceeds max zoom {}",
                fit_zoom, self.config.max_zoom
            )));
        }
        self.fit_zoom = fit_zoom;
        self.zoom = self.zoom.clamp(self.fit_zoom, self.config.max_zoom);
        Ok(())
    }

    /// Set the pan offset directly (used by drag-pan).
    pub fn set_pan_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts content coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to content coordinates.
    pub fn screen_to_content(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.offset) / self.zoom).to_point()
    }

    /// Convert a content point to screen coordinates.
    pub fn content_to_screen(&self, content: Point) -> Point {
        (content.to_vec2() * self.zoom + self.offset).to_point()
    }

    /// Pan the view by a delta in screen pixels. Unbounded.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Step zoom once, keeping the content point under `cursor` fixed.
    pub fn apply_zoom_delta(&mut self, direction: ZoomDirection, cursor: Point) -> ZoomOutcome {
        let step = match direction {
            ZoomDirection::In => self.config.zoom_step,
            ZoomDirection::Out => -self.config.zoom_step,
        };
        let old_zoom = self.zoom;
        let requested = old_zoom + step;

        if requested < self.fit_zoom - ZOOM_EPSILON && self.config.floor == ZoomFloor::ResetToFit {
            log::debug!("zoom {:.3} below fit {:.3}, requesting reset", requested, self.fit_zoom);
            if let Some(on_fit) = self.on_fit.as_mut() {
                on_fit();
            }
            return ZoomOutcome::FitRequested;
        }

        let mut new_zoom = requested.clamp(self.fit_zoom, self.config.max_zoom);
        if (new_zoom - self.fit_zoom).abs() < ZOOM_EPSILON {
            new_zoom = self.fit_zoom;
        } else if (new_zoom - self.config.max_zoom).abs() < ZOOM_EPSILON {
            new_zoom = self.config.max_zoom;
        }
        if (new_zoom - old_zoom).abs() < ZOOM_EPSILON {
            return ZoomOutcome::Unchanged;
        }

        let anchor = cursor.to_vec2();
        let before = self.screen_to_content(cursor);
        let old_offset = self.offset;
        self.offset = anchor - (anchor - old_offset) * (new_zoom / old_zoom);
        self.zoom = new_zoom;

        log::debug!(
            "zoom {:.3} -> {:.3} at ({:.1}, {:.1}), pan ({:.1}, {:.1}) -> ({:.1}, {:.1}), content ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            old_zoom,
            new_zoom,
            cursor.x,
            cursor.y,
            old_offset.x,
            old_offset.y,
            self.offset.x,
            self.offset.y,
            before.x,
            before.y,
            self.screen_to_content(cursor).x,
            self.screen_to_content(cursor).y,
        );
        ZoomOutcome::Changed
    }

    /// Reset to fit zoom with no pan.
    pub fn reset_to_fit(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = self.fit_zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn assert_close(a: Point, b: Point, eps: f64) {
        assert!((a.x - b.x).abs() < eps, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < eps, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.pan_offset(), Vec2::ZERO);
        assert!((viewport.zoom() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_content_with_offset_and_zoom() {
        let mut viewport = Viewport::default();
        viewport.offset = Vec2::new(50.0, 100.0);
        viewport.zoom = 0.5;
        let content = viewport.screen_to_content(Point::new(100.0, 200.0));
        assert_close(content, Point::new(100.0, 200.0), 1e-12);
    }

    #[test]
    fn test_transform_matches_conversions() {
        let mut viewport = Viewport::default();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.zoom = 0.7;
        let content = Point::new(123.0, 456.0);
        assert_close(viewport.transform() * content, viewport.content_to_screen(content), 1e-9);
        let screen = Point::new(10.0, 20.0);
        assert_close(viewport.inverse_transform() * screen, viewport.screen_to_content(screen), 1e-9);
    }

    #[test]
    fn test_wheel_zoom_scenario() {
        let mut viewport = Viewport::default();
        let outcome = viewport.apply_zoom_delta(ZoomDirection::In, Point::new(100.0, 100.0));
        assert_eq!(outcome, ZoomOutcome::Changed);
        assert!((viewport.zoom() - 0.3).abs() < 1e-9);
        assert!((viewport.pan_offset().x + 50.0).abs() < 1e-9);
        assert!((viewport.pan_offset().y + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped_at_max() {
        let mut viewport = Viewport::default();
        for _ in 0..20 {
            viewport.apply_zoom_delta(ZoomDirection::In, Point::new(10.0, 10.0));
        }
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        let outcome = viewport.apply_zoom_delta(ZoomDirection::In, Point::new(10.0, 10.0));
        assert_eq!(outcome, ZoomOutcome::Unchanged);
    }

    #[test]
    fn test_zoom_out_at_floor_is_noop_when_clamping() {
        let mut viewport = Viewport::default();
        viewport.pan(Vec2::new(5.0, 5.0));
        let outcome = viewport.apply_zoom_delta(ZoomDirection::Out, Point::new(40.0, 40.0));
        assert_eq!(outcome, ZoomOutcome::Unchanged);
        assert!((viewport.zoom() - 0.2).abs() < f64::EPSILON);
        assert_eq!(viewport.pan_offset(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_zoom_out_clamps_partial_step() {
        let mut viewport = Viewport::default();
        viewport.set_fit_zoom(0.25).unwrap();
        viewport.zoom = 0.3;
        let outcome = viewport.apply_zoom_delta(ZoomDirection::Out, Point::new(0.0, 0.0));
        assert_eq!(outcome, ZoomOutcome::Changed);
        assert!((viewport.zoom() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_to_fit_callback() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let config = ViewportConfig {
            floor: ZoomFloor::ResetToFit,
            ..Default::default()
        };
        let mut viewport = Viewport::new(config)
            .unwrap()
            .with_fit_callback(move || counter.set(counter.get() + 1));
        viewport.pan(Vec2::new(7.0, 9.0));

        let outcome = viewport.apply_zoom_delta(ZoomDirection::Out, Point::new(10.0, 10.0));
        assert_eq!(outcome, ZoomOutcome::FitRequested);
        assert_eq!(calls.get(), 1);
        // Zoom and pan untouched; the host decides what reset means.
        assert!((viewport.zoom() - 0.2).abs() < f64::EPSILON);
        assert_eq!(viewport.pan_offset(), Vec2::new(7.0, 9.0));
    }

    #[test]
    fn test_zoom_out_lands_on_fit_despite_rounding() {
        let config = ViewportConfig {
            floor: ZoomFloor::ResetToFit,
            ..Default::default()
        };
        let mut viewport = Viewport::new(config).unwrap();
        viewport.set_fit_zoom(0.25).unwrap();
        viewport.reset_to_fit();

        assert_eq!(
            viewport.apply_zoom_delta(ZoomDirection::In, Point::new(100.0, 100.0)),
            ZoomOutcome::Changed
        );
        assert!((viewport.zoom() - 0.35).abs() < 1e-9);
        // 0.35 - 0.1 rounds to just under 0.25.
        assert_eq!(
            viewport.apply_zoom_delta(ZoomDirection::Out, Point::new(100.0, 100.0)),
            ZoomOutcome::Changed
        );
        assert_eq!(viewport.zoom(), 0.25);

        assert_eq!(
            viewport.apply_zoom_delta(ZoomDirection::Out, Point::new(100.0, 100.0)),
            ZoomOutcome::FitRequested
        );
    }

    #[test]
    fn test_state_serde() {
        let mut viewport = Viewport::default();
        viewport.apply_zoom_delta(ZoomDirection::In, Point::new(100.0, 100.0));
        let state = viewport.state();
        assert_eq!(state.pan_offset, viewport.pan_offset());

        let json = serde_json::to_string(&state).unwrap();
        let back: ViewportState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);

        let mut restored = Viewport::default();
        restored.restore(back);
        assert_eq!(restored.state(), state);
    }

    #[test]
    fn test_restore_clamps_zoom() {
        let mut viewport = Viewport::default();
        viewport.restore(ViewportState {
            zoom: 5.0,
            pan_offset: Vec2::new(1.0, 2.0),
        });
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(viewport.pan_offset(), Vec2::new(1.0, 2.0));

        viewport.restore(ViewportState {
            zoom: f64::NAN,
            pan_offset: Vec2::ZERO,
        });
        assert!((viewport.zoom() - viewport.fit_zoom()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_fit_zoom_reclamps() {
        let mut viewport = Viewport::default();
        viewport.set_fit_zoom(0.5).unwrap();
        assert!((viewport.zoom() - 0.5).abs() < f64::EPSILON);
        assert!(viewport.set_fit_zoom(0.0).is_err());
        assert!(viewport.set_fit_zoom(2.0).is_err());
    }

    #[test]
    fn test_pan_and_reset() {
        let mut viewport = Viewport::default();
        viewport.pan(Vec2::new(10.0, 20.0));
        viewport.pan(Vec2::new(-1e6, 1e6));
        assert!((viewport.pan_offset().x - (10.0 - 1e6)).abs() < 1e-6);
        viewport.apply_zoom_delta(ZoomDirection::In, Point::new(3.0, 4.0));
        viewport.reset_to_fit();
        assert_eq!(viewport.pan_offset(), Vec2::ZERO);
        assert!((viewport.zoom() - viewport.fit_zoom()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(ZoomDirection::from_wheel_delta(120.0), ZoomDirection::Out);
        assert_eq!(ZoomDirection::from_wheel_delta(-120.0), ZoomDirection::In);
    }

    proptest! {
        #[test]
        fn zoom_steps_keep_cursor_anchor(
            steps in prop::collection::vec((any::<bool>(), -2000.0f64..2000.0, -2000.0f64..2000.0), 1..40),
        ) {
            let mut viewport = Viewport::default();
            for (zoom_in, x, y) in steps {
                let cursor = Point::new(x, y);
                let before = viewport.screen_to_content(cursor);
                let direction = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
                viewport.apply_zoom_delta(direction, cursor);
                let after = viewport.screen_to_content(cursor);
                prop_assert!((before.x - after.x).abs() < 1e-6 * before.x.abs().max(1.0));
                prop_assert!((before.y - after.y).abs() < 1e-6 * before.y.abs().max(1.0));
                prop_assert!(viewport.zoom() >= viewport.fit_zoom());
                prop_assert!(viewport.zoom() <= 1.0);
            }
        }

        #[test]
        fn content_roundtrip(
            zoom in 0.2f64..1.0,
            ox in -5000.0f64..5000.0,
            oy in -5000.0f64..5000.0,
            cx in -5000.0f64..5000.0,
            cy in -5000.0f64..5000.0,
        ) {
            let mut viewport = Viewport::default();
            viewport.zoom = zoom;
            viewport.offset = Vec2::new(ox, oy);
            let content = Point::new(cx, cy);
            let back = viewport.screen_to_content(viewport.content_to_screen(content));
            prop_assert!((back.x - cx).abs() < 1e-6);
            prop_assert!((back.y - cy).abs() < 1e-6);
        }
    }
}
