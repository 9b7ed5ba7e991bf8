//! Paint surface abstraction and the stroke painters.

use inkpage_core::stroke::{PenStyle, Stroke, StrokeSegment};
use kurbo::{BezPath, Cap, Join, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Surface has no 2D paint context")]
    MissingContext,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Drawing commands a surface must support.
///
/// Coordinates are canvas pixels.
pub trait PaintContext {
    /// Clear everything painted so far.
    fn clear(&mut self, size: Size);

    /// Stroke a path with the given line style and color.
    fn stroke_path(&mut self, path: &BezPath, style: &kurbo::Stroke, color: Color);
}

/// A paintable overlay above the rendered page.
pub trait Surface {
    /// Current size of the backing canvas in pixels.
    fn pixel_size(&self) -> Size;

    /// The 2D paint context, if the surface can provide one.
    fn context(&mut self) -> Option<&mut dyn PaintContext>;
}

/// Line style for a pen: fixed width, round caps and joins.
pub fn pen_stroke(pen: &PenStyle) -> kurbo::Stroke {
    kurbo::Stroke::new(pen.width)
        .with_caps(Cap::Round)
        .with_join(Join::Round)
}

/// Paint one incremental segment of the stroke in progress.
pub fn paint_segment(surface: &mut dyn Surface, segment: &StrokeSegment, pen: &PenStyle) -> RenderResult<()> {
    let size = surface.pixel_size();
    let cx = surface.context().ok_or(RenderError::MissingContext)?;
    cx.stroke_path(&segment.to_path(size), &pen_stroke(pen), pen.color());
    Ok(())
}

/// Paint a whole stroke on top of what is already on the surface.
///
/// Strokes with fewer than two points paint nothing.
pub fn paint_stroke(surface: &mut dyn Surface, stroke: &Stroke) -> RenderResult<()> {
    let size = surface.pixel_size();
    let cx = surface.context().ok_or(RenderError::MissingContext)?;
    if stroke.is_paintable() {
        cx.stroke_path(&stroke.to_path(size), &pen_stroke(&stroke.style), stroke.style.color());
    }
    Ok(())
}

/// Clear the surface and repaint every stroke in order.
///
/// Strokes with fewer than two points are skipped.
pub fn replay(surface: &mut dyn Surface, strokes: &[Stroke]) -> RenderResult<()> {
    let size = surface.pixel_size();
    let cx = surface.context().ok_or(RenderError::MissingContext)?;
    cx.clear(size);

    let mut painted = 0;
    for stroke in strokes.iter().filter(|s| s.is_paintable()) {
        cx.stroke_path(&stroke.to_path(size), &pen_stroke(&stroke.style), stroke.style.color());
        painted += 1;
    }
    log::debug!("replayed {} of {} stroke(s) at {}x{}", painted, strokes.len(), size.width, size.height);
    Ok(())
}
