//! A surface that records paint commands instead of rasterizing them.
//!
//! Useful for headless hosts and for asserting on what was painted.

use crate::renderer::{PaintContext, Surface};
use kurbo::{BezPath, Size};
use peniko::Color;

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Clear(Size),
    Stroke {
        path: BezPath,
        width: f64,
        color: Color,
    },
}

#[derive(Debug, Default)]
struct Recorder {
    commands: Vec<PaintCommand>,
}

impl PaintContext for Recorder {
    fn clear(&mut self, size: Size) {
        self.commands.push(PaintCommand::Clear(size));
    }

    fn stroke_path(&mut self, path: &BezPath, style: &kurbo::Stroke, color: Color) {
        self.commands.push(PaintCommand::Stroke {
            path: path.clone(),
            width: style.width,
            color,
        });
    }
}

/// Surface backed by a command list.
#[derive(Debug)]
pub struct RecordingSurface {
    size: Size,
    recorder: Option<Recorder>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            recorder: Some(Recorder::default()),
        }
    }

    /// A surface that cannot hand out a paint context.
    pub fn without_context(mut self) -> Self {
        self.recorder = None;
        self
    }

    /// Resize the backing canvas, as a host does after re-rendering the page.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn commands(&self) -> &[PaintCommand] {
        self.recorder.as_ref().map(|r| r.commands.as_slice()).unwrap_or(&[])
    }

    /// Number of stroke commands since the last clear.
    pub fn stroke_count(&self) -> usize {
        self.commands()
            .iter()
            .rev()
            .take_while(|c| !matches!(c, PaintCommand::Clear(_)))
            .count()
    }

    /// Drop the recorded history.
    pub fn reset(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.commands.clear();
        }
    }
}

impl Surface for RecordingSurface {
    fn pixel_size(&self) -> Size {
        self.size
    }

    fn context(&mut self) -> Option<&mut dyn PaintContext> {
        self.recorder.as_mut().map(|r| r as &mut dyn PaintContext)
    }
}
