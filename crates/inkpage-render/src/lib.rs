//! InkPage Render Library
//!
//! Paint surface abstraction, stroke painters and the annotation session.
//! An optional Vello-backed surface is available with the `vello-renderer`
//! feature.

mod annotator;
mod recording;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use annotator::{Annotator, SessionError, SessionResult};
pub use recording::{PaintCommand, RecordingSurface};
pub use renderer::{PaintContext, RenderError, RenderResult, Surface, paint_segment, paint_stroke, pen_stroke, replay};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
