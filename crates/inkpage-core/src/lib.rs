//! InkPage Core Library
//!
//! Platform-agnostic stroke capture, scratch-to-erase resolution and the
//! zoom/pan viewport for annotating rendered document pages.

pub mod capture;
pub mod config;
pub mod erase;
pub mod geometry;
pub mod input;
pub mod pages;
pub mod persist;
pub mod stroke;
pub mod viewport;

pub use capture::{CaptureError, CaptureState, Finalized, StrokeCapture};
pub use config::{ConfigError, EraseConfig, InkConfig, ViewportConfig, ZoomFloor};
pub use erase::{Resolution, classify};
pub use input::{DrawAction, InputAction, InputState, KeyEvent, Modifiers, MouseButton, PanGesture, PointerEvent};
pub use pages::{PageNumber, PageRecord, PageStrokeSet};
pub use persist::{MemoryStore, PersistError, PersistFn, PersistResult};
pub use stroke::{PenStyle, SerializableColor, Stroke, StrokeId, StrokeSegment};
pub use viewport::{Viewport, ViewportState, ZoomDirection, ZoomOutcome};
