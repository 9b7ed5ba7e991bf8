//! Vello-backed surface.

use crate::renderer::{PaintContext, Surface};
use kurbo::{Affine, BezPath, Size};
use peniko::Color;
use vello::Scene;

/// Paints strokes into a Vello scene for GPU rendering.
///
/// Paths arrive in canvas pixels. `transform` is applied on top, so a host
/// compositing the overlay can pass [`Viewport::transform`] to place the
/// canvas on screen.
///
/// [`Viewport::transform`]: inkpage_core::viewport::Viewport::transform
pub struct VelloSurface {
    scene: Scene,
    size: Size,
    transform: Affine,
}

impl VelloSurface {
    /// Create a surface for a canvas of the given pixel size.
    pub fn new(size: Size) -> Self {
        Self {
            scene: Scene::new(),
            size,
            transform: Affine::IDENTITY,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Transform applied to subsequent paint calls.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }
}

impl PaintContext for VelloSurface {
    fn clear(&mut self, _size: Size) {
        self.scene.reset();
    }

    fn stroke_path(&mut self, path: &BezPath, style: &kurbo::Stroke, color: Color) {
        self.scene.stroke(style, self.transform, color, None, path);
    }
}

impl Surface for VelloSurface {
    fn pixel_size(&self) -> Size {
        self.size
    }

    fn context(&mut self) -> Option<&mut dyn PaintContext> {
        Some(self)
    }
}
