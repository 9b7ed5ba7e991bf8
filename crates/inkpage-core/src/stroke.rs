//! Pen strokes in normalized page coordinates.

use kurbo::{BezPath, Point, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint style captured when a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenStyle {
    /// Stroke color.
    pub color: SerializableColor,
    /// Line width in canvas pixels. Not rescaled on replay.
    pub width: f64,
}

impl Default for PenStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 3.0,
        }
    }
}

impl PenStyle {
    pub fn new(color: impl Into<SerializableColor>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }

    /// Get the color as a peniko Color.
    pub fn color(&self) -> Color {
        self.color.into()
    }
}

/// Map a canvas-pixel position into `[0, 1]` page coordinates.
///
/// Returns `None` for an empty canvas or a non-finite result.
pub fn normalize(position: Point, canvas: Size) -> Option<Point> {
    if canvas.width <= 0.0 || canvas.height <= 0.0 {
        return None;
    }
    let point = Point::new(position.x / canvas.width, position.y / canvas.height);
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    Some(point)
}

/// Map a normalized point back onto a canvas of the given pixel size.
pub fn to_canvas(point: Point, canvas: Size) -> Point {
    Point::new(point.x * canvas.width, point.y * canvas.height)
}

/// One continuous pen gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: StrokeId,
    /// Normalized points in drawing order.
    pub points: Vec<Point>,
    /// Paint style.
    #[serde(flatten)]
    pub style: PenStyle,
}

impl Stroke {
    /// Start a stroke at a single normalized point.
    pub fn new(start: Point, style: PenStyle) -> Self {
        Self::from_points(vec![start], style)
    }

    /// Create from existing normalized points.
    pub fn from_points(points: Vec<Point>, style: PenStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Add a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the stroke has at least one segment to paint.
    pub fn is_paintable(&self) -> bool {
        self.points.len() >= 2
    }

    /// The segment added by the newest point, for incremental painting.
    pub fn last_segment(&self) -> Option<StrokeSegment> {
        let n = self.points.len();
        match n {
            0 | 1 => None,
            2 => Some(StrokeSegment::Line {
                from: self.points[0],
                to: self.points[1],
            }),
            _ => {
                let (p0, p1, p2) = (self.points[n - 3], self.points[n - 2], self.points[n - 1]);
                let start = if n == 3 { p0 } else { p0.midpoint(p1) };
                Some(StrokeSegment::Quad {
                    start,
                    ctrl: p1,
                    end: p1.midpoint(p2),
                })
            }
        }
    }

    /// Full smoothed path on a canvas of the given pixel size.
    ///
    /// Each interior point becomes the control of a quadratic ending at the
    /// midpoint to its successor; the path finishes with a line to the last
    /// point. Strokes with fewer than two points produce an empty path.
    pub fn to_path(&self, canvas: Size) -> BezPath {
        let mut path = BezPath::new();
        let points = &self.points;

        match points.len() {
            0 | 1 => {}
            2 => {
                path.move_to(to_canvas(points[0], canvas));
                path.line_to(to_canvas(points[1], canvas));
            }
            n => {
                path.move_to(to_canvas(points[0], canvas));
                for pair in points[1..].windows(2).take(n - 2) {
                    let (ctrl, next) = (pair[0], pair[1]);
                    path.quad_to(to_canvas(ctrl, canvas), to_canvas(ctrl.midpoint(next), canvas));
                }
                path.line_to(to_canvas(points[n - 1], canvas));
            }
        }

        path
    }
}

/// The piece of a stroke painted when a new sample arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeSegment {
    /// First segment of a stroke: a straight line.
    Line { from: Point, to: Point },
    /// Smoothed continuation.
    Quad { start: Point, ctrl: Point, end: Point },
}

impl StrokeSegment {
    /// The segment as a path on a canvas of the given pixel size.
    pub fn to_path(&self, canvas: Size) -> BezPath {
        let mut path = BezPath::new();
        match *self {
            StrokeSegment::Line { from, to } => {
                path.move_to(to_canvas(from, canvas));
                path.line_to(to_canvas(to, canvas));
            }
            StrokeSegment::Quad { start, ctrl, end } => {
                path.move_to(to_canvas(start, canvas));
                path.quad_to(to_canvas(ctrl, canvas), to_canvas(end, canvas));
            }
        }
        path
    }
}
