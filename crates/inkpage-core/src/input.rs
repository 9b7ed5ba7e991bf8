//! Input routing for pointer, wheel and keyboard events.
//!
//! Pointer sequences either draw or pan: holding Ctrl (or Cmd) when the
//! pointer goes down starts a drag-pan, otherwise the left button draws.
//! Ctrl+wheel zooms around the cursor. Plain wheel events are left to the
//! host so the page container can scroll.

use crate::viewport::{Viewport, ZoomDirection, ZoomOutcome};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Whether the view-navigation modifier (Ctrl or Cmd) is held.
    pub fn navigate(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates relative to the page container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed { key: String, modifiers: Modifiers },
    Released { key: String, modifiers: Modifiers },
}

/// Drawing step requested by the router, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawAction {
    Begin(Point),
    Extend(Point),
    End,
    Cancel,
}

/// Result of routing one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Nothing for the core to do; the host may handle the event.
    Ignored,
    /// The viewport zoom changed (or a fit reset was requested).
    Zoomed(ZoomOutcome),
    /// The viewport pan changed.
    Panned,
    /// The view was reset to fit.
    Reset,
    /// A drawing step for the stroke capture.
    Draw(DrawAction),
}

/// Ctrl+drag panning.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanGesture {
    /// Pointer position minus pan offset at gesture start.
    anchor: Option<Vec2>,
}

impl PanGesture {
    pub fn is_panning(&self) -> bool {
        self.anchor.is_some()
    }

    /// Begin panning if the navigation modifier is held.
    pub fn start(&mut self, pointer: Point, modifiers: Modifiers, viewport: &Viewport) -> bool {
        if !modifiers.navigate() {
            return false;
        }
        self.anchor = Some(pointer.to_vec2() - viewport.pan_offset());
        true
    }

    /// Follow the pointer. Returns false when no gesture is active.
    pub fn drag(&mut self, pointer: Point, viewport: &mut Viewport) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        viewport.set_pan_offset(pointer.to_vec2() - anchor);
        true
    }

    pub fn stop(&mut self) {
        self.anchor = None;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PointerMode {
    #[default]
    Idle,
    Drawing,
    Panning,
}

/// Tracks modifier and gesture state across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    modifiers: Modifiers,
    pan: PanGesture,
    mode: PointerMode,
    last_wheel_cursor: Option<Point>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl or Cmd is currently held, per the last key event.
    pub fn is_navigate_pressed(&self) -> bool {
        self.modifiers.navigate()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_panning()
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == PointerMode::Drawing
    }

    /// Position of the last zooming wheel event.
    pub fn last_wheel_cursor(&self) -> Option<Point> {
        self.last_wheel_cursor
    }

    /// Route a pointer event, updating the viewport for pan and zoom.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, viewport: &mut Viewport) -> InputAction {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                self.modifiers = modifiers;
                if self.mode != PointerMode::Idle {
                    return InputAction::Ignored;
                }
                if self.pan.start(position, modifiers, viewport) {
                    self.mode = PointerMode::Panning;
                    return InputAction::Ignored;
                }
                if button != MouseButton::Left {
                    return InputAction::Ignored;
                }
                self.mode = PointerMode::Drawing;
                InputAction::Draw(DrawAction::Begin(position))
            }
            PointerEvent::Move { position } => match self.mode {
                PointerMode::Panning if self.pan.drag(position, viewport) => InputAction::Panned,
                PointerMode::Drawing => InputAction::Draw(DrawAction::Extend(position)),
                _ => InputAction::Ignored,
            },
            PointerEvent::Up { .. } => match std::mem::take(&mut self.mode) {
                PointerMode::Panning => {
                    self.pan.stop();
                    InputAction::Ignored
                }
                PointerMode::Drawing => InputAction::Draw(DrawAction::End),
                PointerMode::Idle => InputAction::Ignored,
            },
            PointerEvent::Wheel {
                position,
                delta,
                modifiers,
            } => {
                self.modifiers = modifiers;
                if !modifiers.navigate() {
                    return InputAction::Ignored;
                }
                self.last_wheel_cursor = Some(position);
                let direction = ZoomDirection::from_wheel_delta(delta.y);
                InputAction::Zoomed(viewport.apply_zoom_delta(direction, position))
            }
        }
    }

    /// Route a key event.
    ///
    /// Ctrl+0 resets to fit, Ctrl+= / Ctrl+- step zoom around the last wheel
    /// cursor, Escape cancels the stroke in progress.
    pub fn handle_key_event(&mut self, event: KeyEvent, viewport: &mut Viewport) -> InputAction {
        match event {
            KeyEvent::Pressed { key, modifiers } => {
                self.modifiers = modifiers;
                if key == "Escape" && self.mode == PointerMode::Drawing {
                    self.mode = PointerMode::Idle;
                    return InputAction::Draw(DrawAction::Cancel);
                }
                if !modifiers.navigate() {
                    return InputAction::Ignored;
                }
                let anchor = self.last_wheel_cursor.unwrap_or(Point::ZERO);
                match key.as_str() {
                    "0" => {
                        viewport.reset_to_fit();
                        InputAction::Reset
                    }
                    "=" | "+" => InputAction::Zoomed(viewport.apply_zoom_delta(ZoomDirection::In, anchor)),
                    "-" => InputAction::Zoomed(viewport.apply_zoom_delta(ZoomDirection::Out, anchor)),
                    _ => InputAction::Ignored,
                }
            }
            KeyEvent::Released { modifiers, .. } => {
                self.modifiers = modifiers;
                InputAction::Ignored
            }
        }
    }
}
