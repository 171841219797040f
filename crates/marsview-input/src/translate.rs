//! Reduction of winit window events to [`InputEvent`]s.

use std::time::{Duration, Instant};

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use crate::{DoubleGestureDetector, InputEvent, wheel_delta_pixels};

/// Stateful translator from winit events to viewer input.
///
/// Holds the last cursor position (mouse buttons carry none) and the
/// double-click detector for the primary button.
#[derive(Debug, Clone)]
pub struct EventTranslator {
    cursor: Vec2,
    clicks: DoubleGestureDetector,
    pixels_per_line: f32,
}

impl EventTranslator {
    #[must_use]
    pub fn new(double_click_window: Duration, pixels_per_line: f32) -> Self {
        Self {
            cursor: Vec2::ZERO,
            clicks: DoubleGestureDetector::new(double_click_window),
            pixels_per_line,
        }
    }

    /// Translate a winit window event observed at `now`.
    pub fn translate(&mut self, event: &WindowEvent, now: Instant) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.on_cursor_moved(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseWheel { delta, .. } => Some(self.on_scroll(*delta)),
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(*button, *state, now)
            }
            WindowEvent::Touch(touch) => Some(Self::on_touch(
                touch.phase,
                touch.id,
                touch.location.x as f32,
                touch.location.y as f32,
                now,
            )),
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                Self::on_key(&event.logical_key, event.state)
            }
            WindowEvent::Resized(size) => Some(InputEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }

    pub fn on_cursor_moved(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = Vec2::new(x, y);
        InputEvent::PointerMoved { x, y }
    }

    pub fn on_scroll(&self, delta: MouseScrollDelta) -> InputEvent {
        InputEvent::Wheel {
            delta_y: wheel_delta_pixels(delta, self.pixels_per_line),
        }
    }

    /// Left presses feed the double-click detector; everything else is dropped.
    pub fn on_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        now: Instant,
    ) -> Option<InputEvent> {
        if button != MouseButton::Left || state != ElementState::Pressed {
            return None;
        }
        if self.clicks.press(now) {
            tracing::debug!(x = self.cursor.x, y = self.cursor.y, "double click");
            Some(InputEvent::DoubleClick {
                x: self.cursor.x,
                y: self.cursor.y,
            })
        } else {
            None
        }
    }

    pub fn on_touch(phase: TouchPhase, id: u64, x: f32, y: f32, now: Instant) -> InputEvent {
        match phase {
            TouchPhase::Started => InputEvent::TouchStart { id, x, y, at: now },
            TouchPhase::Moved => InputEvent::TouchMove { id, x, y },
            TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::TouchEnd { id },
        }
    }

    /// Escape closes the overlay.
    pub fn on_key(key: &Key, state: ElementState) -> Option<InputEvent> {
        match (key, state) {
            (Key::Named(NamedKey::Escape), ElementState::Pressed) => Some(InputEvent::Close),
            _ => None,
        }
    }
}
