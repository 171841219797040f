//! The viewer's input vocabulary.

use std::time::Instant;

use winit::event::MouseScrollDelta;

/// A discrete input the viewer reacts to.
///
/// Coordinates are physical pixels relative to the window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse cursor moved.
    PointerMoved { x: f32, y: f32 },
    /// Wheel scrolled. Positive values pull the camera away, in pixels.
    Wheel { delta_y: f32 },
    /// Two primary-button presses in quick succession.
    DoubleClick { x: f32, y: f32 },
    /// A finger touched down.
    TouchStart { id: u64, x: f32, y: f32, at: Instant },
    /// A finger moved.
    TouchMove { id: u64, x: f32, y: f32 },
    /// A finger lifted or the touch was cancelled.
    TouchEnd { id: u64 },
    /// Dismiss the overlay.
    Close,
    /// The drawable area changed size.
    Resized { width: u32, height: u32 },
}

/// Convert a winit scroll delta to browser-style pixels (positive = scroll
/// toward the user).
///
/// winit reports positive `y` for scrolling away from the user, so the sign
/// is flipped. Line deltas are scaled by `pixels_per_line`.
pub fn wheel_delta_pixels(delta: MouseScrollDelta, pixels_per_line: f32) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * pixels_per_line,
        MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_line_delta_scaled_and_flipped() {
        let d = wheel_delta_pixels(MouseScrollDelta::LineDelta(0.0, 1.0), 100.0);
        assert_eq!(d, -100.0);
    }

    #[test]
    fn test_pixel_delta_flipped() {
        let d = wheel_delta_pixels(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -53.0)),
            100.0,
        );
        assert_eq!(d, 53.0);
    }
}
