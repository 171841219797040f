//! Pointer position and normalized camera-steering offsets.

use glam::Vec2;

/// Map a pixel position to offsets in [-1, 1], `x` right and `y` up.
///
/// `x = (cx / w) * 2 - 1`, `y = -(cy / h) * 2 + 1`. Positions outside the
/// viewport are clamped; a zero-sized viewport yields `(0, 0)`.
pub fn normalize_position(position: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 || !position.is_finite() {
        return Vec2::ZERO;
    }
    let x = (position.x / viewport.x) * 2.0 - 1.0;
    let y = -(position.y / viewport.y) * 2.0 + 1.0;
    Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Tracks the pointer, its normalized offsets, and active touches.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    viewport: Vec2,
    position: Vec2,
    offsets: Vec2,
    touches: Vec<u64>,
}

impl PointerState {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Vec2::new(width as f32, height as f32),
            ..Self::default()
        }
    }

    /// Record a new viewport size and re-derive offsets for the held position.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
        self.offsets = normalize_position(self.position, self.viewport);
    }

    /// Move the pointer and update the steering offsets.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.offsets = normalize_position(self.position, self.viewport);
    }

    /// Register a touch. Returns the number of active touches afterwards.
    pub fn touch_started(&mut self, id: u64) -> usize {
        if !self.touches.contains(&id) {
            self.touches.push(id);
        }
        self.touches.len()
    }

    /// Apply a touch move. Only a lone touch steers; returns whether it did.
    pub fn touch_moved(&mut self, id: u64, x: f32, y: f32) -> bool {
        if self.touches.len() == 1 && self.touches[0] == id {
            self.move_to(x, y);
            true
        } else {
            false
        }
    }

    pub fn touch_ended(&mut self, id: u64) {
        self.touches.retain(|&t| t != id);
    }

    #[must_use]
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Normalized offsets, each in [-1, 1].
    #[must_use]
    pub fn offsets(&self) -> Vec2 {
        self.offsets
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Normalized device coordinates for an arbitrary pixel position in
    /// this viewport.
    #[must_use]
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        normalize_position(Vec2::new(x, y), self.viewport)
    }
}
