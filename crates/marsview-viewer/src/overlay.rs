//! The informational overlay is owned by the window layer; the viewer only
//! tells it when to show and hide.

/// Receiver of overlay visibility changes.
pub trait OverlayController {
    /// Show or hide the planet description panel.
    fn set_overlay_visible(&mut self, visible: bool);

    /// Fade the usage hint: `0.0` hidden, `1.0` fully shown.
    fn set_instructions_opacity(&mut self, opacity: f32);
}

/// Records every call in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingOverlay {
    pub calls: Vec<OverlayCall>,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OverlayCall {
    Visible(bool),
    Opacity(f32),
}

#[cfg(test)]
impl OverlayController for RecordingOverlay {
    fn set_overlay_visible(&mut self, visible: bool) {
        self.calls.push(OverlayCall::Visible(visible));
    }

    fn set_instructions_opacity(&mut self, opacity: f32) {
        self.calls.push(OverlayCall::Opacity(opacity));
    }
}
