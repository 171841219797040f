//! Input handling for the Mars viewer.
//!
//! Raw winit window events are reduced to a small [`InputEvent`] vocabulary by
//! [`EventTranslator`]. [`PointerState`] turns pointer positions into the
//! normalized offsets that steer the camera, and [`DoubleGestureDetector`]
//! recognises double-clicks and double-taps.

mod event;
mod gesture;
mod pointer;
mod translate;

pub use event::{InputEvent, wheel_delta_pixels};
pub use gesture::{DEFAULT_DOUBLE_GESTURE_WINDOW, DoubleGestureDetector};
pub use pointer::{PointerState, normalize_position};
pub use translate::EventTranslator;
