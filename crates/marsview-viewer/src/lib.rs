//! Viewer logic: world construction, input dispatch, and per-frame animation.
//!
//! [`Viewer`] owns all mutable application state. The window layer feeds it
//! [`marsview_input::InputEvent`]s through [`Viewer::handle_event`] and calls
//! [`Viewer::tick`] once per redraw before handing the scene to the renderer.

mod assets;
mod overlay;
mod preview;
mod viewer;
mod world;

pub use assets::{AssetError, ImageFileLoader, TextureLoader, load_or_fallback};
pub use overlay::OverlayController;
pub use preview::PreviewScene;
pub use viewer::{ViewMode, Viewer};
pub use world::{PLANET_BASE_COLOR, World, WorldBuilder};
