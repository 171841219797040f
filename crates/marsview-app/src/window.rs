//! winit application handler: window, renderer, and the per-frame loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use marsview_config::Config;
use marsview_input::{EventTranslator, InputEvent};
use marsview_render::{Renderer, SceneView, SurfaceError, init_render_context_blocking};
use marsview_viewer::{OverlayController, Viewer};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::reload::ConfigWatch;

const INSTRUCTIONS: &str = "Double-click the planet to learn more";
const OVERLAY_HINT: &str = "Mars (Esc to close)";

const PLANET_DESCRIPTION: &str = "Mars: fourth planet from the Sun, radius 3389.5 km, \
    one day lasts 24 h 37 min, two moons (Phobos and Deimos).";

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// A fatal error was already logged from inside the loop.
    #[error("viewer stopped after a fatal error")]
    Aborted,
}

pub fn window_attributes(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Presents overlay state through the window title and the log.
pub struct TitleOverlay {
    window: Option<Arc<Window>>,
    base_title: String,
    visible: bool,
    instructions_opacity: f32,
}

impl TitleOverlay {
    pub fn new(base_title: impl Into<String>) -> Self {
        Self {
            window: None,
            base_title: base_title.into(),
            visible: false,
            instructions_opacity: 1.0,
        }
    }

    pub fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
        self.apply();
    }

    pub fn title(&self) -> String {
        if self.visible {
            format!("{} | {OVERLAY_HINT}", self.base_title)
        } else if self.instructions_opacity > 0.0 {
            format!("{} | {INSTRUCTIONS}", self.base_title)
        } else {
            self.base_title.clone()
        }
    }

    fn apply(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.title());
        }
    }
}

impl OverlayController for TitleOverlay {
    fn set_overlay_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            info!("{PLANET_DESCRIPTION}");
        }
        self.apply();
    }

    fn set_instructions_opacity(&mut self, opacity: f32) {
        self.instructions_opacity = opacity;
        self.apply();
    }
}

pub struct AppState {
    config: Config,
    viewer: Viewer,
    translator: EventTranslator,
    overlay: TitleOverlay,
    watch: ConfigWatch,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    failed: bool,
}

fn translator_for(config: &Config) -> EventTranslator {
    EventTranslator::new(
        Duration::from_millis(config.input.double_gesture_window_ms),
        config.input.wheel_pixels_per_line,
    )
}

impl AppState {
    pub fn new(config: Config, viewer: Viewer, watch: ConfigWatch) -> Self {
        let translator = translator_for(&config);
        let overlay = TitleOverlay::new(config.window.title.clone());
        Self {
            config,
            viewer,
            translator,
            overlay,
            watch,
            window: None,
            renderer: None,
            failed: false,
        }
    }

    /// Pick up edits to the config file made while the window was in the
    /// background.
    fn reload_config(&mut self) {
        let Some(reloaded) = self.watch.poll() else {
            return;
        };
        self.config.camera = reloaded.camera;
        self.config.animation = reloaded.animation;
        self.config.input = reloaded.input;
        self.viewer.apply_config(&self.config);
        self.translator = translator_for(&self.config);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop) {
        self.failed = true;
        event_loop.exit();
    }

    /// Advance the scene one frame and draw it.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.viewer.tick();

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let world = self.viewer.world();
        let main = SceneView {
            graph: &world.graph,
            camera: self.viewer.camera(),
        };
        let preview = world.preview.as_ref().map(|p| SceneView {
            graph: &p.graph,
            camera: &p.camera,
        });

        match renderer.render(main, preview) {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => {
                let (width, height) = renderer.size();
                renderer.resize(width, height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                self.fail(event_loop);
                return;
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                self.fail(event_loop);
                return;
            }
        };

        match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(ctx) => {
                let preview_size = self
                    .config
                    .preview
                    .enabled
                    .then_some(self.config.preview.size);
                self.renderer = Some(Renderer::new(ctx, preview_size));
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                self.fail(event_loop);
                return;
            }
        }

        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);
        self.viewer.handle_event(
            InputEvent::Resized {
                width: size.width,
                height: size.height,
            },
            &mut self.overlay,
        );
        self.overlay.attach(window.clone());
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                return;
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(true) => self.reload_config(),
            _ => {}
        }

        if let Some(input) = self.translator.translate(&event, Instant::now()) {
            self.viewer.handle_event(input, &mut self.overlay);
        }
    }
}

/// Open the window and run until it closes.
#[instrument(skip_all)]
pub fn run(config: Config, viewer: Viewer, watch: ConfigWatch) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, viewer, watch);
    event_loop.run_app(&mut app)?;
    if app.failed {
        Err(RunError::Aborted)
    } else {
        Ok(())
    }
}
