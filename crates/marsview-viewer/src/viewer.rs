//! Application state, the input dispatcher, and the per-frame animation driver.

use std::time::Duration;

use glam::{Vec2, Vec3};
use marsview_config::{AnimationConfig, CameraConfig, Config};
use marsview_input::{DoubleGestureDetector, InputEvent, PointerState};
use marsview_scene::{NodeKind, PerspectiveCamera, hit_test};

use crate::overlay::OverlayController;
use crate::world::World;

/// Whether the description overlay is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Exploring,
    OverlayOpen,
}

/// All mutable viewer state.
pub struct Viewer {
    mode: ViewMode,
    pointer: PointerState,
    taps: DoubleGestureDetector,
    camera: PerspectiveCamera,
    world: World,
    camera_config: CameraConfig,
    distance_limits: (f32, f32),
    animation: AnimationConfig,
}

impl Viewer {
    /// Place the camera at its start distance looking at the origin.
    pub fn new(world: World, config: &Config, width: u32, height: u32) -> Self {
        let cam = &config.camera;
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let mut camera = PerspectiveCamera::new(cam.fov_degrees, aspect, cam.near, cam.far)
            .with_position(Vec3::new(0.0, 0.0, cam.clamped_start_distance()));
        camera.look_at(Vec3::ZERO);

        Self {
            mode: ViewMode::Exploring,
            pointer: PointerState::new(width, height),
            taps: DoubleGestureDetector::new(Duration::from_millis(
                config.input.double_gesture_window_ms,
            )),
            camera,
            world,
            camera_config: cam.clone(),
            distance_limits: cam.distance_limits(),
            animation: config.animation.clone(),
        }
    }

    /// Adopt the live-tunable parts of a reloaded config: camera follow and
    /// zoom, animation steps, and the double-gesture window.
    ///
    /// Window, scene and preview settings only take effect on restart.
    pub fn apply_config(&mut self, config: &Config) {
        let cam = &config.camera;
        self.camera_config = cam.clone();
        self.distance_limits = cam.distance_limits();
        self.animation = config.animation.clone();
        self.taps.set_window(Duration::from_millis(
            config.input.double_gesture_window_ms,
        ));

        let (min, max) = self.distance_limits;
        self.camera.position.z = self.camera.position.z.clamp(min, max);
        tracing::info!(min, max, "Applied reloaded config");
    }

    // ── Dispatcher ──────────────────────────────────────────────────

    /// Apply one input event to the viewer state.
    pub fn handle_event(&mut self, event: InputEvent, overlay: &mut dyn OverlayController) {
        match event {
            InputEvent::PointerMoved { x, y } => self.pointer.move_to(x, y),
            InputEvent::Wheel { delta_y } => self.zoom(delta_y),
            InputEvent::DoubleClick { x, y } => self.pick(x, y, overlay),
            InputEvent::TouchStart { id, x, y, at } => {
                self.pointer.touch_started(id);
                if self.taps.press(at) {
                    tracing::debug!(x, y, "double tap");
                    self.pick(x, y, overlay);
                }
            }
            InputEvent::TouchMove { id, x, y } => {
                self.pointer.touch_moved(id, x, y);
            }
            InputEvent::TouchEnd { id } => self.pointer.touch_ended(id),
            InputEvent::Close => self.close_overlay(overlay),
            InputEvent::Resized { width, height } => {
                self.pointer.set_viewport(width, height);
                self.camera.set_viewport(width, height);
            }
        }
    }

    fn zoom(&mut self, delta_y: f32) {
        if self.mode != ViewMode::Exploring || !delta_y.is_finite() {
            return;
        }
        let (min, max) = self.distance_limits;
        let z = self.camera.position.z + delta_y * self.camera_config.zoom_scale;
        if z.is_finite() {
            self.camera.position.z = z.clamp(min, max);
        }
    }

    /// Hit-test at a pixel position; opens the overlay when the planet is the
    /// nearest object.
    fn pick(&mut self, x: f32, y: f32, overlay: &mut dyn OverlayController) {
        if self.mode != ViewMode::Exploring {
            return;
        }
        let ndc = self.pointer.to_ndc(x, y);
        let ray = self.camera.ray_through_ndc(ndc);
        let Some(hit) = hit_test(&self.world.graph, &ray) else {
            tracing::debug!(x, y, "pick hit nothing");
            return;
        };
        let kind = self.world.graph.get(hit.node).map(|n| n.kind);
        if kind == Some(NodeKind::Planet) {
            tracing::info!(distance = hit.distance, "Planet selected");
            self.open_overlay(overlay);
        } else {
            tracing::debug!(node = hit.node.index(), "pick hit non-planet");
        }
    }

    pub fn open_overlay(&mut self, overlay: &mut dyn OverlayController) {
        if self.mode == ViewMode::OverlayOpen {
            return;
        }
        self.mode = ViewMode::OverlayOpen;
        overlay.set_overlay_visible(true);
        overlay.set_instructions_opacity(0.0);
    }

    /// No-op while already exploring.
    pub fn close_overlay(&mut self, overlay: &mut dyn OverlayController) {
        if self.mode == ViewMode::Exploring {
            return;
        }
        self.mode = ViewMode::Exploring;
        overlay.set_overlay_visible(false);
        overlay.set_instructions_opacity(1.0);
    }

    // ── Animation driver ────────────────────────────────────────────

    /// Advance one frame of animation.
    pub fn tick(&mut self) {
        let anim = &self.animation;

        if self.mode == ViewMode::Exploring {
            let cfg = &self.camera_config;
            let offsets = self.pointer.offsets();
            let target = Vec2::new(offsets.x, -offsets.y) * cfg.follow_range;
            let pos = &mut self.camera.position;
            pos.x += (target.x - pos.x) * cfg.follow_factor;
            pos.y += (target.y - pos.y) * cfg.follow_factor;
            self.camera.look_at(Vec3::ZERO);

            if let Some(group) = self.world.graph.get_mut(self.world.planet_group) {
                group.transform.rotation.y += anim.planet_yaw_step;
                group.transform.rotation.x += anim.planet_pitch_step;
            }
        }

        if let Some(stars) = self.world.graph.get_mut(self.world.stars) {
            stars.transform.rotation.y += anim.star_spin_step;
        }

        let step = anim.shader_time_step;
        self.world.graph.for_each_material_mut(|material| {
            if let Some(time) = material.time_uniform_mut() {
                *time += step;
            }
        });

        if let Some(preview) = self.world.preview.as_mut() {
            preview.tick(anim.preview_spin_step);
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
