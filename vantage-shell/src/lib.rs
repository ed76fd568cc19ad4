//! Native shell for the vantage viewer
//!
//! The shell owns the window, the GPU renderer, input capture, and the
//! model loading thread. Every viewer decision lives in the `vantage`
//! core: the shell translates winit input into protocol events, hands
//! them to the core, and executes the commands that come back.

mod asset_loader;
mod camera;
mod orbit;
mod renderer;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use vantage::ViewerCore;
use vantage_protocol::{
    AssetCommand, AssetEvent, AssetLoadedData, Command, Control, ControlEvent, ControllerCommand,
    Core, DebugCommand, EnvironmentCommand, Event, FrameEvent, InitEvent, LifecycleEvent, LogLevel,
    ResizeEvent, SceneCommand, UiCommand,
};

use crate::asset_loader::{LoadError, LoadedModel};
use crate::camera::Camera;
use crate::orbit::OrbitControls;
use crate::renderer::Renderer;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

/// Pixels of trackpad scroll treated as one wheel line
const PIXELS_PER_LINE: f64 = 50.0;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result of a background model load, delivered through the event loop proxy
struct LoadOutcome {
    asset_id: String,
    path: String,
    result: Result<LoadedModel, LoadError>,
}

/// Open a window and run the viewer until it is closed.
pub fn run(model_path: &str, ground_texture: &str, title: &str) -> Result<(), ShellError> {
    let event_loop = EventLoop::<LoadOutcome>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let proxy = event_loop.create_proxy();

    let mut app = App::new(ViewerCore::new(model_path), proxy, ground_texture, title);
    event_loop.run_app(&mut app)?;
    Ok(())
}

struct App {
    core: ViewerCore,
    proxy: EventLoopProxy<LoadOutcome>,
    ground_texture: String,
    title: String,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: Camera,
    controls: OrbitControls,

    /// Draws stay suppressed until the core shows the scene
    scene_visible: bool,
    loading_visible: bool,
    wheel_label: String,

    start: Instant,
    last_frame: Instant,
    frame_index: u64,
    last_cursor: Option<(f64, f64)>,
}

impl App {
    fn new(
        core: ViewerCore,
        proxy: EventLoopProxy<LoadOutcome>,
        ground_texture: &str,
        title: &str,
    ) -> Self {
        let now = Instant::now();
        Self {
            core,
            proxy,
            ground_texture: ground_texture.to_string(),
            title: title.to_string(),
            window: None,
            renderer: None,
            camera: Camera::new(),
            controls: OrbitControls::new(),
            scene_visible: false,
            loading_visible: true,
            wheel_label: String::new(),
            start: now,
            last_frame: now,
            frame_index: 0,
            last_cursor: None,
        }
    }

    /// Hand an event to the core and execute the commands it returns.
    /// Commands that produce follow-up events (asset loads) are queued
    /// back through the core in order.
    fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::new();
        queue.push_back(event);

        while let Some(event) = queue.pop_front() {
            for command in self.core.handle(event) {
                if let Some(follow_up) = self.apply(command) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    fn apply(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::Asset(AssetCommand::Load { asset_id, path }) => {
                let proxy = self.proxy.clone();
                let thread_id = asset_id.clone();
                let thread_path = path.clone();
                std::thread::spawn(move || {
                    let result = asset_loader::load_model(&thread_path);
                    let _ = proxy.send_event(LoadOutcome {
                        asset_id: thread_id,
                        path: thread_path,
                        result,
                    });
                });
                Some(Event::Asset(AssetEvent::LoadStarted { asset_id, path }))
            }

            Command::Scene(SceneCommand::SetModelTransform(transform)) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_model_transform(&transform);
                }
                None
            }

            Command::Environment(EnvironmentCommand::SetCamera(data)) => {
                self.camera.apply(&data);
                None
            }

            Command::Environment(EnvironmentCommand::SetBackground { color }) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_background(color);
                }
                None
            }

            Command::Environment(EnvironmentCommand::ScaleCameraPosition { factor }) => {
                self.camera.scale_position(factor);
                None
            }

            Command::Controller(ControllerCommand::SetTarget { target }) => {
                self.controls.set_target(Vec3::from_array(target));
                None
            }

            Command::Controller(ControllerCommand::SetZoomEnabled { enabled }) => {
                self.controls.enable_zoom = enabled;
                None
            }

            Command::Ui(UiCommand::SetLoadingVisible { visible }) => {
                self.loading_visible = visible;
                self.update_title();
                None
            }

            Command::Ui(UiCommand::SetSceneVisible { visible }) => {
                self.scene_visible = visible;
                None
            }

            Command::Ui(UiCommand::SetControlLabel { control: _, label }) => {
                self.wheel_label = label;
                self.update_title();
                None
            }

            Command::Debug(DebugCommand::Log { level, message }) => {
                match level {
                    LogLevel::Debug => log::debug!("{}", message),
                    LogLevel::Info => log::info!("{}", message),
                    LogLevel::Warn => log::warn!("{}", message),
                    LogLevel::Error => log::error!("{}", message),
                }
                None
            }
        }
    }

    /// The window title doubles as the UI surface for the loading state
    /// and the wheel-zoom label.
    fn update_title(&self) {
        if let Some(window) = &self.window {
            let status: &str = if self.loading_visible {
                "Loading..."
            } else {
                &self.wheel_label
            };
            if status.is_empty() {
                window.set_title(&self.title);
            } else {
                window.set_title(&format!("{} - {}", self.title, status));
            }
        }
    }

    fn dispatch_control_hold(&mut self, control: Control, pressed: bool) {
        let event = if pressed {
            ControlEvent::Pressed { control }
        } else {
            ControlEvent::Released { control }
        };
        self.dispatch(Event::Control(event));
    }
}

impl ApplicationHandler<LoadOutcome> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(
            Arc::clone(&window),
            &self.ground_texture,
        )) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.window = Some(Arc::clone(&window));
        self.renderer = Some(renderer);
        self.update_title();

        self.dispatch(Event::Lifecycle(LifecycleEvent::Init(InitEvent {
            viewport_width: size.width,
            viewport_height: size.height,
        })));

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.dispatch(Event::Lifecycle(LifecycleEvent::Shutdown));
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.dispatch(Event::Lifecycle(LifecycleEvent::Resize(ResizeEvent {
                    width: size.width,
                    height: size.height,
                })));
            }

            WindowEvent::RedrawRequested => {
                // Schedule the next frame before doing this one's work
                if let Some(window) = &self.window {
                    window.request_redraw();
                }

                let now = Instant::now();
                let time = now.duration_since(self.start).as_secs_f64();
                let dt = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;
                let frame = self.frame_index;
                self.frame_index += 1;

                self.controls.update(&mut self.camera);
                self.dispatch(Event::Lifecycle(LifecycleEvent::Frame(FrameEvent {
                    time,
                    dt,
                    frame,
                })));

                if let Some(renderer) = &mut self.renderer {
                    renderer.render(&self.camera, self.scene_visible);
                }
            }

            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.repeat {
                    return;
                }
                let pressed = key_event.state == ElementState::Pressed;
                match key_event.physical_key {
                    PhysicalKey::Code(KeyCode::Equal) | PhysicalKey::Code(KeyCode::NumpadAdd) => {
                        self.dispatch_control_hold(Control::ZoomIn, pressed);
                    }
                    PhysicalKey::Code(KeyCode::Minus)
                    | PhysicalKey::Code(KeyCode::NumpadSubtract) => {
                        self.dispatch_control_hold(Control::ZoomOut, pressed);
                    }
                    PhysicalKey::Code(KeyCode::KeyR) if pressed => {
                        self.dispatch(Event::Control(ControlEvent::Clicked {
                            control: Control::ResetView,
                        }));
                    }
                    PhysicalKey::Code(KeyCode::KeyZ) if pressed => {
                        self.dispatch(Event::Control(ControlEvent::Clicked {
                            control: Control::ToggleWheelZoom,
                        }));
                    }
                    _ => {}
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.controls.begin_drag(),
                ElementState::Released => self.controls.end_drag(),
            },

            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.last_cursor {
                    let dx = (position.x - last_x) as f32;
                    let dy = (position.y - last_y) as f32;
                    self.controls.on_cursor_delta(dx, dy);
                }
                self.last_cursor = Some((position.x, position.y));
            }

            WindowEvent::CursorLeft { .. } => {
                self.controls.end_drag();
                self.last_cursor = None;
                // Leaving the window counts as leaving every held control
                self.dispatch(Event::Control(ControlEvent::Left {
                    control: Control::ZoomIn,
                }));
                self.dispatch(Event::Control(ControlEvent::Left {
                    control: Control::ZoomOut,
                }));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
                };
                self.controls.on_scroll(lines);
            }

            WindowEvent::Focused(false) => {
                // Key releases are lost while unfocused
                self.dispatch_control_hold(Control::ZoomIn, false);
                self.dispatch_control_hold(Control::ZoomOut, false);
            }

            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, outcome: LoadOutcome) {
        match outcome.result {
            Ok(model) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_model(&model);
                }
                self.dispatch(Event::Asset(AssetEvent::Loaded(AssetLoadedData {
                    asset_id: outcome.asset_id,
                    path: outcome.path,
                    mesh_count: model.meshes.len() as u32,
                    bounds_min: model.bounds.min.to_array(),
                    bounds_max: model.bounds.max.to_array(),
                })));
            }
            Err(e) => {
                self.dispatch(Event::Asset(AssetEvent::LoadFailed {
                    asset_id: outcome.asset_id,
                    error: e.to_string(),
                }));
            }
        }
    }
}
