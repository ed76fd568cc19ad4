//! The viewer controller
//!
//! [`ViewerCore`] wires the fit calculator and the zoom-hold state machine
//! into the shell-core protocol: one glTF model per session, framed on
//! load, orbited and zoomed by the user until shutdown.

use vantage_protocol::*;

use crate::bounds::Aabb;
use crate::fit::{self, CameraPlacement};

/// Per-frame camera position multiplier while the zoom-in control is held
pub const ZOOM_IN_FACTOR: f32 = 0.99;

/// Per-frame camera position multiplier while the zoom-out control is held
pub const ZOOM_OUT_FACTOR: f32 = 1.01;

/// Sky blue, #87ceeb
pub const SKY_COLOR: [f32; 4] = [135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0, 1.0];

/// Camera pose before any model is framed
pub const INITIAL_CAMERA_POSITION: [f32; 3] = [0.0, 5.0, 10.0];

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Asset ID the core assigns to the one model it loads
const MODEL_ASSET_ID: &str = "model";

/// Which continuous-zoom controls are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoomHold {
    pub zooming_in: bool,
    pub zooming_out: bool,
}

impl ZoomHold {
    pub fn start_zoom_in(&mut self) {
        self.zooming_in = true;
    }

    pub fn start_zoom_out(&mut self) {
        self.zooming_out = true;
    }

    /// Any release or pointer-leave stops both directions
    pub fn stop(&mut self) {
        self.zooming_in = false;
        self.zooming_out = false;
    }

    pub fn idle(&self) -> bool {
        !self.zooming_in && !self.zooming_out
    }
}

/// The one loaded model, remembered for reset-view framing
#[derive(Debug, Clone, Copy)]
struct ModelHandle {
    source_bounds: Aabb,
    scale: f32,
}

/// Viewer application state
pub struct ViewerCore {
    /// Path of the model to load on init
    model_path: String,
    /// Set once, on the first successful load
    model: Option<ModelHandle>,
    /// Held zoom controls, applied every frame
    zoom: ZoomHold,
    /// Whether the orbit controller may dolly on scrollwheel input
    wheel_zoom_enabled: bool,
}

impl ViewerCore {
    pub fn new(model_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            model: None,
            zoom: ZoomHold::default(),
            wheel_zoom_enabled: true,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn zoom(&self) -> ZoomHold {
        self.zoom
    }

    pub fn wheel_zoom_enabled(&self) -> bool {
        self.wheel_zoom_enabled
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) -> Command {
        Command::Debug(DebugCommand::Log {
            level,
            message: message.into(),
        })
    }

    fn camera_command(&self, placement: CameraPlacement) -> Command {
        Command::Environment(EnvironmentCommand::SetCamera(CameraData {
            position: placement.position.to_array(),
            target: placement.target.to_array(),
            up: [0.0, 1.0, 0.0],
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }))
    }

    /// Re-frame the loaded model from its world-space bounds. A no-op
    /// until a model is in the scene.
    fn reset_view(&self) -> Vec<Command> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        let world_bounds = model.source_bounds.scaled(model.scale);
        let placement = fit::reset_placement(&world_bounds);
        vec![
            self.camera_command(placement),
            Command::Controller(ControllerCommand::SetTarget {
                target: placement.target.to_array(),
            }),
        ]
    }

    fn toggle_wheel_zoom(&mut self) -> Vec<Command> {
        self.wheel_zoom_enabled = !self.wheel_zoom_enabled;
        vec![
            Command::Controller(ControllerCommand::SetZoomEnabled {
                enabled: self.wheel_zoom_enabled,
            }),
            Command::Ui(UiCommand::SetControlLabel {
                control: Control::ToggleWheelZoom,
                label: wheel_zoom_label(self.wheel_zoom_enabled).to_string(),
            }),
        ]
    }
}

pub(crate) fn wheel_zoom_label(enabled: bool) -> &'static str {
    if enabled {
        "Scrollwheel zoom: On"
    } else {
        "Scrollwheel zoom: Off"
    }
}

impl Core for ViewerCore {
    fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Lifecycle(e) => self.handle_lifecycle(e),
            Event::Control(e) => self.handle_control(e),
            Event::Asset(e) => self.handle_asset(e),
        }
    }
}

impl LifecycleHandler for ViewerCore {
    fn handle_lifecycle(&mut self, event: LifecycleEvent) -> Vec<Command> {
        let mut commands = Vec::new();

        match event {
            LifecycleEvent::Init(init) => {
                commands.push(self.log(
                    LogLevel::Info,
                    format!(
                        "Viewer initialized, viewport: {}x{}",
                        init.viewport_width, init.viewport_height
                    ),
                ));

                commands.push(Command::Environment(EnvironmentCommand::SetBackground {
                    color: SKY_COLOR,
                }));

                commands.push(Command::Ui(UiCommand::SetControlLabel {
                    control: Control::ToggleWheelZoom,
                    label: wheel_zoom_label(self.wheel_zoom_enabled).to_string(),
                }));

                commands.push(Command::Asset(AssetCommand::Load {
                    asset_id: MODEL_ASSET_ID.to_string(),
                    path: self.model_path.clone(),
                }));
            }

            LifecycleEvent::Frame(_) => {
                // Held zoom controls scale the camera position every frame.
                // When both are held the factors nearly cancel, leaving a
                // slow drift toward the origin.
                if self.zoom.zooming_in {
                    commands.push(Command::Environment(
                        EnvironmentCommand::ScaleCameraPosition {
                            factor: ZOOM_IN_FACTOR,
                        },
                    ));
                }
                if self.zoom.zooming_out {
                    commands.push(Command::Environment(
                        EnvironmentCommand::ScaleCameraPosition {
                            factor: ZOOM_OUT_FACTOR,
                        },
                    ));
                }
            }

            LifecycleEvent::Resize(_) => {
                // Shell handles resize, core can react if needed
            }

            LifecycleEvent::Shutdown => {
                commands.push(self.log(LogLevel::Info, "Viewer shutting down"));
            }
        }

        commands
    }
}

impl ControlHandler for ViewerCore {
    fn handle_control(&mut self, event: ControlEvent) -> Vec<Command> {
        match event {
            ControlEvent::Pressed { control } => {
                match control {
                    Control::ZoomIn => self.zoom.start_zoom_in(),
                    Control::ZoomOut => self.zoom.start_zoom_out(),
                    _ => {}
                }
                Vec::new()
            }

            ControlEvent::Released { control } | ControlEvent::Left { control } => {
                match control {
                    Control::ZoomIn | Control::ZoomOut => self.zoom.stop(),
                    _ => {}
                }
                Vec::new()
            }

            ControlEvent::Clicked { control } => match control {
                Control::ResetView => self.reset_view(),
                Control::ToggleWheelZoom => self.toggle_wheel_zoom(),
                _ => Vec::new(),
            },
        }
    }
}

impl AssetHandler for ViewerCore {
    fn handle_asset(&mut self, event: AssetEvent) -> Vec<Command> {
        let mut commands = Vec::new();

        match event {
            AssetEvent::LoadStarted { path, .. } => {
                commands.push(self.log(LogLevel::Debug, format!("Loading {}", path)));
            }

            AssetEvent::Loaded(loaded) => {
                if loaded.asset_id != MODEL_ASSET_ID || self.model.is_some() {
                    return commands;
                }

                let bounds = Aabb::from_arrays(loaded.bounds_min, loaded.bounds_max);
                match fit::fit_model(&bounds) {
                    Ok(fit) => {
                        self.model = Some(ModelHandle {
                            source_bounds: bounds,
                            scale: fit.scale,
                        });

                        commands.push(self.log(
                            LogLevel::Info,
                            format!(
                                "Model loaded: {} meshes, scale {:.3}",
                                loaded.mesh_count, fit.scale
                            ),
                        ));
                        commands.push(Command::Scene(SceneCommand::SetModelTransform(
                            ModelTransform {
                                position: fit.position.to_array(),
                                scale: fit.scale,
                            },
                        )));
                        commands.push(self.camera_command(fit.camera));
                        commands.push(Command::Controller(ControllerCommand::SetTarget {
                            target: fit.camera.target.to_array(),
                        }));
                        commands.push(Command::Controller(ControllerCommand::SetZoomEnabled {
                            enabled: self.wheel_zoom_enabled,
                        }));
                        commands.push(Command::Ui(UiCommand::SetLoadingVisible {
                            visible: false,
                        }));
                        commands.push(Command::Ui(UiCommand::SetSceneVisible { visible: true }));
                    }
                    Err(e) => {
                        commands.push(self.log(
                            LogLevel::Error,
                            format!("Cannot fit model {}: {}", loaded.path, e),
                        ));
                    }
                }
            }

            AssetEvent::LoadFailed { asset_id, error } => {
                commands.push(self.log(
                    LogLevel::Error,
                    format!("Failed to load asset {}: {}", asset_id, error),
                ));
            }

            AssetEvent::LoadProgress { .. } => {}
        }

        commands
    }
}
