//! Shell-Core Protocol
//!
//! The viewer uses a shell-core architecture:
//! - **Shell**: Platform-specific (winit/wgpu on desktop)
//!   - Opens the window and drives the frame loop
//!   - Captures input and maps it to viewer controls
//!   - Loads assets off the main thread
//!   - Executes rendering and camera commands
//!
//! - **Core**: Platform-agnostic Rust code
//!   - Receives Events from shell
//!   - Owns the model-fit and zoom-hold state machines
//!   - Emits Commands for shell to execute
//!   - No threads, purely event-driven
//!
//! ## Architecture
//!
//! Events and Commands use an enum-of-enums pattern for modularity:
//! - Handlers can subscribe to specific event categories
//! - Modules only see events relevant to them
//! - Better organization and type safety

use serde::{Deserialize, Serialize};

// ============================================================================
// IDs - All IDs are opaque strings
// ============================================================================

/// Unique identifier for assets (files being loaded)
pub type AssetId = String;

// ============================================================================
// EVENTS (Shell -> Core)
// ============================================================================

/// Top-level events sent from Shell to Core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", content = "event")]
pub enum Event {
    /// Application lifecycle events
    Lifecycle(LifecycleEvent),
    /// Viewer control events (zoom buttons, reset, wheel toggle)
    Control(ControlEvent),
    /// Asset loading events
    Asset(AssetEvent),
}

// ----------------------------------------------------------------------------
// Lifecycle Events
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LifecycleEvent {
    /// Shell initialized, provides viewport dimensions
    Init(InitEvent),
    /// Render frame requested (called every frame)
    Frame(FrameEvent),
    /// Viewport/window resized
    Resize(ResizeEvent),
    /// Application shutting down
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitEvent {
    pub viewport_width: u32,
    pub viewport_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEvent {
    pub time: f64,
    pub dt: f32,
    pub frame: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
}

// ----------------------------------------------------------------------------
// Control Events
// ----------------------------------------------------------------------------

/// The viewer controls the shell exposes, by stable identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleWheelZoom,
}

/// Interaction with a viewer control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ControlEvent {
    /// Control engaged (button/key held down)
    Pressed { control: Control },
    /// Control disengaged (button/key released)
    Released { control: Control },
    /// Pointer left the control while it may still be held
    Left { control: Control },
    /// Discrete activation (click/tap/keystroke)
    Clicked { control: Control },
}

// ----------------------------------------------------------------------------
// Asset Events
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssetEvent {
    LoadStarted { asset_id: AssetId, path: String },
    LoadProgress { asset_id: AssetId, loaded: u64, total: Option<u64> },
    Loaded(AssetLoadedData),
    LoadFailed { asset_id: AssetId, error: String },
}

/// Metadata about a loaded model. The shell keeps the geometry itself;
/// the core only needs the bounds to fit and frame the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetLoadedData {
    pub asset_id: AssetId,
    pub path: String,
    pub mesh_count: u32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

// ============================================================================
// COMMANDS (Core -> Shell)
// ============================================================================

/// Top-level commands sent from Core to Shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", content = "command")]
pub enum Command {
    /// Asset management commands
    Asset(AssetCommand),
    /// Scene commands (model placement)
    Scene(SceneCommand),
    /// Environment commands (camera, background)
    Environment(EnvironmentCommand),
    /// Orbit controller commands
    Controller(ControllerCommand),
    /// UI state commands (loading indicator, control labels)
    Ui(UiCommand),
    /// Debug/logging commands
    Debug(DebugCommand),
}

// ----------------------------------------------------------------------------
// Asset Commands
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum AssetCommand {
    Load { asset_id: AssetId, path: String },
}

// ----------------------------------------------------------------------------
// Scene Commands
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum SceneCommand {
    SetModelTransform(ModelTransform),
}

/// Placement of the loaded model: uniform scale, then translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTransform {
    pub position: [f32; 3],
    pub scale: f32,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }
}

// ----------------------------------------------------------------------------
// Environment Commands
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum EnvironmentCommand {
    SetCamera(CameraData),
    SetBackground { color: [f32; 4] },
    /// Multiply the camera position by `factor`, moving it toward or away
    /// from the world origin without changing its direction
    ScaleCameraPosition { factor: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraData {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

// ----------------------------------------------------------------------------
// Controller Commands
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ControllerCommand {
    SetTarget { target: [f32; 3] },
    SetZoomEnabled { enabled: bool },
}

// ----------------------------------------------------------------------------
// UI Commands
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum UiCommand {
    SetLoadingVisible { visible: bool },
    SetSceneVisible { visible: bool },
    SetControlLabel { control: Control, label: String },
}

// ----------------------------------------------------------------------------
// Debug Commands
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum DebugCommand {
    Log { level: LogLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

// ============================================================================
// CORE TRAIT
// ============================================================================

/// Trait that the application implements
pub trait Core {
    /// Handle an event from the shell
    /// Returns commands for the shell to execute
    fn handle(&mut self, event: Event) -> Vec<Command>;
}

// ============================================================================
// HELPER TRAITS FOR MODULAR HANDLERS
// ============================================================================

/// Handler for lifecycle events
pub trait LifecycleHandler {
    fn handle_lifecycle(&mut self, event: LifecycleEvent) -> Vec<Command>;
}

/// Handler for control events
pub trait ControlHandler {
    fn handle_control(&mut self, event: ControlEvent) -> Vec<Command>;
}

/// Handler for asset events
pub trait AssetHandler {
    fn handle_asset(&mut self, event: AssetEvent) -> Vec<Command>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_loaded_json() {
        let json = r#"{"category":"Asset","event":{"type":"Loaded","asset_id":"model","path":"duck.glb","mesh_count":1,"bounds_min":[-1.0,-1.0,-1.0],"bounds_max":[1.0,1.0,1.0]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        match event {
            Event::Asset(AssetEvent::Loaded(data)) => {
                assert_eq!(data.asset_id, "model");
                assert_eq!(data.path, "duck.glb");
                assert_eq!(data.bounds_max, [1.0, 1.0, 1.0]);
            }
            _ => panic!("Expected Asset::Loaded event"),
        }
    }

    #[test]
    fn test_lifecycle_init_json() {
        let json = r#"{"category":"Lifecycle","event":{"type":"Init","viewport_width":800,"viewport_height":600}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        match event {
            Event::Lifecycle(LifecycleEvent::Init(data)) => {
                assert_eq!(data.viewport_width, 800);
                assert_eq!(data.viewport_height, 600);
            }
            _ => panic!("Expected Lifecycle::Init event"),
        }
    }

    #[test]
    fn test_control_pressed_json() {
        let json = r#"{"category":"Control","event":{"action":"Pressed","control":"ZoomIn"}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        match event {
            Event::Control(ControlEvent::Pressed { control }) => {
                assert_eq!(control, Control::ZoomIn);
            }
            _ => panic!("Expected Control::Pressed event"),
        }
    }

    #[test]
    fn test_command_round_trip() {
        let command = Command::Environment(EnvironmentCommand::ScaleCameraPosition { factor: 0.99 });
        let json = serde_json::to_string(&command).unwrap();
        let parsed: Command = serde_json::from_str(&json).unwrap();
        match parsed {
            Command::Environment(EnvironmentCommand::ScaleCameraPosition { factor }) => {
                assert_eq!(factor, 0.99);
            }
            _ => panic!("Expected ScaleCameraPosition command"),
        }
    }
}
