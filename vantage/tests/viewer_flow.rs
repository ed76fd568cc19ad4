//! Integration tests for the full viewer session flow
//!
//! Drives a ViewerCore through init, load, zoom, toggle, and reset the way
//! a shell would, and checks the commands that come back.

use vantage::protocol::*;
use vantage::{ViewerCore, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// Helper to build a frame event with a fixed timestep
fn frame(n: u64) -> Event {
    Event::Lifecycle(LifecycleEvent::Frame(FrameEvent {
        time: n as f64 / 60.0,
        dt: 1.0 / 60.0,
        frame: n,
    }))
}

/// Helper to drive init and pull out the load request the core makes
fn init_core(core: &mut ViewerCore) -> (String, String) {
    let commands = core.handle(Event::Lifecycle(LifecycleEvent::Init(InitEvent {
        viewport_width: 800,
        viewport_height: 600,
    })));

    let mut load = None;
    let mut background = None;
    for command in commands {
        match command {
            Command::Asset(AssetCommand::Load { asset_id, path }) => {
                load = Some((asset_id, path));
            }
            Command::Environment(EnvironmentCommand::SetBackground { color }) => {
                background = Some(color);
            }
            _ => {}
        }
    }

    let background = background.expect("init must set the sky background");
    assert!((background[0] - 135.0 / 255.0).abs() < 1e-6);
    load.expect("init must request the model load")
}

/// Helper to answer the load request with the given model-space bounds
fn deliver_model(
    core: &mut ViewerCore,
    asset_id: &str,
    path: &str,
    min: [f32; 3],
    max: [f32; 3],
) -> Vec<Command> {
    core.handle(Event::Asset(AssetEvent::Loaded(AssetLoadedData {
        asset_id: asset_id.to_string(),
        path: path.to_string(),
        mesh_count: 3,
        bounds_min: min,
        bounds_max: max,
    })))
}

fn zoom_factors(commands: &[Command]) -> Vec<f32> {
    commands
        .iter()
        .filter_map(|c| match c {
            Command::Environment(EnvironmentCommand::ScaleCameraPosition { factor }) => {
                Some(*factor)
            }
            _ => None,
        })
        .collect()
}

fn camera_positions(commands: &[Command]) -> Vec<[f32; 3]> {
    commands
        .iter()
        .filter_map(|c| match c {
            Command::Environment(EnvironmentCommand::SetCamera(data)) => Some(data.position),
            _ => None,
        })
        .collect()
}

#[test]
fn test_unit_cube_session_framing() {
    // Test: a 2x2x2 model centered on the origin is scaled to 20 units
    // and framed from (25, 12.5, 25).

    let mut core = ViewerCore::new("duck.glb");
    let (asset_id, path) = init_core(&mut core);
    assert_eq!(path, "duck.glb");

    let commands = deliver_model(&mut core, &asset_id, &path, [-1.0; 3], [1.0; 3]);

    let mut transform = None;
    let mut target = None;
    let mut zoom_enabled = None;
    let mut loading_visible = None;
    let mut scene_visible = None;
    for command in &commands {
        match command {
            Command::Scene(SceneCommand::SetModelTransform(t)) => transform = Some(t.clone()),
            Command::Controller(ControllerCommand::SetTarget { target: t }) => target = Some(*t),
            Command::Controller(ControllerCommand::SetZoomEnabled { enabled }) => {
                zoom_enabled = Some(*enabled)
            }
            Command::Ui(UiCommand::SetLoadingVisible { visible }) => {
                loading_visible = Some(*visible)
            }
            Command::Ui(UiCommand::SetSceneVisible { visible }) => scene_visible = Some(*visible),
            _ => {}
        }
    }

    let transform = transform.expect("load must place the model");
    assert_eq!(transform.scale, 10.0);
    assert_eq!(transform.position, [0.0, 0.0, 0.0]);

    assert_eq!(camera_positions(&commands), vec![[25.0, 12.5, 25.0]]);
    assert_eq!(target, Some([0.0, 0.0, 0.0]));
    assert_eq!(zoom_enabled, Some(true));
    assert_eq!(loading_visible, Some(false));
    assert_eq!(scene_visible, Some(true));
}

#[test]
fn test_off_center_model_is_recentered_but_not_lifted() {
    // Test: only x and z follow the model center; y is always 0.

    let mut core = ViewerCore::new("lamp.gltf");
    let (asset_id, path) = init_core(&mut core);

    let commands = deliver_model(
        &mut core,
        &asset_id,
        &path,
        [4.0, 10.0, -6.0],
        [8.0, 12.0, -2.0],
    );

    let transform = commands
        .iter()
        .find_map(|c| match c {
            Command::Scene(SceneCommand::SetModelTransform(t)) => Some(t.clone()),
            _ => None,
        })
        .expect("load must place the model");

    // Longest side 4 -> scale 5; center (6, 11, -4).
    assert_eq!(transform.scale, 5.0);
    assert_eq!(transform.position, [-30.0, 0.0, 20.0]);
}

#[test]
fn test_zoom_hold_across_frames() {
    // Test: held controls emit one factor per frame until released, and
    // holding both emits both factors in press order.

    let mut core = ViewerCore::new("duck.glb");
    let (asset_id, path) = init_core(&mut core);
    deliver_model(&mut core, &asset_id, &path, [-1.0; 3], [1.0; 3]);

    assert!(zoom_factors(&core.handle(frame(1))).is_empty());

    core.handle(Event::Control(ControlEvent::Pressed {
        control: Control::ZoomIn,
    }));
    assert_eq!(zoom_factors(&core.handle(frame(2))), vec![ZOOM_IN_FACTOR]);
    assert_eq!(zoom_factors(&core.handle(frame(3))), vec![ZOOM_IN_FACTOR]);

    core.handle(Event::Control(ControlEvent::Pressed {
        control: Control::ZoomOut,
    }));
    assert_eq!(
        zoom_factors(&core.handle(frame(4))),
        vec![ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR]
    );

    core.handle(Event::Control(ControlEvent::Released {
        control: Control::ZoomOut,
    }));
    assert!(zoom_factors(&core.handle(frame(5))).is_empty());
}

#[test]
fn test_reset_view_reframes_from_world_bounds() {
    // Test: reset recomputes the same framing pose from the scaled bounds
    // without touching the model transform.

    let mut core = ViewerCore::new("duck.glb");
    let (asset_id, path) = init_core(&mut core);
    deliver_model(&mut core, &asset_id, &path, [-1.0; 3], [1.0; 3]);

    let commands = core.handle(Event::Control(ControlEvent::Clicked {
        control: Control::ResetView,
    }));

    assert_eq!(camera_positions(&commands), vec![[25.0, 12.5, 25.0]]);
    assert!(commands
        .iter()
        .all(|c| !matches!(c, Command::Scene(SceneCommand::SetModelTransform(_)))));
}

#[test]
fn test_wheel_toggle_round_trip() {
    // Test: toggling twice restores the enabled state and the label.

    let mut core = ViewerCore::new("duck.glb");

    let off = core.handle(Event::Control(ControlEvent::Clicked {
        control: Control::ToggleWheelZoom,
    }));
    let on = core.handle(Event::Control(ControlEvent::Clicked {
        control: Control::ToggleWheelZoom,
    }));

    let label_of = |commands: &[Command]| {
        commands
            .iter()
            .find_map(|c| match c {
                Command::Ui(UiCommand::SetControlLabel { label, .. }) => Some(label.clone()),
                _ => None,
            })
            .expect("toggle must relabel the control")
    };

    assert_eq!(label_of(&off), "Scrollwheel zoom: Off");
    assert_eq!(label_of(&on), "Scrollwheel zoom: On");
    assert!(core.wheel_zoom_enabled());
}

#[test]
fn test_failed_load_leaves_viewer_waiting() {
    // Test: a load failure only logs; no scene, camera, or UI change.

    let mut core = ViewerCore::new("missing.glb");
    let (asset_id, _path) = init_core(&mut core);

    let commands = core.handle(Event::Asset(AssetEvent::LoadFailed {
        asset_id,
        error: "No such file or directory".to_string(),
    }));

    assert!(!core.model_loaded());
    assert!(commands
        .iter()
        .all(|c| matches!(c, Command::Debug(DebugCommand::Log { .. }))));

    // Reset stays inert after a failed load.
    assert!(core
        .handle(Event::Control(ControlEvent::Clicked {
            control: Control::ResetView,
        }))
        .is_empty());
}
