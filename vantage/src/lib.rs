//! Viewer core for vantage
//!
//! The core is the platform-agnostic half of the viewer. It receives
//! [`Event`]s from a shell, keeps the model-fit and zoom-hold state, and
//! answers with [`Command`]s. It never touches a window, a GPU, or a file;
//! all of that lives in the shell.
//!
//! [`Event`]: vantage_protocol::Event
//! [`Command`]: vantage_protocol::Command

mod bounds;
mod fit;
mod viewer;

pub use bounds::Aabb;
pub use fit::{CameraPlacement, FitError, ModelFit, fit_model, reset_placement};
pub use fit::{DISTANCE_FACTOR, TARGET_SIZE};
pub use viewer::{ViewerCore, ZoomHold, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
pub use viewer::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, INITIAL_CAMERA_POSITION, SKY_COLOR,
};

pub use vantage_protocol as protocol;
