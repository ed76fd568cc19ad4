//! Model fit calculator
//!
//! Pure math for placing a freshly loaded model in the scene: a uniform
//! scale that normalizes the model's longest side to [`TARGET_SIZE`] world
//! units, a translation that centers it horizontally and rests it on the
//! ground, and a camera placement on the (+x, +y, +z) diagonal looking at
//! the origin.

use glam::Vec3;
use thiserror::Error;

use crate::bounds::Aabb;

/// World-unit length every model's longest side is normalized to
pub const TARGET_SIZE: f32 = 20.0;

/// Camera distance as a multiple of the model's scaled longest side
pub const DISTANCE_FACTOR: f32 = 1.25;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("model bounding box has no usable extent (longest side: {max_extent})")]
    InvalidModelExtent { max_extent: f32 },
}

/// Where the camera goes and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub position: Vec3,
    pub target: Vec3,
}

/// Result of fitting a model into the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFit {
    /// Uniform scale applied to the model
    pub scale: f32,
    /// Translation applied after scaling
    pub position: Vec3,
    /// Framing camera placement
    pub camera: CameraPlacement,
}

/// Compute scale, placement, and framing camera for a model with the given
/// model-space bounds.
///
/// Fails with [`FitError::InvalidModelExtent`] when the bounds have no
/// positive finite longest side, which would otherwise divide by zero and
/// poison every transform downstream.
pub fn fit_model(bounds: &Aabb) -> Result<ModelFit, FitError> {
    let max_extent = bounds.max_extent();
    if !max_extent.is_finite() || max_extent <= 0.0 {
        return Err(FitError::InvalidModelExtent { max_extent });
    }

    let scale = TARGET_SIZE / max_extent;

    // Center the model on the y axis, then drop it onto the ground.
    let mut position = -bounds.center() * scale;
    position.y = 0.0;

    let distance = max_extent * DISTANCE_FACTOR * scale;
    Ok(ModelFit {
        scale,
        position,
        camera: camera_at_distance(distance),
    })
}

/// Camera placement that re-frames an already fitted model from its
/// world-space (post-scale) bounds. Used by the reset-view control; the
/// model itself is not moved.
pub fn reset_placement(world_bounds: &Aabb) -> CameraPlacement {
    camera_at_distance(world_bounds.max_extent() * DISTANCE_FACTOR)
}

fn camera_at_distance(distance: f32) -> CameraPlacement {
    CameraPlacement {
        position: Vec3::new(distance, distance / 2.0, distance),
        target: Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_normalizes_longest_side() {
        let bounds = Aabb::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        let fit = fit_model(&bounds).unwrap();
        assert_eq!(fit.scale, TARGET_SIZE / 4.0);
        assert_eq!(bounds.max_extent() * fit.scale, TARGET_SIZE);
    }

    #[test]
    fn test_position_centers_and_grounds() {
        let bounds = Aabb::new(Vec3::new(1.0, 3.0, 5.0), Vec3::new(3.0, 5.0, 7.0));
        let fit = fit_model(&bounds).unwrap();
        // Center (2, 4, 6), scale 10: x and z recenter, y snaps to the ground.
        assert_eq!(fit.position, Vec3::new(-20.0, 0.0, -60.0));
    }

    #[test]
    fn test_camera_sits_on_diagonal() {
        let bounds = Aabb::new(Vec3::splat(-3.0), Vec3::splat(3.0));
        let fit = fit_model(&bounds).unwrap();
        let d = bounds.max_extent() * DISTANCE_FACTOR * fit.scale;
        assert_eq!(fit.camera.position, Vec3::new(d, d / 2.0, d));
        assert_eq!(fit.camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_framing_distance_is_size_independent() {
        // scale * max_extent is always TARGET_SIZE, so the framing distance
        // is the same for a thimble and a cathedral.
        for extent in [0.001_f32, 1.0, 250.0] {
            let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(extent));
            let fit = fit_model(&bounds).unwrap();
            let expected = TARGET_SIZE * DISTANCE_FACTOR;
            assert!((fit.camera.position.x - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_extent_rejected() {
        let bounds = Aabb::new(Vec3::splat(2.0), Vec3::splat(2.0));
        let err = fit_model(&bounds).unwrap_err();
        assert_eq!(err, FitError::InvalidModelExtent { max_extent: 0.0 });
    }

    #[test]
    fn test_nan_extent_rejected() {
        let bounds = Aabb::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE);
        assert!(fit_model(&bounds).is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let bounds = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert!(fit_model(&bounds).is_err());
    }

    #[test]
    fn test_flat_model_is_valid() {
        // A plane has zero thickness but a positive longest side.
        let bounds = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        let fit = fit_model(&bounds).unwrap();
        assert_eq!(fit.scale, 10.0);
    }

    #[test]
    fn test_reset_placement_uses_world_bounds() {
        let world = Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 20.0, 10.0));
        let placement = reset_placement(&world);
        assert_eq!(placement.position, Vec3::new(25.0, 12.5, 25.0));
        assert_eq!(placement.target, Vec3::ZERO);
    }
}
