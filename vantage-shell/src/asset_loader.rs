//! Asset loader for GLB/glTF files
//!
//! Uses the gltf crate to load a model file, walk its default scene, and
//! flatten node transforms into the vertex data. The resulting bounds are
//! what the core fits the camera against, so they must cover every
//! primitive the renderer will draw.

use glam::{Mat3, Mat4, Vec3};
use thiserror::Error;
use vantage::Aabb;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("no renderable geometry in {0}")]
    NoGeometry(String),
}

/// One glTF primitive, flattened into model space and ready for GPU upload
#[derive(Debug)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

/// Everything the shell needs from a loaded model file
#[derive(Debug)]
pub struct LoadedModel {
    pub meshes: Vec<MeshData>,
    pub bounds: Aabb,
}

/// Load a GLB/glTF file from disk. Runs on the loader thread.
pub fn load_model(path: &str) -> Result<LoadedModel, LoadError> {
    log::info!("Loading model from {}", path);

    let (document, buffers, _images) = gltf::import(path)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| LoadError::NoGeometry(path.to_string()))?;

    let mut meshes = Vec::new();
    let mut bounds = None;
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes, &mut bounds);
    }

    let bounds = bounds.ok_or_else(|| LoadError::NoGeometry(path.to_string()))?;

    log::info!(
        "Loaded {} meshes, bounds {:?} to {:?}",
        meshes.len(),
        bounds.min,
        bounds.max
    );

    Ok(LoadedModel { meshes, bounds })
}

fn collect_node(
    node: &gltf::Node,
    parent_transform: Mat4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
    bounds: &mut Option<Aabb>,
) {
    let transform = parent_transform * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(data) = read_primitive(&primitive, transform, buffers) {
                for position in &data.positions {
                    let point = Vec3::from_array(*position);
                    match bounds {
                        Some(aabb) => aabb.extend(point),
                        None => *bounds = Some(Aabb::new(point, point)),
                    }
                }
                meshes.push(data);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, meshes, bounds);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()?
        .map(|p| transform.transform_point3(Vec3::from_array(p)).to_array())
        .collect();
    if positions.is_empty() {
        return None;
    }

    // Normals transform by the inverse-transpose; a singular node matrix
    // falls back to the plain rotation/scale part.
    let linear = Mat3::from_mat4(transform);
    let normal_matrix = if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    };

    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|iter| {
            iter.map(|n| {
                (normal_matrix * Vec3::from_array(n))
                    .normalize_or_zero()
                    .to_array()
            })
            .collect()
        })
        .unwrap_or_else(|| {
            // Default normals pointing up
            vec![[0.0, 1.0, 0.0]; positions.len()]
        });

    let tex_coords: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|t| t.into_f32().collect())
        .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

    // Non-indexed primitives draw their vertices in order
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|i| i.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    Some(MeshData {
        positions,
        normals,
        tex_coords,
        indices,
        base_color,
    })
}
