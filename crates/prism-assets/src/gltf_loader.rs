use std::path::Path;

use tracing::{debug, warn};

use crate::error::AssetError;
use crate::mesh::{Mesh, MeshAsset, Vertex};
use crate::texture::{TextureAsset, TextureFormat};

/// Every mesh and image found in one glTF document.
pub struct GltfContents {
    pub meshes: Vec<MeshAsset>,
    pub textures: Vec<TextureAsset>,
}

/// Load a glTF 2.0 file (.gltf or .glb) and convert every triangle-list
/// primitive into a canonical [`Mesh`].
pub fn load_gltf(path: &Path) -> Result<GltfContents, AssetError> {
    let (document, buffers, images) = gltf::import(path)
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?;

    let mut meshes = Vec::new();
    let mut textures = Vec::new();

    for mesh in document.meshes() {
        let name = mesh.name().unwrap_or("unnamed").to_string();
        let mut primitives = Vec::new();

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "Skipping non-triangle primitive ({:?}) in mesh '{}'",
                    primitive.mode(),
                    name
                );
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .ok_or_else(|| {
                    AssetError::GltfLoadFailed(
                        path.to_path_buf(),
                        format!("primitive in mesh '{name}' has no positions"),
                    )
                })?;
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
            let tex_coords: Option<Vec<[f32; 2]>> =
                reader.read_tex_coords(0).map(|tc| tc.into_f32().collect());
            let tangents: Option<Vec<[f32; 4]>> = reader.read_tangents().map(|iter| iter.collect());
            let indices: Vec<u32> = match reader.read_indices() {
                Some(idx) => idx.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let vertices = positions
                .iter()
                .enumerate()
                .map(|(i, &position)| Vertex {
                    position,
                    normal: normals.as_ref().and_then(|n| n.get(i).copied()),
                    texcoords: tex_coords.as_ref().and_then(|t| t.get(i).copied()),
                    tangent: tangents.as_ref().and_then(|t| t.get(i).copied()),
                })
                .collect();

            let mesh = Mesh { vertices, indices };
            mesh.validate()?;
            primitives.push(mesh);
        }

        debug!("Loaded mesh '{}' with {} primitives", name, primitives.len());
        meshes.push(MeshAsset { name, primitives });
    }

    // Images come back already decoded, whether embedded or external.
    for image_data in &images {
        let (width, height) = (image_data.width, image_data.height);
        let data = match image_data.format {
            gltf::image::Format::R8G8B8A8 => image_data.pixels.clone(),
            gltf::image::Format::R8G8B8 => {
                // pad to RGBA8
                let mut rgba = Vec::with_capacity(image_data.pixels.len() / 3 * 4);
                for chunk in image_data.pixels.chunks(3) {
                    rgba.extend_from_slice(chunk);
                    rgba.push(255);
                }
                rgba
            }
            other => {
                debug!("Skipping unsupported image format {:?} in glTF", other);
                continue;
            }
        };

        textures.push(TextureAsset {
            width,
            height,
            data,
            format: TextureFormat::Rgba8,
        });
    }

    debug!(
        "glTF '{}': {} meshes, {} textures",
        path.display(),
        meshes.len(),
        textures.len()
    );

    Ok(GltfContents { meshes, textures })
}
