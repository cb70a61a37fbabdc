//! Flat JSON mesh format.
//!
//! Parallel attribute arrays (3/3/2/4 floats per vertex) plus an index array.
//! The data is co-indexed by construction, so import is a straight slicing pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AssetError;
use crate::mesh::{Mesh, Vertex};

/// On-disk layout of the flat JSON format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatMesh {
    pub positions: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texcoords: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tangents: Vec<f32>,
    pub indices: Vec<u32>,
}

impl FlatMesh {
    /// Flatten a mesh. An attribute is written only if every vertex has it;
    /// one carried by some vertices but not others cannot be expressed and is an error.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, AssetError> {
        let vertices = &mesh.vertices;
        Ok(FlatMesh {
            positions: vertices.iter().flat_map(|v| v.position).collect(),
            normals: flatten_attribute("normals", vertices, |v| v.normal)?,
            texcoords: flatten_attribute("texcoords", vertices, |v| v.texcoords)?,
            tangents: flatten_attribute("tangents", vertices, |v| v.tangent)?,
            indices: mesh.indices.clone(),
        })
    }

    /// Slice the parallel arrays back into vertices, validating their lengths.
    pub fn into_mesh(self) -> Result<Mesh, AssetError> {
        if self.positions.len() % 3 != 0 {
            return Err(AssetError::InvalidMesh(format!(
                "positions length {} is not a multiple of 3",
                self.positions.len()
            )));
        }
        let count = self.positions.len() / 3;
        check_len("normals", &self.normals, count, 3)?;
        check_len("texcoords", &self.texcoords, count, 2)?;
        check_len("tangents", &self.tangents, count, 4)?;

        let vertices = (0..count)
            .map(|i| Vertex {
                position: [
                    self.positions[i * 3],
                    self.positions[i * 3 + 1],
                    self.positions[i * 3 + 2],
                ],
                normal: (!self.normals.is_empty()).then(|| {
                    [self.normals[i * 3], self.normals[i * 3 + 1], self.normals[i * 3 + 2]]
                }),
                texcoords: (!self.texcoords.is_empty())
                    .then(|| [self.texcoords[i * 2], self.texcoords[i * 2 + 1]]),
                tangent: (!self.tangents.is_empty()).then(|| {
                    [
                        self.tangents[i * 4],
                        self.tangents[i * 4 + 1],
                        self.tangents[i * 4 + 2],
                        self.tangents[i * 4 + 3],
                    ]
                }),
            })
            .collect();

        let mesh = Mesh {
            vertices,
            indices: self.indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }
}

fn flatten_attribute<const N: usize>(
    name: &str,
    vertices: &[Vertex],
    get: impl Fn(&Vertex) -> Option<[f32; N]>,
) -> Result<Vec<f32>, AssetError> {
    let present = vertices.iter().filter(|&v| get(v).is_some()).count();
    if present == 0 {
        return Ok(Vec::new());
    }
    if present != vertices.len() {
        return Err(AssetError::InvalidMesh(format!(
            "{name} present on {present} of {} vertices",
            vertices.len()
        )));
    }
    Ok(vertices.iter().filter_map(&get).flatten().collect())
}

/// An empty optional array means the attribute is absent.
fn check_len(name: &str, values: &[f32], count: usize, width: usize) -> Result<(), AssetError> {
    if values.is_empty() || values.len() == count * width {
        return Ok(());
    }
    Err(AssetError::InvalidMesh(format!(
        "{name} has {} values, expected {} for {count} vertices",
        values.len(),
        count * width
    )))
}

/// Parse flat JSON source text.
pub fn parse_json(source: &str) -> Result<Mesh, AssetError> {
    let flat: FlatMesh = serde_json::from_str(source)?;
    let mesh = flat.into_mesh()?;
    debug!(
        "JSON: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Serialize a mesh to the flat JSON format.
///
/// Fails with [`AssetError::InvalidMesh`] when an attribute is only partially present.
pub fn to_json(mesh: &Mesh) -> Result<String, AssetError> {
    Ok(serde_json::to_string(&FlatMesh::from_mesh(mesh)?)?)
}
