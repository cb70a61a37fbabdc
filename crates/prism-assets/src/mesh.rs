use bytemuck::{Pod, Zeroable};

use crate::error::AssetError;

/// A single mesh vertex as produced by an importer.
///
/// Only the position is mandatory; attributes missing from the source file stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub texcoords: Option<[f32; 2]>,
    pub tangent: Option<[f32; 4]>,
}

impl Vertex {
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Canonical indexed triangle mesh shared by every importer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex buffer, in insertion order
    pub vertices: Vec<Vertex>,
    /// Triangle list; every entry is `< vertices.len()`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Check the triangle-list invariants.
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.indices.len() % 3 != 0 {
            return Err(AssetError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let count = self.vertices.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(AssetError::InvalidMesh(format!(
                "index {bad} out of range for {count} vertices"
            )));
        }
        Ok(())
    }

    pub fn has_normals(&self) -> bool {
        !self.vertices.is_empty() && self.vertices.iter().all(|v| v.normal.is_some())
    }

    pub fn has_texcoords(&self) -> bool {
        !self.vertices.is_empty() && self.vertices.iter().all(|v| v.texcoords.is_some())
    }

    /// Interleave the vertex buffer for upload. Missing attributes are zero-filled.
    pub fn interleaved(&self) -> Vec<PackedVertex> {
        self.vertices.iter().map(PackedVertex::from).collect()
    }
}

/// GPU-facing interleaved vertex layout
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoords: [f32; 2],
    pub tangent: [f32; 4],
}

impl From<&Vertex> for PackedVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal.unwrap_or_default(),
            texcoords: v.texcoords.unwrap_or_default(),
            tangent: v.tangent.unwrap_or_default(),
        }
    }
}

/// A loaded mesh asset (renderer-agnostic). glTF files may contribute several
/// primitives; the text formats always produce exactly one.
#[derive(Debug, Clone)]
pub struct MeshAsset {
    pub name: String,
    pub primitives: Vec<Mesh>,
}

impl MeshAsset {
    pub fn single(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            primitives: vec![mesh],
        }
    }
}
