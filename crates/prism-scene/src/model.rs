use std::sync::Arc;

use prism_assets::{Mesh, MeshAsset};

use crate::material::Material;

/// One drawable piece of a model.
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub mesh: Arc<Mesh>,
    pub material: Material,
}

/// A list of mesh and material pairs drawn together at the node's global transform.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub parts: Vec<ModelPart>,
}

impl Model {
    pub fn new(mesh: impl Into<Arc<Mesh>>, material: Material) -> Self {
        Self {
            parts: vec![ModelPart {
                mesh: mesh.into(),
                material,
            }],
        }
    }

    /// One part per primitive of an imported asset, all sharing `material`.
    pub fn from_asset(asset: &MeshAsset, material: Material) -> Self {
        Self {
            parts: asset
                .primitives
                .iter()
                .map(|mesh| ModelPart {
                    mesh: Arc::new(mesh.clone()),
                    material: material.clone(),
                })
                .collect(),
        }
    }

    pub fn push(&mut self, mesh: impl Into<Arc<Mesh>>, material: Material) {
        self.parts.push(ModelPart {
            mesh: mesh.into(),
            material,
        });
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_assets::{parse_obj, Vertex};
    use prism_core::Color;

    #[test]
    fn counts_span_all_parts() {
        let quad = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        let tri = Mesh {
            vertices: vec![
                Vertex::new([0.0, 0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0]),
            ],
            indices: vec![0, 1, 2],
        };
        let mut model = Model::new(quad, Material::default());
        model.push(tri, Material::from_color(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(model.vertex_count(), 7);
        assert_eq!(model.triangle_count(), 3);
    }

    #[test]
    fn from_asset_keeps_primitive_order() {
        let first = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let second = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        let asset = MeshAsset {
            name: "pair".into(),
            primitives: vec![first, second],
        };
        let model = Model::from_asset(&asset, Material::default());
        assert_eq!(model.parts.len(), 2);
        assert_eq!(model.parts[1].mesh.triangle_count(), 2);
    }
}
