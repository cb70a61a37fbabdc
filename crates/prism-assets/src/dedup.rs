//! Fan triangulation and attribute-triplet vertex deduplication.
//!
//! Formats that index positions, texcoords and normals independently per face
//! corner funnel through [`MeshBuilder`], which emits one output vertex per
//! distinct index triplet.

use std::collections::HashMap;

use crate::mesh::{Mesh, Vertex};

/// Split a convex polygon into `n - 2` triangles sharing its first corner.
///
/// Polygons with fewer than three corners yield nothing.
pub fn fan_triangulate<T: Copy>(corners: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    (2..corners.len()).map(move |i| [corners[0], corners[i - 1], corners[i]])
}

/// 0-based attribute indices of a single face corner.
///
/// Absent attributes are `None`, which keeps `(p, None, None)` distinct from
/// `(p, Some(0), Some(0))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub position: u32,
    pub texcoord: Option<u32>,
    pub normal: Option<u32>,
}

impl VertexKey {
    pub fn new(position: u32, texcoord: Option<u32>, normal: Option<u32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// Accumulates faces into a deduplicated, indexed triangle mesh.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    cache: HashMap<VertexKey, u32>,
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output index for `key`, assembling and appending a vertex on first sight.
    pub fn vertex_index<F>(&mut self, key: VertexKey, assemble: F) -> u32
    where
        F: FnOnce(VertexKey) -> Vertex,
    {
        if let Some(&index) = self.cache.get(&key) {
            return index;
        }
        let index = self.mesh.vertices.len() as u32;
        self.mesh.vertices.push(assemble(key));
        self.cache.insert(key, index);
        index
    }

    /// Add a polygon face. Corners are resolved in listed order, then the face
    /// is fan-triangulated. Returns the number of triangles emitted.
    pub fn push_face<F>(&mut self, corners: &[VertexKey], mut assemble: F) -> usize
    where
        F: FnMut(VertexKey) -> Vertex,
    {
        let resolved: Vec<u32> = corners
            .iter()
            .map(|&key| self.vertex_index(key, &mut assemble))
            .collect();

        let mut emitted = 0;
        for triangle in fan_triangulate(&resolved) {
            self.mesh.indices.extend_from_slice(&triangle);
            emitted += 1;
        }
        emitted
    }

    /// Number of distinct vertices emitted so far
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    pub fn finish(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(p: u32) -> VertexKey {
        VertexKey::new(p, None, None)
    }

    fn assemble(key: VertexKey) -> Vertex {
        Vertex::new([key.position as f32, 0.0, 0.0])
    }

    #[test]
    fn fan_produces_n_minus_two_triangles_from_first_corner() {
        for n in 3..10u32 {
            let corners: Vec<u32> = (0..n).collect();
            let triangles: Vec<_> = fan_triangulate(&corners).collect();
            assert_eq!(triangles.len(), n as usize - 2);
            for (i, t) in triangles.iter().enumerate() {
                assert_eq!(t[0], 0);
                assert_eq!(t[1], i as u32 + 1);
                assert_eq!(t[2], i as u32 + 2);
            }
        }
    }

    #[test]
    fn fan_of_degenerate_polygon_is_empty() {
        assert_eq!(fan_triangulate(&[0u32, 1]).count(), 0);
        assert_eq!(fan_triangulate::<u32>(&[]).count(), 0);
    }

    #[test]
    fn repeated_triplet_reuses_vertex() {
        let mut builder = MeshBuilder::new();
        builder.push_face(&[key(0), key(1), key(2)], assemble);
        builder.push_face(&[key(0), key(2), key(3)], assemble);
        let mesh = builder.finish();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn differing_triplets_get_distinct_vertices() {
        let mut builder = MeshBuilder::new();
        let a = VertexKey::new(0, None, None);
        let b = VertexKey::new(0, Some(0), None);
        let c = VertexKey::new(0, Some(0), Some(0));
        let d = VertexKey::new(0, None, Some(0));
        builder.push_face(&[a, b, c, d], assemble);
        let mesh = builder.finish();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn index_count_matches_triangulated_corner_count() {
        let mut builder = MeshBuilder::new();
        let pentagon: Vec<_> = (0..5).map(key).collect();
        assert_eq!(builder.push_face(&pentagon, assemble), 3);
        assert_eq!(builder.vertex_count(), 5);
        let mesh = builder.finish();
        assert_eq!(mesh.indices.len(), 9);
        assert!(mesh.validate().is_ok());
    }
}
