//! Prism Assets - Mesh import and asset management
//!
//! Every importer (OBJ, ASCII PLY, flat JSON, glTF) produces the same
//! canonical indexed [`Mesh`]. Formats that index attributes independently per
//! face corner go through the shared fan-triangulation and deduplication pass
//! in [`dedup`].

pub mod dedup;
mod error;
mod format;
mod gltf_loader;
mod handle;
pub mod json;
mod mesh;
pub mod obj;
pub mod ply;
mod server;
mod texture;

pub use dedup::{fan_triangulate, MeshBuilder, VertexKey};
pub use error::AssetError;
pub use format::{parse_mesh, MeshFormat};
pub use gltf_loader::{load_gltf, GltfContents};
pub use handle::{AssetHandle, AssetId};
pub use json::{parse_json, to_json, FlatMesh};
pub use mesh::{Mesh, MeshAsset, PackedVertex, Vertex};
pub use obj::parse_obj;
pub use ply::parse_ply;
pub use server::{AssetServer, DocumentHandles};
pub use texture::{decode_texture, TextureAsset, TextureFormat};
