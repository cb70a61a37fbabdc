use std::path::Path;

use crate::error::AssetError;
use crate::mesh::Mesh;
use crate::{json, obj, ply};

/// Mesh file formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Ply,
    Json,
    Gltf,
}

impl MeshFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("obj") => Ok(MeshFormat::Obj),
            Some("ply") => Ok(MeshFormat::Ply),
            Some("json") => Ok(MeshFormat::Json),
            Some("gltf") | Some("glb") => Ok(MeshFormat::Gltf),
            _ => Err(AssetError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Whether the format is parsed from UTF-8 text.
    pub fn is_text(&self) -> bool {
        !matches!(self, MeshFormat::Gltf)
    }
}

/// Parse text source in one of the text formats.
pub fn parse_mesh(format: MeshFormat, source: &str) -> Result<Mesh, AssetError> {
    match format {
        MeshFormat::Obj => obj::parse_obj(source),
        MeshFormat::Ply => ply::parse_ply(source),
        MeshFormat::Json => json::parse_json(source),
        MeshFormat::Gltf => Err(AssetError::InvalidMesh(
            "glTF is a binary container and cannot be parsed from text".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats_by_extension() {
        assert_eq!(MeshFormat::from_path(Path::new("a/b.OBJ")).unwrap(), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("x.ply")).unwrap(), MeshFormat::Ply);
        assert_eq!(MeshFormat::from_path(Path::new("x.json")).unwrap(), MeshFormat::Json);
        assert_eq!(MeshFormat::from_path(Path::new("x.glb")).unwrap(), MeshFormat::Gltf);
        assert!(matches!(
            MeshFormat::from_path(Path::new("x.fbx")),
            Err(AssetError::UnsupportedFormat(_))
        ));
        assert!(MeshFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn text_formats_share_the_canonical_shape() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let json = r#"{"positions":[0,0,0,1,0,0,0,1,0],"indices":[0,1,2]}"#;
        let a = parse_mesh(MeshFormat::Obj, obj).unwrap();
        let b = parse_mesh(MeshFormat::Json, json).unwrap();
        assert_eq!(a, b);
    }
}
