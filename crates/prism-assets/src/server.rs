use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::AssetError;
use crate::format::{parse_mesh, MeshFormat};
use crate::gltf_loader::{self, GltfContents};
use crate::handle::{AssetHandle, AssetId};
use crate::mesh::MeshAsset;
use crate::texture::{self, TextureAsset};

/// Handles for everything imported from one file
#[derive(Debug, Clone, Default)]
pub struct DocumentHandles {
    pub meshes: Vec<AssetHandle<MeshAsset>>,
    pub textures: Vec<AssetHandle<TextureAsset>>,
}

/// Loaded assets of one type plus the path index used for caching.
struct Store<T> {
    loaded: HashMap<AssetId, T>,
    by_path: HashMap<PathBuf, AssetHandle<T>>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            loaded: HashMap::new(),
            by_path: HashMap::new(),
        }
    }
}

impl<T> Store<T> {
    fn cached(&self, path: &Path) -> Option<AssetHandle<T>> {
        self.by_path.get(path).copied()
    }

    fn insert(&mut self, handle: AssetHandle<T>, asset: T) {
        self.loaded.insert(handle.id(), asset);
    }

    fn get(&self, handle: AssetHandle<T>) -> Option<&T> {
        self.loaded.get(&handle.id())
    }
}

/// Owns every mesh and texture loaded from disk and hands out typed handles.
///
/// Relative paths resolve against `base_path`. Loads are asynchronous but not
/// concurrent: each call is awaited before its handle is used, and a failed
/// load leaves the cache untouched.
pub struct AssetServer {
    base_path: PathBuf,
    next_id: AssetId,
    meshes: Store<MeshAsset>,
    textures: Store<TextureAsset>,
}

impl AssetServer {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path: PathBuf = base_path.into();
        info!("Asset root: {}", base_path.display());
        Self {
            base_path,
            next_id: 1,
            meshes: Store::default(),
            textures: Store::default(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match path.is_absolute() {
            true => path.to_path_buf(),
            false => self.base_path.join(path),
        }
    }

    fn allocate<T>(&mut self) -> AssetHandle<T> {
        let id = self.next_id;
        self.next_id += 1;
        AssetHandle::new(id)
    }

    /// Import the first mesh stored at `path` (OBJ, PLY, JSON or glTF).
    /// Images embedded in a glTF document are registered as textures.
    ///
    /// Repeated calls with the same resolved path hand back the first handle.
    pub async fn load_mesh(&mut self, path: &Path) -> Result<AssetHandle<MeshAsset>, AssetError> {
        let full = self.resolve(path);
        if let Some(handle) = self.meshes.cached(&full) {
            return Ok(handle);
        }

        let mut contents = read_document(&full).await?;
        if contents.meshes.is_empty() {
            return Err(AssetError::GltfLoadFailed(full, "no meshes found".into()));
        }
        contents.meshes.truncate(1);

        let handles = self.register(contents);
        let handle = handles.meshes[0];
        self.meshes.by_path.insert(full, handle);
        Ok(handle)
    }

    /// Import every mesh stored at `path`, bypassing the path cache.
    /// Text formats always yield exactly one.
    pub async fn load_meshes(
        &mut self,
        path: &Path,
    ) -> Result<Vec<AssetHandle<MeshAsset>>, AssetError> {
        Ok(self.load_document(path).await?.meshes)
    }

    /// Import every mesh and embedded image stored at `path`, bypassing the path cache.
    pub async fn load_document(&mut self, path: &Path) -> Result<DocumentHandles, AssetError> {
        let full = self.resolve(path);
        let contents = read_document(&full).await?;
        Ok(self.register(contents))
    }

    fn register(&mut self, contents: GltfContents) -> DocumentHandles {
        let mut handles = DocumentHandles::default();
        for mesh in contents.meshes {
            let handle = self.allocate();
            self.meshes.insert(handle, mesh);
            handles.meshes.push(handle);
        }
        for texture in contents.textures {
            let handle = self.allocate();
            self.textures.insert(handle, texture);
            handles.textures.push(handle);
        }
        handles
    }

    /// Decode an image (PNG, JPEG, ...) into RGBA8. Cached by path like meshes.
    pub async fn load_texture(
        &mut self,
        path: &Path,
    ) -> Result<AssetHandle<TextureAsset>, AssetError> {
        let full = self.resolve(path);
        if let Some(handle) = self.textures.cached(&full) {
            return Ok(handle);
        }

        let bytes = tokio::fs::read(&full)
            .await
            .map_err(|e| io_error(&full, e))?;
        let decoded = texture::decode_texture(&bytes, &full)?;

        let handle = self.allocate();
        self.textures.insert(handle, decoded);
        self.textures.by_path.insert(full, handle);
        Ok(handle)
    }

    pub fn get_mesh(&self, handle: AssetHandle<MeshAsset>) -> Option<&MeshAsset> {
        self.meshes.get(handle)
    }

    pub fn get_texture(&self, handle: AssetHandle<TextureAsset>) -> Option<&TextureAsset> {
        self.textures.get(handle)
    }

    pub fn is_mesh_loaded(&self, handle: AssetHandle<MeshAsset>) -> bool {
        self.meshes.get(handle).is_some()
    }

    pub fn is_texture_loaded(&self, handle: AssetHandle<TextureAsset>) -> bool {
        self.textures.get(handle).is_some()
    }

    /// Every loaded texture, file-backed or embedded, in no particular order.
    pub fn textures(&self) -> impl Iterator<Item = (AssetHandle<TextureAsset>, &TextureAsset)> {
        self.textures
            .loaded
            .iter()
            .map(|(&id, texture)| (AssetHandle::new(id), texture))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn io_error(path: &Path, err: io::Error) -> AssetError {
    if err.kind() == io::ErrorKind::NotFound {
        AssetError::NotFound(path.to_path_buf())
    } else {
        AssetError::Io(path.to_path_buf(), err)
    }
}

/// Read and import everything stored in `path`. Text formats carry no images.
pub(crate) async fn read_document(path: &Path) -> Result<GltfContents, AssetError> {
    let format = MeshFormat::from_path(path)?;

    if format.is_text() {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| io_error(path, e))?;
        let mesh = parse_mesh(format, &source)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");
        return Ok(GltfContents {
            meshes: vec![MeshAsset::single(name, mesh)],
            textures: Vec::new(),
        });
    }

    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || gltf_loader::load_gltf(&owned))
        .await
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("prism-assets-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn missing_file_returns_error() {
        let mut server = AssetServer::new("/nonexistent");
        let result = server.load_mesh(Path::new("does_not_exist.obj")).await;
        let err = result.unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn missing_gltf_returns_not_found() {
        let mut server = AssetServer::new("/nonexistent");
        let result = server.load_mesh(Path::new("does_not_exist.glb")).await;
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_texture_returns_error() {
        let mut server = AssetServer::new("/nonexistent");
        let result = server.load_texture(Path::new("does_not_exist.png")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unknown_extension_is_unsupported() {
        let mut server = AssetServer::new("/nonexistent");
        let result = server.load_mesh(Path::new("model.fbx")).await;
        assert!(matches!(result, Err(AssetError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn loads_and_caches_obj() {
        let dir = scratch_dir("obj");
        std::fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut server = AssetServer::new(&dir);
        let first = server.load_mesh(Path::new("tri.obj")).await.unwrap();
        let second = server.load_mesh(Path::new("tri.obj")).await.unwrap();
        assert_eq!(first, second);
        assert!(server.is_mesh_loaded(first));

        let asset = server.get_mesh(first).unwrap();
        assert_eq!(asset.name, "tri");
        assert_eq!(asset.primitives[0].indices, vec![0, 1, 2]);

        let all = server.load_meshes(Path::new("tri.obj")).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_ne!(all[0], first);
    }

    #[tokio::test]
    async fn parse_failure_is_not_cached() {
        let dir = scratch_dir("bad");
        std::fs::write(dir.join("bad.ply"), "ply\nformat ascii 1.0\n").unwrap();

        let mut server = AssetServer::new(&dir);
        let result = server.load_mesh(Path::new("bad.ply")).await;
        assert!(matches!(result, Err(AssetError::MissingEndHeader)));
        assert!(server.meshes.by_path.is_empty());
        assert!(server.meshes.loaded.is_empty());
    }

    #[test]
    fn paths_resolve_against_base() {
        let server = AssetServer::new("/srv/prism");
        assert_eq!(server.resolve(Path::new("/tmp/cube.ply")), Path::new("/tmp/cube.ply"));
        assert_eq!(
            server.resolve(Path::new("meshes/cube.ply")),
            Path::new("/srv/prism/meshes/cube.ply")
        );
    }

    /// One three-vertex position buffer, drawn once as triangles and once as lines,
    /// plus a 2x1 RGBA PNG. Both payloads are inline `data:` URIs.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
        "accessors": [{
            "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
            "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
        }],
        "meshes": [{
            "name": "tri",
            "primitives": [
                { "attributes": { "POSITION": 0 } },
                { "attributes": { "POSITION": 0 }, "mode": 1 }
            ]
        }],
        "images": [{
            "uri": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAIAAAABCAYAAAD0In+KAAAAD0lEQVR4nGP4z8DwHwgbABB5A359Y87XAAAAAElFTkSuQmCC"
        }]
    }"#;

    #[tokio::test]
    async fn gltf_document_loads_meshes_and_images() {
        let dir = scratch_dir("gltf");
        std::fs::write(dir.join("tri.gltf"), TRIANGLE_GLTF).unwrap();

        let mut server = AssetServer::new(&dir);
        let handles = server.load_document(Path::new("tri.gltf")).await.unwrap();
        assert_eq!(handles.meshes.len(), 1);
        assert_eq!(handles.textures.len(), 1);

        let asset = server.get_mesh(handles.meshes[0]).unwrap();
        assert_eq!(asset.name, "tri");
        // the line primitive is skipped
        assert_eq!(asset.primitives.len(), 1);
        let mesh = &asset.primitives[0];
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, None);

        let texture = server.get_texture(handles.textures[0]).unwrap();
        assert_eq!((texture.width, texture.height), (2, 1));
        assert_eq!(texture.data, vec![255, 0, 0, 255, 0, 255, 0, 128]);
        assert_eq!(server.textures().count(), 1);

        let meshes = server.load_meshes(Path::new("tri.gltf")).await.unwrap();
        assert_eq!(meshes.len(), 1);
        assert_ne!(meshes[0], handles.meshes[0]);
    }

    #[tokio::test]
    async fn gltf_first_mesh_is_cached() {
        let dir = scratch_dir("gltf-cache");
        std::fs::write(dir.join("tri.gltf"), TRIANGLE_GLTF).unwrap();

        let mut server = AssetServer::new(&dir);
        let first = server.load_mesh(Path::new("tri.gltf")).await.unwrap();
        let second = server.load_mesh(Path::new("tri.gltf")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(server.get_mesh(first).unwrap().primitives[0].triangle_count(), 1);
    }
}
