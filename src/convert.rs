//! `prism convert`: flatten OBJ and PLY meshes into the JSON mesh format

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use prism_assets::{parse_mesh, to_json, MeshFormat};
use tracing::info;

/// Convert already-read source text in `format` to flat JSON.
pub fn convert_source(format: MeshFormat, source: &str) -> Result<String> {
    if !matches!(format, MeshFormat::Obj | MeshFormat::Ply) {
        bail!("only .obj and .ply inputs can be converted, got {:?}", format);
    }
    let mesh = parse_mesh(format, source)?;
    Ok(to_json(&mesh)?)
}

pub fn run(input: &Path, output: &Path) -> Result<()> {
    let format = MeshFormat::from_path(input)?;
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let json = convert_source(format, &source)
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    fs::write(output, &json).with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Converted {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        json.len()
    );
    Ok(())
}
