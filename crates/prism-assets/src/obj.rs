//! Wavefront OBJ text importer.
//!
//! Understands `v`, `vt`, `vn` and `f` statements. Face tokens are
//! `p`, `p/t`, `p//n` or `p/t/n` with 1-based (or negative, relative) indices.

use tracing::{debug, trace};

use crate::dedup::{MeshBuilder, VertexKey};
use crate::error::AssetError;
use crate::mesh::{Mesh, Vertex};

const FORMAT: &str = "OBJ";

#[derive(Default)]
struct Attributes {
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
}

impl Attributes {
    fn assemble(&self, key: VertexKey) -> Vertex {
        Vertex {
            position: self.positions[key.position as usize],
            normal: key.normal.map(|i| self.normals[i as usize]),
            texcoords: key.texcoord.map(|i| self.texcoords[i as usize]),
            tangent: None,
        }
    }
}

/// Parse OBJ source text into a deduplicated triangle mesh.
pub fn parse_obj(source: &str) -> Result<Mesh, AssetError> {
    let mut attributes = Attributes::default();
    let mut builder = MeshBuilder::new();
    let mut corners = Vec::new();
    let mut faces = 0usize;

    for (line_index, raw) in source.lines().enumerate() {
        let line_no = line_index + 1;
        let line = match raw.split_once('#') {
            Some((content, _)) => content,
            None => raw,
        };
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                attributes.positions.push([x, y, z]);
            }
            "vt" => {
                let [s, t] = parse_floats::<2>(&mut tokens, line_no)?;
                attributes.texcoords.push([s, t]);
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                attributes.normals.push([x, y, z]);
            }
            "f" => {
                corners.clear();
                for token in tokens {
                    corners.push(parse_corner(token, &attributes, line_no)?);
                }
                if corners.len() < 3 {
                    return Err(AssetError::parse(
                        FORMAT,
                        line_no,
                        format!("face has {} corners, need at least 3", corners.len()),
                    ));
                }
                builder.push_face(&corners, |key| attributes.assemble(key));
                faces += 1;
            }
            other => trace!("Ignoring OBJ statement '{}' on line {}", other, line_no),
        }
    }

    let mesh = builder.finish();
    debug!(
        "OBJ: {} faces -> {} vertices, {} triangles",
        faces,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse the first `N` numbers of a statement; extra components are ignored.
fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = tokens.next().ok_or_else(|| {
            AssetError::parse(FORMAT, line_no, format!("expected {} numeric components", N))
        })?;
        *slot = token.parse().map_err(|_| {
            AssetError::parse(FORMAT, line_no, format!("'{token}' is not a number"))
        })?;
    }
    Ok(out)
}

fn parse_corner(token: &str, attributes: &Attributes, line_no: usize) -> Result<VertexKey, AssetError> {
    let mut parts = token.split('/');
    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, attributes.positions.len(), "positions", line_no)?,
        _ => {
            return Err(AssetError::parse(
                FORMAT,
                line_no,
                format!("face corner '{token}' has no position index"),
            ))
        }
    };
    let texcoord = match parts.next() {
        Some(t) if !t.is_empty() => {
            Some(resolve_index(t, attributes.texcoords.len(), "texcoords", line_no)?)
        }
        _ => None,
    };
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, attributes.normals.len(), "normals", line_no)?),
        _ => None,
    };
    Ok(VertexKey::new(position, texcoord, normal))
}

/// Convert a 1-based (or negative, relative-to-end) OBJ index to 0-based.
fn resolve_index(
    token: &str,
    count: usize,
    attribute: &'static str,
    line_no: usize,
) -> Result<u32, AssetError> {
    let raw: i64 = token
        .parse()
        .map_err(|_| AssetError::parse(FORMAT, line_no, format!("'{token}' is not an index")))?;
    let resolved = if raw > 0 { raw - 1 } else { count as i64 + raw };
    if raw == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(AssetError::IndexOutOfRange {
            format: FORMAT,
            attribute,
            index: raw,
            count,
        });
    }
    Ok(resolved as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn quad_without_attributes() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.vertices.iter().all(|v| v.normal.is_none() && v.texcoords.is_none()));
    }

    #[test]
    fn shared_corners_are_deduplicated() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 1
vn 0 0 1
f 1/1/1 2/1/1 3/2/1
f 1/1/1 3/2/1 4/2/1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[2].texcoords, Some([1.0, 1.0]));
        assert_eq!(mesh.vertices[3].normal, Some([0.0, 0.0, 1.0]));
    }

    #[test]
    fn same_position_with_different_texcoords_splits() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 0.5 0.5
f 1/1 2/1 3/1
f 1/2 3/1 2/1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn position_and_normal_without_texcoord() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";
        let mesh = parse_obj(src).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.texcoords.is_none()));
        assert!(mesh.has_normals());
    }

    #[test]
    fn negative_indices_are_relative() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn comments_and_unknown_statements_are_ignored() {
        let src = "\
# a comment
o quad
mtllib quad.mtl
v 0 0 0 # trailing
v 1 0 0
v 0 1 0
usemtl red
s off
f 1 2 3
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn non_numeric_vertex_is_fatal() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
    }

    #[test]
    fn out_of_range_index_is_fatal() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert!(matches!(err, AssetError::IndexOutOfRange { index: 4, .. }));
        assert!(parse_obj("v 0 0 0\nf 0 1 1\n").is_err());
    }

    #[test]
    fn face_with_two_corners_is_fatal() {
        assert!(parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
    }
}
