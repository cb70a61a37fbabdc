//! ASCII PLY importer.
//!
//! Supports the minimal layout written by common exporters: a vertex element
//! whose records carry position, normal and texcoord (8 numbers), followed by
//! a face element of triangles. Vertex records are already co-indexed, so no
//! deduplication pass is needed.

use tracing::debug;

use crate::error::AssetError;
use crate::mesh::{Mesh, Vertex};

const FORMAT: &str = "PLY";
const VERTEX_FIELDS: usize = 8;

#[derive(Debug, Default)]
struct Header {
    vertex_count: usize,
    face_count: usize,
}

/// Parse ASCII PLY source text.
pub fn parse_ply(source: &str) -> Result<Mesh, AssetError> {
    let mut lines = source.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    match lines.next() {
        Some((_, "ply")) => {}
        _ => return Err(AssetError::parse(FORMAT, 1, "missing 'ply' magic")),
    }

    let header = parse_header(&mut lines)?;
    let body: Vec<(usize, &str)> = lines.filter(|(_, line)| !line.is_empty()).collect();
    let last_line = source.lines().count();

    // Header counts are untrusted; never reserve more records than the body holds.
    let index_capacity = header
        .face_count
        .min(body.len())
        .checked_mul(3)
        .ok_or_else(|| AssetError::parse(FORMAT, last_line, "face count overflows"))?;
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(header.vertex_count.min(body.len())),
        indices: Vec::with_capacity(index_capacity),
    };
    let mut body = body.into_iter();

    for _ in 0..header.vertex_count {
        let (line_no, line) = body.next().ok_or_else(|| {
            AssetError::parse(FORMAT, last_line, "unexpected end of file in vertex list")
        })?;
        let fields = parse_numbers::<f32>(line, line_no)?;
        if fields.len() != VERTEX_FIELDS {
            return Err(AssetError::parse(
                FORMAT,
                line_no,
                format!("vertex has {} fields, expected {}", fields.len(), VERTEX_FIELDS),
            ));
        }
        mesh.vertices.push(Vertex {
            position: [fields[0], fields[1], fields[2]],
            normal: Some([fields[3], fields[4], fields[5]]),
            texcoords: Some([fields[6], fields[7]]),
            tangent: None,
        });
    }

    for _ in 0..header.face_count {
        let (line_no, line) = body.next().ok_or_else(|| {
            AssetError::parse(FORMAT, last_line, "unexpected end of file in face list")
        })?;
        let fields = parse_numbers::<u32>(line, line_no)?;
        let Some((&count, corners)) = fields.split_first() else {
            return Err(AssetError::parse(FORMAT, line_no, "empty face record"));
        };
        if count != 3 || corners.len() != 3 {
            return Err(AssetError::parse(
                FORMAT,
                line_no,
                format!("only triangles are supported, got a {count}-corner face"),
            ));
        }
        for &index in corners {
            if index as usize >= header.vertex_count {
                return Err(AssetError::IndexOutOfRange {
                    format: FORMAT,
                    attribute: "vertices",
                    index: index as i64,
                    count: header.vertex_count,
                });
            }
            mesh.indices.push(index);
        }
    }

    debug!(
        "PLY: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn parse_header<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Header, AssetError> {
    let mut header = Header::default();

    for (line_no, line) in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["end_header"] => return Ok(header),
            ["format", encoding, ..] => {
                if *encoding != "ascii" {
                    return Err(AssetError::parse(
                        FORMAT,
                        line_no,
                        format!("'{encoding}' encoding is not supported"),
                    ));
                }
            }
            ["element", name, count] => {
                let count: usize = count.parse().map_err(|_| {
                    AssetError::parse(FORMAT, line_no, format!("bad element count '{count}'"))
                })?;
                match *name {
                    "vertex" => header.vertex_count = count,
                    "face" => header.face_count = count,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Err(AssetError::MissingEndHeader)
}

fn parse_numbers<T: std::str::FromStr>(line: &str, line_no: usize) -> Result<Vec<T>, AssetError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                AssetError::parse(FORMAT, line_no, format!("'{token}' is not a number"))
            })
        })
        .collect()
}
