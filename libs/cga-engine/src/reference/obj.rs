//! Minimal Wavefront OBJ reader and writer.
//!
//! Only `v` and `f` records matter; everything else (normals, texture
//! coordinates, groups, materials) is skipped.

use std::fmt::Write;

use crate::error::{EngineError, EngineResult, Status};
use crate::shape::ShapeGeometry;

/// Parses OBJ text into polygonal geometry.
///
/// Face references may use the `v/vt/vn` forms and negative (relative)
/// indices.
pub(crate) fn parse(text: &str) -> EngineResult<ShapeGeometry> {
    let mut geometry = ShapeGeometry::default();

    for (line_no, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                let coords = fields
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<f64>, _>>()
                    .map_err(|e| syntax(line_no, format!("bad vertex coordinate: {}", e)))?;
                if coords.len() != 3 {
                    return Err(syntax(line_no, "vertex needs 3 coordinates"));
                }
                geometry.vertices.extend(coords);
            }
            Some("f") => {
                let vertex_count = geometry.vertex_count();
                let mut count = 0u32;
                for reference in fields {
                    let index = face_index(reference, vertex_count)
                        .ok_or_else(|| syntax(line_no, format!("bad face reference '{}'", reference)))?;
                    geometry.indices.push(index);
                    count += 1;
                }
                if count < 3 {
                    return Err(syntax(line_no, "face needs at least 3 vertices"));
                }
                geometry.face_counts.push(count);
            }
            _ => {}
        }
    }

    if geometry.face_counts.is_empty() {
        return Err(EngineError::new(Status::InvalidArgument, "OBJ contains no faces"));
    }
    Ok(geometry)
}

fn face_index(reference: &str, vertex_count: usize) -> Option<u32> {
    let position = reference.split('/').next()?;
    let raw: i64 = position.parse().ok()?;
    let resolved = match raw {
        0 => return None,
        r if r > 0 => r - 1,
        r => vertex_count as i64 + r,
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return None;
    }
    u32::try_from(resolved).ok()
}

fn syntax(line_no: usize, message: impl AsRef<str>) -> EngineError {
    EngineError::new(
        Status::InvalidArgument,
        format!("OBJ line {}: {}", line_no + 1, message.as_ref()),
    )
}

/// Renders vertices and faces as OBJ text under object name `name`.
pub(crate) fn write(name: &str, vertices: &[f64], faces: &[Vec<u32>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "o {}", name);
    for v in vertices.chunks_exact(3) {
        let _ = writeln!(out, "v {} {} {}", v[0], v[1], v[2]);
    }
    for face in faces {
        out.push('f');
        for index in face {
            let _ = write!(out, " {}", index + 1);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# lot
v 0 0 0
v 10 0 0
v 10 0 10
v 0 0 10
vn 0 1 0
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn parses_quad() {
        let geometry = parse(QUAD).unwrap();
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.indices, vec![0, 1, 2, 3]);
        assert_eq!(geometry.face_counts, vec![4]);
    }

    #[test]
    fn parses_relative_indices() {
        let geometry = parse("v 0 0 0\nv 1 0 0\nv 0 0 1\nf -3 -2 -1\n").unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_out_of_range_reference() {
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 4\n").unwrap_err();
        assert!(err.message.contains("line 4"));
    }

    #[test]
    fn rejects_faceless_file() {
        assert!(parse("v 0 0 0\n").is_err());
    }

    #[test]
    fn written_text_parses_back() {
        let text = write("lot", &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], &[vec![0, 1, 2]]);
        assert!(text.starts_with("o lot\n"));
        let geometry = parse(&text).unwrap();
        assert_eq!(geometry.face_counts, vec![3]);
    }
}
