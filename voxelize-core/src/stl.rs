/// STL file parser for binary and ASCII formats
use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::{Result, VoxelizeError};
use crate::geometry::Mesh;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Facet = [[f32; 3]; 3];

/// A file handed over by the user, e.g. through an upload widget
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("mesh.stl")
            .to_string();
        Ok(Self { name, bytes })
    }

    /// File name without the `.stl` suffix
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh")
    }
}

/// Load an uploaded STL file into an indexed mesh
pub fn load_upload(upload: &Upload) -> Result<Mesh> {
    let is_stl = Path::new(&upload.name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("stl"));
    if !is_stl {
        return Err(VoxelizeError::Load(format!(
            "{} is not an .stl file",
            upload.name
        )));
    }

    let mesh = parse_stl(&upload.bytes)?;
    info!(
        "loaded {}: {} vertices, {} faces",
        upload.name,
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    let facets = if looks_like_ascii(data) {
        match std::str::from_utf8(data).map(parse_ascii_facets) {
            Ok(Ok(facets)) => facets,
            // Binary files are allowed to start with "solid" too
            _ => parse_binary_facets(data)?,
        }
    } else {
        parse_binary_facets(data)?
    };

    if facets.is_empty() {
        return Err(VoxelizeError::Load("STL contains no triangles".to_string()));
    }
    if facets.iter().flatten().flatten().any(|c| !c.is_finite()) {
        return Err(VoxelizeError::Load(
            "STL contains non-finite coordinates".to_string(),
        ));
    }
    Ok(weld(&facets))
}

fn looks_like_ascii(data: &[u8]) -> bool {
    let trimmed = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(&data[..0], |start| &data[start..]);
    trimmed.starts_with(b"solid")
}

fn parse_binary_facets(data: &[u8]) -> Result<Vec<Facet>> {
    if data.len() < HEADER_LEN + 4 {
        return Err(VoxelizeError::Load(
            "File too small to be a valid STL".to_string(),
        ));
    }

    let count_bytes = [data[80], data[81], data[82], data[83]];
    let triangle_count = u32::from_le_bytes(count_bytes) as usize;
    let body = &data[HEADER_LEN + 4..];

    if body.len() < triangle_count.saturating_mul(FACET_LEN) {
        return Err(VoxelizeError::Load(format!(
            "Unexpected end of file: header announces {} triangles, found {} bytes of facet data",
            triangle_count,
            body.len()
        )));
    }

    let read_f32 = |chunk: &[u8], at: usize| {
        f32::from_le_bytes([chunk[at], chunk[at + 1], chunk[at + 2], chunk[at + 3]])
    };

    let facets = body
        .chunks_exact(FACET_LEN)
        .take(triangle_count)
        .map(|chunk| {
            // Skip the 12-byte normal; it is recomputed from the winding when needed
            let mut facet = [[0.0; 3]; 3];
            for (v, vertex) in facet.iter_mut().enumerate() {
                for (c, coord) in vertex.iter_mut().enumerate() {
                    *coord = read_f32(chunk, 12 + v * 12 + c * 4);
                }
            }
            facet
        })
        .collect();
    Ok(facets)
}

fn parse_ascii_facets(input: &str) -> Result<Vec<Facet>> {
    match parse_ascii_stl_impl(input) {
        Ok((_, facets)) => Ok(facets),
        Err(e) => Err(VoxelizeError::Load(format!(
            "Failed to parse ASCII STL: {:?}",
            e
        ))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

/// Merge bit-identical vertices so faces index into a shared vertex list
fn weld(facets: &[Facet]) -> Mesh {
    let mut index_of: HashMap<[u32; 3], u32> = HashMap::with_capacity(facets.len() * 3 / 2);
    let mut vertices = Vec::new();
    let mut faces = Vec::with_capacity(facets.len());

    for facet in facets {
        let mut face = [0u32; 3];
        for (slot, v) in face.iter_mut().zip(facet) {
            // -0.0 and 0.0 are the same point
            let key = v.map(|c| if c == 0.0 { 0 } else { c.to_bits() });
            *slot = *index_of.entry(key).or_insert_with(|| {
                vertices.push(Point3::new(v[0], v[1], v[2]));
                (vertices.len() - 1) as u32
            });
        }
        faces.push(face);
    }

    debug!(
        "welded {} facet corners into {} vertices",
        facets.len() * 3,
        vertices.len()
    );
    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(facets: &[Facet]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for facet in facets {
            data.extend_from_slice(&[0u8; 12]);
            for v in facet {
                for c in v {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
            data.extend_from_slice(&[0u8; 2]);
        }
        data
    }

    const TETRA: [Facet; 4] = [
        [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
        [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    ];

    #[test]
    fn test_parse_binary_header_only() {
        let data = binary_stl(&[]);
        let result = parse_stl(&data);
        assert!(matches!(result, Err(VoxelizeError::Load(_))));
    }

    #[test]
    fn test_parse_binary_welds_vertices() {
        let mesh = parse_stl(&binary_stl(&TETRA)).unwrap();
        assert_eq!(mesh.faces.len(), 4);
        assert_eq!(mesh.vertices.len(), 4);
        assert!((mesh.volume() - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_binary_truncated() {
        let mut data = binary_stl(&TETRA);
        data.truncate(data.len() - 10);
        let err = parse_stl(&data).unwrap_err();
        assert!(err.to_string().contains("Unexpected end of file"));
    }

    #[test]
    fn test_parse_binary_with_solid_header() {
        let mut data = binary_stl(&TETRA);
        data[..5].copy_from_slice(b"solid");
        let mesh = parse_stl(&data).unwrap();
        assert_eq!(mesh.faces.len(), 4);
    }

    #[test]
    fn test_parse_ascii() {
        let text = "solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 1 0 0
    endloop
  endfacet
  facet normal 0.577 0.577 0.577
    outer loop
      vertex 1 0 0
      vertex 0 1 0
      vertex 0 0 1.5e0
    endloop
  endfacet
endsolid tetra
";
        let mesh = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.bounds().maxs, [1.0, 1.0, 1.5]);
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        let result = parse_stl(b"not a mesh at all");
        assert!(matches!(result, Err(VoxelizeError::Load(_))));
    }

    #[test]
    fn test_non_finite_coordinates_are_a_load_error() {
        let mut facets = TETRA;
        facets[1][2] = [f32::NAN, 0.0, 0.0];
        let err = parse_stl(&binary_stl(&facets)).unwrap_err();
        assert!(matches!(err, VoxelizeError::Load(_)));
        assert!(err.to_string().contains("non-finite"));

        facets[1][2] = [0.0, f32::INFINITY, 0.0];
        assert!(matches!(parse_stl(&binary_stl(&facets)), Err(VoxelizeError::Load(_))));

        let text = "solid bad
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex nan 1 0
    endloop
  endfacet
endsolid bad
";
        assert!(matches!(parse_stl(text.as_bytes()), Err(VoxelizeError::Load(_))));
    }

    #[test]
    fn test_upload_requires_stl_extension() {
        let upload = Upload::new("model.obj", binary_stl(&TETRA));
        assert!(matches!(load_upload(&upload), Err(VoxelizeError::Load(_))));

        let upload = Upload::new("Model.STL", binary_stl(&TETRA));
        assert_eq!(upload.stem(), "Model");
        assert!(load_upload(&upload).is_ok());
    }
}
