//! Binary STL export of the assembly mesh.

use std::io::Write;

use waveshelf_mesh::TriangleMesh;

use crate::error::{ExportError, Result};

const HEADER: &[u8; 80] =
    b"waveshelf STL export                                                            ";

fn facet_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    let nx = e1[1] * e2[2] - e1[2] * e2[1];
    let ny = e1[2] * e2[0] - e1[0] * e2[2];
    let nz = e1[0] * e2[1] - e1[1] * e2[0];
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len > 1e-10 {
        [nx / len, ny / len, nz / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

/// Write `mesh` as binary STL.
pub fn write_stl(mesh: &TriangleMesh, mut writer: impl Write) -> Result<()> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyGeometry);
    }
    let vertex = |i: u32| {
        let i = i as usize * 3;
        [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
    };

    writer.write_all(HEADER)?;
    writer.write_all(&(mesh.num_triangles() as u32).to_le_bytes())?;
    for tri in mesh.indices.chunks_exact(3) {
        let (v0, v1, v2) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
        for c in facet_normal(v0, v1, v2) {
            writer.write_all(&c.to_le_bytes())?;
        }
        for v in [v0, v1, v2] {
            for c in v {
                writer.write_all(&c.to_le_bytes())?;
            }
        }
        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Encode `mesh` as binary STL bytes.
pub fn export_stl(mesh: &TriangleMesh) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(84 + mesh.num_triangles() * 50);
    write_stl(mesh, &mut data)?;
    log::debug!("stl: {} triangles", mesh.num_triangles());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveshelf_math::{Point3, Vec3};

    #[test]
    fn test_stl_layout() {
        let mut mesh = TriangleMesh::new();
        let n = Vec3::new(0.0, 0.0, 1.0);
        let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0), n);
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0), n);
        let c = mesh.push_vertex(Point3::new(0.0, 1.0, 0.0), n);
        mesh.push_triangle(a, b, c);

        let bytes = export_stl(&mesh).unwrap();
        assert_eq!(bytes.len(), 84 + 50);
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn test_empty_mesh_is_an_error() {
        assert!(matches!(
            export_stl(&TriangleMesh::new()),
            Err(ExportError::EmptyGeometry)
        ));
    }
}
