//! Indexed triangle meshes.

use std::collections::HashMap;

use waveshelf_math::{Aabb3, Point3, Transform, Vec3};

/// Output triangle mesh for rendering and export.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// No triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, p: Point3, n: Vec3) -> u32 {
        let index = self.num_vertices() as u32;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        self.normals
            .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        index
    }

    /// Append a triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[i * 3] as f64,
            self.vertices[i * 3 + 1] as f64,
            self.vertices[i * 3 + 2] as f64,
        )
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Copy with positions and normals transformed.
    pub fn transformed(&self, t: &Transform) -> TriangleMesh {
        let mut out = TriangleMesh {
            vertices: Vec::with_capacity(self.vertices.len()),
            indices: self.indices.clone(),
            normals: Vec::with_capacity(self.normals.len()),
        };
        for (p, n) in self.vertices.chunks_exact(3).zip(self.normals.chunks_exact(3)) {
            let p = t.apply_point(&Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
            let n = t.apply_normal(&Vec3::new(n[0] as f64, n[1] as f64, n[2] as f64));
            let n = n.try_normalize(1e-12).unwrap_or(n);
            out.vertices
                .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
            out.normals
                .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        }
        out
    }

    /// Axis-aligned bounds, `None` when there are no vertices.
    pub fn bounds(&self) -> Option<Aabb3> {
        let mut iter = (0..self.num_vertices()).map(|i| self.vertex(i));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        });
        Some(Aabb3 { min, max })
    }

    /// Signed volume via the divergence theorem. Positive for outward winding.
    pub fn signed_volume(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let a = self.vertex(tri[0] as usize).coords;
                let b = self.vertex(tri[1] as usize).coords;
                let c = self.vertex(tri[2] as usize).coords;
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    /// Every directed edge has exactly one reversed partner.
    ///
    /// Vertices are matched by quantized position, so flat-shaded faces that
    /// duplicate corner vertices still count as connected.
    pub fn is_closed(&self) -> bool {
        let key = |i: u32| {
            let p = self.vertex(i as usize);
            [
                (p.x * 1e4).round() as i64,
                (p.y * 1e4).round() as i64,
                (p.z * 1e4).round() as i64,
            ]
        };
        let mut edges: HashMap<([i64; 3], [i64; 3]), usize> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *edges.entry((key(a), key(b))).or_default() += 1;
            }
        }
        !edges.is_empty()
            && edges
                .iter()
                .all(|((a, b), &count)| count == 1 && edges.get(&(*b, *a)) == Some(&1))
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
