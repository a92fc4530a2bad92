//! Rib solids: one closed outline extruded along Z.

use std::f64::consts::TAU;

use waveshelf_math::{Point2D, Point3, Transform, Vec3};
use waveshelf_sketch::{normalize_points, Polygon};

use crate::TriangleMesh;

/// Smallest dimension a rib is built with, in mm.
pub const MIN_DIMENSION: f64 = 0.01;

/// Segments used to approximate an elliptical rib.
pub const ELLIPSE_SEGMENTS: usize = 24;

/// Cross-section handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileKind {
    /// Axis-aligned box.
    Box,
    /// Ellipse with radii `width/2`, `height/2`.
    Ellipse,
    /// Arbitrary outline, normalized into `width × height`.
    Polygon(Vec<Point2D>),
}

/// Size and orientation of one rib.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibSpec {
    /// Extent along X in mm.
    pub width: f64,
    /// Extent along Y in mm.
    pub height: f64,
    /// Extent along Z in mm.
    pub depth: f64,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: [f64; 3],
    /// Back face at z = 0 instead of centered on it.
    pub flat_edge: bool,
}

impl RibSpec {
    /// Copy with every dimension finite and at least [`MIN_DIMENSION`].
    pub fn sanitized(&self) -> RibSpec {
        let dim = |v: f64| {
            if v.is_finite() {
                v.abs().max(MIN_DIMENSION)
            } else {
                MIN_DIMENSION
            }
        };
        RibSpec {
            width: dim(self.width),
            height: dim(self.height),
            depth: dim(self.depth),
            ..*self
        }
    }

    pub(crate) fn z_range(&self) -> (f64, f64) {
        if self.flat_edge {
            (0.0, self.depth)
        } else {
            (-self.depth / 2.0, self.depth / 2.0)
        }
    }
}

/// Build the rib solid for `kind`, rotated about its local origin.
///
/// Never fails: degenerate sizes are clamped and polygons with fewer than
/// three distinct points fall back to a box.
pub fn build_profile(kind: &ProfileKind, spec: &RibSpec) -> TriangleMesh {
    let spec = spec.sanitized();
    let local = match kind {
        ProfileKind::Box => build_box(&spec),
        ProfileKind::Ellipse => {
            let (rx, ry) = (spec.width / 2.0, spec.height / 2.0);
            let ring: Vec<Point2D> = (0..ELLIPSE_SEGMENTS)
                .map(|i| {
                    let a = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                    Point2D::new(rx * a.cos(), ry * a.sin())
                })
                .collect();
            let (z0, z1) = spec.z_range();
            extrude_outline(&ring, z0, z1)
        }
        ProfileKind::Polygon(points) => {
            let finite: Vec<Point2D> = points.iter().copied().filter(Point2D::is_finite).collect();
            let mut poly = Polygon::new(normalize_points(&finite, spec.width, spec.height));
            poly.dedup(1e-9);
            if poly.len() < 3 {
                log::debug!("freeform outline has {} distinct points, using box", poly.len());
                build_box(&spec)
            } else {
                poly.ensure_ccw();
                let (z0, z1) = spec.z_range();
                extrude_outline(&poly.points, z0, z1)
            }
        }
    };

    let [rx, ry, rz] = spec.rotation;
    let rot = Transform::euler_xyz_degrees(rx, ry, rz);
    if rot.is_identity() {
        local
    } else {
        local.transformed(&rot)
    }
}

/// Normal of the face spanned by its first two edges.
fn face_normal(a: Point3, b: Point3, c: Point3) -> Vec3 {
    (b - a).cross(&(c - a)).try_normalize(1e-12).unwrap_or(Vec3::z())
}

/// Push a planar quad (CCW from outside) with a flat normal.
fn push_quad(mesh: &mut TriangleMesh, q: [Point3; 4]) {
    let n = face_normal(q[0], q[1], q[2]);
    let i: Vec<u32> = q.iter().map(|p| mesh.push_vertex(*p, n)).collect();
    mesh.push_triangle(i[0], i[1], i[2]);
    mesh.push_triangle(i[0], i[2], i[3]);
}

fn build_box(spec: &RibSpec) -> TriangleMesh {
    let (hx, hy) = (spec.width / 2.0, spec.height / 2.0);
    let (z0, z1) = spec.z_range();
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let mut mesh = TriangleMesh::new();
    // -Z, +Z
    push_quad(&mut mesh, [p(-hx, -hy, z0), p(-hx, hy, z0), p(hx, hy, z0), p(hx, -hy, z0)]);
    push_quad(&mut mesh, [p(-hx, -hy, z1), p(hx, -hy, z1), p(hx, hy, z1), p(-hx, hy, z1)]);
    // -Y, +Y
    push_quad(&mut mesh, [p(-hx, -hy, z0), p(hx, -hy, z0), p(hx, -hy, z1), p(-hx, -hy, z1)]);
    push_quad(&mut mesh, [p(hx, hy, z0), p(-hx, hy, z0), p(-hx, hy, z1), p(hx, hy, z1)]);
    // -X, +X
    push_quad(&mut mesh, [p(-hx, hy, z0), p(-hx, -hy, z0), p(-hx, -hy, z1), p(-hx, hy, z1)]);
    push_quad(&mut mesh, [p(hx, -hy, z0), p(hx, hy, z0), p(hx, hy, z1), p(hx, -hy, z1)]);
    mesh
}

/// Extrude a counter-clockwise outline from `z0` to `z1`.
///
/// Caps are triangle fans from the vertex centroid, so the outline must be
/// star-shaped about it; the side wall gets one flat quad per outline edge.
pub fn extrude_outline(ring: &[Point2D], z0: f64, z1: f64) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let n = ring.len();
    if n < 3 {
        return mesh;
    }
    let center = Polygon::new(ring.to_vec()).centroid();
    let at = |p: &Point2D, z: f64| Point3::new(p.x, p.y, z);

    // Bottom cap, viewed from below.
    let down = -Vec3::z();
    let c = mesh.push_vertex(at(&center, z0), down);
    let base = mesh.num_vertices() as u32;
    for p in ring {
        mesh.push_vertex(at(p, z0), down);
    }
    for i in 0..n as u32 {
        let j = (i + 1) % n as u32;
        mesh.push_triangle(c, base + j, base + i);
    }

    let up = Vec3::z();
    let c = mesh.push_vertex(at(&center, z1), up);
    let base = mesh.num_vertices() as u32;
    for p in ring {
        mesh.push_vertex(at(p, z1), up);
    }
    for i in 0..n as u32 {
        let j = (i + 1) % n as u32;
        mesh.push_triangle(c, base + i, base + j);
    }

    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        push_quad(&mut mesh, [at(a, z0), at(b, z0), at(b, z1), at(a, z1)]);
    }
    mesh
}
