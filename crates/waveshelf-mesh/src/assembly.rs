//! The full preview: one rib per wave sample plus mount rods.

use waveshelf_math::{Point2D, Point3, Transform};
use waveshelf_params::{RibShape, ShelfParams};
use waveshelf_sketch::{generate_wave_path, WavePoint};

use crate::{build_profile, extrude_outline, MaterialDescriptor, ProfileKind, RibSpec, TriangleMesh};

const ROD_SEGMENTS: usize = 16;

/// One placed rib.
#[derive(Debug, Clone)]
pub struct RibInstance {
    /// Wave sample index.
    pub index: usize,
    /// Normalized path position.
    pub t: f64,
    /// Size and rotation the rib was built with.
    pub spec: RibSpec,
    /// Rib mesh in local coordinates.
    pub mesh: TriangleMesh,
    /// Placement of the local origin.
    pub position: Point3,
}

/// Ribs, rods and the shared material of one shelf.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Ribs in path order.
    pub ribs: Vec<RibInstance>,
    /// Rod meshes in world coordinates.
    pub rods: Vec<TriangleMesh>,
    /// Material shared by every part.
    pub material: MaterialDescriptor,
}

impl Assembly {
    /// `(mesh, position)` pairs in draw order: ribs, then rods at the origin.
    pub fn instances(&self) -> impl Iterator<Item = (&TriangleMesh, Point3)> + '_ {
        self.ribs
            .iter()
            .map(|r| (&r.mesh, r.position))
            .chain(self.rods.iter().map(|m| (m, Point3::origin())))
    }

    /// Everything in one world-space mesh.
    pub fn merged(&self) -> TriangleMesh {
        let mut out = TriangleMesh::new();
        for (mesh, pos) in self.instances() {
            if pos == Point3::origin() {
                out.merge(mesh);
            } else {
                out.merge(&mesh.transformed(&Transform::translation(pos.x, pos.y, pos.z)));
            }
        }
        out
    }
}

/// The cross-section handler for a rib at path position `t`.
pub(crate) fn profile_kind(params: &ShelfParams, t: f64) -> ProfileKind {
    match params.shape {
        RibShape::Square | RibShape::Rectangle => ProfileKind::Box,
        RibShape::Circle => ProfileKind::Ellipse,
        RibShape::Freeform => ProfileKind::Polygon(freeform_points(params, t)),
    }
}

/// The authored outline at `t`, blended when several profiles exist.
pub(crate) fn freeform_points(params: &ShelfParams, t: f64) -> Vec<Point2D> {
    match &params.profiles {
        Some(seq) => seq.points_at(t),
        None => {
            log::warn!("freeform shape without profiles, using box ribs");
            Vec::new()
        }
    }
}

/// Rib size and rotation at wave sample `p`.
pub(crate) fn rib_spec(params: &ShelfParams, p: &WavePoint) -> RibSpec {
    let local = params.keyframe_track().sample(p.t);
    let [w, h, d] = params.base_size_mm();
    let [rx, ry, rz] = params.rotation;
    RibSpec {
        width: w * local.scale_x,
        height: h * local.scale_y,
        depth: d,
        rotation: [rx, ry, rz + local.rotation],
        flat_edge: params.flat_edge,
    }
}

/// Build every rib, the rods and the material for `params`.
pub fn build_assembly(params: &ShelfParams) -> Assembly {
    let path = generate_wave_path(&params.wave());
    let ribs: Vec<RibInstance> = path
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let spec = rib_spec(params, p);
            let mesh = build_profile(&profile_kind(params, p.t), &spec);
            RibInstance {
                index,
                t: p.t,
                spec,
                mesh,
                position: Point3::new(p.x, p.y, 0.0),
            }
        })
        .collect();

    let rods = build_rods(params);
    log::debug!("assembly: {} ribs, {} rods", ribs.len(), rods.len());
    Assembly {
        ribs,
        rods,
        material: MaterialDescriptor::lookup(&params.material, &params.finish),
    }
}

/// Rod centers along Z.
pub(crate) fn rod_offsets(params: &ShelfParams) -> Vec<f64> {
    let depth = params.base_size_mm()[2];
    let back = if params.flat_edge { 0.0 } else { -depth / 2.0 };
    match params.rod_count {
        0 => Vec::new(),
        1 => vec![back + depth * 0.15],
        n => (0..n)
            .map(|i| back + depth * (i as f64 + 0.5) / n as f64)
            .collect(),
    }
}

fn build_rods(params: &ShelfParams) -> Vec<TriangleMesh> {
    let radius = params.rod_diameter / 2.0;
    if !(radius.is_finite() && radius > 0.0) {
        return Vec::new();
    }
    let half = params.length.to_mm() / 2.0;
    let ring: Vec<Point2D> = (0..ROD_SEGMENTS)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / ROD_SEGMENTS as f64;
            Point2D::new(radius * a.cos(), radius * a.sin())
        })
        .collect();
    // Extruded along Z, turned onto X.
    let along_x = Transform::rotation_y(std::f64::consts::FRAC_PI_2);
    let cylinder = extrude_outline(&ring, -half, half).transformed(&along_x);
    rod_offsets(params)
        .into_iter()
        .map(|z| cylinder.transformed(&Transform::translation(0.0, 0.0, z)))
        .collect()
}
