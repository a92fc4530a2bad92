//! Bounding boxes and camera framing for the preview.

use waveshelf_math::{Aabb3, Point3, Rect2, Transform, Vec3};
use waveshelf_params::{RibShape, ShelfParams};
use waveshelf_sketch::{generate_wave_path, normalize_points, AMPLITUDE_SCALE_MM};

use crate::assembly::{freeform_points, rib_spec, rod_offsets};

/// Smallest extent of a framing box on any axis, in mm.
pub const MIN_FRAME_EXTENT: f64 = 50.0;

const DEFAULT_FOV_DEG: f64 = 50.0;

/// Where to put a camera so a box fills the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Look-at point.
    pub target: Point3,
    /// Eye position.
    pub position: Point3,
    /// Eye to target distance.
    pub distance: f64,
}

fn z_center(params: &ShelfParams, depth: f64) -> f64 {
    if params.flat_edge {
        depth / 2.0
    } else {
        0.0
    }
}

/// Bounds of a single un-keyframed rib.
pub fn rib_bounds(params: &ShelfParams) -> Aabb3 {
    let [w, h, d] = params.base_size_mm();
    let z = z_center(params, d);
    let raw = if params.shape == RibShape::Freeform {
        let pts = normalize_points(&freeform_points(params, 0.0), w, h);
        match Rect2::from_points(&pts) {
            Some(r) => Aabb3 {
                min: Point3::new(r.min.x, r.min.y, z - d / 2.0),
                max: Point3::new(r.max.x, r.max.y, z + d / 2.0),
            },
            None => Aabb3::from_center_size(Point3::new(0.0, 0.0, z), Vec3::new(w, h, d)),
        }
    } else {
        Aabb3::from_center_size(Point3::new(0.0, 0.0, z), Vec3::new(w, h, d))
    };
    raw.with_min_extent(MIN_FRAME_EXTENT)
}

/// Bounds of the whole shelf.
///
/// The wave envelope (path length by wave range plus rib height) grown to
/// every rib as built, with keyframe scale and rotation, and to the rods.
pub fn assembly_bounds(params: &ShelfParams) -> Aabb3 {
    let [_, h, d] = params.base_size_mm();
    let wave_range = 2.0 * params.amplitude.abs() * AMPLITUDE_SCALE_MM;
    let mut bounds = Aabb3::from_center_size(
        Point3::new(0.0, 0.0, z_center(params, d)),
        Vec3::new(params.length.to_mm(), wave_range + h, d),
    );

    for p in generate_wave_path(&params.wave()) {
        let spec = rib_spec(params, &p).sanitized();
        let [rx, ry, rz] = spec.rotation;
        let rot = Transform::euler_xyz_degrees(rx, ry, rz);
        let (z0, z1) = spec.z_range();
        let (hx, hy) = (spec.width / 2.0, spec.height / 2.0);
        for (x, y, z) in [
            (-hx, -hy, z0), (hx, -hy, z0), (hx, hy, z0), (-hx, hy, z0),
            (-hx, -hy, z1), (hx, -hy, z1), (hx, hy, z1), (-hx, hy, z1),
        ] {
            let c = rot.apply_point(&Point3::new(x, y, z));
            bounds.include(Point3::new(c.x + p.x, c.y + p.y, c.z));
        }
    }

    let r = params.rod_diameter / 2.0;
    if r.is_finite() && r > 0.0 {
        let half = params.length.to_mm() / 2.0;
        for z in rod_offsets(params) {
            bounds.include(Point3::new(-half, -r, z - r));
            bounds.include(Point3::new(half, r, z + r));
        }
    }

    bounds.with_min_extent(MIN_FRAME_EXTENT)
}

/// Camera that fits `bounds` in a vertical field of view of `fov_deg` degrees.
///
/// The eye looks at the box center from the front (+Z), raised slightly.
pub fn frame_camera(bounds: &Aabb3, fov_deg: f64) -> CameraFrame {
    let fov = if fov_deg.is_finite() {
        fov_deg.clamp(10.0, 120.0)
    } else {
        DEFAULT_FOV_DEG
    };
    let b = bounds.with_min_extent(MIN_FRAME_EXTENT);
    let radius = b.size().norm() / 2.0;
    let distance = radius / (fov.to_radians() / 2.0).tan();
    let dir = Vec3::new(0.0, 0.3, 1.0).normalize();
    let target = b.center();
    CameraFrame {
        target,
        position: target + dir * distance,
        distance,
    }
}
