//! The slotted backplane panel.

use waveshelf_math::{Point2D, Rect2};
use waveshelf_params::{BackplaneParams, BackplaneShape};
use waveshelf_sketch::{densify, point_along, WavePoint};

use crate::model::{Model, PartKind, Shape};
use crate::slot::slot_shape;

/// Smallest rectangular backplane height, in mm.
pub const MIN_BACKPLANE_HEIGHT: f64 = 500.0;

/// Catmull-Rom steps per wave segment for the organic outline.
const ORGANIC_SUBDIVISIONS: usize = 8;

/// Slot centers in wave coordinates: one per sample (minus exclusions) or
/// one per manual position.
pub fn slot_centers(params: &BackplaneParams, wave: &[WavePoint]) -> Vec<Point2D> {
    if params.auto_slots {
        wave.iter()
            .enumerate()
            .filter(|(i, _)| !params.excluded_slots.contains(i))
            .map(|(_, p)| p.position())
            .collect()
    } else {
        params
            .manual_slot_positions
            .iter()
            .filter_map(|t| point_along(wave, *t))
            .collect()
    }
}

/// Closed outline following the wave, offset by `half_height` above and below.
///
/// The path is smoothed, then extended horizontally by `extension` at both
/// ends. The loop runs along the top left to right and back along the bottom.
pub fn organic_outline(wave: &[WavePoint], half_height: f64, extension: f64) -> Vec<Point2D> {
    let dense = densify(wave, ORGANIC_SUBDIVISIONS);
    let (Some(first), Some(last)) = (dense.first(), dense.last()) else {
        return Vec::new();
    };
    let mut center: Vec<Point2D> = Vec::with_capacity(dense.len() + 2);
    center.push(Point2D::new(first.x - extension, first.y));
    center.extend(dense.iter().map(WavePoint::position));
    center.push(Point2D::new(last.x + extension, last.y));

    let mut out: Vec<Point2D> = center.iter().map(|p| p.offset(0.0, half_height)).collect();
    out.extend(center.iter().rev().map(|p| p.offset(0.0, -half_height)));
    out
}

/// Build the backplane model: outline plus one slot child per center.
///
/// `max_rib_width` and `max_rib_height` are the largest nominal rib sizes.
/// Rectangular panels have their minimum corner at the local origin and
/// their slots remapped into that frame; organic panels keep wave
/// coordinates.
pub fn build_backplane(
    params: &BackplaneParams,
    wave: &[WavePoint],
    max_rib_width: f64,
    max_rib_height: f64,
) -> Model {
    let pts: Vec<Point2D> = wave.iter().map(WavePoint::position).collect();
    let path = Rect2::from_points(&pts).unwrap_or(Rect2::new(Point2D::ORIGIN, Point2D::ORIGIN));
    let centers = slot_centers(params, wave);

    let (outline, slot_positions) = match params.shape {
        BackplaneShape::Rectangular => {
            let width = path.width() + max_rib_width + 2.0 * params.margin;
            let height =
                (path.height() + max_rib_height + 2.0 * params.margin).max(MIN_BACKPLANE_HEIGHT);
            let dx = (width - path.width()) / 2.0 - path.min.x;
            let dy = (height - path.height()) / 2.0 - path.min.y;
            (
                Shape::rounded_rectangle(Point2D::ORIGIN, width, height, params.corner_radius),
                centers.iter().map(|c| c.offset(dx, dy)).collect::<Vec<_>>(),
            )
        }
        BackplaneShape::Organic => {
            let half = max_rib_height / 2.0 + params.organic_offset;
            let extension = params.organic_offset + params.material_thickness;
            (
                Shape::closed_polygon(&organic_outline(wave, half, extension)),
                centers,
            )
        }
    };

    let slot = slot_shape(
        params.slot_style,
        params.material_thickness,
        params.slot_depth,
        params.dogbone_radius,
    );
    let mut model = Model::new("backplane", PartKind::Backplane).with_shape(outline);
    model.children = slot_positions
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let mut m = Model::new(format!("slot-{i}"), PartKind::Slot).with_shape(slot.clone());
            m.origin = c;
            m
        })
        .collect();
    log::debug!(
        "backplane {:?}: {} slots",
        params.shape,
        model.children.len()
    );
    model
}
