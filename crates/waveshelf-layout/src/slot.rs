//! Slot cutouts for the backplane.

use std::f64::consts::SQRT_2;

use waveshelf_math::Point2D;
use waveshelf_params::SlotStyle;

use crate::model::{Shape, Vertex};

/// A stadium slot centered on the origin, long axis vertical.
///
/// `width` is the slot width (material thickness) and `height` the total
/// slot length. When `height <= width` there is no straight body and the slot
/// is a circle of radius `width / 2`.
pub fn slot_with_dogbone(width: f64, height: f64) -> Shape {
    let r = width / 2.0;
    if height <= width {
        return Shape::Circle {
            center: Point2D::ORIGIN,
            radius: r,
        };
    }
    let body = height / 2.0 - r;
    Shape::Polyline {
        vertices: vec![
            Vertex::new(r, -body),
            Vertex::with_bulge(r, body, 1.0),
            Vertex::new(-r, body),
            Vertex::with_bulge(-r, -body, 1.0),
        ],
        closed: true,
    }
}

/// A `width × height` slot with a corner relief arc through each corner.
///
/// Each relief is a half circle of radius `radius` whose diameter cuts the
/// corner off, so a bit of that radius clears the full corner. The radius is
/// clamped so neighboring reliefs cannot overlap.
pub fn dogbone_slot(width: f64, height: f64, radius: f64) -> Shape {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let max_r = width.min(height) / (2.0 * SQRT_2);
    let r = radius.clamp(0.0, max_r);
    if !(r > 1e-9) {
        return Shape::rectangle(Point2D::new(-hw, -hh), width, height);
    }
    let k = SQRT_2 * r;
    Shape::Polyline {
        vertices: vec![
            Vertex::new(-hw + k, -hh),
            Vertex::with_bulge(hw - k, -hh, 1.0),
            Vertex::new(hw, -hh + k),
            Vertex::with_bulge(hw, hh - k, 1.0),
            Vertex::new(hw - k, hh),
            Vertex::with_bulge(-hw + k, hh, 1.0),
            Vertex::new(-hw, hh - k),
            Vertex::with_bulge(-hw, -hh + k, 1.0),
        ],
        closed: true,
    }
}

/// The slot for `style`.
pub fn slot_shape(style: SlotStyle, width: f64, height: f64, dogbone_radius: f64) -> Shape {
    match style {
        SlotStyle::Stadium => slot_with_dogbone(width, height),
        SlotStyle::Dogbone => dogbone_slot(width, height, dogbone_radius),
    }
}
