//! Flat rib outlines with their backplane tabs.

use std::f64::consts::TAU;

use waveshelf_math::{Point2D, Rect2};
use waveshelf_params::{BackplaneParams, RibShape, ShelfParams};
use waveshelf_sketch::{generate_wave_path, normalize_points, Polygon};

use crate::model::{Model, PartKind, Shape};
use crate::tab::{tabbed_rectangle, union_tab, TabSpec};

/// Segments of a flattened circular rib.
pub const ELLIPSE_CUT_SEGMENTS: usize = 72;

/// One rib's cut outline, centered on its nominal box.
#[derive(Debug, Clone, PartialEq)]
pub struct RibProfile {
    /// Wave sample index.
    pub index: usize,
    /// Nominal width (without tab).
    pub width: f64,
    /// Nominal height.
    pub height: f64,
    /// Closed outline, counter-clockwise.
    pub outline: Vec<Point2D>,
}

impl RibProfile {
    /// Part name used in the layout.
    pub fn name(&self) -> String {
        format!("rib-{}", self.index)
    }

    /// True extents, tab included.
    pub fn bounds(&self) -> Option<Rect2> {
        Rect2::from_points(&self.outline)
    }

    /// The outline as a model node at the origin.
    pub fn to_model(&self) -> Model {
        Model::new(self.name(), PartKind::Rib).with_shape(Shape::closed_polygon(&self.outline))
    }
}

pub(crate) fn rectangle_points(hw: f64, hh: f64) -> Vec<Point2D> {
    vec![
        Point2D::new(-hw, -hh),
        Point2D::new(hw, -hh),
        Point2D::new(hw, hh),
        Point2D::new(-hw, hh),
    ]
}

fn ellipse_points(width: f64, height: f64) -> Vec<Point2D> {
    (0..ELLIPSE_CUT_SEGMENTS)
        .map(|i| {
            let a = TAU * i as f64 / ELLIPSE_CUT_SEGMENTS as f64;
            Point2D::new(width / 2.0 * a.cos(), height / 2.0 * a.sin())
        })
        .collect()
}

/// One cut outline per wave sample for `params`.
///
/// With the backplane enabled every outline carries a tab on its back
/// (minimum-x) edge: baked into box outlines, unioned onto curved ones.
pub fn rib_profiles(params: &ShelfParams, backplane: &BackplaneParams) -> Vec<RibProfile> {
    let track = params.keyframe_track();
    let [w0, h0, _] = params.base_size_mm();
    generate_wave_path(&params.wave())
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let local = track.sample(p.t);
            let width = (w0 * local.scale_x).abs().max(1e-3);
            let height = (h0 * local.scale_y).abs().max(1e-3);
            let tab = TabSpec::for_rib(backplane, height);
            let outline = match params.shape {
                RibShape::Square | RibShape::Rectangle if backplane.enabled => {
                    tabbed_rectangle(width, height, &tab)
                }
                RibShape::Square | RibShape::Rectangle => rectangle_points(width / 2.0, height / 2.0),
                RibShape::Circle | RibShape::Freeform => {
                    let base = if params.shape == RibShape::Circle {
                        ellipse_points(width, height)
                    } else {
                        freeform_outline(params, p.t, width, height)
                    };
                    if backplane.enabled {
                        union_tab(&base, &tab)
                    } else {
                        base
                    }
                }
            };
            RibProfile {
                index,
                width,
                height,
                outline,
            }
        })
        .collect()
}

fn freeform_outline(params: &ShelfParams, t: f64, width: f64, height: f64) -> Vec<Point2D> {
    let raw = params
        .profiles
        .as_ref()
        .map(|seq| seq.points_at(t))
        .unwrap_or_default();
    let mut poly = Polygon::new(normalize_points(&raw, width, height));
    poly.dedup(1e-9);
    if poly.len() < 3 {
        log::warn!("freeform rib at t={t:.3} has no usable outline, using its bounding box");
        return rectangle_points(width / 2.0, height / 2.0);
    }
    poly.ensure_ccw();
    poly.points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_ribs_are_tabbed() {
        let ribs = rib_profiles(&ShelfParams::default(), &BackplaneParams::default());
        assert_eq!(ribs.len(), 11);
        let r = &ribs[0];
        assert_eq!(r.outline.len(), 8);
        assert!(Polygon::new(r.outline.clone()).is_ccw());
        let b = r.bounds().unwrap();
        assert_relative_eq!(b.width(), 75.0 + 12.0);
        assert_relative_eq!(b.height(), 75.0);
        assert_eq!(r.name(), "rib-0");
    }

    #[test]
    fn test_no_tab_without_backplane() {
        let bp = BackplaneParams {
            enabled: false,
            ..Default::default()
        };
        let ribs = rib_profiles(&ShelfParams::default(), &bp);
        assert_eq!(ribs[3].outline.len(), 4);
        let circles = rib_profiles(&ShelfParams::default().with_shape(RibShape::Circle), &bp);
        assert_eq!(circles[0].outline.len(), ELLIPSE_CUT_SEGMENTS);
    }

    #[test]
    fn test_circle_tab_union() {
        let ribs = rib_profiles(
            &ShelfParams::default().with_shape(RibShape::Circle),
            &BackplaneParams::default(),
        );
        let r = &ribs[0];
        let poly = Polygon::new(r.outline.clone());
        assert!(poly.is_ccw());
        assert!(!poly.is_self_intersecting());
        let b = r.bounds().unwrap();
        assert_relative_eq!(b.min.x, -37.5 - 12.0, epsilon = 1e-9);
        assert_relative_eq!(b.max.x, 37.5, epsilon = 1e-9);
        // Points of the circle between the tab edges are gone.
        assert!(r
            .outline
            .iter()
            .filter(|p| p.y.abs() < 30.0 - 1e-9)
            .all(|p| p.x > 0.0));
    }

    #[test]
    fn test_freeform_without_profiles_falls_back() {
        let ribs = rib_profiles(
            &ShelfParams::default().with_shape(RibShape::Freeform),
            &BackplaneParams::default(),
        );
        assert!(ribs.iter().all(|r| r.outline.len() >= 4));
        assert!(ribs.iter().all(|r| Polygon::new(r.outline.clone()).is_ccw()));
    }
}
