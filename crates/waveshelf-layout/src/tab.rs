//! Tabs that seat a rib in its backplane slot.

use waveshelf_math::{Point2D, Rect2};
use waveshelf_params::BackplaneParams;
use waveshelf_sketch::Polygon;

/// Tab length never exceeds this share of the rib height.
const TAB_HEIGHT_SHARE: f64 = 0.8;

/// Size of the tab that seats a rib in its backplane slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabSpec {
    /// Length along the back edge.
    pub length: f64,
    /// How far the tab sticks out past the back edge.
    pub protrusion: f64,
}

impl TabSpec {
    /// Tab for a rib of `height` seating in `backplane`'s slots.
    pub fn for_rib(backplane: &BackplaneParams, height: f64) -> Self {
        Self {
            length: backplane.slot_depth.min(TAB_HEIGHT_SHARE * height).max(0.0),
            protrusion: backplane.material_thickness.max(0.0),
        }
    }
}

/// Box outline with the tab baked in on the minimum-x edge (8 points).
pub fn tabbed_rectangle(width: f64, height: f64, tab: &TabSpec) -> Vec<Point2D> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let s = tab.length / 2.0;
    let xt = -hw - tab.protrusion;
    vec![
        Point2D::new(-hw, -hh),
        Point2D::new(hw, -hh),
        Point2D::new(hw, hh),
        Point2D::new(-hw, hh),
        Point2D::new(-hw, s),
        Point2D::new(xt, s),
        Point2D::new(xt, -s),
        Point2D::new(-hw, -s),
    ]
}

/// Leftmost point where a downward edge crosses `y`, with the edge index.
fn leftmost_down_crossing(points: &[Point2D], y: f64) -> Option<(usize, Point2D)> {
    let n = points.len();
    (0..n)
        .filter_map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            if a.y >= y && b.y < y {
                let f = (a.y - y) / (a.y - b.y);
                Some((i, Point2D::new(a.x + (b.x - a.x) * f, y)))
            } else {
                None
            }
        })
        .min_by(|(_, p), (_, q)| p.x.total_cmp(&q.x))
}

/// Union a rectangular tab onto the minimum-x side of a counter-clockwise outline.
///
/// The tab spans `y ∈ [-length/2, length/2]` and reaches `protrusion` past the
/// outline's minimum x. The outline between the two crossing points on the
/// left side is replaced by the tab's three outer edges, so a notch cut into
/// that stretch is filled. Returns the outline unchanged if the left side does
/// not cross both tab edges.
pub fn union_tab(outline: &[Point2D], tab: &TabSpec) -> Vec<Point2D> {
    let Some(bounds) = Rect2::from_points(outline) else {
        return Vec::new();
    };
    let s = tab.length / 2.0;
    let crossings = (
        leftmost_down_crossing(outline, s),
        leftmost_down_crossing(outline, -s),
    );
    let ((ia, a), (ib, b)) = match crossings {
        (Some(a), Some(b)) if tab.length > 0.0 => (a, b),
        _ => {
            log::warn!("rib outline does not span the tab, leaving it untabbed");
            return outline.to_vec();
        }
    };
    let xt = bounds.min.x - tab.protrusion;
    let n = outline.len();
    let steps = match (ia + n - ib) % n {
        0 => n,
        k => k,
    };
    let reach = a.x.max(b.x) + 1e-9;
    if (steps + 1..=n).any(|k| outline[(ib + k) % n].x > reach) {
        log::warn!("rib outline is notched inside the tab span, filling the notch");
    }

    let mut out = Vec::with_capacity(steps + 4);
    out.push(b);
    out.extend((1..=steps).map(|k| outline[(ib + k) % n]));
    out.push(a);
    out.push(Point2D::new(xt, s));
    out.push(Point2D::new(xt, -s));
    let mut poly = Polygon::new(out);
    poly.dedup(1e-9);
    poly.points
}
