//! Authored closed profiles ("rybs") built from curve segments.

use serde::{Deserialize, Serialize};
use waveshelf_math::{Point2D, Rect2, Tolerance};

use crate::{CurveSegment, Polygon, SketchError};

/// Number of samples taken along each Bézier segment when flattening.
pub const DEFAULT_CURVE_SAMPLES: usize = 16;

/// An ordered, cyclic list of curve segments describing one rib outline.
///
/// Segments are expected to chain end → start, with the last segment
/// returning to the first. This is not enforced: [`Profile::validate`]
/// reports gaps, and [`Profile::sample_points`] flattens whatever is there.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Ordered segments.
    pub segments: Vec<CurveSegment>,
}

impl Profile {
    /// Create a profile from segments.
    pub fn new(segments: Vec<CurveSegment>) -> Self {
        Self { segments }
    }

    /// A closed polygon of line segments through `points`.
    pub fn from_points(points: &[Point2D]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| CurveSegment::Line {
                start: points[i],
                end: points[(i + 1) % n],
            })
            .collect();
        Self { segments }
    }

    /// Check that the profile is non-empty, has no degenerate segments and
    /// chains into a closed loop.
    pub fn validate(&self) -> Result<(), SketchError> {
        if self.segments.is_empty() {
            return Err(SketchError::EmptyProfile);
        }
        let tol = Tolerance::CUT;
        let n = self.segments.len();
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.is_degenerate() {
                return Err(SketchError::DegenerateSegment(i));
            }
            let next = &self.segments[(i + 1) % n];
            if !tol.points_equal(&seg.end(), &next.start()) {
                return Err(SketchError::NotClosed {
                    index: i,
                    gap: seg.end().distance(&next.start()),
                });
            }
        }
        Ok(())
    }

    /// Flatten to a closed point loop (the first point is not repeated).
    pub fn sample_points(&self, samples_per_curve: usize) -> Vec<Point2D> {
        let mut poly = Polygon::new(
            self.segments
                .iter()
                .flat_map(|s| s.sample(samples_per_curve))
                .collect(),
        );
        // An open chain still needs its last end point.
        if let Some(last) = self.segments.last() {
            poly.points.push(last.end());
        }
        poly.dedup(Tolerance::DEFAULT.linear);
        poly.points
    }

    /// Bounds of the flattened outline.
    pub fn bounds(&self) -> Option<Rect2> {
        Rect2::from_points(&self.sample_points(DEFAULT_CURVE_SAMPLES))
    }
}

/// Normalize a point cloud into a `width × height` box centered on the origin.
///
/// Each axis subtracts its minimum and divides by its range; a range below
/// tolerance divides by 1 instead so flat or single-point input stays finite.
pub fn normalize_points(points: &[Point2D], width: f64, height: f64) -> Vec<Point2D> {
    let Some(b) = Rect2::from_points(points) else {
        return Vec::new();
    };
    let range = |r: f64| {
        if r.is_finite() && r > Tolerance::DEFAULT.linear {
            r
        } else {
            1.0
        }
    };
    let rx = range(b.width());
    let ry = range(b.height());
    points
        .iter()
        .map(|p| {
            Point2D::new(
                ((p.x - b.min.x) / rx - 0.5) * width,
                ((p.y - b.min.y) / ry - 0.5) * height,
            )
        })
        .collect()
}

/// Resample a closed loop to exactly `count` points evenly spaced by arc length.
pub fn resample_closed(points: &[Point2D], count: usize) -> Vec<Point2D> {
    if points.is_empty() || count == 0 {
        return Vec::new();
    }
    let n = points.len();
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(0.0);
    for i in 0..n {
        let d = points[i].distance(&points[(i + 1) % n]);
        cumulative.push(cumulative[i] + d);
    }
    let total = cumulative[n];
    if total <= Tolerance::DEFAULT.linear {
        return vec![points[0]; count];
    }

    let mut out = Vec::with_capacity(count);
    let mut seg = 0;
    for k in 0..count {
        let target = total * k as f64 / count as f64;
        while seg < n - 1 && cumulative[seg + 1] < target {
            seg += 1;
        }
        let len = cumulative[seg + 1] - cumulative[seg];
        let f = if len > 0.0 {
            (target - cumulative[seg]) / len
        } else {
            0.0
        };
        out.push(points[seg].lerp(&points[(seg + 1) % n], f));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_square_profile_is_closed() {
        let p = Profile::from_points(&unit_square());
        assert!(p.validate().is_ok());
        assert_eq!(p.sample_points(8), unit_square());
    }

    #[test]
    fn test_gap_is_reported() {
        let mut p = Profile::from_points(&unit_square());
        if let CurveSegment::Line { end, .. } = &mut p.segments[3] {
            *end = Point2D::new(0.0, 0.5);
        }
        match p.validate() {
            Err(SketchError::NotClosed { index, gap }) => {
                assert_eq!(index, 3);
                assert_relative_eq!(gap, 0.5);
            }
            other => panic!("expected NotClosed, got {other:?}"),
        }
        assert_eq!(Profile::default().validate(), Err(SketchError::EmptyProfile));
    }

    #[test]
    fn test_bezier_profile_sampling() {
        let p = Profile::new(vec![
            CurveSegment::Bezier {
                start: Point2D::new(0.0, 0.0),
                end: Point2D::new(10.0, 0.0),
                control1: Point2D::new(0.0, 10.0),
                control2: Point2D::new(10.0, 10.0),
            },
            CurveSegment::Line {
                start: Point2D::new(10.0, 0.0),
                end: Point2D::new(0.0, 0.0),
            },
        ]);
        let pts = p.sample_points(16);
        assert_eq!(pts.len(), 17);
        let b = p.bounds().unwrap();
        assert_relative_eq!(b.width(), 10.0);
        assert!(b.height() > 7.0);
    }

    #[test]
    fn test_normalize_centers_and_scales() {
        let pts = normalize_points(&unit_square(), 80.0, 40.0);
        let b = Rect2::from_points(&pts).unwrap();
        assert_relative_eq!(b.min.x, -40.0);
        assert_relative_eq!(b.max.y, 20.0);
    }

    #[test]
    fn test_normalize_degenerate_stays_finite() {
        let pts = normalize_points(&[Point2D::new(3.0, 3.0), Point2D::new(3.0, 3.0)], 10.0, 10.0);
        assert!(pts.iter().all(Point2D::is_finite));
    }

    #[test]
    fn test_resample_closed_count_and_spacing() {
        let pts = resample_closed(&unit_square(), 8);
        assert_eq!(pts.len(), 8);
        assert_eq!(pts[0], Point2D::new(0.0, 0.0));
        assert_relative_eq!(pts[1].x, 0.5);
        assert_relative_eq!(pts[2].x, 1.0);
        assert_relative_eq!(pts[2].y, 0.0);
    }
}
