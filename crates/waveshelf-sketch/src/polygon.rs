//! Closed point loops.

use waveshelf_math::{Point2D, Rect2};

/// A closed polygon given by its vertices (the closing edge is implicit).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Vertices in order.
    pub points: Vec<Point2D>,
}

impl Polygon {
    /// Create a new polygon from points.
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polygon is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area. Positive for counter-clockwise, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    /// Is the polygon counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Ensure counter-clockwise winding.
    pub fn ensure_ccw(&mut self) {
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
    }

    /// Perimeter length including the closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.points[i].distance(&self.points[(i + 1) % n]))
            .sum()
    }

    /// Vertex average.
    pub fn centroid(&self) -> Point2D {
        if self.points.is_empty() {
            return Point2D::ORIGIN;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2D::new(sx / n, sy / n)
    }

    /// Tight bounds, `None` when empty.
    pub fn bounds(&self) -> Option<Rect2> {
        Rect2::from_points(&self.points)
    }

    /// Drop consecutive duplicates (and a trailing copy of the first point).
    pub fn dedup(&mut self, eps: f64) {
        self.points.dedup_by(|b, a| a.distance(b) < eps);
        while self.points.len() > 1 {
            let first = self.points[0];
            match self.points.last() {
                Some(last) if last.distance(&first) < eps => {
                    self.points.pop();
                }
                _ => break,
            }
        }
    }

    /// Any two non-adjacent edges cross.
    ///
    /// Edges sharing a vertex are skipped; touching at a single point of two
    /// non-adjacent edges counts as a crossing.
    pub fn is_self_intersecting(&self) -> bool {
        let n = self.points.len();
        if n < 4 {
            return false;
        }
        for i in 0..n {
            let a0 = self.points[i];
            let a1 = self.points[(i + 1) % n];
            for j in (i + 1)..n {
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                let b0 = self.points[j];
                let b1 = self.points[(j + 1) % n];
                if segments_intersect(a0, a1, b0, b1) {
                    return true;
                }
            }
        }
        false
    }
}

fn orient(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point2D, b: Point2D, p: Point2D) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(a0: Point2D, a1: Point2D, b0: Point2D, b1: Point2D) -> bool {
    let eps = 1e-12;
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);
    if ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
    {
        return true;
    }
    (d1.abs() <= eps && on_segment(b0, b1, a0))
        || (d2.abs() <= eps && on_segment(b0, b1, a1))
        || (d3.abs() <= eps && on_segment(a0, a1, b0))
        || (d4.abs() <= eps && on_segment(a0, a1, b1))
}
