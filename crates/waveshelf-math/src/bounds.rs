//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{Point2D, Point3, Vec3};

/// An axis-aligned rectangle in the layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    /// Minimum corner.
    pub min: Point2D,
    /// Maximum corner.
    pub max: Point2D,
}

impl Rect2 {
    /// Rectangle from two corners (any order).
    pub fn new(a: Point2D, b: Point2D) -> Self {
        Self {
            min: Point2D::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Rectangle with its minimum corner at `origin`.
    pub fn from_origin_size(origin: Point2D, width: f64, height: f64) -> Self {
        Self::new(origin, origin.offset(width, height))
    }

    /// Tight bounds of a point set, `None` when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut r = Self {
            min: first,
            max: first,
        };
        for p in iter {
            r.include(*p);
        }
        Some(r)
    }

    /// Grow to contain `p`.
    pub fn include(&mut self, p: Point2D) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect2) -> Rect2 {
        let mut r = *self;
        r.include(other.min);
        r.include(other.max);
        r
    }

    /// Width along X.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along Y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point.
    pub fn center(&self) -> Point2D {
        self.min.lerp(&self.max, 0.5)
    }

    /// Shifted copy.
    pub fn translate(&self, dx: f64, dy: f64) -> Rect2 {
        Rect2 {
            min: self.min.offset(dx, dy),
            max: self.max.offset(dx, dy),
        }
    }

    /// Interiors intersect. Rectangles that only touch do not overlap.
    pub fn overlaps(&self, other: &Rect2, eps: f64) -> bool {
        self.min.x < other.max.x - eps
            && other.min.x < self.max.x - eps
            && self.min.y < other.max.y - eps
            && other.min.y < self.max.y - eps
    }

    /// `other` lies inside `self` (with slack `eps`).
    pub fn contains(&self, other: &Rect2, eps: f64) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.y >= self.min.y - eps
            && other.max.x <= self.max.x + eps
            && other.max.y <= self.max.y + eps
    }
}

/// An axis-aligned box in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Box centered on `center` with the given full size.
    pub fn from_center_size(center: Point3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Grow to contain `p`.
    pub fn include(&mut self, p: Point3) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    /// Full extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Copy whose extents are at least `min_extent` on every axis, keeping the center.
    pub fn with_min_extent(&self, min_extent: f64) -> Self {
        let s = self.size();
        let clamp = |v: f64| if v.is_finite() { v.max(min_extent) } else { min_extent };
        let c = self.center();
        let c = if c.coords.iter().all(|v| v.is_finite()) {
            c
        } else {
            Point3::origin()
        };
        Self::from_center_size(c, Vec3::new(clamp(s.x), clamp(s.y), clamp(s.z)))
    }
}
