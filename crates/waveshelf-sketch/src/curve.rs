//! Curve segments of an authored profile.

use serde::{Deserialize, Serialize};
use waveshelf_math::{Point2D, Tolerance};

/// A segment of an authored rib profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveSegment {
    /// A straight segment from start to end.
    Line {
        /// Start point.
        start: Point2D,
        /// End point.
        end: Point2D,
    },
    /// A cubic Bézier from start to end.
    Bezier {
        /// Start point.
        start: Point2D,
        /// End point.
        end: Point2D,
        /// First control point (pulls the curve leaving `start`).
        control1: Point2D,
        /// Second control point (pulls the curve arriving at `end`).
        control2: Point2D,
    },
}

impl CurveSegment {
    /// Get the start point of this segment.
    pub fn start(&self) -> Point2D {
        match self {
            CurveSegment::Line { start, .. } => *start,
            CurveSegment::Bezier { start, .. } => *start,
        }
    }

    /// Get the end point of this segment.
    pub fn end(&self) -> Point2D {
        match self {
            CurveSegment::Line { end, .. } => *end,
            CurveSegment::Bezier { end, .. } => *end,
        }
    }

    /// Evaluate the segment at parameter `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f64) -> Point2D {
        let t = t.clamp(0.0, 1.0);
        match self {
            CurveSegment::Line { start, end } => start.lerp(end, t),
            CurveSegment::Bezier {
                start,
                end,
                control1,
                control2,
            } => {
                let u = 1.0 - t;
                let b0 = u * u * u;
                let b1 = 3.0 * u * u * t;
                let b2 = 3.0 * u * t * t;
                let b3 = t * t * t;
                Point2D::new(
                    b0 * start.x + b1 * control1.x + b2 * control2.x + b3 * end.x,
                    b0 * start.y + b1 * control1.y + b2 * control2.y + b3 * end.y,
                )
            }
        }
    }

    /// Sample points along the segment, excluding the end point.
    ///
    /// Lines contribute only their start point; Béziers contribute `steps`
    /// evenly spaced parameter samples. Chaining the samples of every segment
    /// of a closed profile yields the profile's closed point loop.
    pub fn sample(&self, steps: usize) -> Vec<Point2D> {
        match self {
            CurveSegment::Line { start, .. } => vec![*start],
            CurveSegment::Bezier { .. } => {
                let steps = steps.max(1);
                (0..steps)
                    .map(|k| self.point_at(k as f64 / steps as f64))
                    .collect()
            }
        }
    }

    /// Approximate arc length.
    pub fn length(&self) -> f64 {
        match self {
            CurveSegment::Line { start, end } => start.distance(end),
            CurveSegment::Bezier { .. } => {
                let mut pts = self.sample(32);
                pts.push(self.end());
                pts.windows(2).map(|w| w[0].distance(&w[1])).sum()
            }
        }
    }

    /// Check if this segment is degenerate (zero length).
    pub fn is_degenerate(&self) -> bool {
        self.length() < Tolerance::DEFAULT.linear
    }
}
