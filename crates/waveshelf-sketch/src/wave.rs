//! The sine path ribs are strung along.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use waveshelf_math::Point2D;

/// Millimeters per unit of the dimensionless amplitude setting.
pub const AMPLITUDE_SCALE_MM: f64 = 25.0;

/// Inputs of the wave path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParameters {
    /// Total path length along X, in mm.
    pub length_mm: f64,
    /// Dimensionless amplitude, scaled by [`AMPLITUDE_SCALE_MM`].
    pub amplitude: f64,
    /// Number of full sine periods over the path.
    pub frequency: f64,
    /// Number of path segments; the path has `rib_count + 1` samples.
    pub rib_count: usize,
}

/// One sample of the wave path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    /// X in mm, centered on the origin.
    pub x: f64,
    /// Y in mm.
    pub y: f64,
    /// Normalized position along the path.
    pub t: f64,
}

impl WavePoint {
    /// The sample as a 2D point.
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Sample the wave path.
///
/// Produces `rib_count + 1` points with `x` spanning `[-L/2, L/2]`. A
/// `rib_count` of zero yields the single point at `t = 0`.
pub fn generate_wave_path(params: &WaveParameters) -> Vec<WavePoint> {
    let length = finite_or_zero(params.length_mm);
    let amplitude = finite_or_zero(params.amplitude) * AMPLITUDE_SCALE_MM;
    let frequency = finite_or_zero(params.frequency);

    let at = |t: f64| WavePoint {
        x: t * length - length / 2.0,
        y: (2.0 * PI * frequency * t).sin() * amplitude,
        t,
    };

    if params.rib_count == 0 {
        return vec![at(0.0)];
    }
    let n = params.rib_count;
    (0..=n).map(|i| at(i as f64 / n as f64)).collect()
}

/// Position at normalized path position `t`, interpolated between samples.
///
/// Returns `None` for an empty path.
pub fn point_along(points: &[WavePoint], t: f64) -> Option<Point2D> {
    let first = points.first()?;
    if points.len() == 1 {
        return Some(first.position());
    }
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let f = t * (points.len() - 1) as f64;
    let i = (f.floor() as usize).min(points.len() - 2);
    Some(points[i].position().lerp(&points[i + 1].position(), f - i as f64))
}

/// Catmull-Rom resampling with `subdivisions` steps per input segment.
///
/// Every input sample is kept; the end points are duplicated as phantom
/// neighbors so the curve passes through them.
pub fn densify(points: &[WavePoint], subdivisions: usize) -> Vec<WavePoint> {
    if points.len() < 2 || subdivisions <= 1 {
        return points.to_vec();
    }
    let n = points.len();
    let get = |i: isize| points[i.clamp(0, n as isize - 1) as usize];
    let mut out = Vec::with_capacity((n - 1) * subdivisions + 1);
    for i in 0..n - 1 {
        let p0 = get(i as isize - 1);
        let p1 = get(i as isize);
        let p2 = get(i as isize + 1);
        let p3 = get(i as isize + 2);
        for s in 0..subdivisions {
            let u = s as f64 / subdivisions as f64;
            let u2 = u * u;
            let u3 = u2 * u;
            let cr = |a: f64, b: f64, c: f64, d: f64| {
                0.5 * (2.0 * b
                    + (-a + c) * u
                    + (2.0 * a - 5.0 * b + 4.0 * c - d) * u2
                    + (-a + 3.0 * b - 3.0 * c + d) * u3)
            };
            out.push(WavePoint {
                x: cr(p0.x, p1.x, p2.x, p3.x),
                y: cr(p0.y, p1.y, p2.y, p3.y),
                t: p1.t + (p2.t - p1.t) * u,
            });
        }
    }
    out.push(points[n - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference() -> WaveParameters {
        WaveParameters {
            length_mm: 1200.0,
            amplitude: 2.0,
            frequency: 1.5,
            rib_count: 10,
        }
    }

    #[test]
    fn test_reference_path() {
        let path = generate_wave_path(&reference());
        assert_eq!(path.len(), 11);
        assert_relative_eq!(path[0].x, -600.0);
        assert_relative_eq!(path[10].x, 600.0);
        assert_relative_eq!(path[0].y, 0.0);
        // t = 0.1 → sin(0.3π) · 50
        assert_relative_eq!(path[1].y, (0.3 * PI).sin() * 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_ribs_single_point() {
        let path = generate_wave_path(&WaveParameters {
            rib_count: 0,
            ..reference()
        });
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].t, 0.0);
        assert_relative_eq!(path[0].x, -600.0);
    }

    #[test]
    fn test_non_finite_inputs() {
        let path = generate_wave_path(&WaveParameters {
            length_mm: f64::NAN,
            amplitude: f64::INFINITY,
            frequency: 1.0,
            rib_count: 4,
        });
        assert!(path.iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }

    #[test]
    fn test_point_along() {
        let path = generate_wave_path(&reference());
        let mid = point_along(&path, 0.5).unwrap();
        assert_relative_eq!(mid.x, 0.0, epsilon = 1e-9);
        let q = point_along(&path, 0.05).unwrap();
        assert_relative_eq!(q.x, -570.0, epsilon = 1e-9);
        assert!(point_along(&[], 0.5).is_none());
    }

    #[test]
    fn test_densify_keeps_samples() {
        let path = generate_wave_path(&reference());
        let dense = densify(&path, 4);
        assert_eq!(dense.len(), 41);
        for (i, p) in path.iter().enumerate() {
            assert_relative_eq!(dense[i * 4].x, p.x, epsilon = 1e-9);
            assert_relative_eq!(dense[i * 4].y, p.y, epsilon = 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_sample_count_and_span(
            length in 1.0f64..5000.0,
            amplitude in 0.0f64..10.0,
            frequency in 0.0f64..10.0,
            rib_count in 1usize..200,
        ) {
            let path = generate_wave_path(&WaveParameters { length_mm: length, amplitude, frequency, rib_count });
            prop_assert_eq!(path.len(), rib_count + 1);
            prop_assert!((path[0].x + length / 2.0).abs() < 1e-9);
            prop_assert!((path[rib_count].x - length / 2.0).abs() < 1e-6);
        }
    }
}
