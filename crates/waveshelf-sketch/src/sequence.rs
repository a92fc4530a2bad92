//! Multi-profile blending along the wave path.

use serde::{Deserialize, Serialize};
use waveshelf_math::Point2D;

use crate::{resample_closed, Profile, DEFAULT_CURVE_SAMPLES};

/// Where each profile sits along the path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileSpacing {
    /// Profiles are spread evenly over `[0, 1]`.
    #[default]
    Even,
    /// Explicit normalized positions, one per profile, ascending.
    Custom {
        /// Positions in `[0, 1]`.
        positions: Vec<f64>,
    },
}

/// How neighboring profiles are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Blend point-by-point between neighbors.
    #[default]
    Linear,
    /// Use the nearest preceding profile unchanged.
    Step,
}

/// An ordered list of authored profiles blended along the path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileSequence {
    /// Profiles in path order.
    pub profiles: Vec<Profile>,
    /// Profile placement.
    #[serde(default)]
    pub spacing: ProfileSpacing,
    /// Blend mode.
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl ProfileSequence {
    /// A sequence holding one profile.
    pub fn single(profile: Profile) -> Self {
        Self {
            profiles: vec![profile],
            ..Default::default()
        }
    }

    /// More than one profile is authored.
    pub fn is_blended(&self) -> bool {
        self.profiles.len() > 1
    }

    /// The blended outline at path position `t ∈ [0, 1]`.
    ///
    /// Returns an empty list when no profile is authored.
    pub fn points_at(&self, t: f64) -> Vec<Point2D> {
        let n = self.profiles.len();
        match n {
            0 => return Vec::new(),
            1 => return self.profiles[0].sample_points(DEFAULT_CURVE_SAMPLES),
            _ => {}
        }
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let ryb_t = self.fractional_index(t);
        let lo = (ryb_t.floor() as usize).min(n - 1);
        let hi = (ryb_t.ceil() as usize).min(n - 1);
        let f = ryb_t - lo as f64;

        let a = self.profiles[lo].sample_points(DEFAULT_CURVE_SAMPLES);
        if lo == hi || self.interpolation == Interpolation::Step {
            return a;
        }
        let b = self.profiles[hi].sample_points(DEFAULT_CURVE_SAMPLES);
        let (a, b) = if a.len() == b.len() {
            (a, b)
        } else {
            let count = a.len().max(b.len());
            log::debug!(
                "resampling profiles {lo} ({}) and {hi} ({}) to {count} points",
                a.len(),
                b.len()
            );
            (resample_closed(&a, count), resample_closed(&b, count))
        };
        a.iter().zip(&b).map(|(p, q)| p.lerp(q, f)).collect()
    }

    /// Map `t` to a fractional profile index in `[0, N-1]`.
    fn fractional_index(&self, t: f64) -> f64 {
        let n = self.profiles.len();
        let last = (n - 1) as f64;
        match &self.spacing {
            ProfileSpacing::Custom { positions } if positions.len() == n => {
                if t <= positions[0] {
                    return 0.0;
                }
                for (i, w) in positions.windows(2).enumerate() {
                    if t <= w[1] {
                        let span = w[1] - w[0];
                        return if span > 0.0 {
                            i as f64 + (t - w[0]) / span
                        } else {
                            (i + 1) as f64
                        };
                    }
                }
                last
            }
            ProfileSpacing::Custom { positions } => {
                log::warn!(
                    "{} custom positions for {} profiles, using even spacing",
                    positions.len(),
                    n
                );
                t * last
            }
            ProfileSpacing::Even => t * last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Profile {
        Profile::from_points(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(size, 0.0),
            Point2D::new(size, size),
            Point2D::new(0.0, size),
        ])
    }

    fn triangle() -> Profile {
        Profile::from_points(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(0.0, 4.0),
        ])
    }

    #[test]
    fn test_blend_between_neighbors() {
        let seq = ProfileSequence {
            profiles: vec![square(2.0), square(4.0), square(8.0)],
            ..Default::default()
        };
        assert!(seq.is_blended());
        let mid = seq.points_at(0.25);
        assert_relative_eq!(mid[2].x, 3.0);
        assert_eq!(seq.points_at(1.0), square(8.0).sample_points(16));
    }

    #[test]
    fn test_step_holds_previous() {
        let seq = ProfileSequence {
            profiles: vec![square(2.0), square(4.0)],
            interpolation: Interpolation::Step,
            ..Default::default()
        };
        assert_eq!(seq.points_at(0.9), square(2.0).sample_points(16));
    }

    #[test]
    fn test_mismatched_counts_are_resampled() {
        let seq = ProfileSequence {
            profiles: vec![square(4.0), triangle()],
            ..Default::default()
        };
        let pts = seq.points_at(0.5);
        assert_eq!(pts.len(), 4);
        assert!(pts.iter().all(Point2D::is_finite));
    }

    #[test]
    fn test_custom_spacing() {
        let seq = ProfileSequence {
            profiles: vec![square(2.0), square(4.0)],
            spacing: ProfileSpacing::Custom {
                positions: vec![0.5, 1.0],
            },
            ..Default::default()
        };
        assert_eq!(seq.points_at(0.3), square(2.0).sample_points(16));
        let p = seq.points_at(0.75);
        assert_relative_eq!(p[2].x, 3.0);
    }
}
