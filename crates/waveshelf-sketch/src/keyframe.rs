//! Piecewise-linear scale/rotation keyframes along the wave path.

use serde::{Deserialize, Serialize};

/// A scale/rotation sample at a normalized path position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformKeyframe {
    /// Normalized path position in `[0, 1]`.
    pub position: f64,
    /// Width multiplier.
    pub scale_x: f64,
    /// Height multiplier.
    pub scale_y: f64,
    /// Rotation about the rib's Z axis, in degrees.
    pub rotation: f64,
}

impl TransformKeyframe {
    /// Identity keyframe at `position`.
    pub fn identity_at(position: f64) -> Self {
        Self {
            position,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }

    fn local(&self) -> LocalTransform {
        LocalTransform {
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            rotation: self.rotation,
        }
    }
}

/// The interpolated transform applied to one rib.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    /// Width multiplier.
    pub scale_x: f64,
    /// Height multiplier.
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

/// A sorted keyframe track with at least two keys.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack {
    keys: Vec<TransformKeyframe>,
}

impl KeyframeTrack {
    /// Build a track from an unordered keyframe list.
    ///
    /// Keys with a non-finite position are dropped. With fewer than two
    /// usable keys the identity pair at positions 0 and 1 is used instead.
    pub fn new(keyframes: Vec<TransformKeyframe>) -> Self {
        let mut keys: Vec<_> = keyframes
            .into_iter()
            .filter(|k| k.position.is_finite())
            .collect();
        if keys.len() < 2 {
            if !keys.is_empty() {
                log::debug!("single keyframe ignored, using identity pair");
            }
            keys = vec![
                TransformKeyframe::identity_at(0.0),
                TransformKeyframe::identity_at(1.0),
            ];
        }
        keys.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { keys }
    }

    /// The sorted keys.
    pub fn keys(&self) -> &[TransformKeyframe] {
        &self.keys
    }

    /// Interpolate at path position `t`.
    ///
    /// Clamps to the first/last key outside their range.
    pub fn sample(&self, t: f64) -> LocalTransform {
        let t = if t.is_finite() { t } else { 0.0 };
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.position {
            return first.local();
        }
        if t >= last.position {
            return last.local();
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.position && t <= b.position {
                let span = b.position - a.position;
                if span <= 0.0 {
                    return b.local();
                }
                let f = (t - a.position) / span;
                let lerp = |x: f64, y: f64| x + (y - x) * f;
                return LocalTransform {
                    scale_x: lerp(a.scale_x, b.scale_x),
                    scale_y: lerp(a.scale_y, b.scale_y),
                    rotation: lerp(a.rotation, b.rotation),
                };
            }
        }
        last.local()
    }
}

impl Default for KeyframeTrack {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn key(position: f64, scale_x: f64, scale_y: f64, rotation: f64) -> TransformKeyframe {
        TransformKeyframe {
            position,
            scale_x,
            scale_y,
            rotation,
        }
    }

    #[test]
    fn test_default_pair_injected() {
        let track = KeyframeTrack::new(vec![key(0.5, 3.0, 3.0, 45.0)]);
        assert_eq!(track.keys().len(), 2);
        assert_eq!(track.sample(0.7), LocalTransform::default());
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let track = KeyframeTrack::new(vec![key(1.0, 2.0, 1.0, 90.0), key(0.0, 1.0, 1.0, 0.0)]);
        let mid = track.sample(0.5);
        assert_relative_eq!(mid.scale_x, 1.5);
        assert_relative_eq!(mid.rotation, 45.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let track = KeyframeTrack::new(vec![key(0.2, 0.5, 0.6, -10.0), key(0.8, 2.0, 3.0, 30.0)]);
        assert_eq!(track.sample(0.0), track.keys()[0].local());
        assert_eq!(track.sample(1.0), track.keys()[1].local());
        assert_eq!(track.sample(f64::NAN), track.keys()[0].local());
    }

    proptest! {
        #[test]
        fn prop_midpoint_is_mean(
            a in 0.0f64..0.5, b in 0.5f64..1.0,
            sa in 0.1f64..5.0, sb in 0.1f64..5.0,
            ra in -180.0f64..180.0, rb in -180.0f64..180.0,
        ) {
            prop_assume!(b - a > 1e-6);
            let track = KeyframeTrack::new(vec![key(a, sa, sb, ra), key(b, sb, sa, rb)]);
            let m = track.sample((a + b) / 2.0);
            prop_assert!((m.scale_x - (sa + sb) / 2.0).abs() < 1e-9);
            prop_assert!((m.scale_y - (sa + sb) / 2.0).abs() < 1e-9);
            prop_assert!((m.rotation - (ra + rb) / 2.0).abs() < 1e-9);
        }
    }
}
