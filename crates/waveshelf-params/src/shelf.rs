//! The shelf parameter snapshot.

use serde::{Deserialize, Serialize};
use waveshelf_sketch::{KeyframeTrack, ProfileSequence, TransformKeyframe, WaveParameters};

use crate::axis::AxisScale;
use crate::units::PhysicalLength;

/// Rib cross-section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RibShape {
    /// Equal width and height box.
    #[default]
    Square,
    /// Box.
    Rectangle,
    /// Ellipse.
    Circle,
    /// Authored curves from [`ShelfParams::profiles`].
    Freeform,
}

/// Index into [`ShelfParams::scale`] and [`ShelfParams::rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Rib width.
    X = 0,
    /// Rib height.
    Y = 1,
    /// Rib depth.
    Z = 2,
}

/// Everything that defines one shelf design.
///
/// A snapshot: edits go through the `with_*` methods, which return a new
/// value and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfParams {
    /// Length of the wave path.
    pub length: PhysicalLength,
    /// Nominal rib height.
    pub height: PhysicalLength,
    /// Nominal rib depth.
    pub rib_depth: PhysicalLength,
    /// Rib stock thickness.
    pub material_thickness: PhysicalLength,
    /// Number of wave segments; `rib_count + 1` ribs are generated.
    pub rib_count: usize,
    /// Dimensionless wave amplitude.
    pub amplitude: f64,
    /// Wave periods over the length.
    pub frequency: f64,
    /// Cross-section kind.
    pub shape: RibShape,
    /// Width, height and depth of a rib.
    pub scale: [AxisScale; 3],
    /// Euler rotation of each rib in degrees, applied X then Y then Z.
    pub rotation: [f64; 3],
    /// Per-position scale/rotation keys.
    pub keyframes: Vec<TransformKeyframe>,
    /// Rib back face flush at z = 0 instead of centered.
    pub flat_edge: bool,
    /// Mount rod diameter in mm.
    pub rod_diameter: f64,
    /// Number of mount rods.
    pub rod_count: usize,
    /// Material id.
    pub material: String,
    /// Finish id.
    pub finish: String,
    /// Authored freeform profiles.
    pub profiles: Option<ProfileSequence>,
}

impl Default for ShelfParams {
    fn default() -> Self {
        let height = PhysicalLength::mm(75.0);
        let rib_depth = PhysicalLength::mm(25.0);
        Self {
            length: PhysicalLength::mm(1200.0),
            height,
            rib_depth,
            material_thickness: PhysicalLength::mm(12.0),
            rib_count: 10,
            amplitude: 2.0,
            frequency: 1.5,
            shape: RibShape::Square,
            scale: [
                AxisScale::new(PhysicalLength::mm(75.0)),
                AxisScale::new(height),
                AxisScale::new(rib_depth),
            ],
            rotation: [0.0; 3],
            keyframes: Vec::new(),
            flat_edge: false,
            rod_diameter: 10.0,
            rod_count: 2,
            material: "birch-plywood".into(),
            finish: "natural".into(),
            profiles: None,
        }
    }
}

impl ShelfParams {
    /// Wave path inputs derived from this snapshot.
    pub fn wave(&self) -> WaveParameters {
        WaveParameters {
            length_mm: self.length.to_mm(),
            amplitude: self.amplitude,
            frequency: self.frequency,
            rib_count: self.rib_count,
        }
    }

    /// Keyframe track with the identity pair injected when needed.
    pub fn keyframe_track(&self) -> KeyframeTrack {
        KeyframeTrack::new(self.keyframes.clone())
    }

    /// Number of ribs generated (one per wave sample).
    pub fn rib_total(&self) -> usize {
        self.rib_count + 1
    }

    /// Effective rib size `[width, height, depth]` in mm before keyframes.
    pub fn base_size_mm(&self) -> [f64; 3] {
        [
            self.scale[0].effective_mm(),
            self.scale[1].effective_mm(),
            self.scale[2].effective_mm(),
        ]
    }

    /// Copy with a new rib count.
    pub fn with_rib_count(&self, rib_count: usize) -> Self {
        Self {
            rib_count,
            ..self.clone()
        }
    }

    /// Copy with a new path length.
    pub fn with_length(&self, length: PhysicalLength) -> Self {
        Self {
            length,
            ..self.clone()
        }
    }

    /// Copy with a new wave amplitude and frequency.
    pub fn with_wave(&self, amplitude: f64, frequency: f64) -> Self {
        Self {
            amplitude,
            frequency,
            ..self.clone()
        }
    }

    /// Copy with a new cross-section kind.
    pub fn with_shape(&self, shape: RibShape) -> Self {
        Self {
            shape,
            ..self.clone()
        }
    }

    /// Copy with one axis resized to `p` (moves that axis' factor).
    pub fn with_axis_physical(&self, axis: Axis, p: PhysicalLength) -> Self {
        let mut next = self.clone();
        next.scale[axis as usize] = self.scale[axis as usize].update_from_physical(p);
        next
    }

    /// Copy with one axis' factor set.
    pub fn with_axis_factor(&self, axis: Axis, factor: f64) -> Self {
        let mut next = self.clone();
        next.scale[axis as usize] = self.scale[axis as usize].update_from_factor(factor);
        next
    }

    /// Copy with one rotation angle set (degrees).
    pub fn with_rotation(&self, axis: Axis, degrees: f64) -> Self {
        let mut next = self.clone();
        next.rotation[axis as usize] = degrees;
        next
    }

    /// Copy with a new nominal height; the Y axis base follows.
    pub fn with_height(&self, height: PhysicalLength) -> Self {
        let mut next = self.clone();
        next.height = height;
        next.scale[1].physical = height;
        next
    }

    /// Copy with a new nominal depth; the Z axis base follows.
    pub fn with_rib_depth(&self, rib_depth: PhysicalLength) -> Self {
        let mut next = self.clone();
        next.rib_depth = rib_depth;
        next.scale[2].physical = rib_depth;
        next
    }

    /// Copy with the keyframes replaced.
    pub fn with_keyframes(&self, keyframes: Vec<TransformKeyframe>) -> Self {
        Self {
            keyframes,
            ..self.clone()
        }
    }

    /// Copy with the flat-edge flag set.
    pub fn with_flat_edge(&self, flat_edge: bool) -> Self {
        Self {
            flat_edge,
            ..self.clone()
        }
    }

    /// Copy with the rod layout set.
    pub fn with_rods(&self, rod_count: usize, rod_diameter: f64) -> Self {
        Self {
            rod_count,
            rod_diameter,
            ..self.clone()
        }
    }

    /// Copy with freeform profiles set.
    pub fn with_profiles(&self, profiles: Option<ProfileSequence>) -> Self {
        Self {
            profiles,
            ..self.clone()
        }
    }

    /// Copy with material and finish ids.
    pub fn with_material(&self, material: &str, finish: &str) -> Self {
        Self {
            material: material.to_string(),
            finish: finish.to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_wave() {
        let p = ShelfParams::default();
        let w = p.wave();
        assert_eq!(w.length_mm, 1200.0);
        assert_eq!(w.rib_count, 10);
        assert_eq!(p.rib_total(), 11);
        assert_eq!(p.base_size_mm(), [75.0, 75.0, 25.0]);
    }

    #[test]
    fn test_updates_are_pure() {
        let p = ShelfParams::default();
        let q = p
            .with_axis_physical(Axis::X, PhysicalLength::mm(150.0))
            .with_rotation(Axis::Z, 30.0)
            .with_rib_count(4);
        assert_relative_eq!(q.scale[0].factor, 2.0);
        assert_eq!(q.rotation, [0.0, 0.0, 30.0]);
        assert_eq!(q.rib_count, 4);
        assert_eq!(p, ShelfParams::default());
    }

    #[test]
    fn test_height_moves_y_base() {
        let p = ShelfParams::default()
            .with_axis_factor(Axis::Y, 2.0)
            .with_height(PhysicalLength::mm(100.0));
        assert_relative_eq!(p.base_size_mm()[1], 200.0);
    }
}
