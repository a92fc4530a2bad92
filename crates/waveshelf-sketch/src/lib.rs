#![warn(missing_docs)]

//! Sketch-level geometry for waveshelf.
//!
//! Everything here is flat and one- or two-dimensional: the sine path the
//! ribs are strung along, the keyframe track that scales and turns each rib
//! along that path, and the authored cross-section curves (lines and cubic
//! Béziers) used by freeform ribs.
//!
//! # Example
//!
//! ```
//! use waveshelf_sketch::{generate_wave_path, KeyframeTrack, WaveParameters};
//!
//! let wave = WaveParameters {
//!     length_mm: 1200.0,
//!     amplitude: 2.0,
//!     frequency: 1.5,
//!     rib_count: 10,
//! };
//! let path = generate_wave_path(&wave);
//! assert_eq!(path.len(), 11);
//!
//! let track = KeyframeTrack::new(Vec::new());
//! assert_eq!(track.sample(path[5].t).scale_x, 1.0);
//! ```

mod curve;
mod keyframe;
mod polygon;
mod profile;
mod sequence;
mod wave;

pub use curve::CurveSegment;
pub use keyframe::{KeyframeTrack, LocalTransform, TransformKeyframe};
pub use polygon::Polygon;
pub use profile::{normalize_points, resample_closed, Profile, DEFAULT_CURVE_SAMPLES};
pub use sequence::{Interpolation, ProfileSequence, ProfileSpacing};
pub use wave::{
    densify, generate_wave_path, point_along, WaveParameters, WavePoint, AMPLITUDE_SCALE_MM,
};

use thiserror::Error;

/// Problems found when checking an authored profile.
///
/// Profiles are never rejected by the geometry pipeline; these are reported
/// so callers can warn about curves that will not chain into a clean loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// The profile has no segments.
    #[error("profile has no segments")]
    EmptyProfile,

    /// A segment is degenerate (zero length).
    #[error("degenerate segment at index {0}")]
    DegenerateSegment(usize),

    /// Consecutive segments (or last → first) do not meet.
    #[error("profile is not closed: gap of {gap:.6} mm after segment {index}")]
    NotClosed {
        /// Index of the segment whose end does not meet the next start.
        index: usize,
        /// Distance between the end and the next start.
        gap: f64,
    },
}
