#![warn(missing_docs)]

//! Triangle meshes for the live waveshelf preview.
//!
//! Ribs are built by extruding a closed outline (box, ellipse or authored
//! polygon) along Z, rotated by the rib's Euler angles and placed at its wave
//! sample. The assembly adds mount rods and a shared material.

mod assembly;
mod bounds;
mod material;
mod mesh;
mod profile;

pub use assembly::{build_assembly, Assembly, RibInstance};
pub use bounds::{assembly_bounds, frame_camera, rib_bounds, CameraFrame, MIN_FRAME_EXTENT};
pub use material::MaterialDescriptor;
pub use mesh::TriangleMesh;
pub use profile::{
    build_profile, extrude_outline, ProfileKind, RibSpec, ELLIPSE_SEGMENTS, MIN_DIMENSION,
};
