//! Shared render material for the assembly.

use serde::{Deserialize, Serialize};

/// Surface appearance handed to the renderer with the assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    /// Material id this descriptor was resolved from.
    pub name: String,
    /// Linear RGB base color in `[0, 1]`.
    pub color: [f64; 3],
    /// Perceptual roughness in `[0, 1]`.
    pub roughness: f64,
    /// Metallic factor in `[0, 1]`.
    pub metallic: f64,
}

impl MaterialDescriptor {
    /// Resolve a material id and finish; unknown materials get the default.
    ///
    /// A `"gloss"` finish lowers roughness, `"matte"` raises it.
    pub fn lookup(material: &str, finish: &str) -> Self {
        let (color, roughness, metallic) = match material {
            "birch-plywood" => ([0.85, 0.72, 0.55], 0.7, 0.0),
            "oak" => ([0.70, 0.53, 0.34], 0.65, 0.0),
            "walnut" => ([0.36, 0.24, 0.16], 0.6, 0.0),
            "maple" => ([0.90, 0.80, 0.65], 0.6, 0.0),
            "mdf" => ([0.62, 0.52, 0.40], 0.9, 0.0),
            "acrylic" => ([0.95, 0.95, 0.97], 0.1, 0.0),
            "aluminum" => ([0.91, 0.92, 0.92], 0.35, 1.0),
            _ => {
                log::debug!("unknown material `{material}`, using default");
                return Self::default().with_finish(finish);
            }
        };
        Self {
            name: material.to_string(),
            color,
            roughness,
            metallic,
        }
        .with_finish(finish)
    }

    fn with_finish(mut self, finish: &str) -> Self {
        match finish {
            "gloss" => self.roughness *= 0.4,
            "satin" => self.roughness *= 0.7,
            "matte" => self.roughness = (self.roughness * 1.2).min(1.0),
            _ => {}
        }
        self
    }
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self {
            name: "default".into(),
            color: [0.8, 0.8, 0.8],
            roughness: 0.5,
            metallic: 0.0,
        }
    }
}
