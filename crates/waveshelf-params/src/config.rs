//! Configuration files: a shelf plus its backplane.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::axis::{MAX_FACTOR, MIN_FACTOR};
use crate::error::{ParamsError, Result};
use crate::{BackplaneParams, ShelfParams};

/// A complete design as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Shelf parameters.
    pub shelf: ShelfParams,
    /// Backplane parameters.
    pub backplane: BackplaneParams,
}

impl ShelfConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a `.toml` or `.json` file (by extension, TOML otherwise).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_toml_str(&text)?
        };
        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values the geometry pipeline would only clamp away.
    pub fn validate(&self) -> Result<()> {
        let s = &self.shelf;
        let lengths = [
            ("shelf.length", s.length),
            ("shelf.height", s.height),
            ("shelf.rib_depth", s.rib_depth),
            ("shelf.material_thickness", s.material_thickness),
        ];
        for (field, l) in lengths {
            if !l.is_positive() {
                return Err(ParamsError::invalid(field, format!("must be positive, got {l}")));
            }
        }
        for (i, axis) in s.scale.iter().enumerate() {
            if !axis.physical.is_positive() {
                return Err(ParamsError::invalid(
                    "shelf.scale",
                    format!("axis {i} base must be positive"),
                ));
            }
            if !(MIN_FACTOR..=MAX_FACTOR).contains(&axis.factor) {
                return Err(ParamsError::invalid(
                    "shelf.scale",
                    format!("axis {i} factor {} outside [{MIN_FACTOR}, {MAX_FACTOR}]", axis.factor),
                ));
            }
        }
        if s.rib_count == 0 {
            return Err(ParamsError::invalid("shelf.rib_count", "must be at least 1"));
        }
        finite_non_negative("shelf.amplitude", s.amplitude)?;
        finite_non_negative("shelf.frequency", s.frequency)?;
        finite_non_negative("shelf.rod_diameter", s.rod_diameter)?;
        if s.rotation.iter().any(|r| !r.is_finite()) {
            return Err(ParamsError::invalid("shelf.rotation", "must be finite"));
        }
        for k in &s.keyframes {
            if !(0.0..=1.0).contains(&k.position) {
                return Err(ParamsError::invalid(
                    "shelf.keyframes",
                    format!("position {} outside [0, 1]", k.position),
                ));
            }
            if !(k.scale_x.is_finite() && k.scale_y.is_finite() && k.rotation.is_finite()) {
                return Err(ParamsError::invalid("shelf.keyframes", "values must be finite"));
            }
        }

        let b = &self.backplane;
        if !(b.material_thickness.is_finite() && b.material_thickness > 0.0) {
            return Err(ParamsError::invalid(
                "backplane.material_thickness",
                "must be positive",
            ));
        }
        if !(b.slot_depth.is_finite() && b.slot_depth > 0.0) {
            return Err(ParamsError::invalid("backplane.slot_depth", "must be positive"));
        }
        finite_non_negative("backplane.dogbone_radius", b.dogbone_radius)?;
        finite_non_negative("backplane.organic_offset", b.organic_offset)?;
        finite_non_negative("backplane.corner_radius", b.corner_radius)?;
        finite_non_negative("backplane.margin", b.margin)?;
        if let Some(p) = b
            .manual_slot_positions
            .iter()
            .find(|p| !(0.0..=1.0).contains(*p))
        {
            return Err(ParamsError::invalid(
                "backplane.manual_slot_positions",
                format!("position {p} outside [0, 1]"),
            ));
        }
        Ok(())
    }
}

fn finite_non_negative(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::invalid(field, format!("must be finite and >= 0, got {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackplaneShape, RibShape, Unit};

    #[test]
    fn test_default_is_valid() {
        assert!(ShelfConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg = ShelfConfig::from_toml_str(
            r#"
            [shelf]
            rib_count = 6
            shape = "circle"
            length = { value = 48.0, unit = "inch" }

            [backplane]
            shape = "organic"
            excluded_slots = [2]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.shelf.rib_count, 6);
        assert_eq!(cfg.shelf.shape, RibShape::Circle);
        assert_eq!(cfg.shelf.length.unit, Unit::Inch);
        assert_eq!(cfg.backplane.shape, BackplaneShape::Organic);
        assert_eq!(cfg.backplane.excluded_slots, vec![2]);
        assert_eq!(cfg.backplane.slot_depth, 60.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let cfg = ShelfConfig::default();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(ShelfConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn test_validation_errors() {
        let mut cfg = ShelfConfig::default();
        cfg.backplane.slot_depth = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("backplane.slot_depth"));

        let mut cfg = ShelfConfig::default();
        cfg.shelf.rib_count = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ParamsError::Invalid { field: "shelf.rib_count", .. })
        ));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            ShelfConfig::from_json_str("{ not json"),
            Err(ParamsError::Json(_))
        ));
    }
}
