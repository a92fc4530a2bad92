#![warn(missing_docs)]

//! waveshelf: parametric wave shelves from design parameters to cut files.
//!
//! A [`Shelf`] wraps one validated [`ShelfConfig`] and derives everything
//! else on request: the wave path, the 3D preview assembly, the flat rib
//! outlines, the packed CNC layout and exported files.
//!
//! # Example
//!
//! ```rust,no_run
//! use waveshelf::{ExportFormat, Shelf, ShelfConfig};
//!
//! let shelf = Shelf::new(ShelfConfig::default()).unwrap();
//! let file = shelf.export(ExportFormat::Dxf).unwrap();
//! std::fs::write(&file.filename, &file.bytes).unwrap();
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use waveshelf_export as export;
pub use waveshelf_layout as layout;
pub use waveshelf_math as math;
pub use waveshelf_mesh as mesh;
pub use waveshelf_params as params;
pub use waveshelf_sketch as sketch;

pub use waveshelf_export::{ExportError, InspectError};
pub use waveshelf_layout::{Layout, LayoutWarning, Model, RibProfile};
pub use waveshelf_mesh::{Assembly, CameraFrame, TriangleMesh};
pub use waveshelf_params::{
    BackplaneParams, ParamsError, PhysicalLength, RibShape, ShelfConfig, ShelfParams, Unit,
};
pub use waveshelf_sketch::WavePoint;

use waveshelf_math::Aabb3;

/// Errors returned by the pipeline facade.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// The configuration could not be loaded or is invalid.
    #[error(transparent)]
    Params(#[from] ParamsError),
    /// Export failed; no file was produced.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// An export format name was not recognized.
    #[error("unknown export format `{0}` (expected dxf, svg or stl)")]
    UnknownFormat(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Cut layout as DXF.
    Dxf,
    /// Cut layout as SVG.
    Svg,
    /// Preview assembly as binary STL.
    Stl,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Dxf => "dxf",
            ExportFormat::Svg => "svg",
            ExportFormat::Stl => "stl",
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dxf" => Ok(ExportFormat::Dxf),
            "svg" => Ok(ExportFormat::Svg),
            "stl" => Ok(ExportFormat::Stl),
            _ => Err(ShelfError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Bytes of an exported file plus a suggested file name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    /// File contents.
    pub bytes: Vec<u8>,
    /// Suggested file name, e.g. `waveshelf-1200mm-11ribs.dxf`.
    pub filename: String,
    /// Format of `bytes`.
    pub format: ExportFormat,
}

/// A shelf design and the geometry derived from it.
///
/// Every accessor recomputes from the current configuration; nothing is
/// cached between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    config: ShelfConfig,
}

impl Shelf {
    /// Wrap a configuration after validating it.
    pub fn new(config: ShelfConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load a `.toml` or `.json` configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            config: ShelfConfig::load(path)?,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    /// Shelf parameters.
    pub fn params(&self) -> &ShelfParams {
        &self.config.shelf
    }

    /// Backplane parameters.
    pub fn backplane(&self) -> &BackplaneParams {
        &self.config.backplane
    }

    /// A new shelf with updated shelf parameters.
    pub fn with_params(&self, shelf: ShelfParams) -> Result<Self> {
        Self::new(ShelfConfig {
            shelf,
            backplane: self.config.backplane.clone(),
        })
    }

    /// A new shelf with updated backplane parameters.
    pub fn with_backplane(&self, backplane: BackplaneParams) -> Result<Self> {
        Self::new(ShelfConfig {
            shelf: self.config.shelf.clone(),
            backplane,
        })
    }

    /// Rib positions along the wave.
    pub fn wave_path(&self) -> Vec<WavePoint> {
        waveshelf_sketch::generate_wave_path(&self.config.shelf.wave())
    }

    /// The 3D preview: one mesh per rib, rods and a material.
    pub fn assembly(&self) -> Assembly {
        waveshelf_mesh::build_assembly(&self.config.shelf)
    }

    /// Bounding box of the whole shelf.
    pub fn bounds(&self) -> Aabb3 {
        waveshelf_mesh::assembly_bounds(&self.config.shelf)
    }

    /// Camera placement that frames the shelf for a vertical field of view.
    pub fn camera(&self, fov_deg: f64) -> CameraFrame {
        waveshelf_mesh::frame_camera(&self.bounds(), fov_deg)
    }

    /// Flat cut outline of every rib.
    pub fn rib_profiles(&self) -> Vec<RibProfile> {
        waveshelf_layout::rib_profiles(&self.config.shelf, &self.config.backplane)
    }

    /// Ribs and backplane packed onto stock sheets.
    pub fn layout(&self) -> Layout {
        waveshelf_layout::layout_shelf(&self.config.shelf, &self.config.backplane)
    }

    /// Suggested file name for an export in `format`.
    pub fn suggested_filename(&self, format: ExportFormat) -> String {
        let length = self.config.shelf.length.to_mm();
        format!(
            "waveshelf-{:.0}mm-{}ribs.{}",
            length,
            self.config.shelf.rib_total(),
            format.extension()
        )
    }

    /// Produce a file. All-or-nothing: on error there are no bytes.
    pub fn export(&self, format: ExportFormat) -> Result<ExportFile> {
        let bytes = match format {
            ExportFormat::Dxf => waveshelf_export::export_dxf(&self.layout().model)?,
            ExportFormat::Svg => waveshelf_export::export_svg(&self.layout().model)?,
            ExportFormat::Stl => waveshelf_export::export_stl(&self.assembly().merged())?,
        };
        let filename = self.suggested_filename(format);
        log::debug!("exported {} ({} bytes)", filename, bytes.len());
        Ok(ExportFile {
            bytes,
            filename,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("DXF".parse::<ExportFormat>().unwrap(), ExportFormat::Dxf);
        assert_eq!(ExportFormat::from_path("out/cut.svg"), Some(ExportFormat::Svg));
        assert_eq!(ExportFormat::from_path("model.step"), None);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ShelfError::UnknownFormat(f)) if f == "pdf"
        ));
        assert_eq!(ExportFormat::Stl.to_string(), "stl");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ShelfConfig::default();
        config.shelf.rib_count = 0;
        assert!(matches!(Shelf::new(config), Err(ShelfError::Params(_))));
    }

    #[test]
    fn test_edits_return_new_shelves() {
        let shelf = Shelf::new(ShelfConfig::default()).unwrap();
        let longer = shelf
            .with_params(
                shelf
                    .params()
                    .with_length(PhysicalLength::mm(1500.0))
                    .with_rib_depth(PhysicalLength::mm(30.0))
                    .with_material("walnut", "oiled"),
            )
            .unwrap();
        assert_eq!(
            longer.suggested_filename(ExportFormat::Svg),
            "waveshelf-1500mm-11ribs.svg"
        );
        assert_eq!(longer.params().base_size_mm()[2], 30.0);
        assert_eq!(shelf.params().length, PhysicalLength::mm(1200.0));

        let bare = shelf
            .with_backplane(BackplaneParams {
                enabled: false,
                ..Default::default()
            })
            .unwrap();
        assert!(!bare.layout().has_backplane());
        assert!(shelf.with_params(shelf.params().with_rib_count(0)).is_err());
    }

    #[test]
    fn test_suggested_filename() {
        let shelf = Shelf::new(ShelfConfig::default()).unwrap();
        assert_eq!(
            shelf.suggested_filename(ExportFormat::Dxf),
            "waveshelf-1200mm-11ribs.dxf"
        );
    }
}
