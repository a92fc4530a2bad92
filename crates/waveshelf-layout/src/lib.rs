#![warn(missing_docs)]

//! CNC cut layout for waveshelf.
//!
//! Flattens every rib to a closed outline (with a backplane tab when a
//! backplane is used), builds the slotted backplane and packs everything onto
//! 1220 × 2440 mm stock sheets. The result is a [`Model`] graph in drawing
//! coordinates: sheets stacked upward, parts as children of their sheet.
//!
//! # Example
//!
//! ```
//! use waveshelf_layout::layout_shelf;
//! use waveshelf_params::{BackplaneParams, ShelfParams};
//!
//! let layout = layout_shelf(&ShelfParams::default(), &BackplaneParams::default());
//! assert_eq!(layout.rib_count(), 11);
//! assert_eq!(layout.slot_count(), 11);
//! ```

pub mod backplane;
pub mod model;
pub mod packer;
pub mod ribs;
pub mod slot;
pub mod tab;

pub use backplane::{build_backplane, organic_outline, slot_centers, MIN_BACKPLANE_HEIGHT};
pub use model::{BulgeArc, Model, PartKind, PlacedShape, Shape, Vertex};
pub use packer::{
    sheet_offset, LayoutWarning, Placement, SheetLayout, SheetPacker, PADDING, SHEET_GAP,
    SHEET_HEIGHT, SHEET_WIDTH,
};
pub use ribs::{rib_profiles, RibProfile, ELLIPSE_CUT_SEGMENTS};
pub use slot::{dogbone_slot, slot_shape, slot_with_dogbone};
pub use tab::{tabbed_rectangle, union_tab, TabSpec};

use waveshelf_params::{BackplaneParams, ShelfParams};
use waveshelf_sketch::{generate_wave_path, WavePoint};

/// A packed cut layout.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Root model: one child per sheet, parts below their sheet.
    pub model: Model,
    /// Per-sheet placement summary.
    pub sheets: Vec<SheetLayout>,
    /// Non-fatal packing notes.
    pub warnings: Vec<LayoutWarning>,
}

impl Layout {
    /// Number of stock sheets used.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Number of rib outlines.
    pub fn rib_count(&self) -> usize {
        self.model.count(PartKind::Rib)
    }

    /// Number of backplane slots.
    pub fn slot_count(&self) -> usize {
        self.model.count(PartKind::Slot)
    }

    /// Whether a backplane was placed.
    pub fn has_backplane(&self) -> bool {
        self.model.count(PartKind::Backplane) > 0
    }
}

/// Pack `ribs` and, when enabled, one backplane slotted at `wave`.
pub fn generate_layout(
    ribs: &[RibProfile],
    backplane: &BackplaneParams,
    wave: &[WavePoint],
) -> Layout {
    let mut packer = SheetPacker::new();
    for rib in ribs {
        packer.place(rib.to_model());
    }

    if backplane.enabled {
        let max_w = ribs.iter().map(|r| r.width).fold(0.0, f64::max);
        let max_h = ribs.iter().map(|r| r.height).fold(0.0, f64::max);
        packer.finish_row();
        packer.place(build_backplane(backplane, wave, max_w, max_h));
    }

    let (sheets, warnings) = packer.finish();
    let mut model = Model::new("layout", PartKind::Layout);
    let mut summaries = Vec::with_capacity(sheets.len());
    for (summary, sheet) in sheets {
        summaries.push(summary);
        model.children.push(sheet);
    }
    log::debug!(
        "layout: {} ribs on {} sheets, {} warnings",
        ribs.len(),
        summaries.len(),
        warnings.len()
    );
    Layout {
        model,
        sheets: summaries,
        warnings,
    }
}

/// Rib outlines, backplane and packing for a whole shelf.
pub fn layout_shelf(params: &ShelfParams, backplane: &BackplaneParams) -> Layout {
    let wave = generate_wave_path(&params.wave());
    let ribs = rib_profiles(params, backplane);
    generate_layout(&ribs, backplane, &wave)
}
