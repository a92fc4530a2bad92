#![warn(missing_docs)]

//! File export for waveshelf.
//!
//! Cut layouts go out as DXF or SVG, the 3D assembly as binary STL. Vector
//! exports are all-or-nothing: the model is validated before a single byte
//! is written. The [`inspect`] module reads DXF files back for checking.

pub mod dxf;
pub mod error;
pub mod inspect;
pub mod stl;
pub mod svg_export;
pub mod validate;

pub use dxf::{export_dxf, DxfDocument};
pub use error::{ExportError, InspectError, Result};
pub use stl::{export_stl, write_stl};
pub use svg_export::{export_svg, svg_document, SVG_MARGIN};
pub use validate::{validate_model, validate_shape};

#[cfg(test)]
mod tests {
    use super::*;
    use waveshelf_layout::layout_shelf;
    use waveshelf_params::{BackplaneParams, ShelfParams};

    #[test]
    fn test_reference_layout_round_trips_through_inspect() {
        let backplane = BackplaneParams::default().with_excluded_slot(5);
        let layout = layout_shelf(&ShelfParams::default(), &backplane);
        let bytes = export_dxf(&layout.model).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let report = inspect::inspect(&text, backplane.material_thickness).unwrap();
        assert_eq!(report.closed_entities, layout.sheet_count() + 11 + 1 + 10);
        assert_eq!(report.layers.get("RIB"), Some(&11));
        assert_eq!(report.layers.get("SLOT"), Some(&10));
        let c = &report.classification;
        assert_eq!(c.sheets.len(), layout.sheet_count());
        assert_eq!(c.slots.len(), 10);
        // Ribs plus the backplane.
        assert_eq!(c.ribs.len(), 12);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["layers"]["BACKPLANE"], 1);
        assert_eq!(json["classification"]["total"], c.total);
    }

    #[test]
    fn test_svg_has_one_element_per_closed_shape() {
        let layout = layout_shelf(&ShelfParams::default(), &BackplaneParams::default());
        let text = String::from_utf8(export_svg(&layout.model).unwrap()).unwrap();
        let closed = layout
            .model
            .flatten()
            .iter()
            .filter(|s| s.shape.is_closed())
            .count();
        let elements = text.matches("<path").count() + text.matches("<circle").count();
        assert_eq!(elements, closed);
    }
}
