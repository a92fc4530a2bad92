//! Shelf (row) packing of parts onto stock sheets.

use serde::Serialize;
use waveshelf_math::{Point2D, Rect2};

use crate::model::{Model, PartKind, Shape};

/// Stock sheet width in mm.
pub const SHEET_WIDTH: f64 = 1220.0;
/// Stock sheet height in mm.
pub const SHEET_HEIGHT: f64 = 2440.0;
/// Gap between parts and around the sheet edge, in mm.
pub const PADDING: f64 = 15.0;
/// Vertical gap between stacked sheets in the drawing, in mm.
pub const SHEET_GAP: f64 = 50.0;

/// Something worth telling the user about a layout. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// A part does not fit on an empty sheet and was placed anyway.
    Oversized {
        /// Part name.
        name: String,
        /// Part width.
        width: f64,
        /// Part height.
        height: f64,
    },
}

/// Where one part went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Part name.
    pub name: String,
    /// Part kind.
    pub kind: PartKind,
    /// Occupied rectangle in sheet coordinates.
    pub bounds: Rect2,
}

/// One stock sheet and its parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetLayout {
    /// Sheet number, from 0.
    pub index: usize,
    /// Minimum corner of the sheet in drawing coordinates.
    pub origin: Point2D,
    /// Parts on this sheet.
    pub placements: Vec<Placement>,
}

/// Bottom-left y of sheet `index` in the drawing.
pub fn sheet_offset(index: usize) -> f64 {
    index as f64 * (SHEET_HEIGHT + SHEET_GAP)
}

fn fits(w: f64, h: f64) -> bool {
    w <= SHEET_WIDTH - 2.0 * PADDING && h <= SHEET_HEIGHT - 2.0 * PADDING
}

/// Row-by-row packer. Parts go left to right; a part that would cross the
/// right edge starts a new row, a row that would cross the top edge starts a
/// new sheet.
#[derive(Debug)]
pub struct SheetPacker {
    sheets: Vec<(SheetLayout, Model)>,
    cur_x: f64,
    cur_y: f64,
    row_height: f64,
    warnings: Vec<LayoutWarning>,
}

impl Default for SheetPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetPacker {
    /// A packer with one empty sheet.
    pub fn new() -> Self {
        let mut packer = Self {
            sheets: Vec::new(),
            cur_x: PADDING,
            cur_y: PADDING,
            row_height: 0.0,
            warnings: Vec::new(),
        };
        packer.open_sheet();
        packer
    }

    fn open_sheet(&mut self) {
        let index = self.sheets.len();
        let origin = Point2D::new(0.0, sheet_offset(index));
        let mut model = Model::new(format!("sheet-{index}"), PartKind::Sheet)
            .with_shape(Shape::rectangle(Point2D::ORIGIN, SHEET_WIDTH, SHEET_HEIGHT));
        model.origin = origin;
        self.sheets.push((
            SheetLayout {
                index,
                origin,
                placements: Vec::new(),
            },
            model,
        ));
        self.cur_x = PADDING;
        self.cur_y = PADDING;
        self.row_height = 0.0;
    }

    fn current_is_empty(&self) -> bool {
        self.sheets
            .last()
            .map_or(true, |(s, _)| s.placements.is_empty())
    }

    /// Start a new row unless the current one is empty.
    pub fn finish_row(&mut self) {
        if self.row_height > 0.0 {
            self.cur_x = PADDING;
            self.cur_y += self.row_height + PADDING;
            self.row_height = 0.0;
        }
    }

    /// Place `part` by its measured bounds. Returns the sheet index.
    ///
    /// A part larger than a sheet is placed anyway, unrotated, and reported.
    pub fn place(&mut self, mut part: Model) -> usize {
        let Some(bounds) = part.bounds() else {
            log::warn!("skipping empty part {}", part.name);
            return self.sheets.len() - 1;
        };
        if !fits(bounds.width(), bounds.height()) {
            log::warn!(
                "{} ({:.1} x {:.1} mm) is larger than a sheet, placing it anyway",
                part.name,
                bounds.width(),
                bounds.height()
            );
            self.warnings.push(LayoutWarning::Oversized {
                name: part.name.clone(),
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        let (w, h) = (bounds.width(), bounds.height());

        if self.cur_x + w > SHEET_WIDTH - PADDING && self.row_height > 0.0 {
            self.finish_row();
        }
        if self.cur_y + h > SHEET_HEIGHT - PADDING && !self.current_is_empty() {
            self.open_sheet();
        }

        let at = Point2D::new(self.cur_x, self.cur_y);
        // Shift the part so its bounds' minimum corner lands on the cursor.
        part.origin = Point2D::new(
            part.origin.x + at.x - bounds.min.x,
            part.origin.y + at.y - bounds.min.y,
        );
        let placed = Rect2::from_origin_size(at, w, h);
        self.cur_x += w + PADDING;
        self.row_height = self.row_height.max(h);

        let index = self.sheets.len() - 1;
        let (sheet, model) = &mut self.sheets[index];
        sheet.placements.push(Placement {
            name: part.name.clone(),
            kind: part.kind,
            bounds: placed,
        });
        model.children.push(part);
        index
    }

    /// Sheets with their models, and the warnings collected.
    pub fn finish(self) -> (Vec<(SheetLayout, Model)>, Vec<LayoutWarning>) {
        (self.sheets, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn part(name: &str, w: f64, h: f64) -> Model {
        Model::new(name, PartKind::Rib).with_shape(Shape::rectangle(Point2D::new(-w / 2.0, -h / 2.0), w, h))
    }

    #[test]
    fn test_row_wrap() {
        let mut p = SheetPacker::new();
        for i in 0..20 {
            p.place(part(&format!("p{i}"), 100.0, 100.0));
        }
        let (sheets, warnings) = p.finish();
        assert!(warnings.is_empty());
        assert_eq!(sheets.len(), 1);
        let placements = &sheets[0].0.placements;
        // (1220 - 15) / 115 → 10 per row.
        assert_eq!(placements[9].bounds.min.y, PADDING);
        assert_eq!(placements[10].bounds.min, Point2D::new(PADDING, PADDING + 115.0));
    }

    #[test]
    fn test_spill_to_new_sheet() {
        let mut p = SheetPacker::new();
        let a = p.place(part("a", 1000.0, 1500.0));
        let b = p.place(part("b", 1000.0, 1500.0));
        assert_eq!((a, b), (0, 1));
        let (sheets, _) = p.finish();
        assert_eq!(sheets[1].0.origin.y, SHEET_HEIGHT + SHEET_GAP);
        assert_eq!(sheets[1].0.placements[0].bounds.min, Point2D::new(PADDING, PADDING));
    }

    #[test]
    fn test_oversized_is_placed_and_reported() {
        let mut p = SheetPacker::new();
        p.place(part("huge", 3000.0, 3000.0));
        let (sheets, warnings) = p.finish();
        assert_eq!(sheets.len(), 1);
        assert!(matches!(&warnings[0], LayoutWarning::Oversized { name, .. } if name == "huge"));
    }

    #[test]
    fn test_wide_part_keeps_its_orientation() {
        let mut p = SheetPacker::new();
        p.place(part("small", 100.0, 100.0));
        p.place(part("wide", 1375.0, 500.0));
        let (sheets, warnings) = p.finish();
        assert_eq!(
            warnings,
            vec![LayoutWarning::Oversized {
                name: "wide".into(),
                width: 1375.0,
                height: 500.0
            }]
        );
        assert_eq!(sheets.len(), 1);
        // Wrapped to its own row, running past the right edge.
        let b = sheets[0].0.placements[1].bounds;
        assert_eq!(b.min, Point2D::new(PADDING, PADDING + 100.0 + PADDING));
        assert!((b.width() - 1375.0).abs() < 1e-9);
        assert!(b.max.x > SHEET_WIDTH);
        let placed = sheets[0].1.children[1].bounds().unwrap();
        assert!((placed.min.x - PADDING).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_no_overlap(sizes in prop::collection::vec((1.0f64..600.0, 1.0f64..900.0), 1..60)) {
            let mut p = SheetPacker::new();
            for (i, (w, h)) in sizes.iter().enumerate() {
                p.place(part(&format!("p{i}"), *w, *h));
            }
            let (sheets, _) = p.finish();
            let total: usize = sheets.iter().map(|(s, _)| s.placements.len()).sum();
            prop_assert_eq!(total, sizes.len());
            for (sheet, _) in &sheets {
                for (i, a) in sheet.placements.iter().enumerate() {
                    for b in &sheet.placements[i + 1..] {
                        prop_assert!(!a.bounds.overlaps(&b.bounds, 1e-9));
                    }
                    prop_assert!(a.bounds.max.x <= SHEET_WIDTH && a.bounds.max.y <= SHEET_HEIGHT);
                }
            }
        }
    }
}
