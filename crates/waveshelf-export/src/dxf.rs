//! DXF export for CNC cut layouts.
//!
//! Writes AutoCAD 2000 (AC1015) ASCII DXF in millimeters. Every part kind
//! gets its own layer so the shop can assign tool paths per layer:
//! - SHEET: stock sheet outlines (reference only)
//! - RIB: rib outlines
//! - BACKPLANE: backplane outline
//! - SLOT: slots cut into the backplane

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use waveshelf_layout::{Model, PartKind, Shape, Vertex};

use crate::error::Result;
use crate::validate::validate_model;

/// Layers written to the LAYER table, with their ACI colors.
const LAYERS: [(PartKind, u8); 4] = [
    (PartKind::Sheet, 8),
    (PartKind::Rib, 7),
    (PartKind::Backplane, 5),
    (PartKind::Slot, 1),
];

/// One entity and its layer.
#[derive(Debug, Clone)]
struct Entity {
    layer: &'static str,
    shape: Shape,
}

/// DXF document builder.
#[derive(Debug, Clone, Default)]
pub struct DxfDocument {
    entities: Vec<Entity>,
}

impl DxfDocument {
    /// Create a new empty DXF document.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document holding every shape of `model` in world coordinates.
    ///
    /// The model is validated first; nothing is built if it fails.
    pub fn from_model(model: &Model) -> Result<Self> {
        let mut doc = Self::new();
        for placed in validate_model(model)? {
            doc.add_shape(placed.kind.layer(), placed.shape);
        }
        Ok(doc)
    }

    /// Add a shape on `layer`.
    pub fn add_shape(&mut self, layer: &'static str, shape: Shape) {
        self.entities.push(Entity { layer, shape });
    }

    /// Number of entities.
    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    /// Number of closed entities (closed polylines and circles).
    pub fn num_closed(&self) -> usize {
        self.entities.iter().filter(|e| e.shape.is_closed()).count()
    }

    /// Export to a DXF file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.export_to_writer(writer)
    }

    /// Export to a writer.
    pub fn export_to_writer(&self, mut writer: impl Write) -> std::io::Result<()> {
        self.write_header(&mut writer)?;
        self.write_tables(&mut writer)?;
        self.write_entities(&mut writer)?;

        writeln!(writer, "0")?;
        writeln!(writer, "EOF")?;
        writer.flush()
    }

    /// Export to an in-memory buffer.
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.export_to_writer(&mut buf)?;
        Ok(buf)
    }

    fn write_header(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "HEADER")?;

        writeln!(writer, "9")?;
        writeln!(writer, "$ACADVER")?;
        writeln!(writer, "1")?;
        writeln!(writer, "AC1015")?;

        // Units = millimeters
        writeln!(writer, "9")?;
        writeln!(writer, "$INSUNITS")?;
        writeln!(writer, "70")?;
        writeln!(writer, "4")?;

        writeln!(writer, "9")?;
        writeln!(writer, "$MEASUREMENT")?;
        writeln!(writer, "70")?;
        writeln!(writer, "1")?;

        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;

        Ok(())
    }

    fn write_tables(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "TABLES")?;

        writeln!(writer, "0")?;
        writeln!(writer, "TABLE")?;
        writeln!(writer, "2")?;
        writeln!(writer, "LAYER")?;
        writeln!(writer, "70")?;
        writeln!(writer, "{}", LAYERS.len())?;

        for (kind, color) in LAYERS {
            writeln!(writer, "0")?;
            writeln!(writer, "LAYER")?;
            writeln!(writer, "2")?;
            writeln!(writer, "{}", kind.layer())?;
            writeln!(writer, "70")?;
            writeln!(writer, "0")?;
            writeln!(writer, "62")?;
            writeln!(writer, "{color}")?;
            writeln!(writer, "6")?;
            writeln!(writer, "CONTINUOUS")?;
        }

        writeln!(writer, "0")?;
        writeln!(writer, "ENDTAB")?;

        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;

        Ok(())
    }

    fn write_entities(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "ENTITIES")?;

        for entity in &self.entities {
            match &entity.shape {
                Shape::Polyline { vertices, closed } => {
                    self.write_polyline(writer, entity.layer, vertices, *closed)?;
                }
                Shape::Circle { center, radius } => {
                    writeln!(writer, "0")?;
                    writeln!(writer, "CIRCLE")?;
                    writeln!(writer, "8")?;
                    writeln!(writer, "{}", entity.layer)?;
                    writeln!(writer, "10")?;
                    writeln!(writer, "{:.6}", center.x)?;
                    writeln!(writer, "20")?;
                    writeln!(writer, "{:.6}", center.y)?;
                    writeln!(writer, "40")?;
                    writeln!(writer, "{:.6}", radius)?;
                }
                Shape::Line { start, end } => {
                    writeln!(writer, "0")?;
                    writeln!(writer, "LINE")?;
                    writeln!(writer, "8")?;
                    writeln!(writer, "{}", entity.layer)?;
                    writeln!(writer, "10")?;
                    writeln!(writer, "{:.6}", start.x)?;
                    writeln!(writer, "20")?;
                    writeln!(writer, "{:.6}", start.y)?;
                    writeln!(writer, "11")?;
                    writeln!(writer, "{:.6}", end.x)?;
                    writeln!(writer, "21")?;
                    writeln!(writer, "{:.6}", end.y)?;
                }
                Shape::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    writeln!(writer, "0")?;
                    writeln!(writer, "ARC")?;
                    writeln!(writer, "8")?;
                    writeln!(writer, "{}", entity.layer)?;
                    writeln!(writer, "10")?;
                    writeln!(writer, "{:.6}", center.x)?;
                    writeln!(writer, "20")?;
                    writeln!(writer, "{:.6}", center.y)?;
                    writeln!(writer, "40")?;
                    writeln!(writer, "{:.6}", radius)?;
                    writeln!(writer, "50")?;
                    writeln!(writer, "{:.6}", start_angle)?;
                    writeln!(writer, "51")?;
                    writeln!(writer, "{:.6}", end_angle)?;
                }
            }
        }

        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;

        Ok(())
    }

    fn write_polyline(
        &self,
        writer: &mut impl Write,
        layer: &str,
        vertices: &[Vertex],
        closed: bool,
    ) -> std::io::Result<()> {
        if vertices.is_empty() {
            return Ok(());
        }

        writeln!(writer, "0")?;
        writeln!(writer, "LWPOLYLINE")?;
        writeln!(writer, "8")?;
        writeln!(writer, "{layer}")?;
        writeln!(writer, "90")?;
        writeln!(writer, "{}", vertices.len())?;
        writeln!(writer, "70")?;
        writeln!(writer, "{}", if closed { 1 } else { 0 })?;

        for v in vertices {
            writeln!(writer, "10")?;
            writeln!(writer, "{:.6}", v.point.x)?;
            writeln!(writer, "20")?;
            writeln!(writer, "{:.6}", v.point.y)?;
            if v.bulge != 0.0 {
                writeln!(writer, "42")?;
                writeln!(writer, "{:.6}", v.bulge)?;
            }
        }

        Ok(())
    }
}

/// Validate `model` and encode it as DXF bytes.
pub fn export_dxf(model: &Model) -> Result<Vec<u8>> {
    let doc = DxfDocument::from_model(model)?;
    let bytes = doc.to_bytes()?;
    log::debug!(
        "dxf: {} entities ({} closed), {} bytes",
        doc.num_entities(),
        doc.num_closed(),
        bytes.len()
    );
    Ok(bytes)
}
