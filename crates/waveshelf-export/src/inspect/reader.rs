//! Minimal ASCII DXF reader for the entities the exporters write.
//!
//! Reads LWPOLYLINE, classic POLYLINE/VERTEX/SEQEND, LINE, CIRCLE and ARC
//! from the ENTITIES section. Everything else is skipped.

use waveshelf_layout::{Shape, Vertex};
use waveshelf_math::Point2D;

use crate::error::InspectError;

/// An entity read back from a DXF file.
#[derive(Debug, Clone, PartialEq)]
pub struct DxfEntity {
    /// Layer name (group 8).
    pub layer: String,
    /// Geometry.
    pub shape: Shape,
}

impl DxfEntity {
    /// DXF type name as written by the exporters.
    pub fn type_name(&self) -> &'static str {
        match self.shape {
            Shape::Polyline { .. } => "LWPOLYLINE",
            Shape::Circle { .. } => "CIRCLE",
            Shape::Line { .. } => "LINE",
            Shape::Arc { .. } => "ARC",
        }
    }
}

/// Split `text` into `(line, code, value)` group pairs.
fn group_pairs(text: &str) -> Result<Vec<(usize, i32, &str)>, InspectError> {
    let mut lines = text.lines().enumerate();
    let mut pairs = Vec::new();
    while let Some((i, code_line)) = lines.next() {
        let code_text = code_line.trim();
        if code_text.is_empty() {
            continue;
        }
        let code: i32 = code_text.parse().map_err(|_| InspectError::GroupCode {
            line: i + 1,
            value: code_text.to_string(),
        })?;
        let Some((_, value)) = lines.next() else {
            return Err(InspectError::MissingValue { line: i + 1, code });
        };
        pairs.push((i + 1, code, value.trim()));
    }
    Ok(pairs)
}

fn number(line: usize, code: i32, value: &str) -> Result<f64, InspectError> {
    value.parse().map_err(|_| InspectError::Number {
        line: line + 1,
        code,
        value: value.to_string(),
    })
}

/// Group values of the entity being read.
#[derive(Debug, Default)]
struct Pending {
    kind: String,
    layer: String,
    flags: i32,
    vertices: Vec<Vertex>,
    p: [f64; 2],
    q: [f64; 2],
    bulge: f64,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl Pending {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            layer: "0".to_string(),
            ..Default::default()
        }
    }

    fn apply(&mut self, line: usize, code: i32, value: &str) -> Result<(), InspectError> {
        let lw = self.kind == "LWPOLYLINE";
        match code {
            8 => self.layer = value.to_string(),
            70 => self.flags = number(line, code, value)? as i32,
            10 if lw => self.vertices.push(Vertex::new(number(line, code, value)?, 0.0)),
            20 if lw => {
                let y = number(line, code, value)?;
                if let Some(v) = self.vertices.last_mut() {
                    v.point.y = y;
                }
            }
            42 if lw => {
                let b = number(line, code, value)?;
                if let Some(v) = self.vertices.last_mut() {
                    v.bulge = b;
                }
            }
            10 => self.p[0] = number(line, code, value)?,
            20 => self.p[1] = number(line, code, value)?,
            11 => self.q[0] = number(line, code, value)?,
            21 => self.q[1] = number(line, code, value)?,
            42 => self.bulge = number(line, code, value)?,
            40 => self.radius = number(line, code, value)?,
            50 => self.start_angle = number(line, code, value)?,
            51 => self.end_angle = number(line, code, value)?,
            _ => {}
        }
        Ok(())
    }

    fn point(&self) -> Point2D {
        Point2D::new(self.p[0], self.p[1])
    }

    fn entity(self, shape: Shape) -> DxfEntity {
        DxfEntity {
            layer: self.layer,
            shape,
        }
    }
}

#[derive(Debug, Default)]
struct Reader {
    entities: Vec<DxfEntity>,
    /// Classic POLYLINE waiting for its VERTEX records.
    open_polyline: Option<Pending>,
}

impl Reader {
    fn finish(&mut self, mut pending: Pending) {
        let kind = std::mem::take(&mut pending.kind);
        match kind.as_str() {
            "LWPOLYLINE" => {
                let closed = pending.flags & 1 == 1;
                let vertices = std::mem::take(&mut pending.vertices);
                self.entities
                    .push(pending.entity(Shape::Polyline { vertices, closed }));
            }
            "LINE" => {
                let (start, end) = (pending.point(), Point2D::new(pending.q[0], pending.q[1]));
                self.entities.push(pending.entity(Shape::Line { start, end }));
            }
            "CIRCLE" => {
                let (center, radius) = (pending.point(), pending.radius);
                self.entities
                    .push(pending.entity(Shape::Circle { center, radius }));
            }
            "ARC" => {
                let shape = Shape::Arc {
                    center: pending.point(),
                    radius: pending.radius,
                    start_angle: pending.start_angle,
                    end_angle: pending.end_angle,
                };
                self.entities.push(pending.entity(shape));
            }
            "POLYLINE" => self.open_polyline = Some(pending),
            "VERTEX" => {
                if let Some(poly) = self.open_polyline.as_mut() {
                    poly.vertices.push(Vertex {
                        point: pending.point(),
                        bulge: pending.bulge,
                    });
                }
            }
            "SEQEND" => {
                if let Some(mut poly) = self.open_polyline.take() {
                    let closed = poly.flags & 1 == 1;
                    let vertices = std::mem::take(&mut poly.vertices);
                    self.entities.push(poly.entity(Shape::Polyline { vertices, closed }));
                }
            }
            other => log::debug!("skipping {other} entity"),
        }
    }
}

/// Read the supported entities of a DXF document, in file order.
pub fn read_dxf(text: &str) -> Result<Vec<DxfEntity>, InspectError> {
    let mut reader = Reader::default();
    let mut in_entities = false;
    let mut awaiting_section_name = false;
    let mut current: Option<Pending> = None;

    for (line, code, value) in group_pairs(text)? {
        if code == 0 {
            if let Some(pending) = current.take() {
                reader.finish(pending);
            }
            match value {
                "SECTION" => awaiting_section_name = true,
                "ENDSEC" => in_entities = false,
                _ if in_entities => current = Some(Pending::new(value)),
                _ => {}
            }
            continue;
        }
        if code == 2 && awaiting_section_name {
            awaiting_section_name = false;
            in_entities = value == "ENTITIES";
            continue;
        }
        if let Some(pending) = current.as_mut() {
            pending.apply(line, code, value)?;
        }
    }
    if let Some(pending) = current.take() {
        reader.finish(pending);
    }
    log::debug!("read {} DXF entities", reader.entities.len());
    Ok(reader.entities)
}

/// Number of closed entities: closed polylines and circles.
pub fn closed_entity_count(entities: &[DxfEntity]) -> usize {
    entities.iter().filter(|e| e.shape.is_closed()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0\nSECTION\n2\nHEADER\n9\n$INSUNITS\n70\n4\n0\nENDSEC\n\
0\nSECTION\n2\nENTITIES\n\
0\nLWPOLYLINE\n8\nSLOT\n90\n2\n70\n1\n10\n1.0\n20\n2.0\n42\n1.0\n10\n3.0\n20\n2.0\n42\n1.0\n\
0\nLINE\n8\nRIB\n10\n0\n20\n0\n11\n5\n21\n0\n\
0\nCIRCLE\n8\n0\n10\n4\n20\n4\n40\n2.5\n\
0\nPOLYLINE\n8\nRIB\n70\n1\n\
0\nVERTEX\n10\n0\n20\n0\n0\nVERTEX\n10\n1\n20\n0\n42\n0.5\n0\nVERTEX\n10\n1\n20\n1\n\
0\nSEQEND\n\
0\nENDSEC\n0\nEOF\n";

    #[test]
    fn test_read_entities() {
        let entities = read_dxf(SAMPLE).unwrap();
        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0].layer, "SLOT");
        assert_eq!(
            entities[0].shape,
            Shape::Polyline {
                vertices: vec![
                    Vertex::with_bulge(1.0, 2.0, 1.0),
                    Vertex::with_bulge(3.0, 2.0, 1.0)
                ],
                closed: true,
            }
        );
        assert_eq!(entities[1].type_name(), "LINE");
        assert!(matches!(entities[2].shape, Shape::Circle { radius, .. } if radius == 2.5));
        let Shape::Polyline { vertices, closed } = &entities[3].shape else {
            panic!("classic polyline should be read");
        };
        assert!(closed);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].bulge, 0.5);
        assert_eq!(closed_entity_count(&entities), 3);
    }

    #[test]
    fn test_header_values_are_not_entities() {
        let entities = read_dxf("0\nSECTION\n2\nHEADER\n9\n$X\n10\n1\n0\nENDSEC\n0\nEOF\n").unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_bad_input_reports_line() {
        let err = read_dxf("0\nSECTION\n2\nENTITIES\nzero\nLINE\n").unwrap_err();
        assert_eq!(
            err,
            InspectError::GroupCode {
                line: 5,
                value: "zero".into()
            }
        );
        let err = read_dxf("0\nSECTION\n2\nENTITIES\n0\nCIRCLE\n40\nwide\n").unwrap_err();
        assert!(matches!(err, InspectError::Number { line: 8, code: 40, .. }));
        assert!(matches!(
            read_dxf("0\n"),
            Err(InspectError::MissingValue { line: 1, code: 0 })
        ));
    }
}
