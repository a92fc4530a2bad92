//! SVG export of cut layouts.
//!
//! Geometry is written in its native y-up millimeter coordinates inside a
//! group flipped with `scale(1,-1)`, so the picture matches the DXF. Closed
//! outlines become `path` elements ending in `z`; circles stay circles.

use svg::node::element::path::Data;
use svg::node::element::{Circle, Group, Line, Path};
use svg::Document;
use waveshelf_layout::{BulgeArc, Model, PartKind, PlacedShape, Shape, Vertex};
use waveshelf_math::{Point2D, Rect2};

use crate::error::Result;
use crate::validate::validate_model;

/// Blank border around the drawing, in mm.
pub const SVG_MARGIN: f64 = 10.0;

/// Layer groups in drawing order, with stroke colors.
const LAYER_STYLES: [(PartKind, &str); 5] = [
    (PartKind::Layout, "#000000"),
    (PartKind::Sheet, "#999999"),
    (PartKind::Rib, "#000000"),
    (PartKind::Backplane, "#0000ff"),
    (PartKind::Slot, "#ff0000"),
];

// `svg::Data` takes `f32` parameter lists.
fn params(values: &[f64]) -> Vec<f32> {
    values.iter().map(|v| *v as f32).collect()
}

fn arc_params(arc: &BulgeArc, to: Point2D) -> Vec<f32> {
    let large = if arc.sweep.abs() > std::f64::consts::PI { 1.0 } else { 0.0 };
    let sweep = if arc.sweep > 0.0 { 1.0 } else { 0.0 };
    params(&[arc.radius, arc.radius, 0.0, large, sweep, to.x, to.y])
}

/// Path data for a polyline, arcs included. `None` when there are no vertices.
pub fn polyline_data(vertices: &[Vertex], closed: bool) -> Option<Data> {
    let first = vertices.first()?;
    let n = vertices.len();
    let mut data = Data::new().move_to(params(&[first.point.x, first.point.y]));
    let segments = if closed { n } else { n - 1 };
    for i in 0..segments {
        let a = &vertices[i];
        let b = &vertices[(i + 1) % n];
        let closing = closed && i + 1 == n;
        match BulgeArc::from_bulge(a.point, b.point, a.bulge) {
            Some(arc) => data = data.elliptical_arc_to(arc_params(&arc, b.point)),
            // `z` draws the closing straight edge.
            None if closing => {}
            None => data = data.line_to(params(&[b.point.x, b.point.y])),
        }
    }
    if closed {
        data = data.close();
    }
    Some(data)
}

/// Path data for a counter-clockwise arc given in degrees.
pub fn arc_data(center: Point2D, radius: f64, start_angle: f64, end_angle: f64) -> Data {
    let point = |deg: f64| {
        let a = deg.to_radians();
        Point2D::new(center.x + radius * a.cos(), center.y + radius * a.sin())
    };
    let mut sweep = (end_angle - start_angle).rem_euclid(360.0);
    if sweep == 0.0 {
        sweep = 360.0;
    }
    let start = point(start_angle);
    let mut data = Data::new().move_to(params(&[start.x, start.y]));
    // A single SVG arc cannot return to its start point.
    let steps = if sweep > 180.0 { 2 } else { 1 };
    for k in 1..=steps {
        let to = point(start_angle + sweep * k as f64 / steps as f64);
        let large = if sweep / steps as f64 > 180.0 { 1.0 } else { 0.0 };
        data = data.elliptical_arc_to(params(&[radius, radius, 0.0, large, 1.0, to.x, to.y]));
    }
    data
}

fn add_shape(group: Group, shape: &Shape) -> Group {
    match shape {
        Shape::Polyline { vertices, closed } => match polyline_data(vertices, *closed) {
            Some(data) => group.add(Path::new().set("d", data)),
            None => group,
        },
        Shape::Circle { center, radius } => group.add(
            Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *radius),
        ),
        Shape::Line { start, end } => group.add(
            Line::new()
                .set("x1", start.x)
                .set("y1", start.y)
                .set("x2", end.x)
                .set("y2", end.y),
        ),
        Shape::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => group.add(Path::new().set(
            "d",
            arc_data(*center, *radius, *start_angle, *end_angle),
        )),
    }
}

/// Build an SVG document from shapes in world coordinates.
pub fn svg_document(shapes: &[PlacedShape]) -> Document {
    let bounds = shapes
        .iter()
        .filter_map(|s| s.shape.bounds())
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Rect2::new(Point2D::ORIGIN, Point2D::new(1.0, 1.0)));

    let mut flipped = Group::new().set("transform", "scale(1,-1)");
    for (kind, color) in LAYER_STYLES {
        let mut layer = Group::new()
            .set("id", kind.layer())
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", 0.5)
            .set("vector-effect", "non-scaling-stroke");
        let mut any = false;
        for placed in shapes.iter().filter(|s| s.kind == kind) {
            layer = add_shape(layer, &placed.shape);
            any = true;
        }
        if any {
            flipped = flipped.add(layer);
        }
    }

    let width = bounds.width() + 2.0 * SVG_MARGIN;
    let height = bounds.height() + 2.0 * SVG_MARGIN;
    Document::new()
        .set("width", format!("{width}mm"))
        .set("height", format!("{height}mm"))
        .set(
            "viewBox",
            (
                bounds.min.x - SVG_MARGIN,
                -bounds.max.y - SVG_MARGIN,
                width,
                height,
            ),
        )
        .add(flipped)
}

/// Validate `model` and encode it as SVG bytes.
pub fn export_svg(model: &Model) -> Result<Vec<u8>> {
    let shapes = validate_model(model)?;
    let text = svg_document(&shapes).to_string();
    log::debug!("svg: {} shapes, {} bytes", shapes.len(), text.len());
    Ok(text.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::path::Command;

    fn stadium() -> Vec<Vertex> {
        vec![
            Vertex::new(6.0, -24.0),
            Vertex::with_bulge(6.0, 24.0, 1.0),
            Vertex::new(-6.0, 24.0),
            Vertex::with_bulge(-6.0, -24.0, 1.0),
        ]
    }

    #[test]
    fn test_closed_polyline_ends_with_close() {
        let data = polyline_data(&stadium(), true).unwrap();
        assert!(matches!(data.last(), Some(Command::Close)));
        // Move, line, arc, line, arc back to the start, close.
        assert_eq!(data.len(), 6);
        let open = polyline_data(&stadium(), false).unwrap();
        assert!(!matches!(open.last(), Some(Command::Close)));
        assert!(polyline_data(&[], true).is_none());
    }

    #[test]
    fn test_straight_closing_edge_is_left_to_close() {
        let square: Vec<Vertex> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|(x, y)| Vertex::new(*x, *y))
            .collect();
        let data = polyline_data(&square, true).unwrap();
        // Move, three lines, close.
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn test_full_arc_is_split() {
        let data = arc_data(Point2D::ORIGIN, 5.0, 0.0, 360.0);
        assert_eq!(data.len(), 3);
        let quarter = arc_data(Point2D::ORIGIN, 5.0, 0.0, 90.0);
        assert_eq!(quarter.len(), 2);
    }

    #[test]
    fn test_document_layers_and_flip() {
        let mut model = Model::new("layout", PartKind::Layout);
        model.children.push(
            Model::new("rib-0", PartKind::Rib)
                .with_shape(Shape::rectangle(Point2D::ORIGIN, 100.0, 50.0)),
        );
        model.children.push(Model::new("slot-0", PartKind::Slot).with_shape(Shape::Circle {
            center: Point2D::new(20.0, 20.0),
            radius: 6.0,
        }));
        let text = String::from_utf8(export_svg(&model).unwrap()).unwrap();
        assert!(text.contains("scale(1,-1)"));
        assert!(text.contains("id=\"RIB\""));
        assert!(text.contains("id=\"SLOT\""));
        assert!(!text.contains("id=\"BACKPLANE\""));
        assert_eq!(text.matches("<path").count(), 1);
        assert_eq!(text.matches("<circle").count(), 1);
        assert!(text.contains("width=\"120mm\""));
    }
}
