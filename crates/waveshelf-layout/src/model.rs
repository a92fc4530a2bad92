//! The 2D model graph handed to the vector encoders.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};
use waveshelf_math::{Point2D, Rect2};

/// What a model represents. Encoders map this to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// Root of a layout.
    Layout,
    /// Stock sheet boundary.
    Sheet,
    /// Rib outline.
    Rib,
    /// Backplane outline.
    Backplane,
    /// Slot cut in the backplane.
    Slot,
}

impl PartKind {
    /// Layer name used in exported drawings.
    pub fn layer(self) -> &'static str {
        match self {
            PartKind::Layout => "0",
            PartKind::Sheet => "SHEET",
            PartKind::Rib => "RIB",
            PartKind::Backplane => "BACKPLANE",
            PartKind::Slot => "SLOT",
        }
    }
}

/// A polyline vertex. `bulge` describes the segment to the next vertex:
/// `tan(θ/4)` of its included arc angle, positive counter-clockwise, 0 straight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position.
    pub point: Point2D,
    /// Bulge of the outgoing segment.
    pub bulge: f64,
}

impl Vertex {
    /// A straight-segment vertex.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point2D::new(x, y),
            bulge: 0.0,
        }
    }

    /// A vertex whose outgoing segment is an arc.
    pub fn with_bulge(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            point: Point2D::new(x, y),
            bulge,
        }
    }
}

/// Circular arc between two polyline vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    /// Arc center.
    pub center: Point2D,
    /// Arc radius.
    pub radius: f64,
    /// Angle of the start point, radians.
    pub start_angle: f64,
    /// Signed sweep, radians (positive counter-clockwise).
    pub sweep: f64,
}

impl BulgeArc {
    /// The arc from `p0` to `p1` with the given bulge, `None` if straight.
    pub fn from_bulge(p0: Point2D, p1: Point2D, bulge: f64) -> Option<Self> {
        let chord = p0.distance(&p1);
        if bulge.abs() < 1e-12 || chord < 1e-12 {
            return None;
        }
        let sweep = 4.0 * bulge.atan();
        let radius = chord * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
        // Signed distance from the chord midpoint to the center, to the left of p0→p1.
        let sagitta_offset = chord * (1.0 - bulge * bulge) / (4.0 * bulge);
        let mid = p0.lerp(&p1, 0.5);
        let (dx, dy) = ((p1.x - p0.x) / chord, (p1.y - p0.y) / chord);
        let center = Point2D::new(mid.x - dy * sagitta_offset, mid.y + dx * sagitta_offset);
        let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
        Some(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Point at fraction `f` of the sweep.
    pub fn point_at(&self, f: f64) -> Point2D {
        let a = self.start_angle + self.sweep * f;
        Point2D::new(
            self.center.x + self.radius * a.cos(),
            self.center.y + self.radius * a.sin(),
        )
    }

    /// Arc end points plus every axis extreme the arc passes through.
    pub fn extreme_points(&self) -> Vec<Point2D> {
        let mut out = vec![self.point_at(0.0), self.point_at(1.0)];
        let (lo, hi) = if self.sweep >= 0.0 {
            (self.start_angle, self.start_angle + self.sweep)
        } else {
            (self.start_angle + self.sweep, self.start_angle)
        };
        let mut k = (lo / FRAC_PI_2).ceil();
        while k * FRAC_PI_2 <= hi {
            let a = k * FRAC_PI_2;
            out.push(Point2D::new(
                self.center.x + self.radius * a.cos(),
                self.center.y + self.radius * a.sin(),
            ));
            k += 1.0;
        }
        out
    }
}

/// A drawable 2D entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Polyline with optional arc segments.
    Polyline {
        /// Vertices in order.
        vertices: Vec<Vertex>,
        /// Closing segment from the last vertex back to the first.
        closed: bool,
    },
    /// Full circle.
    Circle {
        /// Center.
        center: Point2D,
        /// Radius.
        radius: f64,
    },
    /// Line segment.
    Line {
        /// Start point.
        start: Point2D,
        /// End point.
        end: Point2D,
    },
    /// Counter-clockwise arc, angles in degrees.
    Arc {
        /// Center.
        center: Point2D,
        /// Radius.
        radius: f64,
        /// Start angle.
        start_angle: f64,
        /// End angle.
        end_angle: f64,
    },
}

impl Shape {
    /// A closed straight-edged polygon.
    pub fn closed_polygon(points: &[Point2D]) -> Self {
        Shape::Polyline {
            vertices: points
                .iter()
                .map(|p| Vertex {
                    point: *p,
                    bulge: 0.0,
                })
                .collect(),
            closed: true,
        }
    }

    /// Axis-aligned rectangle as one closed polyline.
    pub fn rectangle(min: Point2D, width: f64, height: f64) -> Self {
        Shape::closed_polygon(&[
            min,
            min.offset(width, 0.0),
            min.offset(width, height),
            min.offset(0.0, height),
        ])
    }

    /// Rectangle with arc corners as one closed 8-vertex polyline.
    ///
    /// Radii at or below zero give the plain 4-vertex rectangle.
    pub fn rounded_rectangle(min: Point2D, width: f64, height: f64, corner_radius: f64) -> Self {
        let r = corner_radius.min(width / 2.0).min(height / 2.0);
        if !(r > 1e-9) {
            return Shape::rectangle(min, width, height);
        }
        // tan(π/8): a quarter circle.
        let bulge = (PI / 8.0).tan();
        let (x1, y1) = (min.x, min.y);
        let (x2, y2) = (min.x + width, min.y + height);
        Shape::Polyline {
            vertices: vec![
                Vertex::new(x1 + r, y1),
                Vertex::with_bulge(x2 - r, y1, bulge),
                Vertex::new(x2, y1 + r),
                Vertex::with_bulge(x2, y2 - r, bulge),
                Vertex::new(x2 - r, y2),
                Vertex::with_bulge(x1 + r, y2, bulge),
                Vertex::new(x1, y2 - r),
                Vertex::with_bulge(x1, y1 + r, bulge),
            ],
            closed: true,
        }
    }

    /// Whether this entity encloses a region.
    pub fn is_closed(&self) -> bool {
        match self {
            Shape::Polyline { closed, .. } => *closed,
            Shape::Circle { .. } => true,
            Shape::Line { .. } | Shape::Arc { .. } => false,
        }
    }

    /// Shifted copy.
    pub fn translated(&self, dx: f64, dy: f64) -> Shape {
        match self {
            Shape::Polyline { vertices, closed } => Shape::Polyline {
                vertices: vertices
                    .iter()
                    .map(|v| Vertex {
                        point: v.point.offset(dx, dy),
                        bulge: v.bulge,
                    })
                    .collect(),
                closed: *closed,
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: center.offset(dx, dy),
                radius: *radius,
            },
            Shape::Line { start, end } => Shape::Line {
                start: start.offset(dx, dy),
                end: end.offset(dx, dy),
            },
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => Shape::Arc {
                center: center.offset(dx, dy),
                radius: *radius,
                start_angle: *start_angle,
                end_angle: *end_angle,
            },
        }
    }

    /// Tight bounds including arc bulges.
    pub fn bounds(&self) -> Option<Rect2> {
        match self {
            Shape::Polyline { vertices, closed } => {
                let mut pts: Vec<Point2D> = vertices.iter().map(|v| v.point).collect();
                let n = vertices.len();
                let segs = if *closed { n } else { n.saturating_sub(1) };
                for i in 0..segs {
                    let a = &vertices[i];
                    let b = &vertices[(i + 1) % n];
                    if let Some(arc) = BulgeArc::from_bulge(a.point, b.point, a.bulge) {
                        pts.extend(arc.extreme_points());
                    }
                }
                Rect2::from_points(&pts)
            }
            Shape::Circle { center, radius } => Some(Rect2::new(
                center.offset(-radius, -radius),
                center.offset(*radius, *radius),
            )),
            Shape::Line { start, end } => Some(Rect2::new(*start, *end)),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let start = start_angle.to_radians();
                let mut sweep = (end_angle - start_angle).to_radians().rem_euclid(TAU);
                if sweep == 0.0 {
                    sweep = TAU;
                }
                let arc = BulgeArc {
                    center: *center,
                    radius: *radius,
                    start_angle: start,
                    sweep,
                };
                Rect2::from_points(&arc.extreme_points())
            }
        }
    }

    /// All coordinates and radii are finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Polyline { vertices, .. } => vertices
                .iter()
                .all(|v| v.point.is_finite() && v.bulge.is_finite()),
            Shape::Circle { center, radius } => center.is_finite() && radius.is_finite(),
            Shape::Line { start, end } => start.is_finite() && end.is_finite(),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                center.is_finite()
                    && radius.is_finite()
                    && start_angle.is_finite()
                    && end_angle.is_finite()
            }
        }
    }
}

/// A node of the model graph: shapes in local coordinates, placed at `origin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Identifier, unique among siblings.
    pub name: String,
    /// What this node is.
    pub kind: PartKind,
    /// Offset applied to this node's shapes and children.
    pub origin: Point2D,
    /// Entities of this node.
    pub shapes: Vec<Shape>,
    /// Nested models.
    pub children: Vec<Model>,
}

/// A shape in world coordinates, tagged with its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedShape {
    /// Slash-separated path of model names.
    pub path: String,
    /// Owning model kind.
    pub kind: PartKind,
    /// The entity, translated to world coordinates.
    pub shape: Shape,
}

impl Model {
    /// An empty model at the origin.
    pub fn new(name: impl Into<String>, kind: PartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            origin: Point2D::ORIGIN,
            shapes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add a shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Bounds of shapes and children in this model's parent space.
    pub fn bounds(&self) -> Option<Rect2> {
        let local = self
            .shapes
            .iter()
            .filter_map(Shape::bounds)
            .chain(self.children.iter().filter_map(Model::bounds))
            .reduce(|a, b| a.union(&b))?;
        Some(local.translate(self.origin.x, self.origin.y))
    }

    /// Every shape in world coordinates, parents before children.
    pub fn flatten(&self) -> Vec<PlacedShape> {
        let mut out = Vec::new();
        self.flatten_into("", Point2D::ORIGIN, &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, offset: Point2D, out: &mut Vec<PlacedShape>) {
        let path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{prefix}/{}", self.name)
        };
        let at = offset.offset(self.origin.x, self.origin.y);
        for shape in &self.shapes {
            out.push(PlacedShape {
                path: path.clone(),
                kind: self.kind,
                shape: shape.translated(at.x, at.y),
            });
        }
        for child in &self.children {
            child.flatten_into(&path, at, out);
        }
    }

    /// Number of models of `kind` in this subtree.
    pub fn count(&self, kind: PartKind) -> usize {
        usize::from(self.kind == kind) + self.children.iter().map(|c| c.count(kind)).sum::<usize>()
    }
}
