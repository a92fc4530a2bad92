//! Reading cut files back and scoring them against a reference.
//!
//! Entities are grouped into shapes by shared endpoints, so a rib drawn as
//! loose LINE and ARC entities counts the same as one closed LWPOLYLINE.
//! Shapes are then classified by size into sheets, ribs and slots.

mod compare;
mod reader;

pub use compare::{bounding_box_overlap, compare, CompareReport};
pub use reader::{closed_entity_count, read_dxf, DxfEntity};

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use waveshelf_layout::Shape;
use waveshelf_math::Point2D;

use crate::error::InspectError;

/// Sheets are wider than this, in mm.
pub const SHEET_MIN_WIDTH: f64 = 1000.0;
/// Sheets are taller than this, in mm.
pub const SHEET_MIN_HEIGHT: f64 = 2000.0;
/// A slot side is within this distance of the material thickness.
pub const SLOT_THICKNESS_TOLERANCE: f64 = 5.0;
/// Slots have a smaller bounding-box area than this.
pub const SLOT_MAX_AREA: f64 = 10_000.0;
/// Ribs have a larger bounding-box area than this.
pub const RIB_MIN_AREA: f64 = 100.0;
/// Ribs are wider and taller than this.
pub const RIB_MIN_SIDE: f64 = 20.0;

/// Bulges smaller than this count as straight.
const BULGE_EPS: f64 = 0.001;

fn round_to(v: f64, decimals: i32) -> f64 {
    let k = 10f64.powi(decimals);
    (v * k).round() / k
}

/// One connected shape found in a drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeDescriptor {
    /// Entity type, or `POLYLINE` for a group of several entities.
    pub kind: String,
    /// Layer of the first entity.
    pub layer: String,
    /// Bounding-box width.
    pub width: f64,
    /// Bounding-box height.
    pub height: f64,
    /// Bounding-box minimum corner.
    pub min: Point2D,
    /// Bounding-box maximum corner.
    pub max: Point2D,
    /// Any arc segment.
    pub has_bulge: bool,
    /// Bounding-box area.
    pub area: f64,
    /// Total points over the group's entities.
    pub num_pts: usize,
}

/// Points of one entity used for grouping, for its box and its arcs.
struct RawShape<'a> {
    entity: &'a DxfEntity,
    pts: Vec<Point2D>,
    bbox_pts: Vec<Point2D>,
    has_bulge: bool,
}

impl<'a> RawShape<'a> {
    fn new(entity: &'a DxfEntity) -> Self {
        let around = |c: &Point2D, r: f64| vec![c.offset(-r, -r), c.offset(r, r)];
        let (pts, bbox_pts, has_bulge) = match &entity.shape {
            Shape::Polyline { vertices, .. } => {
                let pts: Vec<Point2D> = vertices.iter().map(|v| v.point).collect();
                let bulge = vertices.iter().any(|v| v.bulge.abs() > BULGE_EPS);
                (pts.clone(), pts, bulge)
            }
            Shape::Line { start, end } => (vec![*start, *end], vec![*start, *end], false),
            // The center stands in for the circle when grouping.
            Shape::Circle { center, radius } => (vec![*center], around(center, *radius), false),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let at = |deg: f64| {
                    let a = deg.to_radians();
                    center.offset(radius * a.cos(), radius * a.sin())
                };
                (
                    vec![at(*start_angle), at(*end_angle)],
                    around(center, *radius),
                    true,
                )
            }
        };
        Self {
            entity,
            pts,
            bbox_pts,
            has_bulge,
        }
    }
}

/// Disjoint sets over entity indices.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Endpoint key at 0.01 mm resolution.
fn point_key(p: &Point2D) -> (i64, i64) {
    ((p.x * 100.0).round() as i64, (p.y * 100.0).round() as i64)
}

/// Group entities that share an end point and describe each group.
///
/// Groups come out in order of their first entity.
pub fn describe_shapes(entities: &[DxfEntity]) -> Vec<ShapeDescriptor> {
    let raw: Vec<RawShape> = entities
        .iter()
        .map(RawShape::new)
        .filter(|r| !r.pts.is_empty())
        .collect();

    let mut uf = UnionFind::new(raw.len());
    let mut seen: HashMap<(i64, i64), usize> = HashMap::new();
    for (i, r) in raw.iter().enumerate() {
        let (Some(first), Some(last)) = (r.pts.first(), r.pts.last()) else {
            continue;
        };
        for key in [point_key(first), point_key(last)] {
            if let Some(&j) = seen.get(&key) {
                uf.union(i, j);
            }
            seen.insert(key, i);
        }
    }

    let mut order: Vec<Vec<usize>> = Vec::new();
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    for i in 0..raw.len() {
        let root = uf.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            order.push(Vec::new());
            order.len() - 1
        });
        order[slot].push(i);
    }

    order
        .iter()
        .filter_map(|members| {
            let first = raw.get(*members.first()?)?;
            let pts = members.iter().flat_map(|&i| raw[i].bbox_pts.iter());
            let (mut min, mut max) = (
                Point2D::new(f64::INFINITY, f64::INFINITY),
                Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            );
            for p in pts {
                min = Point2D::new(min.x.min(p.x), min.y.min(p.y));
                max = Point2D::new(max.x.max(p.x), max.y.max(p.y));
            }
            if !min.is_finite() || !max.is_finite() {
                return None;
            }
            let (w, h) = (max.x - min.x, max.y - min.y);
            let kind = if members.len() > 1 {
                "POLYLINE"
            } else {
                first.entity.type_name()
            };
            Some(ShapeDescriptor {
                kind: kind.to_string(),
                layer: first.entity.layer.clone(),
                width: round_to(w, 2),
                height: round_to(h, 2),
                min: Point2D::new(round_to(min.x, 2), round_to(min.y, 2)),
                max: Point2D::new(round_to(max.x, 2), round_to(max.y, 2)),
                has_bulge: members.iter().any(|&i| raw[i].has_bulge),
                area: round_to(w * h, 1),
                num_pts: members.iter().map(|&i| raw[i].pts.len()).sum(),
            })
        })
        .collect()
}

/// Shapes sorted into sheets, ribs and slots.
///
/// Ribs are everything large enough that is neither a sheet nor a slot, so
/// the backplane lands among them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Stock sheet outlines.
    pub sheets: Vec<ShapeDescriptor>,
    /// Rib and backplane outlines.
    pub ribs: Vec<ShapeDescriptor>,
    /// Slot cutouts.
    pub slots: Vec<ShapeDescriptor>,
    /// Shapes of any kind.
    pub total: usize,
}

fn is_sheet(s: &ShapeDescriptor) -> bool {
    s.width > SHEET_MIN_WIDTH && s.height > SHEET_MIN_HEIGHT
}

fn is_slot(s: &ShapeDescriptor, thickness: f64) -> bool {
    ((s.width - thickness).abs() < SLOT_THICKNESS_TOLERANCE
        || (s.height - thickness).abs() < SLOT_THICKNESS_TOLERANCE)
        && s.has_bulge
        && s.area < SLOT_MAX_AREA
}

/// Sort `shapes` for material `thickness`.
pub fn classify(shapes: &[ShapeDescriptor], thickness: f64) -> Classification {
    let sheets: Vec<_> = shapes.iter().filter(|s| is_sheet(s)).cloned().collect();
    let slots: Vec<_> = shapes
        .iter()
        .filter(|s| is_slot(s, thickness))
        .cloned()
        .collect();
    let ribs = shapes
        .iter()
        .filter(|s| !is_sheet(s) && !is_slot(s, thickness))
        .filter(|s| s.area > RIB_MIN_AREA && s.width > RIB_MIN_SIDE && s.height > RIB_MIN_SIDE)
        .cloned()
        .collect();
    Classification {
        sheets,
        ribs,
        slots,
        total: shapes.len(),
    }
}

/// Summary of one DXF file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// Entities read.
    pub entity_count: usize,
    /// Closed polylines and circles.
    pub closed_entities: usize,
    /// Entities per layer.
    pub layers: BTreeMap<String, usize>,
    /// Classified shapes.
    pub classification: Classification,
}

/// Read and classify a DXF document.
pub fn inspect(text: &str, thickness: f64) -> Result<InspectReport, InspectError> {
    let entities = read_dxf(text)?;
    let mut layers = BTreeMap::new();
    for e in &entities {
        *layers.entry(e.layer.clone()).or_insert(0) += 1;
    }
    let shapes = describe_shapes(&entities);
    Ok(InspectReport {
        entity_count: entities.len(),
        closed_entities: closed_entity_count(&entities),
        layers,
        classification: classify(&shapes, thickness),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveshelf_layout::Vertex;

    fn entity(layer: &str, shape: Shape) -> DxfEntity {
        DxfEntity {
            layer: layer.to_string(),
            shape,
        }
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> DxfEntity {
        entity(
            "0",
            Shape::Line {
                start: Point2D::new(x0, y0),
                end: Point2D::new(x1, y1),
            },
        )
    }

    #[test]
    fn test_loose_lines_group_into_one_shape() {
        let entities = vec![
            line(0.0, 0.0, 50.0, 0.0),
            line(50.0, 0.0, 50.0, 30.0),
            line(50.0, 30.0, 0.0, 30.0),
            line(0.0, 30.0, 0.001, 0.001),
            line(100.0, 100.0, 200.0, 100.0),
        ];
        let shapes = describe_shapes(&entities);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].kind, "POLYLINE");
        assert_eq!(shapes[0].num_pts, 8);
        assert_eq!(shapes[0].width, 50.0);
        assert_eq!(shapes[0].area, 1500.0);
        assert_eq!(shapes[1].kind, "LINE");
    }

    #[test]
    fn test_classification() {
        let entities = vec![
            entity("SHEET", Shape::rectangle(Point2D::ORIGIN, 1220.0, 2440.0)),
            entity("RIB", Shape::rectangle(Point2D::new(15.0, 15.0), 87.0, 75.0)),
            entity(
                "SLOT",
                Shape::Polyline {
                    vertices: vec![
                        Vertex::new(506.0, 476.0),
                        Vertex::with_bulge(506.0, 524.0, 1.0),
                        Vertex::new(494.0, 524.0),
                        Vertex::with_bulge(494.0, 476.0, 1.0),
                    ],
                    closed: true,
                },
            ),
            entity(
                "SLOT",
                Shape::Circle {
                    center: Point2D::new(700.0, 700.0),
                    radius: 6.0,
                },
            ),
            entity("RIB", Shape::rectangle(Point2D::new(300.0, 300.0), 10.0, 10.0)),
        ];
        let c = classify(&describe_shapes(&entities), 12.0);
        assert_eq!(c.total, 5);
        assert_eq!(c.sheets.len(), 1);
        assert_eq!(c.slots.len(), 1);
        // A bulge-free circle is not a slot and too small for a rib.
        assert_eq!(c.ribs.len(), 1);
        assert_eq!(c.ribs[0].layer, "RIB");
    }
}
