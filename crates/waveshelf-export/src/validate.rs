//! Pre-export checks on a laid-out model.

use waveshelf_layout::{Model, PartKind, PlacedShape, Shape};
use waveshelf_sketch::Polygon;

use crate::error::{ExportError, Result};

/// Kinds whose polylines bound a region that gets cut out.
fn is_region(kind: PartKind) -> bool {
    matches!(
        kind,
        PartKind::Sheet | PartKind::Rib | PartKind::Backplane | PartKind::Slot
    )
}

/// Check one placed shape.
pub fn validate_shape(placed: &PlacedShape) -> Result<()> {
    let path = || placed.path.clone();
    if !placed.shape.is_finite() {
        return Err(ExportError::NonFinite { path: path() });
    }
    match &placed.shape {
        Shape::Polyline { vertices, closed } if is_region(placed.kind) => {
            if !closed {
                return Err(ExportError::NotClosed { path: path() });
            }
            if vertices.len() < 2 {
                return Err(ExportError::TooFewVertices {
                    path: path(),
                    count: vertices.len(),
                });
            }
            if matches!(placed.kind, PartKind::Rib | PartKind::Backplane) {
                let poly = Polygon::new(vertices.iter().map(|v| v.point).collect());
                if poly.is_self_intersecting() {
                    return Err(ExportError::SelfIntersecting { path: path() });
                }
            }
        }
        Shape::Circle { radius, .. } | Shape::Arc { radius, .. } if !(*radius > 0.0) => {
            return Err(ExportError::BadRadius {
                path: path(),
                radius: *radius,
            });
        }
        _ => {}
    }
    Ok(())
}

/// Check every shape of `model`, returning them in world coordinates.
///
/// Stops at the first problem.
pub fn validate_model(model: &Model) -> Result<Vec<PlacedShape>> {
    let shapes = model.flatten();
    for placed in &shapes {
        validate_shape(placed)?;
    }
    log::debug!("validated {} shapes of {}", shapes.len(), model.name);
    Ok(shapes)
}
