//! Scoring a generated cut file against a reference one.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{classify, round_to, ShapeDescriptor};

/// Ribs with a larger bounding-box area are taken to be a backplane.
pub const BACKPLANE_MIN_AREA: f64 = 500_000.0;
/// An organic backplane outline has more points than this.
pub const ORGANIC_MIN_POINTS: usize = 50;
/// A rib outline with a tab has at least this many points.
pub const TABBED_MIN_POINTS: usize = 8;
/// Largest deviation of a slot's narrow side from the material thickness.
pub const SLOT_WIDTH_TOLERANCE: f64 = 3.0;
/// Tabbed ribs needed for full tab credit, at most.
const TAB_CREDIT_CAP: usize = 10;

/// Metrics comparing a generated drawing with a reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    /// Shapes in the generated file.
    pub shape_count_generated: usize,
    /// Shapes in the reference file.
    pub shape_count_reference: usize,
    /// Same number of shapes.
    pub shape_count_match: bool,
    /// Ribs in the generated file (backplane included).
    pub rib_count_generated: usize,
    /// Ribs in the reference file (backplane included).
    pub rib_count_reference: usize,
    /// Same number of ribs.
    pub rib_count_match: bool,
    /// Slots in the generated file.
    pub slot_count_generated: usize,
    /// Slots in the reference file.
    pub slot_count_reference: usize,
    /// Same number of slots.
    pub slot_count_match: bool,
    /// Sheets in the generated file.
    pub sheet_count_generated: usize,
    /// Sheets in the reference file.
    pub sheet_count_reference: usize,
    /// The generated file has a backplane.
    pub has_backplane_generated: bool,
    /// The reference file has a backplane.
    pub has_backplane_reference: bool,
    /// The generated backplane follows the wave.
    pub is_backplane_organic_generated: bool,
    /// The reference backplane follows the wave.
    pub is_backplane_organic_reference: bool,
    /// Tabbed ribs in the generated file.
    pub ribs_with_tabs_generated: usize,
    /// Tabbed ribs in the reference file.
    pub ribs_with_tabs_reference: usize,
    /// Intersection over union of the rib extents, percent.
    pub bounding_box_overlap_ribs: f64,
    /// Intersection over union of the slot extents, percent.
    pub bounding_box_overlap_slots: f64,
    /// Shared share of distinct rib areas (to 100 mm²), percent.
    pub size_distribution_match: f64,
    /// Every slot in both files is about one material thickness wide.
    pub slot_width_consistency: bool,
    /// Weighted score out of 100.
    pub overall_score: f64,
}

/// Intersection over union of the overall extents of two shape sets, in
/// percent with one decimal. 0 when either set is empty.
pub fn bounding_box_overlap(a: &[ShapeDescriptor], b: &[ShapeDescriptor]) -> f64 {
    let extent = |shapes: &[ShapeDescriptor]| {
        shapes.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), s| {
                (
                    x0.min(s.min.x),
                    y0.min(s.min.y),
                    x1.max(s.max.x),
                    y1.max(s.max.y),
                )
            },
        )
    };
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (ax0, ay0, ax1, ay1) = extent(a);
    let (bx0, by0, bx1, by1) = extent(b);
    let (ox0, ox1) = (ax0.max(bx0), ax1.min(bx1));
    let (oy0, oy1) = (ay0.max(by0), ay1.min(by1));
    if ox1 <= ox0 || oy1 <= oy0 {
        return 0.0;
    }
    let overlap = (ox1 - ox0) * (oy1 - oy0);
    let union = (ax1 - ax0) * (ay1 - ay0) + (bx1 - bx0) * (by1 - by0) - overlap;
    round_to(overlap / union.max(1.0) * 100.0, 1)
}

fn has_backplane(ribs: &[ShapeDescriptor]) -> bool {
    ribs.iter().any(|s| s.area > BACKPLANE_MIN_AREA)
}

fn has_organic_backplane(ribs: &[ShapeDescriptor]) -> bool {
    ribs.iter()
        .any(|s| s.area > BACKPLANE_MIN_AREA && s.num_pts > ORGANIC_MIN_POINTS)
}

fn tabbed(ribs: &[ShapeDescriptor]) -> usize {
    ribs.iter()
        .filter(|s| s.area < BACKPLANE_MIN_AREA && s.num_pts >= TABBED_MIN_POINTS)
        .count()
}

fn size_distribution_match(a: &[ShapeDescriptor], b: &[ShapeDescriptor]) -> f64 {
    let sizes = |shapes: &[ShapeDescriptor]| -> BTreeSet<i64> {
        shapes
            .iter()
            .map(|s| (s.area / 100.0).round() as i64)
            .collect()
    };
    let (sa, sb) = (sizes(a), sizes(b));
    if sa.is_empty() || sb.is_empty() {
        return 0.0;
    }
    let common = sa.intersection(&sb).count();
    let total = sa.union(&sb).count();
    round_to(common as f64 / total.max(1) as f64 * 100.0, 1)
}

fn slots_consistent(slots: &[ShapeDescriptor], thickness: f64) -> bool {
    slots
        .iter()
        .all(|s| (s.width.min(s.height) - thickness).abs() < SLOT_WIDTH_TOLERANCE)
}

/// Share of `reference` reached by `generated`, scaled to `weight`.
fn count_score(generated: usize, reference: usize, weight: f64) -> f64 {
    (weight * generated.min(reference) as f64 / reference.max(1) as f64).min(weight)
}

/// Compare shapes of a generated drawing with a reference drawing.
pub fn compare(
    generated: &[ShapeDescriptor],
    reference: &[ShapeDescriptor],
    thickness: f64,
) -> CompareReport {
    let ours = classify(generated, thickness);
    let theirs = classify(reference, thickness);

    let slot_width_consistency = !ours.slots.is_empty()
        && !theirs.slots.is_empty()
        && slots_consistent(&ours.slots, thickness)
        && slots_consistent(&theirs.slots, thickness);

    let mut report = CompareReport {
        shape_count_generated: ours.total,
        shape_count_reference: theirs.total,
        shape_count_match: ours.total == theirs.total,
        rib_count_generated: ours.ribs.len(),
        rib_count_reference: theirs.ribs.len(),
        rib_count_match: ours.ribs.len() == theirs.ribs.len(),
        slot_count_generated: ours.slots.len(),
        slot_count_reference: theirs.slots.len(),
        slot_count_match: ours.slots.len() == theirs.slots.len(),
        sheet_count_generated: ours.sheets.len(),
        sheet_count_reference: theirs.sheets.len(),
        has_backplane_generated: has_backplane(&ours.ribs),
        has_backplane_reference: has_backplane(&theirs.ribs),
        is_backplane_organic_generated: has_organic_backplane(&ours.ribs),
        is_backplane_organic_reference: has_organic_backplane(&theirs.ribs),
        ribs_with_tabs_generated: tabbed(&ours.ribs),
        ribs_with_tabs_reference: tabbed(&theirs.ribs),
        bounding_box_overlap_ribs: bounding_box_overlap(&ours.ribs, &theirs.ribs),
        bounding_box_overlap_slots: bounding_box_overlap(&ours.slots, &theirs.slots),
        size_distribution_match: size_distribution_match(&ours.ribs, &theirs.ribs),
        slot_width_consistency,
        overall_score: 0.0,
    };
    report.overall_score = overall_score(&report);
    report
}

fn overall_score(r: &CompareReport) -> f64 {
    let flag = |on: bool, weight: f64| if on { weight } else { 0.0 };
    let tabs_needed = r.rib_count_reference.min(TAB_CREDIT_CAP);
    let score = flag(r.slot_count_generated > 0, 15.0)
        + flag(r.rib_count_generated > 0, 15.0)
        + flag(r.has_backplane_generated, 10.0)
        + flag(r.is_backplane_organic_generated, 15.0)
        + flag(r.ribs_with_tabs_generated >= tabs_needed, 15.0)
        + count_score(r.rib_count_generated, r.rib_count_reference, 15.0)
        + count_score(r.slot_count_generated, r.slot_count_reference, 15.0);
    round_to(score, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use waveshelf_math::Point2D;

    fn shape(x: f64, y: f64, w: f64, h: f64, pts: usize, bulge: bool) -> ShapeDescriptor {
        ShapeDescriptor {
            kind: "LWPOLYLINE".into(),
            layer: "0".into(),
            width: w,
            height: h,
            min: Point2D::new(x, y),
            max: Point2D::new(x + w, y + h),
            has_bulge: bulge,
            area: w * h,
            num_pts: pts,
        }
    }

    fn drawing(ribs: usize, slots: usize, organic: bool) -> Vec<ShapeDescriptor> {
        let mut out = vec![shape(0.0, 0.0, 1220.0, 2440.0, 4, false)];
        out.extend((0..ribs).map(|i| shape(15.0 + 102.0 * i as f64, 15.0, 87.0, 75.0, 8, false)));
        out.push(shape(15.0, 105.0, 1375.0, 500.0, if organic { 180 } else { 8 }, true));
        out.extend((0..slots).map(|i| shape(100.0 + 100.0 * i as f64, 300.0, 12.0, 48.0, 4, true)));
        out
    }

    #[test]
    fn test_identical_drawings() {
        let d = drawing(11, 10, false);
        let r = compare(&d, &d, 12.0);
        assert!(r.shape_count_match && r.rib_count_match && r.slot_count_match);
        // Eleven ribs plus the backplane.
        assert_eq!(r.rib_count_generated, 12);
        assert_eq!(r.ribs_with_tabs_generated, 11);
        assert!(r.has_backplane_generated);
        assert!(!r.is_backplane_organic_generated);
        assert_eq!(r.bounding_box_overlap_ribs, 100.0);
        assert_eq!(r.size_distribution_match, 100.0);
        assert!(r.slot_width_consistency);
        // Everything but the organic credit.
        assert_relative_eq!(r.overall_score, 85.0);
    }

    #[test]
    fn test_partial_match() {
        let generated = drawing(5, 4, true);
        let reference = drawing(11, 10, false);
        let r = compare(&generated, &reference, 12.0);
        assert!(!r.rib_count_match);
        assert!(r.is_backplane_organic_generated);
        // 15 + 15 + 10 + 15, no tab credit (5 < 10), 15·6/12 + 15·4/10
        assert_relative_eq!(r.overall_score, 68.5);
    }

    #[test]
    fn test_disjoint_extents() {
        let a = vec![shape(0.0, 0.0, 10.0, 10.0, 4, false)];
        let b = vec![shape(100.0, 100.0, 10.0, 10.0, 4, false)];
        assert_eq!(bounding_box_overlap(&a, &b), 0.0);
        assert_eq!(bounding_box_overlap(&a, &[]), 0.0);
        let c = vec![shape(5.0, 0.0, 10.0, 10.0, 4, false)];
        // 50 / (100 + 100 - 50)
        assert_relative_eq!(bounding_box_overlap(&a, &c), 33.3);
    }
}
