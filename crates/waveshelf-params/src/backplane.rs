//! Backplane panel parameters.

use serde::{Deserialize, Serialize};

/// Outline of the backplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackplaneShape {
    /// Rounded rectangle around the whole rib row.
    #[default]
    Rectangular,
    /// Contour following the wave.
    Organic,
}

/// Cut style of the rib slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStyle {
    /// Rectangle with semicircular ends.
    #[default]
    Stadium,
    /// Square-ended slot with corner relief arcs.
    Dogbone,
}

/// The single slotted panel all ribs mount into. Lengths are in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackplaneParams {
    /// Emit a backplane and rib tabs.
    pub enabled: bool,
    /// Outline variant.
    pub shape: BackplaneShape,
    /// Sheet thickness; also the slot width.
    pub material_thickness: f64,
    /// Slot length.
    pub slot_depth: f64,
    /// Corner relief radius for [`SlotStyle::Dogbone`].
    pub dogbone_radius: f64,
    /// Clearance between the ribs and the organic outline.
    pub organic_offset: f64,
    /// One slot per wave sample; otherwise `manual_slot_positions` is used.
    pub auto_slots: bool,
    /// Normalized path positions of manually placed slots.
    pub manual_slot_positions: Vec<f64>,
    /// Wave sample indices that get no slot in auto mode.
    pub excluded_slots: Vec<usize>,
    /// Slot cut style.
    pub slot_style: SlotStyle,
    /// Corner radius of the rectangular outline.
    pub corner_radius: f64,
    /// Margin around the ribs for the rectangular outline.
    pub margin: f64,
}

impl Default for BackplaneParams {
    fn default() -> Self {
        Self {
            enabled: true,
            shape: BackplaneShape::Rectangular,
            material_thickness: 12.0,
            slot_depth: 60.0,
            dogbone_radius: 3.175,
            organic_offset: 30.0,
            auto_slots: true,
            manual_slot_positions: Vec::new(),
            excluded_slots: Vec::new(),
            slot_style: SlotStyle::Stadium,
            corner_radius: 20.0,
            margin: 50.0,
        }
    }
}

impl BackplaneParams {
    /// Copy with `index` added to the excluded slots.
    pub fn with_excluded_slot(&self, index: usize) -> Self {
        let mut next = self.clone();
        if !next.excluded_slots.contains(&index) {
            next.excluded_slots.push(index);
            next.excluded_slots.sort_unstable();
        }
        next
    }

    /// Copy with the outline shape changed.
    pub fn with_shape(&self, shape: BackplaneShape) -> Self {
        Self {
            shape,
            ..self.clone()
        }
    }

    /// Copy switched to manual slots at `positions`.
    pub fn with_manual_slots(&self, positions: Vec<f64>) -> Self {
        Self {
            auto_slots: false,
            manual_slot_positions: positions,
            ..self.clone()
        }
    }
}
