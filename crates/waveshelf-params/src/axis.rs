//! Per-axis rib size as a base length times a multiplier.

use serde::{Deserialize, Serialize};

use crate::units::{PhysicalLength, Unit};

/// Smallest allowed scale factor.
pub const MIN_FACTOR: f64 = 0.1;
/// Largest allowed scale factor.
pub const MAX_FACTOR: f64 = 10.0;

fn clamp_factor(f: f64) -> f64 {
    if f.is_finite() {
        f.clamp(MIN_FACTOR, MAX_FACTOR)
    } else {
        1.0
    }
}

/// One rib axis: a stored base length and a multiplier in `[0.1, 10]`.
///
/// The effective size is `base × factor`. Editing the displayed physical size
/// moves the factor; editing the factor leaves the base alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    /// Base length.
    pub physical: PhysicalLength,
    /// Multiplier applied to the base.
    pub factor: f64,
}

impl AxisScale {
    /// Axis with the given base and a factor of 1.
    pub fn new(physical: PhysicalLength) -> Self {
        Self {
            physical,
            factor: 1.0,
        }
    }

    /// Base length times factor, in mm.
    pub fn effective_mm(&self) -> f64 {
        self.physical.to_mm() * self.factor
    }

    /// The effective size expressed in the base's unit.
    pub fn displayed(&self) -> PhysicalLength {
        PhysicalLength::from_mm(self.effective_mm(), self.physical.unit)
    }

    /// New axis whose effective size matches `p`, unless the factor clamps.
    ///
    /// The base is re-expressed in `p`'s unit. A non-positive base cannot
    /// carry a ratio, so it is replaced by `p` with a factor of 1.
    pub fn update_from_physical(&self, p: PhysicalLength) -> Self {
        let base_mm = self.physical.to_mm();
        if !(base_mm.is_finite() && base_mm > 0.0) {
            return Self::new(p);
        }
        Self {
            physical: self.physical.convert(p.unit),
            factor: clamp_factor(p.to_mm() / base_mm),
        }
    }

    /// New axis with the factor set to `f` (clamped).
    pub fn update_from_factor(&self, f: f64) -> Self {
        Self {
            physical: self.physical,
            factor: clamp_factor(f),
        }
    }

    /// Same effective size, base shown in another unit.
    pub fn with_unit(&self, unit: Unit) -> Self {
        Self {
            physical: self.physical.convert(unit),
            factor: self.factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_update_from_physical() {
        let axis = AxisScale::new(PhysicalLength::mm(75.0));
        let next = axis.update_from_physical(PhysicalLength::mm(150.0));
        assert_relative_eq!(next.factor, 2.0);
        assert_relative_eq!(next.effective_mm(), 150.0);
        assert_relative_eq!(next.displayed().value, 150.0);
        // The original value is untouched.
        assert_eq!(axis.factor, 1.0);
    }

    #[test]
    fn test_update_changes_unit() {
        let axis = AxisScale::new(PhysicalLength::mm(50.8));
        let next = axis.update_from_physical(PhysicalLength::inches(4.0));
        assert_eq!(next.physical.unit, Unit::Inch);
        assert_relative_eq!(next.physical.value, 2.0, epsilon = 1e-9);
        assert_relative_eq!(next.effective_mm(), 101.6, epsilon = 1e-9);
    }

    #[test]
    fn test_factor_clamps() {
        let axis = AxisScale::new(PhysicalLength::mm(10.0));
        assert_eq!(axis.update_from_factor(50.0).factor, MAX_FACTOR);
        assert_eq!(axis.update_from_factor(0.0).factor, MIN_FACTOR);
        assert_eq!(axis.update_from_factor(f64::NAN).factor, 1.0);
        let huge = axis.update_from_physical(PhysicalLength::mm(1000.0));
        assert_eq!(huge.factor, MAX_FACTOR);
    }

    #[test]
    fn test_zero_base_is_replaced() {
        let axis = AxisScale::new(PhysicalLength::mm(0.0));
        let next = axis.update_from_physical(PhysicalLength::mm(40.0));
        assert_eq!(next, AxisScale::new(PhysicalLength::mm(40.0)));
    }

    proptest! {
        #[test]
        fn prop_physical_update_matches(base in 1.0f64..500.0, ratio in 0.11f64..9.9) {
            let axis = AxisScale::new(PhysicalLength::mm(base));
            let target = PhysicalLength::mm(base * ratio);
            let next = axis.update_from_physical(target);
            prop_assert!((next.effective_mm() - target.to_mm()).abs() < 1e-9 * target.to_mm());
        }

        #[test]
        fn prop_factor_update_matches(base in 1.0f64..500.0, f in 0.1f64..10.0) {
            let next = AxisScale::new(PhysicalLength::inches(base)).update_from_factor(f);
            prop_assert!((next.effective_mm() - base * 25.4 * f).abs() < 1e-9 * base * 25.4 * f);
        }
    }
}
