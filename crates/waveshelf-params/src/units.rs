//! Physical lengths in inches or millimeters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Inches.
    Inch,
    /// Millimeters.
    #[default]
    Millimeter,
}

impl Unit {
    /// Millimeters in one of this unit.
    pub fn mm_factor(self) -> f64 {
        match self {
            Unit::Inch => MM_PER_INCH,
            Unit::Millimeter => 1.0,
        }
    }

    /// Short suffix for display.
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Inch => "in",
            Unit::Millimeter => "mm",
        }
    }
}

/// A length with its unit. Immutable; every change yields a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLength {
    /// Magnitude in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: Unit,
}

impl PhysicalLength {
    /// A length in `unit`.
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A length in millimeters.
    pub const fn mm(value: f64) -> Self {
        Self::new(value, Unit::Millimeter)
    }

    /// A length in inches.
    pub const fn inches(value: f64) -> Self {
        Self::new(value, Unit::Inch)
    }

    /// Canonical millimeter value.
    pub fn to_mm(&self) -> f64 {
        to_mm(self.value, self.unit)
    }

    /// Express `mm` millimeters in `unit`.
    pub fn from_mm(mm: f64, unit: Unit) -> Self {
        Self::new(to_physical(mm, unit), unit)
    }

    /// The same length in another unit.
    pub fn convert(&self, unit: Unit) -> Self {
        Self::from_mm(self.to_mm(), unit)
    }

    /// Same unit, new magnitude.
    pub fn with_value(&self, value: f64) -> Self {
        Self::new(value, self.unit)
    }

    /// Strictly positive and finite.
    pub fn is_positive(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

impl fmt::Display for PhysicalLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Convert a value in `unit` to millimeters.
pub fn to_mm(value: f64, unit: Unit) -> f64 {
    value * unit.mm_factor()
}

/// Convert millimeters to a value in `unit`.
pub fn to_physical(mm: f64, unit: Unit) -> f64 {
    mm / unit.mm_factor()
}
