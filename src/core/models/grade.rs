//! Grade value

use crate::core::error::{RegistryError, Result};
use std::fmt;

/// An exam grade on the 2.00–6.00 scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Grade(f64);

impl Grade {
    /// Lowest grade on the scale
    pub const MIN: f64 = 2.00;
    /// Highest grade on the scale
    pub const MAX: f64 = 6.00;
    /// Lowest passing grade
    pub const PASSING: f64 = 3.00;

    /// Create a grade rounded to two decimals, validating the range
    ///
    /// Rounding happens first so the stored value is exactly the one written
    /// to records files and shown to the operator.
    ///
    /// # Errors
    /// Returns `GradeOutOfRange` when the rounded value is outside [2.00, 6.00]
    pub fn new(value: f64) -> Result<Self> {
        let value = (value * 100.0).round() / 100.0;
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RegistryError::GradeOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Numeric value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// A taken exam: grade of at least 3.00
    #[must_use]
    pub fn is_passing(self) -> bool {
        self.0 >= Self::PASSING
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
