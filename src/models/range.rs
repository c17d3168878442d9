use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed acceptable interval for one measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive of both bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let range = Range::new(18.0, 27.0);
        assert!(range.contains(18.0));
        assert!(range.contains(27.0));
        assert!(range.contains(22.5));
        assert!(!range.contains(17.9));
        assert!(!range.contains(27.1));
    }

    #[test]
    fn inverted_range_is_invalid() {
        assert!(!Range::new(30.0, 10.0).is_valid());
        assert!(!Range::new(f64::NAN, 10.0).is_valid());
        assert!(Range::new(10.0, 10.0).is_valid());
    }
}
