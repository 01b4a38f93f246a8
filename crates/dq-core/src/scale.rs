//! Linear mapping between numeric intervals (data space ↔ screen space)

use crate::Range;

/// Pair of intervals a value is mapped between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapping {
    pub old: Range,
    pub new: Range,
}

impl ScaleMapping {
    pub const fn new(old: Range, new: Range) -> Self {
        Self { old, new }
    }

    /// Same mapping in the opposite direction (pixel → data)
    pub const fn inverted(&self) -> Self {
        Self {
            old: self.new,
            new: self.old,
        }
    }
}

/// Affine map of `value` from `mapping.old` into `mapping.new`.
///
/// A zero-length `old` interval returns `zero` instead of dividing by zero.
pub fn scale(value: f64, mapping: &ScaleMapping, zero: f64) -> f64 {
    let ScaleMapping { old, new } = mapping;
    if old.max == old.min {
        return zero;
    }
    (value - old.min) * (new.max - new.min) / (old.max - old.min) + new.min
}

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;
}

/// Linear scale with an explicit degenerate-domain fallback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    mapping: ScaleMapping,
    zero: f64,
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            mapping: ScaleMapping::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)),
            zero: 0.0,
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.mapping.old = Range::new(min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.mapping.new = Range::new(min, max);
        self
    }

    /// Value returned when the domain (or, when inverting, the range) is
    /// zero-length
    pub fn zero(mut self, zero: f64) -> Self {
        self.zero = zero;
        self
    }

    pub fn domain_bounds(&self) -> Range {
        self.mapping.old
    }

    pub fn range_bounds(&self) -> Range {
        self.mapping.new
    }

    pub fn mapping(&self) -> ScaleMapping {
        self.mapping
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        scale(value, &self.mapping, self.zero)
    }

    fn invert(&self, value: f64) -> f64 {
        scale(value, &self.mapping.inverted(), self.zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_fixed_points() {
        let mappings = [
            ScaleMapping::new(Range::new(0.0, 10.0), Range::new(0.0, 500.0)),
            ScaleMapping::new(Range::new(-4.0, 4.0), Range::new(300.0, 20.0)),
            ScaleMapping::new(Range::new(1.7e12, 1.8e12), Range::new(60.0, 780.0)),
        ];
        for m in mappings {
            assert!((scale(m.old.min, &m, 0.0) - m.new.min).abs() < 1e-9);
            assert!((scale(m.old.max, &m, 0.0) - m.new.max).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scale_degenerate_domain() {
        let m = ScaleMapping::new(Range::new(5.0, 5.0), Range::new(0.0, 100.0));
        assert_eq!(scale(42.0, &m, 7.0), 7.0);
        assert_eq!(scale(5.0, &m, 7.0), 7.0);
    }

    #[test]
    fn test_scale_inverted_round_trip() {
        let m = ScaleMapping::new(Range::new(0.0, 10.0), Range::new(100.0, 0.0));
        let px = scale(2.5, &m, 0.0);
        assert_eq!(px, 75.0);
        assert_eq!(scale(px, &m.inverted(), 0.0), 2.5);
    }

    #[test]
    fn test_linear_scale() {
        let s = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);
        assert_eq!(s.scale(0.0), 0.0);
        assert_eq!(s.scale(50.0), 250.0);
        assert_eq!(s.scale(100.0), 500.0);
        assert_eq!(s.invert(250.0), 50.0);
    }

    #[test]
    fn test_linear_scale_zero_fallback() {
        let s = LinearScale::new().domain(3.0, 3.0).range(0.0, 80.0).zero(40.0);
        assert_eq!(s.scale(3.0), 40.0);
    }
}
