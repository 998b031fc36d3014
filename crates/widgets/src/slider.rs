use serde::{Deserialize, Serialize};

/// A bounded value that snaps to a step grid anchored at `min`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl RangeSlider {
    /// Bounds are swapped if given in the wrong order; a non-positive step
    /// disables snapping. The initial value is clamped but not snapped.
    pub fn new(min: f64, max: f64, step: f64, value: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let value = if value.is_finite() { value.clamp(min, max) } else { min };
        Self {
            min,
            max,
            step,
            value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Clamp and snap `value`; returns the value actually stored.
    pub fn set(&mut self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { self.value };
        let mut v = value.clamp(self.min, self.max);
        if self.step > 0.0 {
            let steps = ((v - self.min) / self.step).round();
            v = (self.min + steps * self.step).min(self.max);
            // drop float noise like 0.30000000000000004
            v = ((v * 1e9).round() / 1e9).clamp(self.min, self.max);
        }
        self.value = v;
        v
    }

    /// Position within the range in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_snaps() {
        let mut s = RangeSlider::new(0.1, 3.0, 0.1, 1.0);
        assert_eq!(s.set(7.0), 3.0);
        assert_eq!(s.set(-2.0), 0.1);
        assert_eq!(s.set(1.234), 1.2);
        assert_eq!(s.set(f64::NAN), 1.2);
    }

    #[test]
    fn integer_steps() {
        let mut s = RangeSlider::new(0.0, 100.0, 1.0, 50.0);
        assert_eq!(s.set(42.6), 43.0);
        assert_eq!(s.fraction(), 0.43);
    }

    #[test]
    fn swapped_bounds_are_fixed() {
        let s = RangeSlider::new(5.0, 1.0, 0.0, 3.3);
        assert_eq!((s.min(), s.max()), (1.0, 5.0));
        assert_eq!(s.value(), 3.3);
    }
}
