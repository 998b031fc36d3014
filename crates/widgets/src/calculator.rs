use crate::slider::RangeSlider;
use serde::Serialize;

/// `value × multiplier` with both operands on sliders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterCalculator {
    value: RangeSlider,
    multiplier: RangeSlider,
}

impl Default for ParameterCalculator {
    fn default() -> Self {
        Self {
            value: RangeSlider::new(0.0, 100.0, 1.0, 50.0),
            multiplier: RangeSlider::new(0.1, 5.0, 0.1, 2.0),
        }
    }
}

impl ParameterCalculator {
    pub fn value(&self) -> f64 {
        self.value.value()
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier.value()
    }

    pub fn set_value(&mut self, v: f64) -> f64 {
        self.value.set(v)
    }

    pub fn set_multiplier(&mut self, v: f64) -> f64 {
        self.multiplier.set(v)
    }

    pub fn result(&self) -> f64 {
        self.value() * self.multiplier()
    }

    /// Value scaled to `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        self.value() / 100.0
    }

    pub fn formula(&self) -> String {
        format!(
            "{} × {} = {:.1}",
            self.value(),
            self.multiplier(),
            self.result()
        )
    }
}
