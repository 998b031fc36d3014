//! Slider-driven sine wave `f(t) = A · sin(ωt + φ)`.

use crate::slider::RangeSlider;
use anyhow::Result;
use plotters::prelude::*;
use serde::Serialize;
use std::f64::consts::PI;
use std::path::Path;

/// Samples taken across the plotted domain, inclusive of both ends.
pub const WAVE_SAMPLES: usize = 200;
/// Plotted time domain is `[0, WAVE_SPAN]`.
pub const WAVE_SPAN: f64 = 4.0 * PI;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaveWidget {
    amplitude: RangeSlider,
    frequency: RangeSlider,
    phase: RangeSlider,
}

impl Default for WaveWidget {
    fn default() -> Self {
        Self {
            amplitude: RangeSlider::new(0.1, 3.0, 0.1, 1.0),
            frequency: RangeSlider::new(0.1, 3.0, 0.1, 1.0),
            phase: RangeSlider::new(-PI, PI, 0.1, 0.0),
        }
    }
}

impl WaveWidget {
    pub fn amplitude(&self) -> f64 {
        self.amplitude.value()
    }

    pub fn frequency(&self) -> f64 {
        self.frequency.value()
    }

    pub fn phase(&self) -> f64 {
        self.phase.value()
    }

    pub fn set_amplitude(&mut self, v: f64) -> f64 {
        self.amplitude.set(v)
    }

    pub fn set_frequency(&mut self, v: f64) -> f64 {
        self.frequency.set(v)
    }

    pub fn set_phase(&mut self, v: f64) -> f64 {
        self.phase.set(v)
    }

    pub fn eval(&self, t: f64) -> f64 {
        self.amplitude() * (self.frequency() * t + self.phase()).sin()
    }

    /// `(t, f(t))` pairs across `[0, 4π]`.
    pub fn samples(&self) -> Vec<(f64, f64)> {
        (0..=WAVE_SAMPLES)
            .map(|i| {
                let t = i as f64 / WAVE_SAMPLES as f64 * WAVE_SPAN;
                (t, self.eval(t))
            })
            .collect()
    }

    pub fn formula(&self) -> String {
        format!(
            "f(t) = {:.1} × sin({:.1}t + {:.1})",
            self.amplitude(),
            self.frequency(),
            self.phase()
        )
    }

    pub fn render_svg(&self, output_path: &Path) -> Result<()> {
        let root = SVGBackend::new(output_path, (500, 300)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(self.formula(), ("sans-serif", 16))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..WAVE_SPAN, -3f64..3f64)?;

        chart
            .configure_mesh()
            .x_desc("Time (radians)")
            .y_desc("Amplitude")
            .draw()?;

        chart.draw_series(LineSeries::new(
            self.samples(),
            RGBColor(0x3b, 0x82, 0xf6).stroke_width(2),
        ))?;

        root.present()?;
        Ok(())
    }
}
