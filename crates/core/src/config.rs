//! Simulation configuration.
//!
//! Every field has a serde default so a JSON file only needs the values it
//! overrides.

use crate::{clamp_agent_count, CographError, DEFAULT_MAX_ROUND, MAX_ROUND_LIMIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Constants that shape generated rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    /// Proposal score before any improvement.
    pub baseline: f32,
    /// Score gained per round.
    pub rate: f32,
    /// Peak-to-peak width of the score noise.
    pub noise_amplitude: f32,
    /// Radius of the proposal ring, in scene units.
    pub radius: f32,
    pub base_position: (f32, f32),
    pub orchestrator_position: (f32, f32),
    /// Display-only score of the base agent.
    pub base_score: f32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            baseline: 0.3,
            rate: 0.05,
            noise_amplitude: 0.2,
            radius: 150.0,
            base_position: (400.0, 300.0),
            orchestrator_position: (400.0, 100.0),
            base_score: 0.3,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), CographError> {
        let finite = [
            self.baseline,
            self.rate,
            self.noise_amplitude,
            self.radius,
            self.base_position.0,
            self.base_position.1,
            self.orchestrator_position.0,
            self.orchestrator_position.1,
            self.base_score,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(CographError::InvalidParameter {
                name: "generator",
                reason: "all generator parameters must be finite",
            });
        }
        if self.noise_amplitude < 0.0 {
            return Err(CographError::InvalidParameter {
                name: "noise_amplitude",
                reason: "must not be negative",
            });
        }
        if self.radius <= 0.0 {
            return Err(CographError::InvalidParameter {
                name: "radius",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub agent_count: usize,
    pub max_round: usize,
    pub seed: u64,
    /// Auto-advance cadence in milliseconds.
    pub interval_ms: u64,
    pub generator: GeneratorParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agent_count: 4,
            max_round: DEFAULT_MAX_ROUND,
            seed: 42,
            interval_ms: 1500,
            generator: GeneratorParams::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Reject malformed values and clamp out-of-range ones.
    pub fn validated(mut self) -> Result<Self, CographError> {
        self.agent_count = clamp_agent_count(self.agent_count)?;
        self.max_round = self.max_round.min(MAX_ROUND_LIMIT);
        if self.interval_ms == 0 {
            return Err(CographError::InvalidParameter {
                name: "interval_ms",
                reason: "must be positive",
            });
        }
        self.generator.validate()?;
        self.generator.base_score = self.generator.base_score.clamp(0.0, 1.0);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"agent_count": 6, "generator": {{"rate": 0.1}}}}"#).unwrap();

        let cfg = SimulationConfig::from_json_file(f.path()).unwrap();
        assert_eq!(cfg.agent_count, 6);
        assert_eq!(cfg.max_round, DEFAULT_MAX_ROUND);
        assert_eq!(cfg.generator.rate, 0.1);
        assert_eq!(cfg.generator.radius, 150.0);
    }

    #[test]
    fn validation_clamps_and_rejects() {
        let cfg = SimulationConfig {
            agent_count: 12,
            max_round: 5000,
            ..SimulationConfig::default()
        }
        .validated()
        .unwrap();
        assert_eq!(cfg.agent_count, 8);
        assert_eq!(cfg.max_round, MAX_ROUND_LIMIT);

        let zero = SimulationConfig {
            interval_ms: 0,
            ..SimulationConfig::default()
        };
        assert!(zero.validated().is_err());

        let mut bad = SimulationConfig::default();
        bad.generator.baseline = f32::NAN;
        assert!(bad.validated().is_err());
    }

    #[test]
    fn base_score_is_clamped_into_unit_range() {
        let mut high = SimulationConfig::default();
        high.generator.base_score = 5.0;
        assert_eq!(high.validated().unwrap().generator.base_score, 1.0);

        let mut low = SimulationConfig::default();
        low.generator.base_score = -0.5;
        assert_eq!(low.validated().unwrap().generator.base_score, 0.0);
    }
}
