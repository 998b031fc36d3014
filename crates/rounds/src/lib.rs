//! Round generation for simulated coordination-graph runs.
//!
//! Provides [`RoundGenerator`] for building snapshots and [`RoundSequence`]
//! for holding one immutable run.

use cograph_core::{CographError, RoundSnapshot, SimulationConfig};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

pub mod entropy;
pub mod generator;

pub use entropy::{ConstantEntropy, CycleEntropy, Entropy};
pub use generator::{generate_rounds, top_by_score, RoundGenerator};

/// One generated run. Never updated in place; a new agent count means a new
/// sequence.
#[derive(Clone, Debug)]
pub struct RoundSequence {
    agent_count: usize,
    rounds: Vec<RoundSnapshot>,
}

impl RoundSequence {
    pub fn generate(
        generator: &RoundGenerator,
        agent_count: usize,
        entropy: &mut dyn Entropy,
    ) -> Result<Self, CographError> {
        let rounds = generator.generate(agent_count, entropy)?;
        let agent_count = rounds
            .first()
            .map(|r| r.proposals().count())
            .unwrap_or(agent_count);
        info!(agent_count, rounds = rounds.len(), "Generated round sequence");
        Ok(Self {
            agent_count,
            rounds,
        })
    }

    /// Build a sequence from a config, seeding a `StdRng` from `config.seed`.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, CographError> {
        let config = config.clone().validated()?;
        let generator = RoundGenerator::new(config.generator, config.max_round)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::generate(&generator, config.agent_count, &mut rng)
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    pub fn max_round(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Snapshot at `round`, clamped to the last round.
    pub fn get(&self, round: usize) -> &RoundSnapshot {
        &self.rounds[round.min(self.max_round())]
    }

    /// Snapshot at `round`, or an error past the last round.
    pub fn try_get(&self, round: usize) -> Result<&RoundSnapshot, CographError> {
        self.rounds.get(round).ok_or(CographError::RoundOutOfRange {
            round,
            max_round: self.max_round(),
        })
    }

    pub fn rounds(&self) -> &[RoundSnapshot] {
        &self.rounds
    }

    pub fn into_rounds(self) -> Vec<RoundSnapshot> {
        self.rounds
    }
}
