use crate::controller::{PlaybackConfig, PlaybackController, PlaybackEvent};
use crate::scheduler::Scheduler;
use cograph_core::{CographError, RoundSnapshot, SimulationConfig};
use cograph_rounds::{RoundGenerator, RoundSequence};
use rand::{rngs::StdRng, SeedableRng};
use tracing::warn;

/// A generated run together with the controller stepping through it.
///
/// Changing the agent count throws the current sequence away, generates a
/// fresh one and rewinds to round 0.
pub struct PlaybackSession {
    generator: RoundGenerator,
    rng: StdRng,
    sequence: RoundSequence,
    controller: PlaybackController,
}

impl PlaybackSession {
    pub fn new(config: &SimulationConfig, scheduler: Box<dyn Scheduler>) -> Result<Self, CographError> {
        let config = config.clone().validated()?;
        let generator = RoundGenerator::new(config.generator.clone(), config.max_round)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sequence = RoundSequence::generate(&generator, config.agent_count, &mut rng)?;
        let controller = PlaybackController::new(
            PlaybackConfig {
                max_round: sequence.max_round(),
                ..PlaybackConfig::from(&config)
            },
            scheduler,
        )?;
        Ok(Self {
            generator,
            rng,
            sequence,
            controller,
        })
    }

    pub fn sequence(&self) -> &RoundSequence {
        &self.sequence
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Snapshot at the controller's current round.
    pub fn current(&self) -> &RoundSnapshot {
        self.sequence.get(self.controller.round())
    }

    /// Regenerate for a new agent count. Ignored while auto-advancing.
    ///
    /// Returns whether a new sequence was generated.
    pub fn set_agent_count(&mut self, agent_count: usize) -> Result<bool, CographError> {
        if self.controller.is_auto_advancing() {
            warn!(agent_count, "Ignoring agent count change while auto-advance is running");
            return Ok(false);
        }
        let sequence = RoundSequence::generate(&self.generator, agent_count, &mut self.rng)?;
        let agent_count = sequence.agent_count();
        self.sequence = sequence;
        self.controller.reset();
        self.controller
            .emit(PlaybackEvent::SequenceRegenerated { agent_count });
        Ok(true)
    }
}
