use crate::scheduler::{Scheduler, TickSource};
use cograph_core::{CographError, SimulationConfig};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// State changes reported to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    RoundChanged { from: usize, to: usize },
    AutoAdvanceChanged { enabled: bool },
    SequenceRegenerated { agent_count: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub max_round: usize,
    pub interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_round: cograph_core::DEFAULT_MAX_ROUND,
            interval: Duration::from_millis(1500),
        }
    }
}

impl From<&SimulationConfig> for PlaybackConfig {
    fn from(cfg: &SimulationConfig) -> Self {
        Self {
            max_round: cfg.max_round,
            interval: Duration::from_millis(cfg.interval_ms),
        }
    }
}

type Listener = Box<dyn FnMut(&PlaybackEvent)>;

/// Current round index plus the auto-advance flag.
///
/// The controller is the only writer of its state. Manual seeking and reset
/// are ignored while auto-advance is on. At most one tick source is alive at
/// a time and it is dropped, and so cancelled, whenever auto-advance turns
/// off or the controller itself is dropped.
pub struct PlaybackController {
    round: usize,
    config: PlaybackConfig,
    auto_advance: bool,
    ticker: Option<Box<dyn TickSource>>,
    scheduler: Box<dyn Scheduler>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("round", &self.round)
            .field("config", &self.config)
            .field("auto_advance", &self.auto_advance)
            .field("has_ticker", &self.ticker.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PlaybackController {
    pub fn new(config: PlaybackConfig, scheduler: Box<dyn Scheduler>) -> Result<Self, CographError> {
        if config.interval.is_zero() {
            return Err(CographError::InvalidParameter {
                name: "interval",
                reason: "must be positive",
            });
        }
        Ok(Self {
            round: 0,
            config,
            auto_advance: false,
            ticker: None,
            scheduler,
            listeners: Vec::new(),
        })
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn max_round(&self) -> usize {
        self.config.max_round
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advance
    }

    pub fn has_live_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Register a listener that sees every subsequent state change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Seek to `round`, clamped to `0..=max_round`.
    ///
    /// Returns whether the index changed. Ignored while auto-advancing.
    pub fn set_round(&mut self, round: usize) -> bool {
        if self.auto_advance {
            warn!(round, "Ignoring seek while auto-advance is running");
            return false;
        }
        let target = round.min(self.config.max_round);
        if target != round {
            debug!(requested = round, clamped = target, "Clamped seek target");
        }
        self.move_to(target)
    }

    /// Back to round 0. Ignored while auto-advancing.
    pub fn reset(&mut self) -> bool {
        if self.auto_advance {
            warn!("Ignoring reset while auto-advance is running");
            return false;
        }
        self.move_to(0)
    }

    /// Flip auto-advance and return the new flag.
    ///
    /// Enabling at the last round is refused since there is nothing left to
    /// advance to.
    pub fn toggle_auto_advance(&mut self) -> bool {
        if self.auto_advance {
            self.stop_auto_advance();
        } else if self.round >= self.config.max_round {
            warn!(round = self.round, "Already at last round; auto-advance not started");
        } else {
            self.ticker = Some(self.scheduler.start(self.config.interval));
            self.auto_advance = true;
            info!(
                round = self.round,
                interval_ms = self.config.interval.as_millis() as u64,
                "Auto-advance started"
            );
            self.emit(PlaybackEvent::AutoAdvanceChanged { enabled: true });
        }
        self.auto_advance
    }

    /// Apply one auto-advance step. Stray ticks while stopped are ignored.
    pub fn tick(&mut self) -> bool {
        if !self.auto_advance {
            return false;
        }
        let next = (self.round + 1).min(self.config.max_round);
        let moved = self.move_to(next);
        if self.round >= self.config.max_round {
            self.stop_auto_advance();
        }
        moved
    }

    /// Apply ticks that fired since the last poll. Returns how many applied.
    pub fn poll(&mut self) -> usize {
        let fired = self.ticker.as_mut().map(|t| t.drain()).unwrap_or(0);
        self.apply_ticks(fired)
    }

    /// Like [`poll`](Self::poll) but blocks up to `timeout` for a tick.
    pub fn wait_for_tick(&mut self, timeout: Duration) -> usize {
        let fired = self.ticker.as_mut().map(|t| t.wait(timeout)).unwrap_or(0);
        self.apply_ticks(fired)
    }

    fn apply_ticks(&mut self, fired: usize) -> usize {
        let mut applied = 0;
        for _ in 0..fired {
            if !self.auto_advance {
                break;
            }
            self.tick();
            applied += 1;
        }
        applied
    }

    fn stop_auto_advance(&mut self) {
        // dropping the source cancels it and discards queued ticks
        self.ticker = None;
        self.auto_advance = false;
        info!(round = self.round, "Auto-advance stopped");
        self.emit(PlaybackEvent::AutoAdvanceChanged { enabled: false });
    }

    fn move_to(&mut self, round: usize) -> bool {
        if round == self.round {
            return false;
        }
        let from = self.round;
        self.round = round;
        self.emit(PlaybackEvent::RoundChanged { from, to: round });
        true
    }

    pub(crate) fn emit(&mut self, event: PlaybackEvent) {
        debug!(?event, "Playback event");
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
