//! Playback over a generated round sequence.
//!
//! [`PlaybackController`] owns the round index and auto-advance flag,
//! [`Scheduler`]/[`TickSource`] provide the cancellable timer, and
//! [`PlaybackSession`] ties a controller to a regenerable sequence.

pub mod controller;
pub mod scheduler;
pub mod session;

pub use controller::{PlaybackConfig, PlaybackController, PlaybackEvent};
pub use scheduler::{ManualScheduler, Scheduler, ThreadScheduler, ThreadTicker, TickSource};
pub use session::PlaybackSession;
