use thiserror::Error;

/// Errors raised before any generation or playback work starts.
#[derive(Debug, Error, PartialEq)]
pub enum CographError {
    #[error("invalid proposal agent count: {0} (must be at least 1)")]
    InvalidAgentCount(usize),
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    #[error("round {round} is outside 0..={max_round}")]
    RoundOutOfRange { round: usize, max_round: usize },
}
