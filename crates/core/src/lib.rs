//! Core types for simulated coordination-graph rounds.
//!
//! A run is a sequence of [`RoundSnapshot`]s. Each snapshot is an independent,
//! immutable picture of the agents and the connections between them.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod error;

pub use config::{GeneratorParams, SimulationConfig};
pub use error::CographError;

/// Smallest proposal-agent count; cyclic neighbor selection degenerates below it.
pub const MIN_PROPOSAL_AGENTS: usize = 2;
/// Largest proposal-agent count the layout is designed for.
pub const MAX_PROPOSAL_AGENTS: usize = 8;
/// Last round index of a default run.
pub const DEFAULT_MAX_ROUND: usize = 10;
/// Upper bound accepted for `max_round`.
pub const MAX_ROUND_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn base() -> Self {
        Self("base".to_string())
    }

    pub fn orchestrator() -> Self {
        Self("orchestrator".to_string())
    }

    pub fn proposal(index: usize) -> Self {
        Self(format!("proposal-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Index of a proposal agent, parsed from its id.
    pub fn proposal_index(&self) -> Option<usize> {
        self.0.strip_prefix("proposal-")?.parse().ok()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Base,
    Orchestrator,
    Proposal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub role: AgentRole,
    pub x: f32,
    pub y: f32,
    /// In [0, 1]. Only meaningful for proposals once the run has started.
    pub score: f32,
    pub instruction: String,
    pub active: bool,
}

impl Agent {
    pub fn is_proposal(&self) -> bool {
        self.role == AgentRole::Proposal
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Orchestrator to proposal.
    Coordination,
    /// Proposal to proposal instruction exchange.
    Instruction,
    /// Top proposals back to the base agent.
    Feedback,
}

impl ConnectionKind {
    pub const ALL: [ConnectionKind; 3] = [
        ConnectionKind::Coordination,
        ConnectionKind::Instruction,
        ConnectionKind::Feedback,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConnectionKind::Coordination => "Coordination",
            ConnectionKind::Instruction => "Instruction Exchange",
            ConnectionKind::Feedback => "Feedback",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: AgentId,
    pub target: AgentId,
    pub kind: ConnectionKind,
    /// In [0, 1]; drives visual weight.
    pub strength: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: usize,
    pub agents: Vec<Agent>,
    pub connections: Vec<Connection>,
    pub best_score: f32,
    pub avg_score: f32,
}

impl RoundSnapshot {
    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| &a.id == id)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_proposal())
    }

    pub fn active_proposals(&self) -> impl Iterator<Item = &Agent> {
        self.proposals().filter(|a| a.active)
    }

    pub fn connections_of(&self, kind: ConnectionKind) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.kind == kind)
    }

    pub fn count_of(&self, kind: ConnectionKind) -> usize {
        self.connections_of(kind).count()
    }
}

/// Best and average over a set of scores, both 0 when the set is empty.
pub fn score_summary(scores: &[f32]) -> (f32, f32) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let best = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let avg = scores.iter().sum::<f32>() / scores.len() as f32;
    (best, avg)
}

/// Clamp a requested proposal-agent count into the supported range.
///
/// Zero is a malformed configuration rather than an out-of-range value and is
/// rejected.
pub fn clamp_agent_count(requested: usize) -> Result<usize, CographError> {
    if requested == 0 {
        return Err(CographError::InvalidAgentCount(requested));
    }
    Ok(requested.clamp(MIN_PROPOSAL_AGENTS, MAX_PROPOSAL_AGENTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_ids_round_trip_their_index() {
        let id = AgentId::proposal(7);
        assert_eq!(id.as_str(), "proposal-7");
        assert_eq!(id.proposal_index(), Some(7));
        assert_eq!(AgentId::base().proposal_index(), None);
    }

    #[test]
    fn agent_count_clamps_and_rejects_zero() {
        assert!(matches!(
            clamp_agent_count(0),
            Err(CographError::InvalidAgentCount(0))
        ));
        assert_eq!(clamp_agent_count(1).unwrap(), 2);
        assert_eq!(clamp_agent_count(5).unwrap(), 5);
        assert_eq!(clamp_agent_count(40).unwrap(), 8);
    }

    #[test]
    fn empty_scores_summarize_to_zero() {
        assert_eq!(score_summary(&[]), (0.0, 0.0));
        let (best, avg) = score_summary(&[0.2, 0.6, 0.4]);
        assert!((best - 0.6).abs() < 1e-6);
        assert!((avg - 0.4).abs() < 1e-6);
    }

    #[test]
    fn enums_serialize_lowercase() {
        let s = serde_json::to_string(&ConnectionKind::Instruction).unwrap();
        assert_eq!(s, "\"instruction\"");
        let r: AgentRole = serde_json::from_str("\"orchestrator\"").unwrap();
        assert_eq!(r, AgentRole::Orchestrator);
    }
}
