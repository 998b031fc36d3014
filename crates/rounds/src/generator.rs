use crate::entropy::Entropy;
use cograph_core::{
    clamp_agent_count, score_summary, Agent, AgentId, AgentRole, CographError, Connection,
    ConnectionKind, GeneratorParams, RoundSnapshot, MAX_ROUND_LIMIT,
};
use std::cmp::Ordering;
use std::f32::consts::PI;
use tracing::debug;

/// Number of top proposals that feed back into the base agent each round.
const FEEDBACK_FANIN: usize = 2;

/// Builds round snapshots from a fixed set of generator constants.
#[derive(Clone, Debug)]
pub struct RoundGenerator {
    params: GeneratorParams,
    max_round: usize,
}

impl RoundGenerator {
    pub fn new(params: GeneratorParams, max_round: usize) -> Result<Self, CographError> {
        params.validate()?;
        Ok(Self {
            params,
            max_round: max_round.min(MAX_ROUND_LIMIT),
        })
    }

    pub fn max_round(&self) -> usize {
        self.max_round
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Generate rounds `0..=max_round` for `agent_count` proposal agents.
    ///
    /// The agent count is clamped into the supported range; zero is rejected.
    pub fn generate(
        &self,
        agent_count: usize,
        entropy: &mut dyn Entropy,
    ) -> Result<Vec<RoundSnapshot>, CographError> {
        let n = clamp_agent_count(agent_count)?;
        if n != agent_count {
            debug!(requested = agent_count, clamped = n, "Clamped proposal agent count");
        }
        Ok((0..=self.max_round)
            .map(|round| self.round(round, n, entropy))
            .collect())
    }

    fn round(&self, round: usize, n: usize, entropy: &mut dyn Entropy) -> RoundSnapshot {
        let p = &self.params;
        let started = round > 0;

        let base = Agent {
            id: AgentId::base(),
            role: AgentRole::Base,
            x: p.base_position.0,
            y: p.base_position.1,
            score: p.base_score.clamp(0.0, 1.0),
            instruction: "Initial instruction".to_string(),
            active: true,
        };
        let orchestrator = Agent {
            id: AgentId::orchestrator(),
            role: AgentRole::Orchestrator,
            x: p.orchestrator_position.0,
            y: p.orchestrator_position.1,
            score: 0.0,
            instruction: "Coordinates proposals".to_string(),
            active: true,
        };

        let proposals: Vec<Agent> = (0..n)
            .map(|i| {
                let angle = (i as f32 / n as f32) * 2.0 * PI;
                let noise = (entropy.unit() - 0.5) * p.noise_amplitude;
                let score = (p.baseline + round as f32 * p.rate + noise).clamp(0.0, 1.0);
                Agent {
                    id: AgentId::proposal(i),
                    role: AgentRole::Proposal,
                    x: p.base_position.0 + p.radius * angle.cos(),
                    y: p.base_position.1 + p.radius * angle.sin(),
                    score,
                    instruction: format!("Instruction variant {}", i + 1),
                    active: started,
                }
            })
            .collect();

        let mut connections = Vec::new();

        for agent in &proposals {
            connections.push(Connection {
                source: orchestrator.id.clone(),
                target: agent.id.clone(),
                kind: ConnectionKind::Coordination,
                strength: 0.8 + entropy.unit() * 0.2,
            });
        }

        if started {
            for i in 0..n {
                // 1 or 2 outgoing instruction edges to the next neighbors on the ring
                let fanout = 1 + (entropy.unit() * 2.0) as usize;
                for j in 0..fanout {
                    let target = (i + j + 1) % n;
                    if target == i {
                        continue;
                    }
                    connections.push(Connection {
                        source: proposals[i].id.clone(),
                        target: proposals[target].id.clone(),
                        kind: ConnectionKind::Instruction,
                        strength: entropy.unit() * 0.6 + 0.2,
                    });
                }
            }

            for i in top_by_score(&proposals, FEEDBACK_FANIN) {
                connections.push(Connection {
                    source: proposals[i].id.clone(),
                    target: base.id.clone(),
                    kind: ConnectionKind::Feedback,
                    strength: proposals[i].score,
                });
            }
        }

        let active_scores: Vec<f32> = proposals
            .iter()
            .filter(|a| a.active)
            .map(|a| a.score)
            .collect();
        let (best_score, avg_score) = score_summary(&active_scores);

        debug!(
            round,
            agents = n,
            edges = connections.len(),
            best_score,
            avg_score,
            "Generated round"
        );

        let mut agents = Vec::with_capacity(n + 2);
        agents.push(base);
        agents.push(orchestrator);
        agents.extend(proposals);

        RoundSnapshot {
            round,
            agents,
            connections,
            best_score,
            avg_score,
        }
    }
}

/// Indices of the `k` highest-scoring agents, ties broken by lower index.
pub fn top_by_score(agents: &[Agent], k: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f32)> = agents
        .iter()
        .enumerate()
        .map(|(i, a)| (i, a.score))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    ranked.into_iter().take(k).map(|(i, _)| i).collect()
}

/// Generate a run with the default generator constants.
pub fn generate_rounds(
    agent_count: usize,
    max_round: usize,
    entropy: &mut dyn Entropy,
) -> Result<Vec<RoundSnapshot>, CographError> {
    RoundGenerator::new(GeneratorParams::default(), max_round)?.generate(agent_count, entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{ConstantEntropy, CycleEntropy};

    fn agent_with_score(i: usize, score: f32) -> Agent {
        Agent {
            id: AgentId::proposal(i),
            role: AgentRole::Proposal,
            x: 0.0,
            y: 0.0,
            score,
            instruction: String::new(),
            active: true,
        }
    }

    #[test]
    fn ties_prefer_lower_index() {
        let agents = vec![
            agent_with_score(0, 0.4),
            agent_with_score(1, 0.7),
            agent_with_score(2, 0.4),
            agent_with_score(3, 0.7),
        ];
        assert_eq!(top_by_score(&agents, 2), vec![1, 3]);
        assert_eq!(top_by_score(&agents, 3), vec![1, 3, 0]);
    }

    #[test]
    fn constant_entropy_gives_flat_noise() {
        // u = 0.5 cancels the noise term entirely
        let rounds = generate_rounds(3, 4, &mut ConstantEntropy(0.5)).unwrap();
        for snap in &rounds[1..] {
            let expected = 0.3 + snap.round as f32 * 0.05;
            for a in snap.proposals() {
                assert!((a.score - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn low_draws_emit_single_instruction_edge() {
        let rounds = generate_rounds(4, 1, &mut CycleEntropy::new(vec![0.1])).unwrap();
        assert_eq!(rounds[1].count_of(ConnectionKind::Instruction), 4);

        let rounds = generate_rounds(4, 1, &mut CycleEntropy::new(vec![0.9])).unwrap();
        assert_eq!(rounds[1].count_of(ConnectionKind::Instruction), 8);
    }

    #[test]
    fn two_agents_never_self_connect() {
        let rounds = generate_rounds(2, 3, &mut ConstantEntropy(0.9)).unwrap();
        for snap in &rounds {
            for c in snap.connections_of(ConnectionKind::Instruction) {
                assert_ne!(c.source, c.target);
            }
        }
    }
}
