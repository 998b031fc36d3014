use cograph_core::{AgentId, AgentRole, ConnectionKind, SimulationConfig};
use cograph_rounds::{generate_rounds, top_by_score, RoundSequence};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn every_agent_count_yields_full_sequences() {
    for n in 2..=8 {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let rounds = generate_rounds(n, 10, &mut rng).unwrap();
        assert_eq!(rounds.len(), 11);
        for (i, snap) in rounds.iter().enumerate() {
            assert_eq!(snap.round, i);
            assert_eq!(snap.proposals().count(), n);
            assert_eq!(snap.agents.len(), n + 2);
            assert!(snap.agents.iter().any(|a| a.role == AgentRole::Base));
            assert!(snap.agents.iter().any(|a| a.role == AgentRole::Orchestrator));
        }
    }
}

#[test]
fn round_zero_is_idle() {
    let mut rng = StdRng::seed_from_u64(7);
    let rounds = generate_rounds(5, 10, &mut rng).unwrap();
    let zero = &rounds[0];

    assert!(zero.proposals().all(|a| !a.active));
    assert_eq!(zero.count_of(ConnectionKind::Instruction), 0);
    assert_eq!(zero.count_of(ConnectionKind::Feedback), 0);
    assert_eq!(zero.best_score, 0.0);
    assert_eq!(zero.avg_score, 0.0);
}

#[test]
fn started_rounds_follow_edge_rules() {
    for n in 2..=8 {
        let mut rng = StdRng::seed_from_u64(100 + n as u64);
        let rounds = generate_rounds(n, 10, &mut rng).unwrap();
        for snap in &rounds[1..] {
            assert_eq!(snap.count_of(ConnectionKind::Coordination), n);
            for c in snap.connections_of(ConnectionKind::Coordination) {
                assert_eq!(c.source, AgentId::orchestrator());
            }

            for a in snap.proposals() {
                let out = snap
                    .connections_of(ConnectionKind::Instruction)
                    .filter(|c| c.source == a.id)
                    .count();
                if n == 2 {
                    assert_eq!(out, 1);
                } else {
                    assert!((1..=2).contains(&out), "proposal {} has {out} edges", a.id);
                }
            }

            let feedback: Vec<_> = snap.connections_of(ConnectionKind::Feedback).collect();
            assert!(feedback.len() <= 2);
            let proposals: Vec<_> = snap.proposals().cloned().collect();
            let expected: Vec<AgentId> = top_by_score(&proposals, 2)
                .into_iter()
                .map(|i| proposals[i].id.clone())
                .collect();
            let actual: Vec<AgentId> = feedback.iter().map(|c| c.source.clone()).collect();
            assert_eq!(actual, expected);
            for c in &feedback {
                assert_eq!(c.target, AgentId::base());
            }
        }
    }
}

#[test]
fn summary_statistics_match_active_scores() {
    let mut rng = StdRng::seed_from_u64(11);
    let rounds = generate_rounds(6, 10, &mut rng).unwrap();
    for snap in &rounds[1..] {
        let scores: Vec<f32> = snap.active_proposals().map(|a| a.score).collect();
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        let max = scores.iter().copied().fold(f32::MIN, f32::max);
        assert!((snap.avg_score - mean).abs() < 1e-5);
        assert!((snap.best_score - max).abs() < 1e-6);
    }
}

#[test]
fn scores_and_strengths_stay_in_unit_range() {
    let mut rng = StdRng::seed_from_u64(3);
    let rounds = generate_rounds(8, 10, &mut rng).unwrap();
    for snap in &rounds {
        for a in &snap.agents {
            assert!((0.0..=1.0).contains(&a.score));
        }
        for c in &snap.connections {
            assert!((0.0..=1.0).contains(&c.strength));
        }
    }
}

#[test]
fn scores_trend_upward() {
    let mut rng = StdRng::seed_from_u64(5);
    let rounds = generate_rounds(8, 10, &mut rng).unwrap();
    // noise is bounded by +/-0.1, trend adds 0.45 between rounds 1 and 10
    assert!(rounds[10].avg_score > rounds[1].avg_score + 0.2);
}

#[test]
fn proposals_sit_on_a_ring_around_base() {
    let mut rng = StdRng::seed_from_u64(9);
    let rounds = generate_rounds(4, 0, &mut rng).unwrap();
    let base = rounds[0].agent(&AgentId::base()).unwrap();
    for a in rounds[0].proposals() {
        let d = ((a.x - base.x).powi(2) + (a.y - base.y).powi(2)).sqrt();
        assert!((d - 150.0).abs() < 1e-3);
    }
    let p0 = rounds[0].agent(&AgentId::proposal(0)).unwrap();
    assert!((p0.x - 550.0).abs() < 1e-3);
    assert!((p0.y - 300.0).abs() < 1e-3);
}

#[test]
fn zero_agents_are_rejected_and_large_counts_clamped() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(generate_rounds(0, 10, &mut rng).is_err());
    let rounds = generate_rounds(1, 2, &mut rng).unwrap();
    assert_eq!(rounds[0].proposals().count(), 2);
    let rounds = generate_rounds(30, 2, &mut rng).unwrap();
    assert_eq!(rounds[0].proposals().count(), 8);
}

#[test]
fn same_seed_same_sequence() {
    let cfg = SimulationConfig {
        agent_count: 5,
        seed: 1234,
        ..SimulationConfig::default()
    };
    let a = RoundSequence::from_config(&cfg).unwrap();
    let b = RoundSequence::from_config(&cfg).unwrap();
    assert_eq!(a.rounds(), b.rounds());
    assert_eq!(a.agent_count(), 5);
    assert_eq!(a.max_round(), 10);
    assert_eq!(a.get(99).round, 10);
}

#[test]
fn strict_lookup_rejects_rounds_past_the_end() {
    let seq = RoundSequence::from_config(&SimulationConfig {
        max_round: 3,
        ..SimulationConfig::default()
    })
    .unwrap();
    assert_eq!(seq.try_get(3).unwrap().round, 3);
    assert_eq!(
        seq.try_get(9).unwrap_err(),
        cograph_core::CographError::RoundOutOfRange {
            round: 9,
            max_round: 3
        }
    );
    assert_eq!(seq.get(9).round, 3);
}

#[test]
fn base_score_stays_in_unit_range() {
    let mut cfg = SimulationConfig::default();
    cfg.generator.base_score = 5.0;
    let seq = RoundSequence::from_config(&cfg).unwrap();
    for snap in seq.rounds() {
        assert!(snap.agents.iter().all(|a| (0.0..=1.0).contains(&a.score)));
        assert_eq!(snap.agent(&AgentId::base()).unwrap().score, 1.0);
    }

    // a generator built directly skips config validation but still clamps
    let mut params = cograph_core::GeneratorParams::default();
    params.base_score = -2.0;
    let generator = cograph_rounds::RoundGenerator::new(params, 2).unwrap();
    let rounds = generator
        .generate(3, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(rounds[0].agent(&AgentId::base()).unwrap().score, 0.0);
}
