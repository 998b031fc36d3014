//! Text that accompanies the graph: metric cards and the round status note.

use cograph_core::RoundSnapshot;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub title: &'static str,
    pub value: String,
}

pub fn score_cards(snap: &RoundSnapshot) -> [ScoreCard; 3] {
    [
        ScoreCard {
            title: "Current Round",
            value: snap.round.to_string(),
        },
        ScoreCard {
            title: "Best Score",
            value: format!("{:.3}", snap.best_score),
        },
        ScoreCard {
            title: "Average Score",
            value: format!("{:.3}", snap.avg_score),
        },
    ]
}

pub fn round_label(round: usize, max_round: usize) -> String {
    format!("Round: {round} / {max_round}")
}

pub fn round_status(round: usize) -> Vec<&'static str> {
    if round == 0 {
        vec!["Initial setup - agents are positioned but not yet active."]
    } else {
        vec![
            "Orchestrator (Ω) dynamically updates coordination graph",
            "Proposal agents exchange instructions based on graph topology",
            "Evaluator scores instructions on validation minibatch",
            "Best instructions provide feedback to base LLM",
        ]
    }
}
