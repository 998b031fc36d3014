use serde::Serialize;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Concept {
    pub title: &'static str,
    pub description: &'static str,
}

/// An academic idea paired with its practical counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ConceptMapping {
    pub id: &'static str,
    pub academic: Concept,
    pub practical: Concept,
    pub insight: &'static str,
}

pub const MAPPINGS: [ConceptMapping; 3] = [
    ConceptMapping {
        id: "cg",
        academic: Concept {
            title: "Coordination Graphs",
            description: "A CG is an effective way of encoding who should talk to whom now, or more broadly, which agents on the team should be interacting with each other.",
        },
        practical: Concept {
            title: "Communication patterns",
            description: "Structured patterns that determine how different LLMs in a system coordinate and share information during task execution.",
        },
        insight: "Explicitly representing the topology of agent interactions, and varying it based on context, helps optimize the cost/benefit tradeoff of communication and coordination.",
    },
    ConceptMapping {
        id: "mp",
        academic: Concept {
            title: "Max-Plus messages",
            description: "Mathematical messages that encode utility and preference information between agents in a distributed optimization problem.",
        },
        practical: Concept {
            title: "Inter-LLM communication",
            description: "Short, human- or machine-readable snippets of information, e.g., natural language summaries, structured output, numbers etc.",
        },
        insight: "Local messages are tiny, can be streamed, cached, or routed through cheap models. Because they are iterative, the orchestrator can stop after k rounds and still have a coherent global plan.",
    },
    ConceptMapping {
        id: "mcts",
        academic: Concept {
            title: "MCTS roll-outs",
            description: "Monte Carlo Tree Search trajectories that explore possible future states and actions to guide decision-making.",
        },
        practical: Concept {
            title: "Test-time reasoning/simulation",
            description: "Each trajectory is a \"what-if\" execution trace that interleaves reasoning traces of individual agents with multi-agent coordination turns.",
        },
        insight: "Rather than wait for reasoning to conclude before assigning sub-tasks, the planner can look ahead in deciding how to break down the problem. This makes long-horizon workflows (research pipelines, code-gen + unit tests, multi-step data cleaning) tractable and interruptible.",
    },
];

/// At most one mapping is expanded at a time.
#[derive(Clone, Debug, Default)]
pub struct ConceptExplorer {
    active: Option<&'static str>,
}

impl ConceptExplorer {
    pub fn mappings(&self) -> &'static [ConceptMapping] {
        &MAPPINGS
    }

    pub fn active(&self) -> Option<&'static ConceptMapping> {
        let id = self.active?;
        MAPPINGS.iter().find(|m| m.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active == Some(id)
    }

    /// Expand `id`, or collapse it if it is already expanded.
    pub fn toggle(&mut self, id: &str) -> Option<&'static ConceptMapping> {
        let Some(mapping) = MAPPINGS.iter().find(|m| m.id == id) else {
            warn!(id, "Unknown concept mapping");
            return self.active();
        };
        self.active = if self.active == Some(mapping.id) {
            None
        } else {
            Some(mapping.id)
        };
        self.active()
    }
}
