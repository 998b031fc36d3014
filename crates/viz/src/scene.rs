//! Projection of a round snapshot into drawable primitives.
//!
//! The projection is pure: it reads a [`RoundSnapshot`] and returns a
//! [`Scene`]; drawing it is left to a backend (see [`crate::svg`]).

use crate::palette::{self, Rgb};
use cograph_core::{AgentId, AgentRole, ConnectionKind, RoundSnapshot};
use serde::Serialize;
use tracing::warn;

pub const SCENE_WIDTH: u32 = 800;
pub const SCENE_HEIGHT: u32 = 600;
/// Offset applied to agent positions so the outer ring clears the border.
pub const SCENE_MARGIN: f32 = 20.0;

/// Proposals above this score get light strokes and labels.
const BRIGHT_SCORE: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fill {
    Solid { color: Rgb },
    Radial { inner: Rgb, outer: Rgb },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeGlyph {
    pub id: AgentId,
    pub role: AgentRole,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub fill: Fill,
    pub stroke: Rgb,
    pub stroke_width: f32,
    pub opacity: f32,
    pub glow: bool,
    pub style: NodeStyle,
    pub label_color: Rgb,
    pub label_size: u32,
    /// Three-decimal score shown under active proposals.
    pub score_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeGlyph {
    pub source: AgentId,
    pub target: AgentId,
    pub kind: ConnectionKind,
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: Rgb,
    pub color_end: Rgb,
    pub width: f32,
    pub opacity: f32,
    pub dashed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: Rgb,
    pub label: &'static str,
    pub sublabel: Option<&'static str>,
    pub dashed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub round: usize,
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<NodeGlyph>,
    pub edges: Vec<EdgeGlyph>,
    pub agent_legend: Vec<LegendEntry>,
    pub connection_legend: Vec<LegendEntry>,
}

impl Scene {
    pub fn node(&self, id: &AgentId) -> Option<&NodeGlyph> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Project one snapshot into a scene.
pub fn project(snapshot: &RoundSnapshot) -> Scene {
    let nodes = snapshot
        .agents
        .iter()
        .map(|a| {
            let active = a.active;
            let bright = a.role == AgentRole::Proposal && a.score > BRIGHT_SCORE;
            let (fill, stroke) = match (active, a.role) {
                (false, _) => (
                    Fill::Solid {
                        color: palette::INACTIVE_FILL,
                    },
                    palette::INACTIVE_STROKE,
                ),
                (true, AgentRole::Base) => (
                    Fill::Radial {
                        inner: palette::BASE_GRADIENT.0,
                        outer: palette::BASE_GRADIENT.1,
                    },
                    palette::BASE_STROKE,
                ),
                (true, AgentRole::Orchestrator) => (
                    Fill::Radial {
                        inner: palette::ORCHESTRATOR_GRADIENT.0,
                        outer: palette::ORCHESTRATOR_GRADIENT.1,
                    },
                    palette::ORCHESTRATOR_STROKE,
                ),
                (true, AgentRole::Proposal) => (
                    Fill::Solid {
                        color: palette::plasma(a.score * 0.8 + 0.2),
                    },
                    if bright {
                        palette::WHITE
                    } else {
                        palette::PROPOSAL_DARK_STROKE
                    },
                ),
            };
            let label_color = if !active {
                palette::INACTIVE_LABEL
            } else if bright || a.role != AgentRole::Proposal {
                palette::WHITE
            } else {
                palette::INK
            };
            NodeGlyph {
                id: a.id.clone(),
                role: a.role,
                label: node_label(&a.id, a.role),
                x: a.x + SCENE_MARGIN,
                y: a.y + SCENE_MARGIN,
                radius: node_radius(a.role),
                fill,
                stroke,
                stroke_width: if active { 3.0 } else { 2.0 },
                opacity: if active { 1.0 } else { 0.6 },
                glow: active,
                style: if active {
                    NodeStyle::Active
                } else {
                    NodeStyle::Inactive
                },
                label_color,
                label_size: if a.role == AgentRole::Orchestrator { 16 } else { 12 },
                score_label: (a.role == AgentRole::Proposal && active)
                    .then(|| format!("{:.3}", a.score)),
            }
        })
        .collect();

    let mut edges = Vec::with_capacity(snapshot.connections.len());
    for c in &snapshot.connections {
        let (Some(src), Some(dst)) = (snapshot.agent(&c.source), snapshot.agent(&c.target)) else {
            warn!(
                round = snapshot.round,
                source = %c.source,
                target = %c.target,
                "Skipping connection with unknown endpoint"
            );
            continue;
        };
        let (color, color_end) = connection_colors(c.kind);
        let strength = c.strength.clamp(0.0, 1.0);
        edges.push(EdgeGlyph {
            source: c.source.clone(),
            target: c.target.clone(),
            kind: c.kind,
            from: (src.x + SCENE_MARGIN, src.y + SCENE_MARGIN),
            to: (dst.x + SCENE_MARGIN, dst.y + SCENE_MARGIN),
            color,
            color_end,
            width: (strength * 5.0).max(2.0),
            opacity: 0.6 + strength * 0.4,
            dashed: c.kind == ConnectionKind::Coordination,
        });
    }

    Scene {
        round: snapshot.round,
        width: SCENE_WIDTH,
        height: SCENE_HEIGHT,
        nodes,
        edges,
        agent_legend: agent_legend(),
        connection_legend: connection_legend(),
    }
}

pub fn node_radius(role: AgentRole) -> f32 {
    match role {
        AgentRole::Base => 32.0,
        AgentRole::Orchestrator => 28.0,
        AgentRole::Proposal => 22.0,
    }
}

fn node_label(id: &AgentId, role: AgentRole) -> String {
    match role {
        AgentRole::Base => "Base".to_string(),
        AgentRole::Orchestrator => "Ω".to_string(),
        AgentRole::Proposal => match id.proposal_index() {
            Some(i) => format!("P{i}"),
            None => id.to_string(),
        },
    }
}

pub fn connection_colors(kind: ConnectionKind) -> (Rgb, Rgb) {
    match kind {
        ConnectionKind::Coordination => palette::COORDINATION,
        ConnectionKind::Instruction => palette::INSTRUCTION,
        ConnectionKind::Feedback => palette::FEEDBACK,
    }
}

pub fn agent_legend() -> Vec<LegendEntry> {
    vec![
        LegendEntry {
            color: Rgb::hex(0xef4444),
            label: "Base LLM",
            sublabel: Some("GPT-3.5"),
            dashed: false,
        },
        LegendEntry {
            color: Rgb::hex(0x8b5cf6),
            label: "Orchestrator",
            sublabel: Some("GPT-4o"),
            dashed: false,
        },
        LegendEntry {
            color: Rgb::hex(0xa855f7),
            label: "Proposal Agent",
            sublabel: Some("GPT-4o-mini"),
            dashed: false,
        },
    ]
}

pub fn connection_legend() -> Vec<LegendEntry> {
    ConnectionKind::ALL
        .iter()
        .map(|&kind| LegendEntry {
            color: connection_colors(kind).0,
            label: kind.label(),
            sublabel: None,
            dashed: kind == ConnectionKind::Coordination,
        })
        .collect()
}
