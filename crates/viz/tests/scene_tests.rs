use cograph_core::{AgentId, AgentRole, ConnectionKind, RoundSnapshot};
use cograph_rounds::generate_rounds;
use cograph_viz::{
    project, render_svg, render_svg_string, round_status, score_cards, write_dot_to, Fill,
    NodeStyle,
};
use rand::{rngs::StdRng, SeedableRng};

fn rounds(n: usize) -> Vec<RoundSnapshot> {
    let mut rng = StdRng::seed_from_u64(21);
    generate_rounds(n, 10, &mut rng).unwrap()
}

#[test]
fn idle_snapshot_projects_to_inactive_proposals() {
    let mut snap = rounds(4).remove(0);
    snap.connections.clear();

    let scene = project(&snap);
    assert!(scene.edges.is_empty());
    assert_eq!(scene.nodes.len(), 6);

    let active: Vec<_> = scene
        .nodes
        .iter()
        .filter(|n| n.style == NodeStyle::Active)
        .map(|n| n.role)
        .collect();
    assert_eq!(active, vec![AgentRole::Base, AgentRole::Orchestrator]);

    for n in scene.nodes.iter().filter(|n| n.role == AgentRole::Proposal) {
        assert_eq!(n.style, NodeStyle::Inactive);
        assert_eq!(n.opacity, 0.6);
        assert!(!n.glow);
        assert!(n.score_label.is_none());
    }
    // still draws
    assert!(render_svg_string(&scene).unwrap().contains("<svg"));
}

#[test]
fn one_edge_per_connection_with_category_styling() {
    let snap = &rounds(5)[6];
    let scene = project(snap);
    assert_eq!(scene.edges.len(), snap.connections.len());

    for (edge, conn) in scene.edges.iter().zip(&snap.connections) {
        assert_eq!(edge.kind, conn.kind);
        assert_eq!(edge.dashed, conn.kind == ConnectionKind::Coordination);
        assert!((edge.width - (conn.strength * 5.0).max(2.0)).abs() < 1e-6);
        assert!(edge.width >= 2.0);
    }
    let coord = scene.edges.iter().find(|e| e.dashed).unwrap();
    let instr = scene
        .edges
        .iter()
        .find(|e| e.kind == ConnectionKind::Instruction)
        .unwrap();
    assert_ne!(coord.color, instr.color);
}

#[test]
fn node_sizes_follow_roles() {
    let scene = project(&rounds(3)[2]);
    let base = scene.node(&AgentId::base()).unwrap();
    let orch = scene.node(&AgentId::orchestrator()).unwrap();
    let p0 = scene.node(&AgentId::proposal(0)).unwrap();

    assert!(base.radius > p0.radius);
    assert!(orch.radius > p0.radius);
    assert_eq!(orch.label, "Ω");
    assert_eq!(p0.label, "P0");
    assert!(matches!(base.fill, Fill::Radial { .. }));
    assert!(matches!(p0.fill, Fill::Solid { .. }));
    assert!(p0.score_label.is_some());
}

#[test]
fn unknown_endpoints_are_skipped() {
    let mut snap = rounds(3).remove(1);
    let before = snap.connections.len();
    snap.connections[0].target = AgentId("ghost".to_string());
    let scene = project(&snap);
    assert_eq!(scene.edges.len(), before - 1);
}

#[test]
fn projection_leaves_input_untouched() {
    let snap = rounds(4).remove(3);
    let copy = snap.clone();
    let _ = project(&snap);
    assert_eq!(snap, copy);
}

#[test]
fn legends_are_static() {
    let a = project(&rounds(2)[0]);
    let b = project(&rounds(8)[9]);
    assert_eq!(a.agent_legend, b.agent_legend);
    assert_eq!(a.connection_legend.len(), 3);
    assert!(a.connection_legend[0].dashed);
    assert_eq!(a.connection_legend[1].label, "Instruction Exchange");
}

#[test]
fn writes_svg_and_dot() {
    let snap = &rounds(4)[4];
    let dir = tempfile::tempdir().unwrap();
    let svg = dir.path().join("round4.svg");
    render_svg(&project(snap), &svg).unwrap();
    assert!(std::fs::read_to_string(&svg).unwrap().contains("<svg"));

    let mut dot = Vec::new();
    write_dot_to(&mut dot, snap).unwrap();
    let dot = String::from_utf8(dot).unwrap();
    assert!(dot.starts_with("digraph round_4 {"));
    assert!(dot.contains("\"orchestrator\" -> \"proposal-0\""));
    assert!(dot.contains("style=dashed"));
}

#[test]
fn panel_text_tracks_round() {
    let all = rounds(4);
    let cards = score_cards(&all[0]);
    assert_eq!(cards[0].value, "0");
    assert_eq!(cards[1].value, "0.000");
    assert_eq!(round_status(0).len(), 1);
    assert_eq!(round_status(3).len(), 4);
}
