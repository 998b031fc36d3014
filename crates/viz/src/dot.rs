use crate::scene::connection_colors;
use anyhow::{Context, Result};
use cograph_core::{AgentRole, ConnectionKind, RoundSnapshot};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_dot(path: impl AsRef<Path>, snap: &RoundSnapshot) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write_dot_to(&mut w, snap)?;
    w.flush()?;
    Ok(())
}

/// Graphviz rendering of a snapshot. Positions are pinned (`neato -n`).
pub fn write_dot_to(w: &mut impl Write, snap: &RoundSnapshot) -> Result<()> {
    writeln!(w, "digraph round_{} {{", snap.round)?;
    writeln!(w, "  node [shape=circle, style=filled];")?;
    for a in &snap.agents {
        let shade = match (a.active, a.role) {
            (false, _) => "#f3f4f6",
            (true, AgentRole::Base) => "#ef4444",
            (true, AgentRole::Orchestrator) => "#8b5cf6",
            (true, AgentRole::Proposal) => "#a855f7",
        };
        let label = if a.is_proposal() && a.active {
            format!("{}\\n{:.3}", a.id, a.score)
        } else {
            a.id.to_string()
        };
        writeln!(
            w,
            "  \"{}\" [label=\"{}\", pos=\"{:.1},{:.1}!\", fillcolor=\"{}\"];",
            a.id, label, a.x, -a.y, shade
        )?;
    }
    for c in &snap.connections {
        let style = if c.kind == ConnectionKind::Coordination {
            "dashed"
        } else {
            "solid"
        };
        writeln!(
            w,
            "  \"{}\" -> \"{}\" [label=\"{:.3}\", color=\"{}\", style={}, penwidth={:.1}];",
            c.source,
            c.target,
            c.strength,
            connection_colors(c.kind).0,
            style,
            (c.strength * 5.0).max(2.0) / 2.0
        )?;
    }
    writeln!(w, "}}")?;
    Ok(())
}
