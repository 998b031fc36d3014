//! Trace export and analysis for generated round sequences.

use anyhow::{Context, Result};
use cograph_core::{ConnectionKind, RoundSnapshot};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write rounds as JSONL, one snapshot per line.
pub fn write_trace(path: impl AsRef<Path>, rounds: &[RoundSnapshot]) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for snap in rounds {
        serde_json::to_writer(&mut w, snap)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    info!(path = %path.display(), rounds = rounds.len(), "Wrote round trace");
    Ok(())
}

/// Load a JSONL round trace.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<RoundSnapshot>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(f);

    let mut rounds = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let snap: RoundSnapshot = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed round", path.display(), lineno + 1))?;
        rounds.push(snap);
    }
    Ok(rounds)
}

/// Metrics computed from a round sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceMetrics {
    pub agent_count: usize,
    pub round_count: usize,
    pub rounds: Vec<RoundMetrics>,
    pub summary: SummaryMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundMetrics {
    pub round: usize,
    pub active_agents: usize,
    pub best_score: f32,
    pub avg_score: f32,
    pub min_score: f32,
    pub score_std: f32,
    pub coordination_edges: usize,
    pub instruction_edges: usize,
    pub feedback_edges: usize,
    /// Instruction edges over all possible proposal pairs.
    pub instruction_density: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_edges: usize,
    pub avg_edges_per_round: f32,
    pub overall_avg_score: f32,
    pub final_best_score: f32,
    pub score_trend: f32, // avg score slope per round
    pub edge_stability: f32, // instruction edges kept between rounds
}

pub fn compute_metrics(rounds: &[RoundSnapshot]) -> TraceMetrics {
    let n = rounds.first().map(|r| r.proposals().count()).unwrap_or(0);
    let max_edges = if n > 1 { n * (n - 1) } else { 1 };

    let per_round: Vec<RoundMetrics> = rounds
        .iter()
        .map(|rd| {
            let scores: Vec<f32> = rd.active_proposals().map(|a| a.score).collect();
            let min_score = scores.iter().cloned().fold(f32::INFINITY, f32::min);
            let variance = if scores.len() > 1 {
                scores
                    .iter()
                    .map(|s| (s - rd.avg_score).powi(2))
                    .sum::<f32>()
                    / scores.len() as f32
            } else {
                0.0
            };
            let instruction_edges = rd.count_of(ConnectionKind::Instruction);

            RoundMetrics {
                round: rd.round,
                active_agents: scores.len(),
                best_score: rd.best_score,
                avg_score: rd.avg_score,
                min_score: if min_score.is_finite() { min_score } else { 0.0 },
                score_std: variance.sqrt(),
                coordination_edges: rd.count_of(ConnectionKind::Coordination),
                instruction_edges,
                feedback_edges: rd.count_of(ConnectionKind::Feedback),
                instruction_density: instruction_edges as f32 / max_edges as f32,
            }
        })
        .collect();

    let total_edges: usize = rounds.iter().map(|r| r.connections.len()).sum();
    let avg_edges_per_round = if rounds.is_empty() {
        0.0
    } else {
        total_edges as f32 / rounds.len() as f32
    };

    // only rounds with active agents carry a meaningful score
    let started: Vec<&RoundMetrics> = per_round.iter().filter(|r| r.active_agents > 0).collect();
    let overall_avg_score = if started.is_empty() {
        0.0
    } else {
        started.iter().map(|r| r.avg_score).sum::<f32>() / started.len() as f32
    };

    // least-squares slope of avg score over round index
    let score_trend = if started.len() >= 2 {
        let n = started.len() as f32;
        let sum_x: f32 = started.iter().map(|r| r.round as f32).sum();
        let sum_y: f32 = started.iter().map(|r| r.avg_score).sum();
        let sum_xy: f32 = started.iter().map(|r| r.round as f32 * r.avg_score).sum();
        let sum_x2: f32 = started.iter().map(|r| (r.round as f32).powi(2)).sum();
        let denom = n * sum_x2 - sum_x.powi(2);
        if denom.abs() > f32::EPSILON {
            (n * sum_xy - sum_x * sum_y) / denom
        } else {
            0.0
        }
    } else {
        0.0
    };

    // Jaccard similarity of instruction edges between consecutive started rounds
    let started_rounds: Vec<&RoundSnapshot> = rounds.iter().filter(|r| r.round > 0).collect();
    let edge_stability = if started_rounds.len() >= 2 {
        let edge_set = |r: &RoundSnapshot| -> HashSet<(String, String)> {
            r.connections_of(ConnectionKind::Instruction)
                .map(|c| (c.source.0.clone(), c.target.0.clone()))
                .collect()
        };
        let mut jaccard_sum = 0.0;
        for pair in started_rounds.windows(2) {
            let prev = edge_set(pair[0]);
            let curr = edge_set(pair[1]);
            let union = prev.union(&curr).count();
            if union > 0 {
                jaccard_sum += prev.intersection(&curr).count() as f32 / union as f32;
            }
        }
        jaccard_sum / (started_rounds.len() - 1) as f32
    } else {
        1.0
    };

    TraceMetrics {
        agent_count: n,
        round_count: rounds.len(),
        summary: SummaryMetrics {
            total_edges,
            avg_edges_per_round,
            overall_avg_score,
            final_best_score: per_round.last().map(|r| r.best_score).unwrap_or(0.0),
            score_trend,
            edge_stability,
        },
        rounds: per_round,
    }
}

/// Generate a markdown report from metrics.
pub fn format_report(title: &str, metrics: &TraceMetrics) -> String {
    let mut s = String::new();

    s.push_str(&format!("# Round Analysis: {}\n\n", title));
    s.push_str(&format!(
        "**Proposal agents:** {} | **Rounds:** {}\n\n",
        metrics.agent_count, metrics.round_count
    ));

    s.push_str("## Summary\n\n");
    s.push_str("| Metric | Value |\n|--------|-------|\n");
    s.push_str(&format!("| Total Edges | {} |\n", metrics.summary.total_edges));
    s.push_str(&format!(
        "| Avg Edges/Round | {:.1} |\n",
        metrics.summary.avg_edges_per_round
    ));
    s.push_str(&format!(
        "| Overall Avg Score | {:.3} |\n",
        metrics.summary.overall_avg_score
    ));
    s.push_str(&format!(
        "| Final Best Score | {:.3} |\n",
        metrics.summary.final_best_score
    ));
    s.push_str(&format!(
        "| Score Trend | {:+.4}/round |\n",
        metrics.summary.score_trend
    ));
    s.push_str(&format!(
        "| Edge Stability | {:.1}% |\n",
        metrics.summary.edge_stability * 100.0
    ));

    s.push_str("\n## Per-Round Metrics\n\n");
    s.push_str("| Round | Best | Avg | Min | Std | Coord | Instr | Feedback | Density |\n");
    s.push_str("|-------|------|-----|-----|-----|-------|-------|----------|---------|\n");
    for r in &metrics.rounds {
        s.push_str(&format!(
            "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {} | {} | {} | {:.1}% |\n",
            r.round,
            r.best_score,
            r.avg_score,
            r.min_score,
            r.score_std,
            r.coordination_edges,
            r.instruction_edges,
            r.feedback_edges,
            r.instruction_density * 100.0
        ));
    }

    s
}

/// Plot best and average score across rounds as SVG.
pub fn plot_scores(metrics: &TraceMetrics, output_path: &Path) -> Result<()> {
    let root = SVGBackend::new(output_path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_round = metrics.round_count.saturating_sub(1) as f32;

    let mut chart = ChartBuilder::on(&root)
        .caption("Score Evolution", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..max_round.max(1.0), 0f32..1f32)?;

    chart
        .configure_mesh()
        .x_desc("Round")
        .y_desc("Score")
        .draw()?;

    let best: Vec<(f32, f32)> = metrics
        .rounds
        .iter()
        .map(|r| (r.round as f32, r.best_score))
        .collect();
    let avg: Vec<(f32, f32)> = metrics
        .rounds
        .iter()
        .map(|r| (r.round as f32, r.avg_score))
        .collect();

    chart
        .draw_series(LineSeries::new(best.clone(), &GREEN))?
        .label("Best Score")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .draw_series(LineSeries::new(avg.clone(), &BLUE))?
        .label("Avg Score")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    // min..best spread per round
    chart.draw_series(metrics.rounds.iter().map(|r| {
        Rectangle::new(
            [
                (r.round as f32 - 0.1, r.min_score),
                (r.round as f32 + 0.1, r.best_score),
            ],
            BLUE.mix(0.3).filled(),
        )
    }))?;

    chart.draw_series(PointSeries::of_element(
        avg,
        5,
        &BLUE,
        &|c, s, st| Circle::new(c, s, st.filled()),
    ))?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Plot instruction-graph density across rounds.
pub fn plot_density(metrics: &TraceMetrics, output_path: &Path) -> Result<()> {
    let root = SVGBackend::new(output_path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_round = metrics.round_count.saturating_sub(1) as f32;

    let mut chart = ChartBuilder::on(&root)
        .caption("Instruction Graph Density", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..max_round.max(1.0), 0f32..1f32)?;

    chart
        .configure_mesh()
        .x_desc("Round")
        .y_desc("Density")
        .draw()?;

    let data: Vec<(f32, f32)> = metrics
        .rounds
        .iter()
        .map(|r| (r.round as f32, r.instruction_density))
        .collect();

    chart
        .draw_series(LineSeries::new(data.clone(), &RED))?
        .label("Density")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart.draw_series(PointSeries::of_element(
        data,
        5,
        &RED,
        &|c, s, st| Circle::new(c, s, st.filled()),
    ))?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Generate all charts into `output_dir`.
pub fn generate_all_plots(metrics: &TraceMetrics, output_dir: &Path) -> Result<Vec<String>> {
    std::fs::create_dir_all(output_dir)?;

    let mut paths = Vec::new();

    let scores_path = output_dir.join("scores.svg");
    plot_scores(metrics, &scores_path)?;
    paths.push(scores_path.display().to_string());

    let density_path = output_dir.join("density.svg");
    plot_density(metrics, &density_path)?;
    paths.push(density_path.display().to_string());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cograph_rounds::generate_rounds;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample(n: usize) -> Vec<RoundSnapshot> {
        let mut rng = StdRng::seed_from_u64(77);
        generate_rounds(n, 10, &mut rng).unwrap()
    }

    #[test]
    fn test_metrics_on_empty_trace() {
        let m = compute_metrics(&[]);
        assert_eq!(m.round_count, 0);
        assert_eq!(m.summary.total_edges, 0);
        assert_eq!(m.summary.overall_avg_score, 0.0);
    }

    #[test]
    fn test_metrics_match_rounds() {
        let rounds = sample(5);
        let m = compute_metrics(&rounds);
        assert_eq!(m.agent_count, 5);
        assert_eq!(m.round_count, 11);
        assert_eq!(m.rounds[0].active_agents, 0);
        assert_eq!(m.rounds[0].instruction_edges, 0);
        assert_eq!(m.rounds[0].min_score, 0.0);
        for r in &m.rounds[1..] {
            assert_eq!(r.coordination_edges, 5);
            assert!(r.feedback_edges <= 2);
            assert!(r.min_score <= r.avg_score && r.avg_score <= r.best_score);
            assert!(r.instruction_density > 0.0 && r.instruction_density <= 1.0);
        }
        assert!(m.summary.score_trend > 0.0);
        assert!((0.0..=1.0).contains(&m.summary.edge_stability));
    }

    #[test]
    fn test_trace_round_trip() {
        let rounds = sample(3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        write_trace(&path, &rounds).unwrap();
        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded, rounds);
    }

    #[test]
    fn test_malformed_line_names_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "\n{not json}\n").unwrap();
        let err = load_trace(&path).unwrap_err();
        assert!(format!("{err:#}").contains(":2:"));
    }

    #[test]
    fn test_report_and_plots() {
        let m = compute_metrics(&sample(4));
        let report = format_report("seed-77", &m);
        assert!(report.starts_with("# Round Analysis: seed-77"));
        assert!(report.contains("| Score Trend |"));
        // summary header + 6 rows, per-round header + 11 rows
        assert_eq!(report.matches("\n| ").count(), 7 + 1 + 11);

        let dir = tempfile::tempdir().unwrap();
        let paths = generate_all_plots(&m, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        for p in paths {
            assert!(std::fs::read_to_string(p).unwrap().contains("<svg"));
        }
    }
}
