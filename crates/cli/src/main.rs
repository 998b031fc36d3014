//! cograph CLI - generate, play back and render coordination-graph rounds.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cograph_analyze::{compute_metrics, format_report, generate_all_plots, load_trace, write_trace};
use cograph_core::{ConnectionKind, RoundSnapshot, SimulationConfig};
use cograph_playback::{PlaybackSession, ThreadScheduler};
use cograph_rounds::RoundSequence;
use cograph_viz::{project, render_svg, round_label, round_status, score_cards, write_dot};
use cograph_widgets::{
    build_toc, extract_markdown_headings, HeadingBox, ParameterCalculator, ScrollSpy, WaveWidget,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cograph")]
#[command(about = "Simulated coordination-graph rounds: generate, play, render, analyze")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

/// Simulation settings. Flags override values loaded from `--config`.
#[derive(Args, Debug, Clone)]
struct SimArgs {
    /// JSON file with a SimulationConfig
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of proposal agents (clamped to 2..=8)
    #[arg(long)]
    agents: Option<usize>,

    /// Last round index
    #[arg(long)]
    max_round: Option<usize>,

    /// Seed for the noise generator
    #[arg(long)]
    seed: Option<u64>,

    /// Auto-advance interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
}

impl SimArgs {
    fn resolve(&self) -> Result<SimulationConfig> {
        let mut cfg = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(n) = self.agents {
            cfg.agent_count = n;
        }
        if let Some(r) = self.max_round {
            cfg.max_round = r;
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(ms) = self.interval_ms {
            cfg.interval_ms = ms;
        }
        Ok(cfg.validated()?)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Generate a round sequence, print a per-round table and optionally write a trace
    Rounds {
        #[command(flatten)]
        sim: SimArgs,

        /// Directory for rounds.jsonl
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Render rounds to SVG, DOT and scene JSON
    Render {
        #[command(flatten)]
        sim: SimArgs,

        /// Round to render (clamped to the last round)
        #[arg(long, default_value_t = 0, conflicts_with = "all")]
        round: usize,

        /// Render every round in parallel
        #[arg(long)]
        all: bool,

        /// Output directory
        #[arg(long, default_value = "renders")]
        out: PathBuf,
    },

    /// Auto-advance through the rounds on a timer, printing each one
    Play {
        #[command(flatten)]
        sim: SimArgs,

        /// Also write an SVG per visited round
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compute metrics and charts from a rounds.jsonl trace
    Analyze {
        /// Path to a rounds.jsonl trace
        #[arg(long)]
        trace: PathBuf,

        /// Directory for the SVG charts
        #[arg(long, default_value = "analysis")]
        out: PathBuf,
    },

    /// Evaluate the sine wave widget
    Wave {
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        amplitude: f64,

        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        frequency: f64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        phase: f64,

        /// SVG file to write the plot to
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Evaluate the parameter calculator
    Calc {
        #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
        value: f64,

        #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
        multiplier: f64,
    },

    /// Print the table of contents of a markdown file
    Toc {
        /// Markdown file
        #[arg(long)]
        input: PathBuf,

        /// Scroll offset in pixels; marks the active heading
        #[arg(long)]
        scroll: Option<f64>,

        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport: f64,

        /// Height of one markdown line in pixels
        #[arg(long, default_value_t = 24.0)]
        line_height: f64,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Rounds { sim, out } => cmd_rounds(&sim.resolve()?, out.as_deref()),
        Command::Render {
            sim,
            round,
            all,
            out,
        } => cmd_render(&sim.resolve()?, round, all, &out),
        Command::Play { sim, out } => cmd_play(&sim.resolve()?, out.as_deref()),
        Command::Analyze { trace, out } => cmd_analyze(&trace, &out),
        Command::Wave {
            amplitude,
            frequency,
            phase,
            out,
        } => cmd_wave(amplitude, frequency, phase, out.as_deref()),
        Command::Calc { value, multiplier } => {
            let mut calc = ParameterCalculator::default();
            calc.set_value(value);
            calc.set_multiplier(multiplier);
            println!("{}", calc.formula());
            println!("normalized: {:.2}", calc.normalized());
            Ok(())
        }
        Command::Toc {
            input,
            scroll,
            viewport,
            line_height,
        } => cmd_toc(&input, scroll, viewport, line_height),
    }
}

fn cmd_rounds(cfg: &SimulationConfig, out: Option<&Path>) -> Result<()> {
    let seq = RoundSequence::from_config(cfg)?;
    println!(
        "{} proposal agents, rounds 0..={}, seed {}",
        seq.agent_count(),
        seq.max_round(),
        cfg.seed
    );
    println!();
    println!("round  active   best    avg  coord  instr  fb");
    for snap in seq.rounds() {
        println!(
            "{:>5} {:>7} {:>6.3} {:>6.3} {:>6} {:>6} {:>3}",
            snap.round,
            snap.active_proposals().count(),
            snap.best_score,
            snap.avg_score,
            snap.count_of(ConnectionKind::Coordination),
            snap.count_of(ConnectionKind::Instruction),
            snap.count_of(ConnectionKind::Feedback),
        );
    }

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join("rounds.jsonl");
        write_trace(&path, seq.rounds())?;
        println!("\nTrace written to: {}", path.display());
    }
    Ok(())
}

fn render_round(snap: &RoundSnapshot, dir: &Path) -> Result<()> {
    let scene = project(snap);
    let stem = format!("round_{:02}", snap.round);

    render_svg(&scene, dir.join(format!("{stem}.svg")))?;
    write_dot(dir.join(format!("{stem}.dot")), snap)?;

    let json_path = dir.join(format!("{stem}.json"));
    let json = scene.to_json()?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    Ok(())
}

fn cmd_render(cfg: &SimulationConfig, round: usize, all: bool, out: &Path) -> Result<()> {
    let seq = RoundSequence::from_config(cfg)?;
    std::fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    if all {
        seq.rounds()
            .par_iter()
            .map(|snap| render_round(snap, out))
            .collect::<Result<Vec<_>>>()?;
        info!(rounds = seq.len(), out = %out.display(), "Rendered all rounds");
        println!("Rendered {} rounds to {}", seq.len(), out.display());
        return Ok(());
    }

    let snap = match seq.try_get(round) {
        Ok(snap) => snap,
        Err(err) => {
            warn!(%err, "Clamping to the last round");
            seq.get(round)
        }
    };
    render_round(snap, out)?;
    print_round(snap, seq.max_round());
    println!("\nRendered round {} to {}", snap.round, out.display());
    Ok(())
}

fn print_round(snap: &RoundSnapshot, max_round: usize) {
    println!("{}", round_label(snap.round, max_round));
    for card in score_cards(snap) {
        println!("  {:<14} {}", card.title, card.value);
    }
    for line in round_status(snap.round) {
        println!("  - {line}");
    }
}

fn cmd_play(cfg: &SimulationConfig, out: Option<&Path>) -> Result<()> {
    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut session = PlaybackSession::new(cfg, Box::new(ThreadScheduler))?;
    let interval = session.controller().interval();
    let max_round = session.controller().max_round();

    let show = |snap: &RoundSnapshot| -> Result<()> {
        print_round(snap, max_round);
        println!();
        if let Some(dir) = out {
            render_svg(&project(snap), dir.join(format!("round_{:02}.svg", snap.round)))?;
        }
        Ok(())
    };

    show(session.current())?;
    if !session.controller_mut().toggle_auto_advance() {
        return Ok(());
    }

    let mut shown = session.controller().round();
    while session.controller().is_auto_advancing() {
        session.controller_mut().wait_for_tick(interval * 2);
        let round = session.controller().round();
        if round != shown {
            shown = round;
            show(session.current())?;
        }
    }
    info!(round = shown, "Playback finished");
    Ok(())
}

fn cmd_analyze(trace: &Path, out: &Path) -> Result<()> {
    let rounds = load_trace(trace)?;
    let metrics = compute_metrics(&rounds);
    println!("{}", format_report(&trace.display().to_string(), &metrics));

    std::fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;
    for path in generate_all_plots(&metrics, out)? {
        println!("Wrote chart: {path}");
    }
    Ok(())
}

fn cmd_wave(amplitude: f64, frequency: f64, phase: f64, out: Option<&Path>) -> Result<()> {
    let mut wave = WaveWidget::default();
    wave.set_amplitude(amplitude);
    wave.set_frequency(frequency);
    wave.set_phase(phase);
    println!("{}", wave.formula());

    if let Some(path) = out {
        wave.render_svg(path)?;
        println!("Wrote plot: {}", path.display());
    }
    Ok(())
}

fn cmd_toc(input: &Path, scroll: Option<f64>, viewport: f64, line_height: f64) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let found = extract_markdown_headings(&text);
    let headings: Vec<_> = found.iter().map(|(_, h)| h.clone()).collect();
    let toc = build_toc(&headings);

    let active = match scroll {
        Some(scroll_top) => {
            let boxes = found
                .iter()
                .zip(&toc)
                .map(|((line, _), item)| HeadingBox {
                    id: item.id.clone(),
                    top: *line as f64 * line_height,
                    height: line_height,
                })
                .collect();
            let mut spy = ScrollSpy::new(boxes);
            spy.update(scroll_top, viewport);
            spy.active().map(str::to_string)
        }
        None => None,
    };

    for item in &toc {
        let indent = if item.level == 3 { "    " } else { "" };
        let marker = if active.as_deref() == Some(item.id.as_str()) {
            ">"
        } else {
            " "
        };
        println!("{marker} {indent}{} (#{})", item.text, item.id);
    }
    Ok(())
}
