use crate::palette::{self, Rgb};
use crate::scene::{EdgeGlyph, Fill, LegendEntry, NodeGlyph, Scene};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Coordination dash pattern, in pixels.
const DASH: u32 = 8;
const GAP: u32 = 4;

/// Draw `scene` to an SVG file.
pub fn render_svg(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let root = SVGBackend::new(path.as_ref(), (scene.width, scene.height)).into_drawing_area();
    draw_scene(&root, scene)?;
    root.present()?;
    Ok(())
}

/// Draw `scene` and return the SVG document.
pub fn render_svg_string(scene: &Scene) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()?;
    }
    Ok(buf)
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn px(p: (f32, f32)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn draw_scene(root: &Canvas<'_>, scene: &Scene) -> Result<()> {
    root.fill(&WHITE)?;
    for edge in &scene.edges {
        draw_edge(root, edge)?;
    }
    for node in &scene.nodes {
        draw_node(root, node)?;
    }
    draw_legend_box(root, (30, 30), 200, &scene.agent_legend)?;
    draw_legend_box(root, (260, 30), 180, &scene.connection_legend)?;
    Ok(())
}

fn draw_edge(root: &Canvas<'_>, edge: &EdgeGlyph) -> Result<()> {
    let style = color(edge.color)
        .mix(edge.opacity as f64)
        .stroke_width(edge.width.round() as u32);
    if edge.dashed {
        root.draw(&DashedPathElement::new(
            vec![px(edge.from), px(edge.to)],
            DASH,
            GAP,
            style,
        ))?;
    } else {
        root.draw(&PathElement::new(vec![px(edge.from), px(edge.to)], style))?;
    }
    Ok(())
}

fn draw_node(root: &Canvas<'_>, node: &NodeGlyph) -> Result<()> {
    let center = px((node.x, node.y));
    let radius = node.radius.round() as i32;
    let alpha = node.opacity as f64;

    match node.fill {
        Fill::Solid { color: c } => {
            if node.glow {
                root.draw(&Circle::new(center, radius + 4, color(c).mix(0.25).filled()))?;
            }
            root.draw(&Circle::new(center, radius, color(c).mix(alpha).filled()))?;
        }
        Fill::Radial { inner, outer } => {
            if node.glow {
                root.draw(&Circle::new(center, radius + 4, color(outer).mix(0.25).filled()))?;
            }
            root.draw(&Circle::new(center, radius, color(outer).mix(alpha).filled()))?;
            root.draw(&Circle::new(
                center,
                radius * 3 / 5,
                color(inner).mix(alpha * 0.8).filled(),
            ))?;
        }
    }
    root.draw(&Circle::new(
        center,
        radius,
        color(node.stroke)
            .mix(alpha)
            .stroke_width(node.stroke_width.round() as u32),
    ))?;

    let label_style = ("sans-serif", node.label_size)
        .into_font()
        .color(&color(node.label_color))
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(node.label.clone(), center, label_style))?;

    if let Some(score) = &node.score_label {
        let score_style = ("monospace", 10)
            .into_font()
            .color(&color(palette::INK))
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            score.clone(),
            (center.0, center.1 + radius + 12),
            score_style,
        ))?;
    }
    Ok(())
}

fn draw_legend_box(
    root: &Canvas<'_>,
    origin: (i32, i32),
    width: i32,
    entries: &[LegendEntry],
) -> Result<()> {
    let (x, y) = origin;
    root.draw(&Rectangle::new(
        [(x - 10, y - 10), (x - 10 + width, y + 70)],
        WHITE.mix(0.95).filled(),
    ))?;
    root.draw(&Rectangle::new(
        [(x - 10, y - 10), (x - 10 + width, y + 70)],
        color(palette::LEGEND_BORDER).stroke_width(1),
    ))?;

    for (i, entry) in entries.iter().enumerate() {
        let row = y + i as i32 * 22;
        let text_x = if entry.sublabel.is_some() { x + 18 } else { x + 32 };
        match entry.sublabel {
            Some(_) => {
                root.draw(&Circle::new((x, row), 7, color(entry.color).filled()))?;
            }
            None => {
                let style = color(entry.color).stroke_width(4);
                if entry.dashed {
                    root.draw(&DashedPathElement::new(
                        vec![(x, row), (x + 25, row)],
                        DASH,
                        GAP,
                        style,
                    ))?;
                } else {
                    root.draw(&PathElement::new(vec![(x, row), (x + 25, row)], style))?;
                }
            }
        }

        let label_style = ("sans-serif", 13)
            .into_font()
            .color(&color(palette::INK))
            .pos(Pos::new(HPos::Left, VPos::Center));
        match entry.sublabel {
            Some(sub) => {
                root.draw(&Text::new(entry.label, (text_x, row - 4), label_style))?;
                let sub_style = ("sans-serif", 10)
                    .into_font()
                    .color(&color(palette::MUTED_INK))
                    .pos(Pos::new(HPos::Left, VPos::Center));
                root.draw(&Text::new(sub, (text_x, row + 8), sub_style))?;
            }
            None => {
                root.draw(&Text::new(entry.label, (text_x, row), label_style))?;
            }
        }
    }
    Ok(())
}
