//! Table of contents with scroll-spy.
//!
//! Headings at levels 2 and 3 become entries. While scrolling, a heading
//! becomes active when it enters the band between 20% and 65% of the
//! viewport height; the active entry sticks until another heading enters.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub text: String,
    pub level: u8,
    /// Explicit id, kept as-is when present.
    pub id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Lowercase, drop everything except word characters, whitespace and `-`,
/// then join whitespace runs with `-`.
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn build_toc(headings: &[Heading]) -> Vec<TocItem> {
    headings
        .iter()
        .filter(|h| h.level == 2 || h.level == 3)
        .enumerate()
        .map(|(index, h)| {
            let id = match &h.id {
                Some(id) if !id.is_empty() => id.clone(),
                _ => {
                    let slug = slugify(&h.text);
                    if slug.is_empty() {
                        format!("heading-{index}")
                    } else {
                        slug
                    }
                }
            };
            TocItem {
                id,
                text: h.text.clone(),
                level: h.level,
            }
        })
        .collect()
}

/// Pull `##` and `###` headings out of markdown, skipping fenced code.
///
/// A trailing `{#id}` sets an explicit id. Returns each heading with the
/// zero-based line it was found on.
pub fn extract_markdown_headings(markdown: &str) -> Vec<(usize, Heading)> {
    let mut out = Vec::new();
    let mut in_fence = false;
    for (lineno, line) in markdown.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let (level, rest) = if let Some(rest) = trimmed.strip_prefix("### ") {
            (3, rest)
        } else if let Some(rest) = trimmed.strip_prefix("## ") {
            (2, rest)
        } else {
            continue;
        };
        let rest = rest.trim();
        let (text, id) = match rest.rfind("{#") {
            Some(pos) if rest.ends_with('}') => (
                rest[..pos].trim_end().to_string(),
                Some(rest[pos + 2..rest.len() - 1].to_string()),
            ),
            _ => (rest.to_string(), None),
        };
        out.push((lineno, Heading { text, level, id }));
    }
    out
}

/// Where a heading sits on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Clone, Debug)]
pub struct ScrollSpy {
    boxes: Vec<HeadingBox>,
    intersecting: Vec<bool>,
    active: Option<String>,
}

impl ScrollSpy {
    /// Fraction of the viewport trimmed from the top of the observed band.
    pub const TOP_MARGIN: f64 = 0.20;
    /// Fraction of the viewport trimmed from the bottom of the observed band.
    pub const BOTTOM_MARGIN: f64 = 0.35;

    pub fn new(boxes: Vec<HeadingBox>) -> Self {
        let intersecting = vec![false; boxes.len()];
        Self {
            boxes,
            intersecting,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Recompute intersections for a new scroll position.
    ///
    /// Returns the new active id when it changed.
    pub fn update(&mut self, scroll_top: f64, viewport_height: f64) -> Option<&str> {
        let band_top = scroll_top + viewport_height * Self::TOP_MARGIN;
        let band_bottom = scroll_top + viewport_height * (1.0 - Self::BOTTOM_MARGIN);

        let mut entered: Option<usize> = None;
        for (i, b) in self.boxes.iter().enumerate() {
            let now = b.top <= band_bottom && b.top + b.height >= band_top;
            if now && !self.intersecting[i] {
                entered = Some(i);
            }
            self.intersecting[i] = now;
        }

        let id = &self.boxes[entered?].id;
        if self.active.as_deref() == Some(id.as_str()) {
            return None;
        }
        self.active = Some(id.clone());
        self.active.as_deref()
    }
}
