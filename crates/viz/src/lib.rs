//! Visual output for coordination-graph rounds.
//!
//! [`project`] turns a snapshot into a backend-neutral [`Scene`];
//! [`render_svg`] and [`write_dot`] put it on disk.

pub mod dot;
pub mod palette;
pub mod panel;
pub mod scene;
pub mod svg;

pub use dot::{write_dot, write_dot_to};
pub use palette::{plasma, Rgb};
pub use panel::{round_label, round_status, score_cards, ScoreCard};
pub use scene::{project, EdgeGlyph, Fill, LegendEntry, NodeGlyph, NodeStyle, Scene};
pub use svg::{render_svg, render_svg_string};
