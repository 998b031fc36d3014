//! Interactive companions to the round visualization: slider-driven
//! formulas, a table of contents with scroll-spy, and the concept
//! mapping explorer.

pub mod calculator;
pub mod concepts;
pub mod slider;
pub mod toc;
pub mod wave;

pub use calculator::ParameterCalculator;
pub use concepts::{Concept, ConceptExplorer, ConceptMapping, MAPPINGS};
pub use slider::RangeSlider;
pub use toc::{build_toc, extract_markdown_headings, slugify, Heading, HeadingBox, ScrollSpy, TocItem};
pub use wave::{WaveWidget, WAVE_SAMPLES, WAVE_SPAN};
