//! # Orikaeshi
//!
//! Line layout for UI text boxes.
//!
//! ## Overview
//!
//! `Orikaeshi` turns a string, a font's glyph advances and a box width into
//! an ordered list of display lines. It honors explicit `\n` / `\r` breaks,
//! wraps at whitespace, allows a break after every hyphen, and splits a word
//! between characters when it cannot fit a line on its own. Every line keeps
//! the exact slice of text it covers together with its measured width, with
//! trailing whitespace left out of the width.
//!
//! The pipeline has two independent stages, [`text::tokenize`] and
//! [`text::LineBuilder`], wrapped by the [`TextLayout`] facade which re-runs
//! them whenever the text, the flags, or the font metrics change.
//!
//! ## Usage
//!
//! ```rust
//! use orikaeshi::{FontSlot, MetricsTable, TextLayout, text::LayoutConfig};
//!
//! // The font loader publishes metrics into a slot once they are ready.
//! let font = FontSlot::new();
//! font.publish(MetricsTable::monospace(10.0, 12.0));
//!
//! let mut layout = TextLayout::new(LayoutConfig {
//!     width: 60.0,
//!     ..Default::default()
//! })
//! .with_font(font)
//! .with_text("split me-please now");
//!
//! let texts: Vec<&str> = layout.lines().iter().map(|line| line.text.as_str()).collect();
//! assert_eq!(texts, ["split ", "me-", "please ", "now"]);
//! ```
//!
//! Real fonts are measured through [`FontStorage`], which parses faces found by
//! `fontdb` with `fontdue` and publishes [`metrics::FontMetrics`] snapshots.

pub mod font_slot;
pub mod font_storage;
pub mod metrics;
pub mod text;

// common re-exports
pub use font_slot::{FontSlot, SharedMetrics};
pub use font_storage::FontStorage;
pub use metrics::{GlyphMetrics, MetricsTable};
pub use text::{Line, TextLayout};

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use parking_lot;
