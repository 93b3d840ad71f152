use std::sync::Arc;

use crate::{
    font_slot::FontSlot,
    metrics::GlyphMetrics,
    text::{
        line_builder::{self, Line},
        token,
    },
};

/// Size in layout pixels.
pub type LayoutSize = euclid::default::Size2D<f32>;

/// Layout inputs besides the text and the font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Box width in pixels. Only constrains lines while [`Self::wraps`] holds.
    pub width: f32,
    pub wrap_lines: bool,
    /// Grow the box to fit the text. Overrides `wrap_lines`.
    pub auto_width: bool,
    /// Multiplier applied to the font's line height when measuring height.
    pub line_height_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            wrap_lines: true,
            auto_width: false,
            line_height_scale: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Whether width-triggered breaks are active.
    pub fn wraps(&self) -> bool {
        self.wrap_lines && !self.auto_width
    }
}

/// Immutable result of one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSnapshot {
    pub lines: Vec<Line>,
    /// Width of the widest line.
    pub total_width: f32,
    /// Height of all lines stacked at the scaled line height.
    pub total_height: f32,
    /// Scaled distance between two baselines.
    pub line_height: f32,
}

impl LayoutSnapshot {
    fn new(lines: Vec<Line>, line_height: f32) -> Self {
        let total_width = lines.iter().map(|line| line.width).fold(0.0, f32::max);
        let total_height = lines.len() as f32 * line_height;
        Self {
            lines,
            total_width,
            total_height,
            line_height,
        }
    }

    /// `[total_width, total_height]` as a size.
    pub fn size(&self) -> LayoutSize {
        LayoutSize::new(self.total_width, self.total_height)
    }

    /// Stored text of each line, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

/// Tokenizes `text` and breaks it into lines according to `config`.
pub fn layout_lines<M: GlyphMetrics>(text: &str, metrics: M, config: &LayoutConfig) -> Vec<Line> {
    let tokens = token::tokenize(text);
    line_builder::build(&tokens, metrics, config.width, !config.wraps())
}

/// Text box that keeps its line layout in sync with its inputs.
///
/// Setters only record the change. The next read runs [`Self::refresh`],
/// which recomputes the whole layout when an input changed or the font slot
/// published or unloaded metrics since the last pass. Until the slot is
/// ready no lines exist at all; the inputs are kept and laid out as soon as
/// metrics arrive.
///
/// Each pass produces a new [`LayoutSnapshot`]. Snapshots handed out earlier
/// stay valid and unchanged.
#[derive(Debug)]
pub struct TextLayout {
    text: String,
    config: LayoutConfig,
    font: Option<FontSlot>,
    /// Slot generation the current snapshot was computed against.
    font_generation: Option<u64>,
    dirty: bool,
    snapshot: Option<Arc<LayoutSnapshot>>,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl TextLayout {
    /// Creates an empty text box with no font.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            text: String::new(),
            config: LayoutConfig {
                width: sanitize_width(config.width),
                ..config
            },
            font: None,
            font_generation: None,
            dirty: true,
            snapshot: None,
        }
    }

    /// Builder form of [`Self::set_font`].
    pub fn with_font(mut self, font: FontSlot) -> Self {
        self.set_font(font);
        self
    }

    /// Builder form of [`Self::set_text`].
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }
}

/// Inputs
impl TextLayout {
    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.dirty = true;
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces every configuration value at once.
    pub fn set_config(&mut self, config: LayoutConfig) {
        let config = LayoutConfig {
            width: sanitize_width(config.width),
            ..config
        };
        if self.config != config {
            self.config = config;
            self.dirty = true;
        }
    }

    /// Configured box width.
    pub fn width(&self) -> f32 {
        self.config.width
    }

    /// Sets the box width. Negative and NaN widths are treated as zero.
    pub fn set_width(&mut self, width: f32) {
        self.set_config(LayoutConfig {
            width,
            ..self.config
        });
    }

    /// Whether wrapping was requested.
    pub fn wrap_lines(&self) -> bool {
        self.config.wrap_lines
    }

    /// Enables or disables wrapping.
    pub fn set_wrap_lines(&mut self, wrap_lines: bool) {
        self.set_config(LayoutConfig {
            wrap_lines,
            ..self.config
        });
    }

    /// Whether the box grows to fit the text.
    pub fn auto_width(&self) -> bool {
        self.config.auto_width
    }

    /// Switches auto width on or off.
    pub fn set_auto_width(&mut self, auto_width: bool) {
        self.set_config(LayoutConfig {
            auto_width,
            ..self.config
        });
    }

    /// Line height multiplier.
    pub fn line_height_scale(&self) -> f32 {
        self.config.line_height_scale
    }

    /// Sets the line height multiplier.
    pub fn set_line_height_scale(&mut self, line_height_scale: f32) {
        self.set_config(LayoutConfig {
            line_height_scale,
            ..self.config
        });
    }

    /// Bound font slot, if any.
    pub fn font(&self) -> Option<&FontSlot> {
        self.font.as_ref()
    }

    /// Binds the box to `font`. Rebinding the same slot keeps the layout.
    pub fn set_font(&mut self, font: FontSlot) {
        if self.font.as_ref().is_some_and(|current| current.same_slot(&font)) {
            return;
        }
        self.font = Some(font);
        self.dirty = true;
    }

    /// Unbinds the font; the box has no lines until a font is set again.
    pub fn clear_font(&mut self) {
        if self.font.take().is_some() {
            self.dirty = true;
        }
    }
}

/// Layout
impl TextLayout {
    /// Recomputes the layout if any input or the font changed since the last
    /// pass. Returns `true` when a pass ran.
    pub fn refresh(&mut self) -> bool {
        let (generation, metrics) = match &self.font {
            Some(font) => {
                let (generation, metrics) = font.snapshot();
                (Some(generation), metrics)
            }
            None => (None, None),
        };

        if !self.dirty && self.font_generation == generation {
            return false;
        }
        self.dirty = false;
        self.font_generation = generation;

        let Some(metrics) = metrics else {
            log::debug!("font metrics not ready; layout deferred");
            self.snapshot = None;
            return false;
        };

        let lines = layout_lines(&self.text, &metrics, &self.config);
        log::debug!(
            "laid out {} bytes into {} lines (width {}, wrap {})",
            self.text.len(),
            lines.len(),
            self.config.width,
            self.config.wraps()
        );

        let line_height = metrics.line_height() * self.config.line_height_scale;
        self.snapshot = Some(Arc::new(LayoutSnapshot::new(lines, line_height)));
        true
    }

    /// Whether a layout exists for the current inputs.
    pub fn is_ready(&mut self) -> bool {
        self.refresh();
        self.snapshot.is_some()
    }

    /// Current lines; empty while no font metrics are available.
    pub fn lines(&mut self) -> &[Line] {
        self.refresh();
        self.snapshot
            .as_deref()
            .map(|snapshot| snapshot.lines.as_slice())
            .unwrap_or(&[])
    }

    /// Shared handle to the current layout.
    pub fn snapshot(&mut self) -> Option<Arc<LayoutSnapshot>> {
        self.refresh();
        self.snapshot.clone()
    }

    /// Width of the widest line and height of all lines, or `None` while no
    /// font metrics are available.
    pub fn natural_size(&mut self) -> Option<LayoutSize> {
        self.refresh();
        self.snapshot.as_deref().map(LayoutSnapshot::size)
    }

    /// Width the owning element should give the box: the natural width when
    /// `auto_width` is set, the configured width otherwise.
    pub fn box_width(&mut self) -> f32 {
        if !self.config.auto_width {
            return self.config.width;
        }
        self.natural_size().map(|size| size.width).unwrap_or(0.0)
    }
}

fn sanitize_width(width: f32) -> f32 {
    // `f32::max` returns the other operand for NaN.
    width.max(0.0)
}
