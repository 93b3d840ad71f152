use std::{collections::HashMap, sync::Arc};

/// Read-only glyph measurements consumed by the line builder.
///
/// Implementors must be total: every `char` resolves to some advance, using a
/// fallback glyph when the font has nothing better. Advances are expected to
/// be `>= 0`; negative values are not corrected.
pub trait GlyphMetrics {
    /// Horizontal advance of `ch` in pixels.
    fn advance_width(&self, ch: char) -> f32;

    /// Distance between two consecutive baselines in pixels.
    fn line_height(&self) -> f32;

    /// Sum of the advances of every character in `text`.
    ///
    /// Kerning is not applied, so the result is the same as pushing the
    /// characters one at a time.
    fn measure(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.advance_width(ch)).sum()
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn advance_width(&self, ch: char) -> f32 {
        (**self).advance_width(ch)
    }

    fn line_height(&self) -> f32 {
        (**self).line_height()
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for Arc<M> {
    fn advance_width(&self, ch: char) -> f32 {
        (**self).advance_width(ch)
    }

    fn line_height(&self) -> f32 {
        (**self).line_height()
    }
}

/// Explicit advance table with a fallback for unknown characters.
///
/// Useful for bitmap fonts described by a sidecar file, or for any host that
/// already decoded its font description into plain numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsTable {
    advances: HashMap<char, f32, fxhash::FxBuildHasher>,
    fallback_advance: f32,
    line_height: f32,
}

impl MetricsTable {
    /// Creates an empty table where every character uses `fallback_advance`.
    pub fn new(line_height: f32, fallback_advance: f32) -> Self {
        Self {
            advances: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            fallback_advance,
            line_height,
        }
    }

    /// Table in which every character has the same advance.
    pub fn monospace(advance: f32, line_height: f32) -> Self {
        Self::new(line_height, advance)
    }

    /// Builder form of [`Self::insert`].
    pub fn with_glyph(mut self, ch: char, advance: f32) -> Self {
        self.insert(ch, advance);
        self
    }

    /// Sets the advance of `ch`, returning the previous entry if one existed.
    pub fn insert(&mut self, ch: char, advance: f32) -> Option<f32> {
        self.advances.insert(ch, advance)
    }

    /// Advance used for characters without an entry.
    pub fn fallback_advance(&self) -> f32 {
        self.fallback_advance
    }

    /// Number of characters with an explicit entry.
    pub fn len(&self) -> usize {
        self.advances.len()
    }

    /// `true` when only the fallback glyph is defined.
    pub fn is_empty(&self) -> bool {
        self.advances.is_empty()
    }
}

impl GlyphMetrics for MetricsTable {
    fn advance_width(&self, ch: char) -> f32 {
        self.advances
            .get(&ch)
            .copied()
            .unwrap_or(self.fallback_advance)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Metrics of a parsed `fontdue` font rasterized at a fixed pixel size.
///
/// The font is shared and immutable, so a `FontMetrics` is a complete snapshot
/// the moment it is constructed. Characters the font does not cover resolve
/// to glyph index 0, the font's own default glyph.
#[derive(Clone)]
pub struct FontMetrics {
    font: Arc<fontdue::Font>,
    px: f32,
    line_height: f32,
}

impl FontMetrics {
    /// Creates a snapshot for `font` at `px` pixels per em.
    pub fn new(font: Arc<fontdue::Font>, px: f32) -> Self {
        // Fonts without a hhea table still need a usable line pitch.
        let line_height = font
            .horizontal_line_metrics(px)
            .map(|metrics| metrics.new_line_size)
            .unwrap_or(px);

        Self {
            font,
            px,
            line_height,
        }
    }

    /// Pixel size the advances are scaled to.
    pub fn px(&self) -> f32 {
        self.px
    }

    /// Underlying font handle.
    pub fn font(&self) -> &Arc<fontdue::Font> {
        &self.font
    }
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("name", &self.font.name())
            .field("px", &self.px)
            .field("line_height", &self.line_height)
            .finish()
    }
}

impl GlyphMetrics for FontMetrics {
    fn advance_width(&self, ch: char) -> f32 {
        let glyph_idx = self.font.lookup_glyph_index(ch);
        self.font.metrics_indexed(glyph_idx, self.px).advance_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}


#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_uses_fallback_for_unknown_chars() {
        let table = MetricsTable::new(20.0, 7.0).with_glyph('a', 10.0);

        assert_eq!(table.advance_width('a'), 10.0);
        assert_eq!(table.advance_width('Z'), 7.0);
        assert_eq!(table.advance_width('\u{10FFFF}'), 7.0);
        assert_eq!(table.line_height(), 20.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_replaces_existing_advance() {
        let mut table = MetricsTable::monospace(5.0, 12.0);
        assert!(table.is_empty());

        assert_eq!(table.insert('x', 3.0), None);
        assert_eq!(table.insert('x', 4.0), Some(3.0));
        assert_eq!(table.advance_width('x'), 4.0);
        assert_eq!(table.fallback_advance(), 5.0);
    }

    #[test]
    fn test_measure_sums_advances() {
        let table = MetricsTable::monospace(8.0, 10.0).with_glyph(' ', 2.0);

        assert_eq!(table.measure(""), 0.0);
        assert_eq!(table.measure("ab c"), 26.0);
    }

    #[test]
    fn test_measure_through_references() {
        let table = Arc::new(MetricsTable::monospace(3.0, 10.0));
        let borrowed: &dyn GlyphMetrics = &table;

        assert_eq!(borrowed.measure("four"), 12.0);
        assert_eq!(borrowed.line_height(), 10.0);
    }

    #[test]
    fn test_reference_metrics_scale() {
        let metrics = tests_support::reference_metrics();

        assert!((metrics.advance_width('m') - 26.656).abs() < 1e-4);
        assert!((metrics.line_height() - 36.768).abs() < 1e-4);
    }
}
