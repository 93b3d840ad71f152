use std::ops::Range;

use crate::{
    metrics::GlyphMetrics,
    text::token::{HardBreak, Token, TokenKind},
};

/// One display line produced by [`LineBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Characters covered by the line, including trailing whitespace but
    /// never the hard break that closed it.
    pub text: String,
    /// Byte range of `text` in the source string.
    pub range: Range<usize>,
    /// Measured width in pixels. Trailing whitespace is not counted.
    pub width: f32,
    /// The hard break that ended this line, `None` when the line was closed
    /// by wrapping or is the last line.
    pub hard_break: Option<HardBreak>,
}

impl Line {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Line currently being filled.
///
/// `advance` is the running pen position including whitespace, which is what
/// the next fragment is measured against. `trailing_whitespace` is the part
/// of `advance` contributed by whitespace after the last visible character;
/// it is subtracted when the line closes.
struct LineBuffer {
    text: String,
    start: usize,
    end: usize,
    advance: f32,
    trailing_whitespace: f32,
}

impl LineBuffer {
    fn starting_at(start: usize) -> Self {
        Self {
            text: String::new(),
            start,
            end: start,
            advance: 0.0,
            trailing_whitespace: 0.0,
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push_whitespace(&mut self, text: &str, width: f32) {
        self.text.push_str(text);
        self.end += text.len();
        self.advance += width;
        self.trailing_whitespace += width;
    }

    fn push_visible(&mut self, text: &str, width: f32) {
        self.text.push_str(text);
        self.end += text.len();
        self.advance += width;
        self.trailing_whitespace = 0.0;
    }

    fn fits(&self, width: f32, limit: f32) -> bool {
        self.advance + width <= limit
    }

    fn into_line(self, hard_break: Option<HardBreak>) -> Line {
        Line {
            text: self.text,
            range: self.start..self.end,
            width: (self.advance - self.trailing_whitespace).max(0.0),
            hard_break,
        }
    }
}

/// Greedy line breaker over a token stream.
///
/// Word fragments are kept whole whenever they fit; a fragment wider than
/// the whole line is split between characters instead. A line always accepts
/// its first character, so the builder makes progress even when a single
/// glyph is wider than the limit.
pub struct LineBuilder<M> {
    metrics: M,
    /// `None` disables width-triggered breaks.
    max_width: Option<f32>,
    lines: Vec<Line>,
    current: LineBuffer,
}

impl<M: GlyphMetrics> LineBuilder<M> {
    /// Creates a builder that wraps at `max_width`, or never wraps when
    /// `max_width` is `None`.
    pub fn new(metrics: M, max_width: Option<f32>) -> Self {
        Self {
            metrics,
            max_width,
            lines: Vec::new(),
            current: LineBuffer::starting_at(0),
        }
    }

    /// Feeds one token.
    pub fn push(&mut self, token: &Token<'_>) {
        match token.kind {
            TokenKind::HardBreak(hard_break) => {
                self.close_line(Some(hard_break), token.end());
            }
            TokenKind::Whitespace => {
                let width = self.metrics.measure(token.text);
                self.current.push_whitespace(token.text, width);
            }
            TokenKind::Word | TokenKind::HyphenWord => self.push_word(token.text),
        }
    }

    fn push_word(&mut self, text: &str) {
        let width = self.metrics.measure(text);

        let Some(limit) = self.max_width else {
            self.current.push_visible(text, width);
            return;
        };

        if self.current.fits(width, limit) {
            self.current.push_visible(text, width);
            return;
        }

        if !self.current.is_empty() {
            let next_start = self.current.end;
            self.close_line(None, next_start);
        }

        if width <= limit {
            self.current.push_visible(text, width);
            return;
        }

        self.push_chars(text, limit);
    }

    /// Places `text` one character at a time, opening a new line whenever the
    /// next character would overflow.
    fn push_chars(&mut self, text: &str, limit: f32) {
        log::trace!("splitting {:?} between characters (limit {})", text, limit);

        for (idx, ch) in text.char_indices() {
            let width = self.metrics.advance_width(ch);
            if !self.current.is_empty() && !self.current.fits(width, limit) {
                let next_start = self.current.end;
                self.close_line(None, next_start);
            }
            self.current
                .push_visible(&text[idx..idx + ch.len_utf8()], width);
        }
    }

    fn close_line(&mut self, hard_break: Option<HardBreak>, next_start: usize) {
        let finished = std::mem::replace(&mut self.current, LineBuffer::starting_at(next_start));
        self.lines.push(finished.into_line(hard_break));
    }

    /// Closes the line in progress and returns every line in order.
    ///
    /// There is always at least one line, which is empty for empty input.
    pub fn finish(mut self) -> Vec<Line> {
        let last = std::mem::replace(&mut self.current, LineBuffer::starting_at(0));
        self.lines.push(last.into_line(None));
        self.lines
    }
}

/// Runs the builder over an already tokenized string.
///
/// `wrap_disabled` turns off every width-triggered break; only hard breaks
/// then start new lines.
pub fn build<M: GlyphMetrics>(
    tokens: &[Token<'_>],
    metrics: M,
    width: f32,
    wrap_disabled: bool,
) -> Vec<Line> {
    let max_width = (!wrap_disabled).then_some(width);
    let mut builder = LineBuilder::new(metrics, max_width);
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metrics::{MetricsTable, tests_support::reference_metrics},
        text::token::tokenize,
    };

    fn wrap(text: &str, width: f32) -> Vec<Line> {
        build(&tokenize(text), &reference_metrics(), width, false)
    }

    fn no_wrap(text: &str, width: f32) -> Vec<Line> {
        build(&tokenize(text), &reference_metrics(), width, true)
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|line| line.text.as_str()).collect()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    fn rebuild(lines: &[Line]) -> String {
        let mut out = String::new();
        for line in lines {
            out.push_str(&line.text);
            if let Some(hard_break) = line.hard_break {
                out.push(hard_break.as_char());
            }
        }
        out
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let lines = wrap("", 200.0);

        assert_eq!(texts(&lines), vec![""]);
        assert_eq!(lines[0].width, 0.0);
        assert_eq!(lines[0].range, 0..0);
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        assert_eq!(texts(&wrap("abcde fghij", 200.0)), vec!["abcde fghij"]);
    }

    #[test]
    fn test_breaks_between_words() {
        let lines = wrap("abcde fghij klmno pqrst uvwxyz", 200.0);

        assert_eq!(texts(&lines), vec!["abcde fghij ", "klmno pqrst ", "uvwxyz"]);
        let metrics = reference_metrics();
        assert_close(lines[0].width, metrics.measure("abcde fghij"));
        assert_close(lines[1].width, metrics.measure("klmno pqrst"));
    }

    #[test]
    fn test_single_long_word_falls_back_to_characters() {
        assert_eq!(
            texts(&wrap("abcdefghijklmnopqrstuvwxyz", 200.0)),
            vec!["abcdefghijklm", "nopqrstuvwxy", "z"]
        );
    }

    #[test]
    fn test_long_word_after_short_word_starts_on_new_line() {
        assert_eq!(
            texts(&wrap("abcdefgh ijklmnopqrstuvwxyz", 200.0)),
            vec!["abcdefgh ", "ijklmnopqrstu", "vwxyz"]
        );
    }

    #[test]
    fn test_one_pixel_width_puts_each_character_on_its_own_line() {
        let lines = wrap("abcdef ghijkl", 1.0);

        assert_eq!(
            texts(&lines),
            vec!["a", "b", "c", "d", "e", "f ", "g", "h", "i", "j", "k", "l"]
        );
        // Each line holds one glyph that is wider than the box on its own.
        let metrics = reference_metrics();
        assert_close(lines[5].width, metrics.advance_width('f'));
        assert!(lines.iter().all(|line| line.width > 1.0));
    }

    #[test]
    fn test_trailing_whitespace_does_not_force_a_break() {
        let lines = wrap("abcdefgh        i", 200.0);

        assert_eq!(texts(&lines), vec!["abcdefgh        ", "i"]);
        assert_close(lines[0].width, reference_metrics().measure("abcdefgh"));
    }

    #[test]
    fn test_breaks_after_hyphen() {
        assert_eq!(
            texts(&wrap("abcde fghij-klm nopqr stuvwxyz", 200.0)),
            vec!["abcde fghij-", "klm nopqr ", "stuvwxyz"]
        );
    }

    #[test]
    fn test_keeps_hyphenated_segments_together() {
        assert_eq!(
            texts(&wrap("abcde fghij-klm nopqr stuvwxyz", 150.0)),
            vec!["abcde ", "fghij-klm ", "nopqr ", "stuvwxyz"]
        );
    }

    #[test]
    fn test_hard_breaks() {
        assert_eq!(texts(&wrap("abcde\nfghij", 200.0)), vec!["abcde", "fghij"]);
        assert_eq!(texts(&wrap("abcde\rfghij", 200.0)), vec!["abcde", "fghij"]);

        let lines = wrap("abcde\n\n\nfg\nhij", 200.0);
        assert_eq!(texts(&lines), vec!["abcde", "", "", "fg", "hij"]);
        assert_eq!(
            lines.iter().map(|line| line.hard_break).collect::<Vec<_>>(),
            vec![
                Some(HardBreak::LineFeed),
                Some(HardBreak::LineFeed),
                Some(HardBreak::LineFeed),
                Some(HardBreak::LineFeed),
                None,
            ]
        );
    }

    #[test]
    fn test_crlf_is_two_breaks() {
        assert_eq!(texts(&wrap("ab\r\ncd", 200.0)), vec!["ab", "", "cd"]);
    }

    #[test]
    fn test_whitespace_after_hard_break_belongs_to_next_line() {
        let lines = wrap("ab\n  cd", 200.0);

        assert_eq!(texts(&lines), vec!["ab", "  cd"]);
        assert_eq!(lines[1].range, 3..7);
        assert_close(lines[1].width, reference_metrics().measure("  cd"));
    }

    #[test]
    fn test_trailing_text_with_break_ends_in_empty_line() {
        let lines = wrap("abc\n", 200.0);

        assert_eq!(texts(&lines), vec!["abc", ""]);
        assert_eq!(lines[1].range, 4..4);
    }

    #[test]
    fn test_no_wrap_ignores_width() {
        let text = "abcde fghij klmno pqrst uvwxyz";
        for width in [0.0, 1.0, 150.0, 10_000.0] {
            assert_eq!(texts(&no_wrap(text, width)), vec![text]);
        }
        assert_eq!(
            texts(&no_wrap("abcde fghij\nklmno pqrst uvwxyz", 1.0)),
            vec!["abcde fghij", "klmno pqrst uvwxyz"]
        );
    }

    #[test]
    fn test_no_wrap_line_count_follows_hard_breaks() {
        let text = "a\nbb cc\r\rddd-eee fff\n";
        let hard_breaks = text.chars().filter(|ch| matches!(ch, '\n' | '\r')).count();

        assert_eq!(no_wrap(text, 1.0).len(), hard_breaks + 1);
    }

    #[test]
    fn test_lines_reconstruct_source() {
        for text in [
            "",
            "abcde fghij klmno pqrst uvwxyz",
            "abcdefghijklmnopqrstuvwxyz",
            "abcde fghij-klm nopqr stuvwxyz",
            "abcde\n\n\nfg\nhij",
            "  lead\r\n trail  \n",
        ] {
            for width in [1.0, 60.0, 150.0, 200.0] {
                let lines = wrap(text, width);
                assert_eq!(rebuild(&lines), text, "text {text:?} width {width}");
                for line in &lines {
                    assert_eq!(&text[line.range.clone()], line.text);
                }
            }
        }
    }

    #[test]
    fn test_width_bound_holds_except_for_single_characters() {
        let text = "the quick brown-fox jumps over the lazy dog wwwwwwwwwwwwwwwwwwww";
        for width in [10.0, 40.0, 90.0, 200.0] {
            for line in wrap(text, width) {
                let visible = line.text.trim_end_matches([' ', '\t']).chars().count();
                assert!(
                    line.width <= width || visible == 1,
                    "line {:?} is {} wide for limit {}",
                    line.text,
                    line.width,
                    width
                );
            }
        }
    }

    #[test]
    fn test_rebuilding_is_idempotent() {
        let text = "abcde fghij-klm nopqr stuvwxyz\nabcdefghijklmnopqrstuvwxyz";

        assert_eq!(wrap(text, 150.0), wrap(text, 150.0));
    }

    #[test]
    fn test_zero_width_glyphs_never_stall() {
        let metrics = MetricsTable::monospace(0.0, 10.0).with_glyph('w', 50.0);
        let lines = build(&tokenize("wwww zz ww"), &metrics, 0.0, false);

        assert_eq!(texts(&lines), vec!["w", "w", "w", "w ", "zz ", "w", "w"]);
    }

    #[test]
    fn test_fallback_continues_on_last_partial_line() {
        let metrics = MetricsTable::monospace(10.0, 12.0);
        let lines = build(&tokenize("abcdefg hi"), &metrics, 30.0, false);

        assert_eq!(texts(&lines), vec!["abc", "def", "g ", "hi"]);
        assert_close(lines[2].width, 10.0);
    }

    #[test]
    fn test_multibyte_characters_split_on_char_boundaries() {
        let metrics = MetricsTable::monospace(10.0, 12.0);
        let lines = build(&tokenize("äöüß"), &metrics, 25.0, false);

        assert_eq!(texts(&lines), vec!["äö", "üß"]);
        assert_eq!(lines[1].range, 4..8);
    }
}
