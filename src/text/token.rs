/// Explicit line terminator found in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HardBreak {
    /// `\n`
    LineFeed,
    /// `\r`
    CarriageReturn,
}

impl HardBreak {
    /// Classifies `ch`, returning `None` for anything that is not a hard break.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '\n' => Some(Self::LineFeed),
            '\r' => Some(Self::CarriageReturn),
            _ => None,
        }
    }

    /// The character this break was read from.
    pub fn as_char(self) -> char {
        match self {
            Self::LineFeed => '\n',
            Self::CarriageReturn => '\r',
        }
    }
}

/// Break classification of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A single `\n` or `\r`.
    HardBreak(HardBreak),
    /// A run of spaces and tabs.
    Whitespace,
    /// A run of visible characters with no break opportunity inside.
    Word,
    /// Like [`TokenKind::Word`] but ending in `-`; a line may end right after it.
    HyphenWord,
}

impl TokenKind {
    /// `true` for the two word-like kinds that are measured against the width.
    pub fn is_word(self) -> bool {
        matches!(self, Self::Word | Self::HyphenWord)
    }
}

/// Contiguous slice of the source text with its break classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Byte offset of `text` in the source.
    pub start: usize,
    pub text: &'a str,
}

impl Token<'_> {
    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Characters that separate words without ending the line.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t')
}

/// Iterator over the tokens of a string, in source order.
///
/// Concatenating the `text` of every token yields the input unchanged.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    source: &'a str,
    cursor: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, cursor: 0 }
    }

    /// Byte length of the whitespace run at the start of `rest`.
    fn whitespace_len(rest: &str) -> usize {
        rest.find(|ch: char| !is_whitespace(ch))
            .unwrap_or(rest.len())
    }

    /// Byte length and kind of the word fragment at the start of `rest`.
    ///
    /// A fragment stops before whitespace or a hard break, and stops right
    /// after a hyphen so that every hyphen is the last character of its
    /// fragment.
    fn word_len(rest: &str) -> (usize, TokenKind) {
        for (idx, ch) in rest.char_indices() {
            if ch == '-' {
                return (idx + ch.len_utf8(), TokenKind::HyphenWord);
            }
            if is_whitespace(ch) || HardBreak::from_char(ch).is_some() {
                return (idx, TokenKind::Word);
            }
        }
        (rest.len(), TokenKind::Word)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.source[self.cursor..];
        let first = rest.chars().next()?;

        let (len, kind) = if let Some(hard_break) = HardBreak::from_char(first) {
            (first.len_utf8(), TokenKind::HardBreak(hard_break))
        } else if is_whitespace(first) {
            (Self::whitespace_len(rest), TokenKind::Whitespace)
        } else {
            Self::word_len(rest)
        };

        let token = Token {
            kind,
            start: self.cursor,
            text: &rest[..len],
        };
        self.cursor += len;
        Some(token)
    }
}

/// Splits `text` into break-annotated tokens. An empty string yields no tokens.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    Tokenizer::new(text).collect()
}
