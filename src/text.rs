/// Greedy line breaking over tokens.
pub mod line_builder;
/// Text box facade that keeps its lines in sync with its inputs.
pub mod layout;
/// Splits text into break-annotated tokens.
pub mod token;

pub use layout::{LayoutConfig, LayoutSize, LayoutSnapshot, TextLayout, layout_lines};
pub use line_builder::{Line, LineBuilder};
pub use token::{HardBreak, Token, TokenKind, Tokenizer, tokenize};
