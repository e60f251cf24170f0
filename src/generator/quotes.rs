//! Quote files: each quote is an optional block of `author:` / `source:`
//! lines followed by its words in braces.
//!
//! ```text
//! author: Ada Lovelace
//! source: Notes
//! { The Analytical Engine weaves algebraic patterns }
//! ```
//!
//! Inside the braces `\}` stands for a literal brace. A malformed quote is
//! skipped through its closing brace.

use tracing::debug;

use crate::generator::dictionary::{WordRead, is_separator, read_word};

pub const QUOTES_EN: &str = include_str!("../../assets/quotes-en.txt");

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Quote {
    pub author: Option<String>,
    pub source: Option<String>,
    pub words: Vec<String>,
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_separator) {
            self.pos += 1;
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Reads `label:` and returns the label. Rewinds on failure.
    fn label(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            self.pos += 1;
        }
        let label = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        self.skip_whitespace();
        if label.is_empty() || self.peek() != Some(b':') {
            self.pos = start;
            return None;
        }
        self.pos += 1;
        Some(label)
    }

    /// Rest of the current line, which must be printable and non-empty.
    fn value(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b != b'\n') {
            self.pos += 1;
        }
        let value = &self.input[start..self.pos];
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        let value = value.strip_suffix(b"\r").unwrap_or(value);
        if value.is_empty() || !value.iter().all(|b| (0x20..=0x7e).contains(b)) {
            return None;
        }
        Some(String::from_utf8_lossy(value).into_owned())
    }

    fn labels(&mut self, quote: &mut Quote) -> Option<()> {
        loop {
            self.skip_whitespace();
            let Some(label) = self.label() else {
                return Some(());
            };
            self.skip_blanks();
            let value = self.value()?;
            match label.to_ascii_lowercase().as_str() {
                "author" => quote.author = Some(value),
                "source" => quote.source = Some(value),
                _ => return None,
            }
        }
    }

    fn body(&mut self, quote: &mut Quote) -> Option<()> {
        self.skip_whitespace();
        if self.peek() != Some(b'{') {
            return None;
        }
        self.pos += 1;

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Some(());
                }
                None => return None,
                Some(_) => {}
            }
            match read_word(self.input, &mut self.pos, Some(b'}')) {
                WordRead::Word(word) => quote.words.push(word),
                WordRead::Skipped | WordRead::End => {
                    while self.peek().is_some_and(|b| !is_separator(b) && b != b'}') {
                        self.pos += 1;
                    }
                }
            }
        }
    }

    /// Skip past the next unescaped closing brace.
    fn skip_quote(&mut self) {
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'}' => return,
                b'\\' => self.pos += 1,
                _ => {}
            }
        }
    }
}

pub fn parse_quotes(input: &str) -> Vec<Quote> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
    };
    let mut quotes = Vec::new();
    let mut skipped = 0usize;

    loop {
        parser.skip_whitespace();
        if parser.peek().is_none() {
            break;
        }

        let start = parser.pos;
        let mut quote = Quote::default();
        let parsed = parser.labels(&mut quote).and_then(|_| parser.body(&mut quote));
        match parsed {
            Some(()) if !quote.words.is_empty() => quotes.push(quote),
            Some(()) => skipped += 1,
            None => {
                skipped += 1;
                parser.skip_quote();
                if parser.pos == start {
                    parser.pos += 1;
                }
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, kept = quotes.len(), "skipped malformed quotes");
    }
    quotes
}

pub fn builtin_quotes() -> Vec<Quote> {
    parse_quotes(QUOTES_EN)
}
