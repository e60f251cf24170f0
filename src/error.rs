use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorpusKind {
    Dictionary,
    Quotes,
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusKind::Dictionary => f.write_str("dictionary words"),
            CorpusKind::Quotes => f.write_str("quotes"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no {corpus} left after filtering")]
    ExhaustedCorpus { corpus: CorpusKind },

    #[error("decorating '{word}' with '{decoration}' would exceed {max} characters")]
    EncodingTooLong {
        word: String,
        decoration: String,
        max: usize,
    },
}

/// A history file that cannot be loaded. The whole record is rejected.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("expected start-of-text marker")]
    MissingStartMarker,

    #[error("text block ended before end-of-text marker")]
    MissingEndMarker,

    #[error("non-printable byte 0x{byte:02x} in history record")]
    NonPrintable { byte: u8 },

    #[error("malformed record on line {line}")]
    BadRecord { line: usize },

    #[error("more than {max} records")]
    TooManyRecords { max: usize },

    #[error("{matches} typed words but only {words} target words")]
    InconsistentCounts { words: usize, matches: usize },

    #[error("history IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid range '{0}', expected '-', 'N' or 'N-M'")]
    BadRange(String),

    #[error("circumfix punctuation '{0}' must have an even length")]
    OddCircumfix(String),

    #[error("punctuation '{0}' must be printable ASCII")]
    NonAsciiPunctuation(String),

    #[error("invalid word filter: {0}")]
    BadRegex(#[from] regex::Error),

    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("viewport width {width} is narrower than the minimum of {min}")]
    ViewportTooNarrow { width: usize, min: usize },

    #[error("viewport height {height} is outside {min}..={max}")]
    BadHeight {
        height: usize,
        min: usize,
        max: usize,
    },
}
