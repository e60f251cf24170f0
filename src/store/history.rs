//! Text format of a history record.
//!
//! ```text
//! main-mode: Normal
//! instant-death: off
//! chars-correct: 97/102
//! time-elapsed: 21.36s
//! wpm: 54.49
//! accuracy: 95.10%
//! awl: 4.35
//! <STX>word<NUL>word<NUL>...<ETX>
//! <STX>typed<NUL>typed<NUL>...<ETX>
//! ```
//!
//! The first block holds the target words, the second what was typed for
//! each attempted word. `author:` and `source:` records follow `awl:` for
//! quotes.

use crate::config::Mode;
use crate::error::HistoryError;
use crate::session::stat::Stat;
use crate::session::text::TypeText;

pub const STX: u8 = 0x02;
pub const ETX: u8 = 0x03;
pub const MAX_HISTORY_RECORDS: usize = 63;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameVal {
    pub name: String,
    pub value: String,
}

impl NameVal {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    pub stats: Vec<NameVal>,
    pub text: Vec<String>,
    pub matches: Vec<String>,
}

impl History {
    /// Timed tests keep only the target words reached; the rest keep all of
    /// them. Typed words always stop at the last attempted word.
    pub fn from_test(tt: &TypeText, stat: &Stat) -> Self {
        let mut stats = vec![
            NameVal::new("main-mode", stat.mode.as_str()),
            NameVal::new("instant-death", if stat.instant_death { "on" } else { "off" }),
            NameVal::new("chars-correct", format!("{}/{}", stat.ncorrect, stat.ntyped)),
            NameVal::new("time-elapsed", format!("{:.2}s", stat.elapsed_secs())),
            NameVal::new("wpm", format!("{:.2}", stat.wpm)),
            NameVal::new("accuracy", format!("{:.2}%", stat.accuracy)),
            NameVal::new("awl", format!("{:.2}", stat.avg_word_len)),
        ];
        if let Some(author) = &stat.author {
            stats.push(NameVal::new("author", author.as_str()));
        }
        if let Some(source) = &stat.source {
            stats.push(NameVal::new("source", source.as_str()));
        }

        let (text, matches) = if tt.text.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let last = tt.last_attempted_word();
            let text_end = if stat.mode == Mode::Timed {
                last + 1
            } else {
                tt.text.len()
            };
            (tt.text[..text_end].to_vec(), tt.matches[..=last].to_vec())
        };

        Self {
            stats,
            text,
            matches,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for nv in &self.stats {
            out.extend_from_slice(nv.name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(nv.value.as_bytes());
            out.push(b'\n');
        }
        for block in [&self.text, &self.matches] {
            out.push(STX);
            for word in block {
                out.extend_from_slice(word.as_bytes());
                out.push(0);
            }
            out.push(ETX);
            out.push(b'\n');
        }
        out
    }

    pub fn decode(input: &[u8]) -> Result<Self, HistoryError> {
        let mut reader = Reader { input, pos: 0 };
        let mut stats = Vec::new();

        loop {
            reader.skip_whitespace();
            match reader.peek() {
                None | Some(STX) => break,
                Some(_) => {}
            }
            if stats.len() == MAX_HISTORY_RECORDS {
                return Err(HistoryError::TooManyRecords {
                    max: MAX_HISTORY_RECORDS,
                });
            }
            stats.push(reader.record()?);
        }

        let text = reader.block()?;
        let matches = reader.block()?;
        if text.len() < matches.len() {
            return Err(HistoryError::InconsistentCounts {
                words: text.len(),
                matches: matches.len(),
            });
        }

        Ok(Self {
            stats,
            text,
            matches,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|nv| nv.name == name)
            .map(|nv| nv.value.as_str())
    }

    pub fn mode(&self) -> Option<Mode> {
        self.get("main-mode").and_then(Mode::from_name)
    }

    pub fn instant_death(&self) -> Option<bool> {
        match self.get("instant-death")? {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        }
    }

    /// `(correct, typed)`
    pub fn chars_correct(&self) -> Option<(usize, usize)> {
        let (correct, typed) = self.get("chars-correct")?.split_once('/')?;
        Some((correct.parse().ok()?, typed.parse().ok()?))
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.get("time-elapsed")?.strip_suffix('s')?.parse().ok()
    }

    pub fn wpm(&self) -> Option<f64> {
        self.get("wpm")?.parse().ok()
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.get("accuracy")?.strip_suffix('%')?.parse().ok()
    }
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n')) {
            self.pos += 1;
        }
    }

    fn line(&self) -> usize {
        self.input[..self.pos].iter().filter(|&&b| b == b'\n').count() + 1
    }

    fn bad_record(&self) -> HistoryError {
        HistoryError::BadRecord { line: self.line() }
    }

    fn record(&mut self) -> Result<NameVal, HistoryError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.bad_record());
        }
        let name = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();

        self.skip_whitespace();
        if self.peek() != Some(b':') {
            return Err(self.bad_record());
        }
        self.pos += 1;
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }

        let value_start = self.pos;
        while self.peek().is_some_and(|b| b != b'\n') {
            self.pos += 1;
        }
        let value = &self.input[value_start..self.pos];
        if value.is_empty() {
            return Err(self.bad_record());
        }
        if let Some(&byte) = value.iter().find(|&&b| !is_printable(b)) {
            return Err(HistoryError::NonPrintable { byte });
        }

        Ok(NameVal {
            name,
            value: String::from_utf8_lossy(value).into_owned(),
        })
    }

    /// A `STX word NUL ... ETX` block.
    fn block(&mut self) -> Result<Vec<String>, HistoryError> {
        self.skip_whitespace();
        if self.peek() != Some(STX) {
            return Err(HistoryError::MissingStartMarker);
        }
        self.pos += 1;

        let mut words = Vec::new();
        loop {
            match self.peek() {
                Some(ETX) => {
                    self.pos += 1;
                    return Ok(words);
                }
                None => return Err(HistoryError::MissingEndMarker),
                Some(_) => {}
            }
            let rest = &self.input[self.pos..];
            let Some(len) = rest.iter().position(|&b| b == 0) else {
                return Err(HistoryError::MissingEndMarker);
            };
            let word = &rest[..len];
            if let Some(&byte) = word.iter().find(|&&b| !is_printable(b)) {
                return Err(HistoryError::NonPrintable { byte });
            }
            words.push(String::from_utf8_lossy(word).into_owned());
            self.pos += len + 1;
        }
    }
}
