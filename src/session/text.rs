use std::ops::Range;
use std::time::{Duration, Instant};

use crate::engine::layout::{self, Line};

/// Per-character comparison of a typed word against its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Pending,
    /// Typed past the end of the target word.
    Overflow,
}

/// Words of a single test, what was typed for each, and how they wrap.
#[derive(Clone, Debug, Default)]
pub struct TypeText {
    pub text: Vec<String>,
    pub matches: Vec<String>,
    pub lines: Vec<Line>,
    /// Equals `word_count()` once the last word has been completed.
    pub current_word: usize,
    pub current_line: usize,
    pub author: Option<String>,
    pub source: Option<String>,
    /// Keystrokes that reached a match buffer, never reduced by backspace.
    pub raw_typed: usize,
    pub raw_correct: usize,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl TypeText {
    /// Lay `words` out from scratch for a viewport `width` columns wide.
    pub fn from_words(words: Vec<String>, width: usize) -> Self {
        let mut tt = Self::default();
        tt.append_words(words);
        layout::fix_line(&mut tt, 0, width);
        tt
    }

    /// Append words onto the last line without reflowing.
    pub fn append_words(&mut self, words: impl IntoIterator<Item = String>) {
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        let last = self.lines.len() - 1;
        for word in words {
            self.lines[last].len += word.len() + 1;
            self.text.push(word);
            self.matches.push(String::new());
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.len()
    }

    /// Width a word occupies on screen, not counting its separator.
    pub fn visual_len(&self, word: usize) -> usize {
        self.text[word].len().max(self.matches[word].len())
    }

    pub fn is_complete(&self) -> bool {
        self.current_word >= self.text.len()
    }

    /// The word currently under the cursor, clamped to the last word.
    pub fn last_attempted_word(&self) -> usize {
        self.current_word.min(self.text.len().saturating_sub(1))
    }

    /// Index range of the words placed on `line`.
    pub fn line_words(&self, line: usize) -> Range<usize> {
        let start = self.lines[line].first_word;
        let end = self
            .lines
            .get(line + 1)
            .map_or(self.text.len(), |next| next.first_word);
        start..end
    }

    /// Lines shown in a window `height` lines tall, keeping the cursor centred.
    pub fn visible_lines(&self, height: usize) -> Range<usize> {
        let start = self.current_line.saturating_sub(height / 2);
        let end = (start + height).min(self.lines.len());
        start..end
    }

    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Compare the typed text of `word` against its target, byte by byte.
    pub fn diff_word(&self, word: usize) -> Vec<(char, CharState)> {
        diff_word(&self.text[word], &self.matches[word])
    }
}

/// Typed characters are shown as typed; untyped ones show the target.
pub fn diff_word(target: &str, typed: &str) -> Vec<(char, CharState)> {
    let target = target.as_bytes();
    let typed = typed.as_bytes();
    let len = target.len().max(typed.len());

    (0..len)
        .map(|i| match (target.get(i), typed.get(i)) {
            (Some(&t), Some(&m)) if t == m => (m as char, CharState::Correct),
            (Some(_), Some(&m)) => (m as char, CharState::Incorrect),
            (Some(&t), None) => (t as char, CharState::Pending),
            (None, Some(&m)) => (m as char, CharState::Overflow),
            (None, None) => unreachable!(),
        })
        .collect()
}
