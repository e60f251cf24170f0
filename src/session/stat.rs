use std::time::Duration;

use crate::config::Mode;
use crate::session::text::TypeText;

/// Summary of a finished or aborted test.
#[derive(Clone, Debug, PartialEq)]
pub struct Stat {
    pub mode: Mode,
    pub instant_death: bool,
    pub elapsed_ms: u64,
    /// Characters in the final match buffers, separators included.
    pub ntyped: usize,
    /// Of those, characters matching their target.
    pub ncorrect: usize,
    pub raw_typed: usize,
    pub raw_correct: usize,
    pub words_typed: usize,
    pub wpm: f64,
    /// From the raw counters, so corrected mistakes still count against it.
    pub accuracy: f64,
    pub avg_word_len: f64,
    pub author: Option<String>,
    pub source: Option<String>,
}

impl Stat {
    /// `limit` caps the elapsed time, for timed tests that overran.
    pub fn from_text(tt: &TypeText, mode: Mode, instant_death: bool, limit: Option<Duration>) -> Self {
        let mut elapsed = tt.elapsed();
        if let Some(limit) = limit {
            elapsed = elapsed.min(limit);
        }
        let elapsed_ms = elapsed.as_millis() as u64;
        let (ntyped, ncorrect) = chars_typed(tt);

        Self {
            mode,
            instant_death,
            elapsed_ms,
            ntyped,
            ncorrect,
            raw_typed: tt.raw_typed,
            raw_correct: tt.raw_correct,
            words_typed: tt.current_word,
            wpm: wpm(ncorrect, elapsed_ms),
            accuracy: accuracy(tt.raw_typed, tt.raw_correct),
            avg_word_len: avg_word_len(tt),
            author: tt.author.clone(),
            source: tt.source.clone(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}

/// `(typed, correct)` over the match buffers up to the current word. One
/// separator is counted per finished word, except after the final word.
pub fn chars_typed(tt: &TypeText) -> (usize, usize) {
    if tt.text.is_empty() {
        return (0, 0);
    }

    let mut typed = 0;
    let mut correct = 0;
    for i in 0..=tt.last_attempted_word() {
        let target = tt.text[i].as_bytes();
        let matched = tt.matches[i].as_bytes();
        typed += matched.len();
        correct += target
            .iter()
            .zip(matched)
            .filter(|(t, m)| t == m)
            .count();
    }

    let separators = tt.current_word.min(tt.text.len() - 1);
    (typed + separators, correct + separators)
}

/// Words per minute, with a word being five characters.
pub fn wpm(ncorrect: usize, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    12000.0 * ncorrect as f64 / elapsed_ms as f64
}

pub fn accuracy(raw_typed: usize, raw_correct: usize) -> f64 {
    if raw_typed == 0 {
        return 100.0;
    }
    100.0 * raw_correct as f64 / raw_typed as f64
}

/// Mean target length of the words finished so far.
pub fn avg_word_len(tt: &TypeText) -> f64 {
    let done = tt.current_word.min(tt.text.len());
    if done == 0 {
        return 0.0;
    }
    let sum: usize = tt.text[..done].iter().map(String::len).sum();
    sum as f64 / done as f64
}
