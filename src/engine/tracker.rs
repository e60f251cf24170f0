use std::time::Instant;

use tracing::debug;

use crate::config::MAX_ERR;
use crate::engine::layout;
use crate::session::text::TypeText;

/// What a keystroke did to the test as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Completed,
    /// Wrong keystroke while instant death is on.
    Aborted,
}

impl Signal {
    pub fn is_finished(self) -> bool {
        !matches!(self, Signal::Continue)
    }
}

/// Feed one typed character to the current word.
///
/// A space finishes the word once it has been typed out to at least its
/// target length; otherwise it is matched like any other character. Input
/// beyond `MAX_ERR` extra characters is dropped. Only ASCII graphic
/// characters and space are accepted.
pub fn process_char(tt: &mut TypeText, ch: char, instant_death: bool, width: usize) -> Signal {
    if tt.is_complete() || !(ch == ' ' || ch.is_ascii_graphic()) {
        return Signal::Continue;
    }

    if tt.started_at.is_none() {
        tt.started_at = Some(Instant::now());
    }

    let cur = tt.current_word;
    let word_len = tt.text[cur].len();
    let match_len = tt.matches[cur].len();

    if ch == ' ' && match_len >= word_len {
        tt.current_word += 1;
        if tt.is_complete() {
            tt.finished_at = Some(Instant::now());
            debug!(words = tt.word_count(), "test completed");
            return Signal::Completed;
        }
        tt.raw_typed += 1;
        tt.raw_correct += 1;
        if tt
            .lines
            .get(tt.current_line + 1)
            .is_some_and(|next| next.first_word == tt.current_word)
        {
            tt.current_line += 1;
        }
        return Signal::Continue;
    }

    if match_len >= word_len + MAX_ERR {
        return Signal::Continue;
    }

    tt.raw_typed += 1;
    tt.matches[cur].push(ch);
    let match_len = match_len + 1;
    let correct = match_len <= word_len && tt.text[cur].as_bytes()[match_len - 1] == ch as u8;
    if correct {
        tt.raw_correct += 1;
    }

    if match_len > word_len {
        let line = tt.current_line;
        tt.lines[line].len += 1;
        layout::fix_line(tt, line, width);
    }

    if !correct && instant_death {
        tt.finished_at = Some(Instant::now());
        debug!(word = cur, "instant death");
        return Signal::Aborted;
    }

    Signal::Continue
}

/// Undo the last character of the current word, or step back to the
/// previous word when nothing has been typed yet. Counters are untouched.
pub fn process_backspace(tt: &mut TypeText, width: usize) {
    if tt.is_complete() {
        return;
    }

    let cur = tt.current_word;
    if tt.matches[cur].is_empty() {
        if cur > 0 {
            tt.current_word -= 1;
            if tt.current_word < tt.lines[tt.current_line].first_word {
                tt.current_line -= 1;
            }
        }
        return;
    }

    tt.matches[cur].pop();
    if tt.matches[cur].len() >= tt.text[cur].len() {
        let line = tt.current_line;
        tt.lines[line].len -= 1;
        if line > 0 {
            layout::fix_line(tt, line - 1, width);
        }
        // The pass above may have moved the cursor word onto the previous line.
        let line = tt.current_line;
        layout::fix_line(tt, line, width);
    }
}
