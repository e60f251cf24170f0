//! Word wrapping for the typing window.
//!
//! Every line but the last satisfies `len <= width` and could not take the
//! first word of the following line without going over `width`. A line's
//! `len` is the sum of `visual_len + 1` over its words.

use tracing::trace;

use crate::config::{MAX_MAIN_HEIGHT, MIN_MAIN_HEIGHT, MIN_MAIN_WIDTH};
use crate::error::LayoutError;
use crate::session::text::TypeText;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub first_word: usize,
    pub len: usize,
}

/// Inner size of the typing window, in columns and lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    /// Narrower windows could leave a single overtyped word wider than a line.
    pub fn new(width: usize, height: usize) -> Result<Self, LayoutError> {
        if width < MIN_MAIN_WIDTH {
            return Err(LayoutError::ViewportTooNarrow {
                width,
                min: MIN_MAIN_WIDTH,
            });
        }
        if !(MIN_MAIN_HEIGHT..=MAX_MAIN_HEIGHT).contains(&height) {
            return Err(LayoutError::BadHeight {
                height,
                min: MIN_MAIN_HEIGHT,
                max: MAX_MAIN_HEIGHT,
            });
        }
        Ok(Self { width, height })
    }
}

/// Restore the wrapping invariant from `line` onwards after one word on it
/// changed width, or after words were appended to it.
pub fn fix_line(tt: &mut TypeText, line: usize, width: usize) {
    if tt.text.is_empty() || tt.lines.is_empty() {
        return;
    }

    // Popping `n` and pushing `n, n + 1` back runs line n+1 to completion
    // before line n is re-checked.
    let mut pending = vec![line];
    while let Some(n) = pending.pop() {
        if n >= tt.lines.len() {
            continue;
        }

        let last = n + 1 == tt.lines.len();
        if tt.lines[n].len > width {
            if tt.line_words(n).len() < 2 {
                // A lone word wider than the window stays where it is.
                continue;
            }
            if last {
                tt.lines.push(Line {
                    first_word: tt.word_count(),
                    len: 0,
                });
                push_word_next(tt, n);
                // The new line holds a single word and needs no fixing.
                pending.push(n);
            } else {
                push_word_next(tt, n);
                pending.push(n);
                pending.push(n + 1);
            }
        } else if !last {
            let next_first = tt.lines[n + 1].first_word;
            if tt.lines[n].len + tt.visual_len(next_first) + 1 <= width {
                pull_word_next(tt, n);
                pending.push(n);
                pending.push(n + 1);
            }
        }
    }

    sync_current_line(tt);
}

/// Rewrap the whole text, e.g. after the window was resized.
pub fn fix_all_lines(tt: &mut TypeText, width: usize) {
    if tt.lines.is_empty() {
        return;
    }
    let total: usize = tt.lines.iter().map(|l| l.len).sum();
    tt.lines.truncate(1);
    tt.lines[0] = Line {
        first_word: 0,
        len: total,
    };
    tt.current_line = 0;
    fix_line(tt, 0, width);
}

/// Move the last word of line `n` to the front of line `n + 1`.
fn push_word_next(tt: &mut TypeText, n: usize) {
    let word = tt.lines[n + 1].first_word - 1;
    let moved = tt.visual_len(word) + 1;
    tt.lines[n].len -= moved;
    tt.lines[n + 1].len += moved;
    tt.lines[n + 1].first_word = word;
    trace!(word, from = n, "pushed word to next line");
}

/// Move the first word of line `n + 1` to the end of line `n`, dropping
/// line `n + 1` if that empties it.
fn pull_word_next(tt: &mut TypeText, n: usize) {
    let word = tt.lines[n + 1].first_word;
    let moved = tt.visual_len(word) + 1;
    tt.lines[n].len += moved;
    tt.lines[n + 1].len -= moved;
    tt.lines[n + 1].first_word += 1;
    if tt.line_words(n + 1).is_empty() {
        tt.lines.remove(n + 1);
    }
    trace!(word, to = n, "pulled word from next line");
}

fn sync_current_line(tt: &mut TypeText) {
    let cur = tt.current_word;
    tt.current_line = tt
        .lines
        .partition_point(|l| l.first_word <= cur)
        .saturating_sub(1);
}

/// Number of lines `text` wraps to at `width`, sizing each word by the longer
/// of its target and its match. Words past the end of `matches` use their
/// target length.
pub fn count_lines(text: &[String], matches: &[String], width: usize) -> usize {
    let mut lines = 1;
    let mut x = 0;
    for (i, word) in text.iter().enumerate() {
        let len = matches.get(i).map_or(word.len(), |m| word.len().max(m.len()));
        x += len + 1;
        if x > width {
            x = len + 1;
            lines += 1;
        }
    }
    lines
}
