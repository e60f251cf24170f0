//! Whitespace separated word lists.
//!
//! Words consist of graphic ASCII characters; `\` escapes the next graphic
//! character. Words that are too long or contain anything else are skipped
//! up to the next whitespace.

use tracing::debug;

use crate::config::MAX_WORD;

pub const WORDS_EN: &str = include_str!("../../assets/words-en.txt");

pub(crate) fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Outcome of reading one word.
pub(crate) enum WordRead {
    Word(String),
    /// Stopped on `delim` or end of input without reading anything.
    End,
    Skipped,
}

/// Read a word starting at `*pos`, which must not be whitespace. Stops before
/// whitespace, `delim`, or a byte that can't be part of a word.
pub(crate) fn read_word(input: &[u8], pos: &mut usize, delim: Option<u8>) -> WordRead {
    let start = *pos;
    let mut word = Vec::new();
    let mut valid = true;

    while let Some(&b) = input.get(*pos) {
        if Some(b) == delim || is_separator(b) {
            break;
        }
        *pos += 1;
        let ch = if b == b'\\' {
            match input.get(*pos) {
                Some(&escaped) if escaped.is_ascii_graphic() => {
                    *pos += 1;
                    escaped
                }
                _ => {
                    valid = false;
                    continue;
                }
            }
        } else {
            b
        };
        if !ch.is_ascii_graphic() {
            valid = false;
            continue;
        }
        word.push(ch);
    }

    if *pos == start {
        return WordRead::End;
    }
    if !valid || word.is_empty() || word.len() > MAX_WORD {
        return WordRead::Skipped;
    }
    // Only graphic ASCII was pushed.
    WordRead::Word(word.into_iter().map(char::from).collect())
}

/// Parse a dictionary, dropping unusable words.
pub fn parse_dictionary(input: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    let mut pos = 0;
    let mut words = Vec::new();
    let mut skipped = 0usize;

    loop {
        while bytes.get(pos).is_some_and(|&b| is_separator(b)) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        match read_word(bytes, &mut pos, None) {
            WordRead::Word(word) => words.push(word),
            WordRead::Skipped => skipped += 1,
            WordRead::End => pos += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, kept = words.len(), "skipped unusable dictionary words");
    }
    words
}

pub fn builtin_words() -> Vec<String> {
    parse_dictionary(WORDS_EN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_dictionary("cat  dog\n\tbird\n"), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_escape() {
        assert_eq!(parse_dictionary(r"a\\b c\d"), vec![r"a\b", "cd"]);
    }

    #[test]
    fn test_skips_bad_words() {
        let long = "x".repeat(MAX_WORD + 1);
        let input = format!("ok {long} caf\u{e9} fine");
        assert_eq!(parse_dictionary(&input), vec!["ok", "fine"]);
    }

    #[test]
    fn test_trailing_backslash_skipped() {
        assert_eq!(parse_dictionary("good bad\\"), vec!["good"]);
    }

    #[test]
    fn test_builtin_words_nonempty_and_valid() {
        let words = builtin_words();
        assert!(words.len() > 100);
        assert!(words.iter().all(|w| w.len() <= MAX_WORD && w.bytes().all(|b| b.is_ascii_graphic())));
    }
}
