use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::{Config, MAX_WORD};
use crate::engine::filter::LengthRange;
use crate::error::GenerateError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PunctKind {
    /// Appended after the word.
    Postfix,
    /// Split in half around the word.
    Circumfix,
}

/// Built-in marks with their cumulative thresholds out of 100.
static RARITY_TABLE: [(&str, u32, PunctKind); 10] = [
    (",", 20, PunctKind::Postfix),
    (".", 40, PunctKind::Postfix),
    ("!", 50, PunctKind::Postfix),
    (";", 60, PunctKind::Postfix),
    ("?", 70, PunctKind::Postfix),
    (":", 80, PunctKind::Postfix),
    ("...", 85, PunctKind::Postfix),
    ("()", 90, PunctKind::Circumfix),
    ("''", 95, PunctKind::Circumfix),
    ("\"\"", 100, PunctKind::Circumfix),
];

/// Draw space reserved for capitalizing without punctuating.
const CAPITALIZE_ONLY: u32 = 20;
const POSTFIX_MASS: u32 = 10;
const CIRCUMFIX_MASS: u32 = 5;

/// How generated words get decorated.
#[derive(Clone, Copy, Debug)]
pub struct DecorationPolicy<'a> {
    pub punctuation: u32,
    pub insert_frequency: u32,
    pub digit_strings: LengthRange,
    pub postfix: &'a [String],
    pub circumfix: &'a [String],
}

impl<'a> DecorationPolicy<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            punctuation: config.punctuation,
            insert_frequency: config.insert_frequency,
            digit_strings: config.digit_strings,
            postfix: config.postfix.marks(),
            circumfix: config.circumfix.marks(),
        }
    }

    fn max_draw(&self) -> u32 {
        let mut pmax = 100;
        if !self.postfix.is_empty() {
            pmax += POSTFIX_MASS;
        }
        if !self.circumfix.is_empty() {
            pmax += CIRCUMFIX_MASS;
        }
        pmax
    }

    /// Pick a mark for a draw in `1..=max_draw()`.
    fn select(&self, p: u32, rng: &mut SmallRng) -> (&'a str, PunctKind) {
        if p <= 100 {
            let (mark, _, kind) = RARITY_TABLE
                .iter()
                .find(|(_, threshold, _)| p <= *threshold)
                .copied()
                .unwrap_or(RARITY_TABLE[RARITY_TABLE.len() - 1]);
            return (mark, kind);
        }

        let postfix_limit = 100 + if self.postfix.is_empty() { 0 } else { POSTFIX_MASS };
        if p <= postfix_limit {
            let mark = &self.postfix[rng.gen_range(0..self.postfix.len())];
            (mark.as_str(), PunctKind::Postfix)
        } else {
            let mark = &self.circumfix[rng.gen_range(0..self.circumfix.len())];
            (mark.as_str(), PunctKind::Circumfix)
        }
    }
}

/// Decorate `word` in place: capitalize it, or attach one punctuation mark.
/// The word is left alone if the mark would make it too long.
pub fn punctuate(
    word: &mut String,
    policy: &DecorationPolicy,
    rng: &mut SmallRng,
) -> Result<(), GenerateError> {
    let pmax = policy.max_draw();
    let p = rng.gen_range(1..=pmax + CAPITALIZE_ONLY);

    if p > pmax {
        capitalize_first(word);
        return Ok(());
    }

    let (mark, kind) = policy.select(p, rng);
    if word.len() + mark.len() > MAX_WORD {
        return Err(GenerateError::EncodingTooLong {
            word: word.clone(),
            decoration: mark.to_string(),
            max: MAX_WORD,
        });
    }

    match kind {
        PunctKind::Postfix => word.push_str(mark),
        PunctKind::Circumfix => encase(word, mark),
    }
    Ok(())
}

/// `encase("word", "<>")` gives `"<word>"`.
fn encase(word: &mut String, mark: &str) {
    let (open, close) = mark.split_at(mark.len() / 2);
    word.insert_str(0, open);
    word.push_str(close);
}

pub fn capitalize_first(word: &mut String) {
    if let Some(first) = word.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
}

/// Whether the word after this one should start a sentence.
pub fn ends_sentence(word: &str) -> bool {
    word.ends_with(['.', '?', '!'])
}
