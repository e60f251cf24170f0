pub mod corpus;
pub mod dictionary;
pub mod numbers;
pub mod punctuate;
pub mod quotes;

use rand::Rng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::config::Mode;
use crate::engine::layout::{self, Viewport};
use crate::error::{CorpusKind, GenerateError};
use crate::generator::punctuate::DecorationPolicy;
use crate::session::Session;
use crate::session::text::TypeText;

/// Size of the first batch of words in a timed test.
pub const TIMED_INITIAL_BATCH: usize = 64;

/// Build the text for a new test in the configured mode.
pub fn generate(session: &mut Session, viewport: &Viewport) -> Result<TypeText, GenerateError> {
    let tt = match session.config.mode {
        Mode::Normal => {
            let count = session.config.word_count;
            let words = draw_words(session, count, None)?;
            TypeText::from_words(words, viewport.width)
        }
        Mode::Timed => {
            let mut tt = TypeText::default();
            grow_timed(session, &mut tt, viewport)?;
            tt
        }
        Mode::Quote => {
            let quotes = session.corpus.filtered_quotes();
            if quotes.is_empty() {
                return Err(GenerateError::ExhaustedCorpus {
                    corpus: CorpusKind::Quotes,
                });
            }
            let quote = quotes[session.rng.gen_range(0..quotes.len())].clone();
            let mut tt = TypeText::from_words(quote.words, viewport.width);
            tt.author = quote.author;
            tt.source = quote.source;
            tt
        }
    };

    info!(
        mode = %session.config.mode,
        words = tt.word_count(),
        lines = tt.lines.len(),
        "generated text"
    );
    Ok(tt)
}

/// Keep a timed test's buffer at least one line deeper than the window
/// below the cursor line. Each batch doubles the word count.
pub fn grow_timed(
    session: &mut Session,
    tt: &mut TypeText,
    viewport: &Viewport,
) -> Result<(), GenerateError> {
    while tt.lines.len().saturating_sub(tt.current_line) < viewport.height + 1 {
        let batch = if tt.text.is_empty() {
            TIMED_INITIAL_BATCH
        } else {
            tt.word_count()
        };
        let words = draw_words(session, batch, tt.text.last().map(String::as_str))?;
        tt.append_words(words);
        let last = tt.lines.len() - 1;
        layout::fix_line(tt, last, viewport.width);
        debug!(batch, total = tt.word_count(), lines = tt.lines.len(), "grew timed text");
    }
    Ok(())
}

/// Draw `count` decorated words. `prev` is the word these follow, if any.
fn draw_words(
    session: &mut Session,
    count: usize,
    prev: Option<&str>,
) -> Result<Vec<String>, GenerateError> {
    let Session {
        config,
        corpus,
        rng,
    } = session;
    let policy = DecorationPolicy::from_config(config);
    let dict = corpus.filtered_words();

    let mut words: Vec<String> = Vec::with_capacity(count);
    for _ in 0..count {
        let last = words.last().map(String::as_str).or(prev);
        let capitalize = policy.punctuation > 0 && last.is_some_and(punctuate::ends_sentence);
        words.push(gen_word(dict, &policy, capitalize, rng)?);
    }
    Ok(words)
}

/// Generate one word: a digit string or a dictionary word, possibly
/// decorated. With an empty dictionary only digit strings are produced.
pub fn gen_word(
    dict: &[String],
    policy: &DecorationPolicy,
    capitalize: bool,
    rng: &mut SmallRng,
) -> Result<String, GenerateError> {
    let want_digits = dict.is_empty() || rng.gen_range(0..100) < policy.insert_frequency;
    let digits = if want_digits {
        numbers::digit_string(policy.digit_strings, rng)
    } else {
        None
    };

    let mut word = match digits {
        Some(digits) => digits,
        None => {
            if dict.is_empty() {
                return Err(GenerateError::ExhaustedCorpus {
                    corpus: CorpusKind::Dictionary,
                });
            }
            let mut word = dict[rng.gen_range(0..dict.len())].clone();
            if capitalize {
                punctuate::capitalize_first(&mut word);
            }
            word
        }
    };

    if rng.gen_range(0..100) < policy.punctuation {
        if let Err(e) = punctuate::punctuate(&mut word, policy, rng) {
            debug!(error = %e, "left word undecorated");
        }
    }
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MIN_MAIN_WIDTH};
    use crate::engine::filter::LengthRange;
    use crate::generator::quotes::Quote;

    fn viewport() -> Viewport {
        Viewport::new(MIN_MAIN_WIDTH, 5).unwrap()
    }

    fn plain_config() -> Config {
        Config {
            punctuation: 0,
            insert_frequency: 0,
            ..Config::default()
        }
    }

    fn session(config: Config, words: &[&str]) -> Session {
        let words = words.iter().map(|w| w.to_string()).collect();
        Session::with_seed(config, words, Vec::new(), 42).unwrap()
    }

    #[test]
    fn test_normal_mode_draws_from_dictionary() {
        let config = Config {
            word_count: 2,
            ..plain_config()
        };
        let mut session = session(config, &["cat", "dog"]);
        let tt = generate(&mut session, &viewport()).unwrap();
        assert_eq!(tt.word_count(), 2);
        assert!(tt.text.iter().all(|w| w == "cat" || w == "dog"));
        assert_eq!(tt.matches, vec![String::new(), String::new()]);
        assert_eq!(tt.current_word, 0);
    }

    #[test]
    fn test_empty_dictionary_without_digits_is_exhausted() {
        let mut session = session(plain_config(), &[]);
        assert!(matches!(
            generate(&mut session, &viewport()),
            Err(GenerateError::ExhaustedCorpus {
                corpus: CorpusKind::Dictionary
            })
        ));
    }

    #[test]
    fn test_empty_dictionary_falls_back_to_digits() {
        let config = Config {
            digit_strings: LengthRange::new(2, 3),
            word_count: 30,
            ..plain_config()
        };
        let mut session = session(config, &[]);
        let tt = generate(&mut session, &viewport()).unwrap();
        assert_eq!(tt.word_count(), 30);
        assert!(tt.text.iter().all(|w| w.bytes().all(|b| b.is_ascii_digit())));
    }

    #[test]
    fn test_filters_exhaust_dictionary() {
        let config = Config {
            word_length: LengthRange::new(10, 12),
            ..plain_config()
        };
        let mut session = session(config, &["cat", "dog"]);
        assert!(generate(&mut session, &viewport()).is_err());
    }

    #[test]
    fn test_insert_frequency_full() {
        let config = Config {
            insert_frequency: 100,
            digit_strings: LengthRange::new(1, 4),
            ..plain_config()
        };
        let mut session = session(config, &["cat"]);
        let tt = generate(&mut session, &viewport()).unwrap();
        assert!(tt.text.iter().all(|w| w.bytes().all(|b| b.is_ascii_digit())));
    }

    #[test]
    fn test_capitalize_after_sentence_end() {
        let config = Config {
            punctuation: 100,
            word_count: 300,
            ..plain_config()
        };
        let mut session = session(config, &["cat"]);
        let tt = generate(&mut session, &viewport()).unwrap();
        let mut checked = 0;
        for pair in tt.text.windows(2) {
            if punctuate::ends_sentence(&pair[0]) {
                let next = pair[1].trim_start_matches(['(', '\'', '"']);
                assert!(next.starts_with('C'), "{:?} after {:?}", pair[1], pair[0]);
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_timed_mode_fills_window() {
        let config = Config {
            mode: Mode::Timed,
            ..plain_config()
        };
        let mut session = session(config, &["alpha", "bravo", "charlie"]);
        let vp = viewport();
        let mut tt = generate(&mut session, &vp).unwrap();
        assert_eq!(tt.word_count(), TIMED_INITIAL_BATCH);
        assert!(tt.lines.len() > vp.height);

        // Move the cursor near the end and the buffer grows by doubling.
        tt.current_word = tt.line_words(tt.lines.len() - 1).start;
        tt.current_line = tt.lines.len() - 1;
        grow_timed(&mut session, &mut tt, &vp).unwrap();
        assert_eq!(tt.word_count(), TIMED_INITIAL_BATCH * 2);
        assert!(tt.lines.len() - tt.current_line > vp.height);
    }

    #[test]
    fn test_quote_mode() {
        let quote = Quote {
            author: Some("Someone".into()),
            source: None,
            words: vec!["to".into(), "be".into()],
        };
        let config = Config {
            mode: Mode::Quote,
            ..plain_config()
        };
        let mut session = Session::with_seed(config, Vec::new(), vec![quote], 1).unwrap();
        let tt = generate(&mut session, &viewport()).unwrap();
        assert_eq!(tt.text, vec!["to", "be"]);
        assert_eq!(tt.author.as_deref(), Some("Someone"));
        assert_eq!(tt.source, None);
    }

    #[test]
    fn test_quote_mode_exhausted() {
        let config = Config {
            mode: Mode::Quote,
            ..Config::default()
        };
        let mut session = session(config, &["cat"]);
        assert!(matches!(
            generate(&mut session, &viewport()),
            Err(GenerateError::ExhaustedCorpus {
                corpus: CorpusKind::Quotes
            })
        ));
    }
}
