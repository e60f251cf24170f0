use tracing::debug;

use crate::engine::filter::CorpusFilters;
use crate::generator::quotes::Quote;

/// Loaded dictionary and quotes, plus their filtered views.
///
/// The filtered views are rebuilt on first access after the corpus or the
/// filters change.
#[derive(Debug, Default)]
pub struct CorpusStore {
    words: Vec<String>,
    quotes: Vec<Quote>,
    filters: CorpusFilters,
    filtered_words: Vec<String>,
    filtered_quotes: Vec<Quote>,
    words_dirty: bool,
    quotes_dirty: bool,
}

impl CorpusStore {
    pub fn new(words: Vec<String>, quotes: Vec<Quote>, filters: CorpusFilters) -> Self {
        Self {
            words,
            quotes,
            filters,
            filtered_words: Vec::new(),
            filtered_quotes: Vec::new(),
            words_dirty: true,
            quotes_dirty: true,
        }
    }

    pub fn set_words(&mut self, words: Vec<String>) {
        self.words = words;
        self.words_dirty = true;
    }

    pub fn set_quotes(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.quotes_dirty = true;
    }

    pub fn set_filters(&mut self, filters: CorpusFilters) {
        self.filters = filters;
        self.words_dirty = true;
        self.quotes_dirty = true;
    }

    pub fn filters(&self) -> &CorpusFilters {
        &self.filters
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn filtered_words(&mut self) -> &[String] {
        if self.words_dirty {
            self.filtered_words = self
                .words
                .iter()
                .filter(|w| self.filters.accepts_word(w))
                .cloned()
                .collect();
            self.words_dirty = false;
            debug!(
                total = self.words.len(),
                kept = self.filtered_words.len(),
                "refiltered dictionary"
            );
        }
        &self.filtered_words
    }

    pub fn filtered_quotes(&mut self) -> &[Quote] {
        if self.quotes_dirty {
            self.filtered_quotes = self
                .quotes
                .iter()
                .filter(|q| self.filters.accepts_quote(q.words.len()))
                .cloned()
                .collect();
            self.quotes_dirty = false;
            debug!(
                total = self.quotes.len(),
                kept = self.filtered_quotes.len(),
                "refiltered quotes"
            );
        }
        &self.filtered_quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filter::LengthRange;

    fn store() -> CorpusStore {
        let words = ["a", "cat", "horse", "elephant"].map(String::from).to_vec();
        let quotes = vec![
            Quote {
                words: vec!["short".into()],
                ..Quote::default()
            },
            Quote {
                words: vec!["a".into(), "longer".into(), "one".into()],
                ..Quote::default()
            },
        ];
        CorpusStore::new(words, quotes, CorpusFilters::default())
    }

    #[test]
    fn test_unfiltered_view() {
        let mut store = store();
        assert_eq!(store.filtered_words().len(), 4);
        assert_eq!(store.filtered_quotes().len(), 2);
    }

    #[test]
    fn test_filters_invalidate_cache() {
        let mut store = store();
        assert_eq!(store.filtered_words().len(), 4);
        store.set_filters(CorpusFilters {
            word_length: LengthRange::new(3, 5),
            quote_length: LengthRange::new(2, 10),
            word_filter: None,
        });
        assert_eq!(store.filtered_words(), ["cat", "horse"]);
        assert_eq!(store.filtered_quotes().len(), 1);
        assert_eq!(store.filtered_quotes()[0].words.len(), 3);
    }

    #[test]
    fn test_set_words_invalidates_cache() {
        let mut store = store();
        assert_eq!(store.filtered_words().len(), 4);
        store.set_words(vec!["dog".into()]);
        assert_eq!(store.filtered_words(), ["dog"]);
        assert_eq!(store.words().len(), 1);
    }
}
