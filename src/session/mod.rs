pub mod stat;
pub mod text;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::filter::CorpusFilters;
use crate::error::ConfigError;
use crate::generator::corpus::CorpusStore;
use crate::generator::quotes::Quote;

/// Everything generation needs: options, corpora and the random source.
pub struct Session {
    pub config: Config,
    pub corpus: CorpusStore,
    pub rng: SmallRng,
}

impl Session {
    pub fn new(config: Config, words: Vec<String>, quotes: Vec<Quote>) -> Result<Self, ConfigError> {
        Self::with_rng(config, words, quotes, SmallRng::from_entropy())
    }

    pub fn with_seed(
        config: Config,
        words: Vec<String>,
        quotes: Vec<Quote>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(config, words, quotes, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: Config,
        words: Vec<String>,
        quotes: Vec<Quote>,
        rng: SmallRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let filters = CorpusFilters::from_config(&config)?;
        Ok(Self {
            config,
            corpus: CorpusStore::new(words, quotes, filters),
            rng,
        })
    }

    /// Swap in new options. Filters are rebuilt, which invalidates the
    /// filtered corpora.
    pub fn apply_config(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        let filters = CorpusFilters::from_config(&config)?;
        self.corpus.set_filters(filters);
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_config_refilters() {
        let words = vec!["cat".to_string(), "horse".to_string()];
        let mut session = Session::with_seed(Config::default(), words, Vec::new(), 42).unwrap();
        assert_eq!(session.corpus.filtered_words().len(), 2);

        let config = Config {
            word_filter: Some("^h".to_string()),
            ..Config::default()
        };
        session.apply_config(config).unwrap();
        assert_eq!(session.corpus.filtered_words(), ["horse"]);
    }

    #[test]
    fn test_apply_bad_config_keeps_old() {
        let mut session = Session::with_seed(Config::default(), Vec::new(), Vec::new(), 42).unwrap();
        let config = Config {
            word_filter: Some("[".to_string()),
            ..Config::default()
        };
        assert!(session.apply_config(config).is_err());
        assert!(session.config.word_filter.is_none());
    }
}
