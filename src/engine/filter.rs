use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{Config, MAX_QUOTE_LENGTH, MAX_WORD};
use crate::error::ConfigError;

/// Inclusive length bound, or off. Written as `-`, `N` or `N-M`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LengthRange {
    bounds: Option<(usize, usize)>,
}

impl LengthRange {
    pub const OFF: LengthRange = LengthRange { bounds: None };

    pub fn new(min: usize, max: usize) -> Self {
        Self {
            bounds: Some((min, max.max(min))),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if s.is_empty() || s == "-" {
            return Ok(Self::OFF);
        }

        let bad = || ConfigError::BadRange(s.to_string());
        let (min, max) = match s.split_once('-') {
            Some((lo, hi)) => (
                lo.trim().parse::<usize>().map_err(|_| bad())?,
                hi.trim().parse::<usize>().map_err(|_| bad())?,
            ),
            None => {
                let n = s.parse::<usize>().map_err(|_| bad())?;
                (n, n)
            }
        };

        Ok(Self::new(min, max))
    }

    pub fn is_off(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.bounds
    }

    /// Clamp both ends into `lo..=hi`. An off range stays off.
    pub fn clamped(self, lo: usize, hi: usize) -> Self {
        match self.bounds {
            Some((min, max)) => Self::new(min.clamp(lo, hi), max.clamp(lo, hi)),
            None => self,
        }
    }

    /// Off ranges contain everything.
    pub fn contains(&self, n: usize) -> bool {
        match self.bounds {
            Some((min, max)) => (min..=max).contains(&n),
            None => true,
        }
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bounds {
            None => f.write_str("-"),
            Some((min, max)) if min == max => write!(f, "{min}"),
            Some((min, max)) => write!(f, "{min}-{max}"),
        }
    }
}

impl TryFrom<String> for LengthRange {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LengthRange> for String {
    fn from(range: LengthRange) -> Self {
        range.to_string()
    }
}

/// Length and pattern constraints applied to the loaded corpora.
#[derive(Clone, Debug, Default)]
pub struct CorpusFilters {
    pub word_length: LengthRange,
    pub quote_length: LengthRange,
    pub word_filter: Option<Regex>,
}

impl CorpusFilters {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let word_filter = match config.word_filter.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(Regex::new(pattern)?),
            _ => None,
        };

        Ok(Self {
            word_length: config.word_length.clamped(0, MAX_WORD),
            quote_length: config.quote_length.clamped(1, MAX_QUOTE_LENGTH),
            word_filter,
        })
    }

    pub fn accepts_word(&self, word: &str) -> bool {
        if !self.word_length.contains(word.len()) {
            return false;
        }
        match &self.word_filter {
            Some(re) => re.is_match(word),
            None => true,
        }
    }

    /// Quote length is measured in words.
    pub fn accepts_quote(&self, nwords: usize) -> bool {
        self.quote_length.contains(nwords)
    }
}
