use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::filter::LengthRange;
use crate::error::ConfigError;

pub const MAX_WORD: usize = 30;
/// How far a typed word may run past its target.
pub const MAX_ERR: usize = 4;

pub const MIN_NWORDS: usize = 1;
pub const MAX_NWORDS: usize = 3000;
pub const MAX_QUOTE_LENGTH: usize = 3000;
pub const MIN_TIMER: u64 = 0;
pub const MAX_TIMER: u64 = 600;
pub const MIN_HIST_LIMIT: usize = 0;
pub const MAX_HIST_LIMIT: usize = 1000;
pub const MIN_MAIN_WIDTH: usize = MAX_WORD + MAX_ERR + 3;
pub const MAX_MAIN_WIDTH: usize = 80;
pub const MIN_MAIN_HEIGHT: usize = 1;
pub const MAX_MAIN_HEIGHT: usize = 21;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Timed,
    Quote,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Timed => "Timed",
            Mode::Quote => "Quote",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" => Some(Mode::Normal),
            "Timed" => Some(Mode::Timed),
            "Quote" => Some(Mode::Quote),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Mode::Normal => Mode::Timed,
            Mode::Timed => Mode::Quote,
            Mode::Quote => Mode::Normal,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whitespace separated punctuation marks, e.g. `"-- ~"` or `"<> []"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PunctuationList(Vec<String>);

impl PunctuationList {
    pub fn parse(s: &str) -> Self {
        Self(s.split_whitespace().map(str::to_string).collect())
    }

    pub fn marks(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for PunctuationList {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PunctuationList> for String {
    fn from(list: PunctuationList) -> Self {
        list.0.join(" ")
    }
}

/// Colour names (`red`, `lightblue`, `default`, ...) or `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(default = "default_border_color")]
    pub border: String,
    #[serde(default = "default_text_color")]
    pub text: String,
    #[serde(default = "default_typed_color")]
    pub typed: String,
    #[serde(default = "default_error_color")]
    pub error: String,
    #[serde(default = "default_selected_color")]
    pub selected: String,
    #[serde(default = "default_background_color")]
    pub background: String,
}

fn default_border_color() -> String {
    "magenta".to_string()
}
fn default_text_color() -> String {
    "default".to_string()
}
fn default_typed_color() -> String {
    "green".to_string()
}
fn default_error_color() -> String {
    "red".to_string()
}
fn default_selected_color() -> String {
    "blue".to_string()
}
fn default_background_color() -> String {
    "default".to_string()
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            border: default_border_color(),
            text: default_text_color(),
            typed: default_typed_color(),
            error: default_error_color(),
            selected: default_selected_color(),
            background: default_background_color(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    /// Seconds. Zero means the timed test never runs out.
    #[serde(default = "default_timer")]
    pub timer: u64,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default)]
    pub instant_death: bool,
    /// Percent chance each generated word is decorated.
    #[serde(default = "default_punctuation")]
    pub punctuation: u32,
    /// Percent chance a dictionary word is replaced by a digit string.
    #[serde(default = "default_insert_frequency")]
    pub insert_frequency: u32,
    #[serde(default)]
    pub digit_strings: LengthRange,
    #[serde(default)]
    pub word_length: LengthRange,
    #[serde(default)]
    pub quote_length: LengthRange,
    #[serde(default)]
    pub word_filter: Option<String>,
    #[serde(default)]
    pub postfix: PunctuationList,
    #[serde(default)]
    pub circumfix: PunctuationList,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_main_width")]
    pub main_width: usize,
    #[serde(default = "default_main_height")]
    pub main_height: usize,
    #[serde(default = "default_true")]
    pub border: bool,
    #[serde(default = "default_true")]
    pub colors_enabled: bool,
    #[serde(default)]
    pub colors: ThemeColors,
}

fn default_timer() -> u64 {
    20
}
fn default_word_count() -> usize {
    20
}
fn default_punctuation() -> u32 {
    20
}
fn default_insert_frequency() -> u32 {
    10
}
fn default_history_limit() -> usize {
    25
}
fn default_main_width() -> usize {
    55
}
fn default_main_height() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            timer: default_timer(),
            word_count: default_word_count(),
            instant_death: false,
            punctuation: default_punctuation(),
            insert_frequency: default_insert_frequency(),
            digit_strings: LengthRange::OFF,
            word_length: LengthRange::OFF,
            quote_length: LengthRange::OFF,
            word_filter: None,
            postfix: PunctuationList::default(),
            circumfix: PunctuationList::default(),
            history_limit: default_history_limit(),
            main_width: default_main_width(),
            main_height: default_main_height(),
            border: true,
            colors_enabled: true,
            colors: ThemeColors::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Missing files yield the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ptype")
            .join("config.toml")
    }

    /// Pull every numeric option back into its allowed range.
    pub fn normalize(&mut self) {
        self.timer = self.timer.clamp(MIN_TIMER, MAX_TIMER);
        self.word_count = self.word_count.clamp(MIN_NWORDS, MAX_NWORDS);
        self.punctuation = self.punctuation.min(100);
        self.insert_frequency = self.insert_frequency.min(100);
        self.history_limit = self.history_limit.clamp(MIN_HIST_LIMIT, MAX_HIST_LIMIT);
        self.main_width = self.main_width.clamp(MIN_MAIN_WIDTH, MAX_MAIN_WIDTH);
        self.main_height = self.main_height.clamp(MIN_MAIN_HEIGHT, MAX_MAIN_HEIGHT);
        self.digit_strings = self.digit_strings.clamped(1, MAX_WORD);
        self.word_length = self.word_length.clamped(0, MAX_WORD);
        self.quote_length = self.quote_length.clamped(1, MAX_QUOTE_LENGTH);
        if self.word_filter.as_deref().is_some_and(str::is_empty) {
            self.word_filter = None;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .postfix
            .marks()
            .iter()
            .chain(self.circumfix.marks())
            .find(|mark| !mark.bytes().all(|b| b.is_ascii_graphic()))
        {
            return Err(ConfigError::NonAsciiPunctuation(bad.clone()));
        }
        if let Some(odd) = self
            .circumfix
            .marks()
            .iter()
            .find(|mark| mark.len() % 2 != 0)
        {
            return Err(ConfigError::OddCircumfix(odd.clone()));
        }
        if let Some(pattern) = &self.word_filter {
            regex::Regex::new(pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mode, Mode::Normal);
        assert_eq!(config.timer, 20);
        assert_eq!(config.word_count, 20);
        assert!(!config.instant_death);
        assert_eq!(config.punctuation, 20);
        assert_eq!(config.insert_frequency, 10);
        assert!(config.digit_strings.is_off());
        assert!(config.word_length.is_off());
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.main_width, 55);
        assert_eq!(config.main_height, 5);
        assert_eq!(config.colors, ThemeColors::default());
    }

    #[test]
    fn test_config_parses_ranges_and_lists() {
        let toml_str = r##"
mode = "timed"
digit_strings = "2-4"
word_length = "3"
postfix = "-- ~"
circumfix = "<> []"

[colors]
typed = "#00ff00"
"##;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mode, Mode::Timed);
        assert_eq!(config.digit_strings.bounds(), Some((2, 4)));
        assert_eq!(config.word_length.bounds(), Some((3, 3)));
        assert_eq!(config.postfix.marks(), ["--", "~"]);
        assert_eq!(config.circumfix.marks(), ["<>", "[]"]);
        assert_eq!(config.colors.typed, "#00ff00");
        assert_eq!(config.colors.error, "red");
    }

    #[test]
    fn test_config_bad_range_is_error() {
        assert!(toml::from_str::<Config>("word_length = \"x-y\"").is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            digit_strings: LengthRange::new(2, 5),
            postfix: PunctuationList::parse("% &"),
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.digit_strings, config.digit_strings);
        assert_eq!(deserialized.postfix, config.postfix);
        assert_eq!(deserialized.mode, config.mode);
    }

    #[test]
    fn test_normalize_clamps() {
        let mut config = Config {
            timer: 9000,
            word_count: 0,
            punctuation: 250,
            main_width: 10,
            main_height: 99,
            digit_strings: LengthRange::new(0, 99),
            word_filter: Some(String::new()),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.timer, MAX_TIMER);
        assert_eq!(config.word_count, MIN_NWORDS);
        assert_eq!(config.punctuation, 100);
        assert_eq!(config.main_width, MIN_MAIN_WIDTH);
        assert_eq!(config.main_height, MAX_MAIN_HEIGHT);
        assert_eq!(config.digit_strings.bounds(), Some((1, MAX_WORD)));
        assert_eq!(config.word_filter, None);
    }

    #[test]
    fn test_validate_rejects_odd_circumfix() {
        let config = Config {
            circumfix: PunctuationList::parse("<> [[]"),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::OddCircumfix(m)) if m == "[[]"));
    }

    #[test]
    fn test_validate_rejects_non_ascii_marks() {
        // Four bytes, so the even-length check alone would let it through.
        let config = Config {
            circumfix: PunctuationList::parse("<> a€"),
            ..Config::default()
        };
        assert!(
            matches!(config.validate(), Err(ConfigError::NonAsciiPunctuation(m)) if m == "a€")
        );

        let config = Config {
            postfix: PunctuationList::parse("é"),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.word_count, 20);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = Config {
            instant_death: true,
            mode: Mode::Quote,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.instant_death);
        assert_eq!(loaded.mode, Mode::Quote);
    }

    #[test]
    fn test_mode_names() {
        for mode in [Mode::Normal, Mode::Timed, Mode::Quote] {
            assert_eq!(Mode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(Mode::Quote.next(), Mode::Normal);
    }
}
