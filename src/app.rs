use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use ptype::config::{Config, MAX_MAIN_HEIGHT, MIN_MAIN_HEIGHT, MIN_MAIN_WIDTH, Mode};
use ptype::engine::Viewport;
use ptype::engine::layout;
use ptype::engine::tracker::{self, Signal};
use ptype::error::LayoutError;
use ptype::generator;
use ptype::session::Session;
use ptype::session::stat::Stat;
use ptype::session::text::TypeText;
use ptype::store::history::History;
use ptype::store::history_store::HistoryStore;

use crate::ui::components::history_view;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Main,
    Test,
    Stat,
    History,
    HistoryDetail,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Session,
    /// The test being typed, or the preview of the next one on the main screen.
    pub text: Option<TypeText>,
    pub last_stat: Option<Stat>,
    pub aborted: bool,
    pub history: Option<HistoryStore>,
    pub history_names: Vec<String>,
    pub history_selected: usize,
    pub history_detail: Option<(String, History)>,
    pub history_scroll: usize,
    pub theme: Theme,
    pub viewport: Viewport,
    pub status: Option<String>,
    pub config_path: PathBuf,
    pub oneshot: bool,
    pub should_quit: bool,
}

/// Fit the configured window into a terminal of `cols` by `rows`, leaving a
/// header row and two footer rows.
pub fn viewport_for(config: &Config, cols: u16, rows: u16) -> Result<Viewport, LayoutError> {
    let frame = if config.border { 2 } else { 0 };
    let width = config
        .main_width
        .min((cols as usize).saturating_sub(frame))
        .max(MIN_MAIN_WIDTH);
    let height = config
        .main_height
        .min((rows as usize).saturating_sub(3 + frame))
        .clamp(MIN_MAIN_HEIGHT, MAX_MAIN_HEIGHT);
    Viewport::new(width, height)
}

impl App {
    pub fn new(
        session: Session,
        history: Option<HistoryStore>,
        config_path: PathBuf,
        oneshot: bool,
        (cols, rows): (u16, u16),
    ) -> Result<Self> {
        let viewport = viewport_for(&session.config, cols, rows)?;
        let theme = Theme::new(session.config.colors.clone(), session.config.colors_enabled);

        let mut app = Self {
            screen: AppScreen::Main,
            session,
            text: None,
            last_stat: None,
            aborted: false,
            history,
            history_names: Vec::new(),
            history_selected: 0,
            history_detail: None,
            history_scroll: 0,
            theme,
            viewport,
            status: None,
            config_path,
            oneshot,
            should_quit: false,
        };
        app.regenerate();
        Ok(app)
    }

    /// Replace the preview with fresh text. If nothing can be generated the
    /// old preview stays, unless it has already been typed.
    pub fn regenerate(&mut self) {
        match generator::generate(&mut self.session, &self.viewport) {
            Ok(tt) => {
                self.text = Some(tt);
                self.status = None;
            }
            Err(e) => {
                warn!(error = %e, "text generation failed");
                if self.text.as_ref().is_some_and(|tt| tt.started_at.is_some()) {
                    self.text = None;
                }
                self.status = Some(format!("No text generated: {e}"));
            }
        }
    }

    pub fn start_test(&mut self, ch: char) {
        let Some(tt) = &self.text else {
            return;
        };
        info!(
            mode = %self.session.config.mode,
            words = tt.word_count(),
            instant_death = self.session.config.instant_death,
            "test started"
        );
        self.status = None;
        self.screen = AppScreen::Test;
        self.type_char(ch);
    }

    pub fn type_char(&mut self, ch: char) {
        let Some(tt) = self.text.as_mut() else {
            return;
        };
        let signal = tracker::process_char(
            tt,
            ch,
            self.session.config.instant_death,
            self.viewport.width,
        );
        if self.session.config.mode == Mode::Timed && !signal.is_finished() {
            if let Err(e) = generator::grow_timed(&mut self.session, tt, &self.viewport) {
                warn!(error = %e, "could not extend timed text");
            }
        }

        match signal {
            Signal::Completed => self.finish(false),
            Signal::Aborted => self.finish(true),
            Signal::Continue if self.time_up() => self.finish(false),
            Signal::Continue => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(tt) = self.text.as_mut() {
            tracker::process_backspace(tt, self.viewport.width);
        }
    }

    /// Esc during a test: score what was typed, or go back to the preview
    /// when nothing was.
    pub fn abort(&mut self) {
        let started = self.text.as_ref().is_some_and(|tt| tt.started_at.is_some());
        if started {
            self.finish(true);
        } else {
            self.screen = AppScreen::Main;
        }
    }

    fn time_limit(&self) -> Option<Duration> {
        let config = &self.session.config;
        (config.mode == Mode::Timed && config.timer > 0).then(|| Duration::from_secs(config.timer))
    }

    fn time_up(&self) -> bool {
        let Some(limit) = self.time_limit() else {
            return false;
        };
        self.text
            .as_ref()
            .and_then(|tt| tt.started_at)
            .is_some_and(|start| start.elapsed() >= limit)
    }

    /// Seconds left in a running timed test.
    pub fn remaining_secs(&self) -> Option<u64> {
        let limit = self.time_limit()?;
        let elapsed = self.text.as_ref().map_or(Duration::ZERO, TypeText::elapsed);
        Some(limit.saturating_sub(elapsed).as_secs())
    }

    fn finish(&mut self, aborted: bool) {
        let limit = self.time_limit();
        let Some(tt) = self.text.as_mut() else {
            return;
        };
        if tt.finished_at.is_none() {
            tt.finished_at = Some(Instant::now());
        }

        let config = &self.session.config;
        let stat = Stat::from_text(tt, config.mode, config.instant_death, limit);
        info!(wpm = stat.wpm, accuracy = stat.accuracy, aborted, "test finished");

        let record = History::from_test(tt, &stat);
        self.save_history(&record);

        self.last_stat = Some(stat);
        self.aborted = aborted;
        self.screen = AppScreen::Stat;
        if self.oneshot {
            self.should_quit = true;
        }
    }

    fn save_history(&mut self, record: &History) {
        let Some(store) = &self.history else {
            return;
        };
        let limit = self.session.config.history_limit;
        let result = if limit == 0 {
            store.prune(0)
        } else {
            store.write(record).and_then(|_| store.prune(limit))
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to save history");
            self.status = Some(format!("History not saved: {e}"));
        }
    }

    pub fn go_to_main(&mut self) {
        self.screen = AppScreen::Main;
        self.history_detail = None;
        self.regenerate();
    }

    pub fn cycle_mode(&mut self) {
        let mut config = self.session.config.clone();
        config.mode = config.mode.next();
        match self.session.apply_config(config) {
            Ok(()) => {
                // The old preview belongs to the previous mode.
                self.text = None;
                self.regenerate();
            }
            Err(e) => self.status = Some(format!("Invalid options: {e}")),
        }
    }

    pub fn toggle_instant_death(&mut self) {
        let config = &mut self.session.config;
        config.instant_death = !config.instant_death;
        let state = if config.instant_death { "on" } else { "off" };
        self.status = Some(format!("Instant death {state}"));
    }

    pub fn save_config(&mut self) {
        match self.session.config.save_to(&self.config_path) {
            Ok(()) => {
                info!(path = %self.config_path.display(), "saved options");
                self.status = Some("Options saved".to_string());
            }
            Err(e) => {
                warn!(error = %e, "failed to save options");
                self.status = Some(format!("Options not saved: {e}"));
            }
        }
    }

    pub fn go_to_history(&mut self) {
        let Some(store) = &self.history else {
            self.status = Some("History is unavailable".to_string());
            return;
        };
        match store.list() {
            Ok(names) => {
                self.history_names = names;
                self.history_selected = 0;
                self.screen = AppScreen::History;
            }
            Err(e) => {
                warn!(error = %e, "failed to list history");
                self.status = Some(format!("History unreadable: {e}"));
            }
        }
    }

    pub fn history_next(&mut self) {
        if !self.history_names.is_empty() {
            self.history_selected = (self.history_selected + 1).min(self.history_names.len() - 1);
        }
    }

    pub fn history_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn open_history(&mut self) {
        let (Some(store), Some(name)) = (&self.history, self.history_names.get(self.history_selected))
        else {
            return;
        };
        match store.load(name) {
            Ok(history) => {
                self.history_detail = Some((name.clone(), history));
                self.history_scroll = 0;
                self.screen = AppScreen::HistoryDetail;
            }
            Err(e) => {
                warn!(file = %name, error = %e, "malformed history file");
                self.status = Some(format!("Cannot open {name}: {e}"));
            }
        }
    }

    pub fn scroll_history(&mut self, down: bool) {
        let Some((_, history)) = &self.history_detail else {
            return;
        };
        let max = history_view::text_lines(history, self.viewport.width).saturating_sub(1);
        self.history_scroll = if down {
            (self.history_scroll + 1).min(max)
        } else {
            self.history_scroll.saturating_sub(1)
        };
    }

    pub fn close_history_detail(&mut self) {
        self.history_detail = None;
        self.screen = AppScreen::History;
    }

    pub fn on_tick(&mut self) {
        if self.screen == AppScreen::Test && self.time_up() {
            self.finish(false);
        }
    }

    /// Rewrap the text for the new window width and top up timed text for a
    /// taller window.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        let viewport = match viewport_for(&self.session.config, cols, rows) {
            Ok(viewport) => viewport,
            Err(e) => {
                warn!(error = %e, "ignoring resize");
                return;
            }
        };
        let width_changed = viewport.width != self.viewport.width;
        self.viewport = viewport;

        let Some(tt) = self.text.as_mut() else {
            return;
        };
        if width_changed {
            layout::fix_all_lines(tt, viewport.width);
        }
        if self.session.config.mode == Mode::Timed && !tt.is_complete() {
            if let Err(e) = generator::grow_timed(&mut self.session, tt, &self.viewport) {
                warn!(error = %e, "could not extend timed text");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app(config: Config, dir: &TempDir) -> App {
        let words = vec!["cat".to_string(), "dog".to_string()];
        let session = Session::with_seed(config, words, Vec::new(), 7).unwrap();
        let store = HistoryStore::with_base_dir(dir.path().join("history")).unwrap();
        App::new(
            session,
            Some(store),
            dir.path().join("config.toml"),
            false,
            (100, 30),
        )
        .unwrap()
    }

    fn plain(word_count: usize) -> Config {
        Config {
            word_count,
            punctuation: 0,
            insert_frequency: 0,
            ..Config::default()
        }
    }

    fn type_target(app: &mut App) {
        let target = app.text.as_ref().unwrap().text.join(" ");
        let mut chars = target.chars();
        app.start_test(chars.next().unwrap());
        for ch in chars {
            app.type_char(ch);
        }
        app.type_char(' ');
    }

    #[test]
    fn test_viewport_for_terminal_size() {
        let config = Config::default();
        let vp = viewport_for(&config, 120, 40).unwrap();
        assert_eq!((vp.width, vp.height), (config.main_width, config.main_height));
        let small = viewport_for(&config, 20, 4).unwrap();
        assert_eq!((small.width, small.height), (MIN_MAIN_WIDTH, MIN_MAIN_HEIGHT));
    }

    #[test]
    fn test_complete_test_records_history() {
        let dir = TempDir::new().unwrap();
        let mut app = app(plain(3), &dir);
        assert_eq!(app.screen, AppScreen::Main);

        type_target(&mut app);
        assert_eq!(app.screen, AppScreen::Stat);
        assert!(!app.aborted);
        let stat = app.last_stat.as_ref().unwrap();
        assert_eq!(stat.words_typed, 3);
        assert_eq!(stat.accuracy, 100.0);

        app.go_to_history();
        assert_eq!(app.screen, AppScreen::History);
        assert_eq!(app.history_names.len(), 1);
        app.open_history();
        assert_eq!(app.screen, AppScreen::HistoryDetail);
        let (_, history) = app.history_detail.as_ref().unwrap();
        assert_eq!(history.mode(), Some(Mode::Normal));
        app.close_history_detail();
        assert_eq!(app.screen, AppScreen::History);
    }

    #[test]
    fn test_instant_death_aborts() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            instant_death: true,
            ..plain(5)
        };
        let mut app = app(config, &dir);
        app.start_test('x');
        assert_eq!(app.screen, AppScreen::Stat);
        assert!(app.aborted);
        let stat = app.last_stat.as_ref().unwrap();
        assert_eq!((stat.raw_typed, stat.raw_correct), (1, 0));
    }

    #[test]
    fn test_abort_without_input_returns_to_preview() {
        let dir = TempDir::new().unwrap();
        let mut app = app(plain(5), &dir);
        app.screen = AppScreen::Test;
        app.abort();
        assert_eq!(app.screen, AppScreen::Main);
        assert!(app.last_stat.is_none());
    }

    #[test]
    fn test_history_limit_zero_keeps_nothing() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            history_limit: 0,
            ..plain(1)
        };
        let mut app = app(config, &dir);
        type_target(&mut app);
        assert_eq!(app.screen, AppScreen::Stat);
        app.go_to_history();
        assert!(app.history_names.is_empty());
    }

    #[test]
    fn test_cycle_mode_and_toggles() {
        let dir = TempDir::new().unwrap();
        let mut app = app(plain(5), &dir);
        app.cycle_mode();
        assert_eq!(app.session.config.mode, Mode::Timed);
        assert!(app.text.as_ref().unwrap().word_count() >= generator::TIMED_INITIAL_BATCH);
        assert_eq!(app.remaining_secs(), Some(app.session.config.timer));

        // No quotes loaded: the timed preview is dropped, not typed as a quote.
        app.cycle_mode();
        assert_eq!(app.session.config.mode, Mode::Quote);
        assert!(app.text.is_none());
        assert!(app.status.as_deref().unwrap().starts_with("No text generated"));
        app.start_test('a');
        assert_eq!(app.screen, AppScreen::Main);
        assert!(app.last_stat.is_none());

        app.toggle_instant_death();
        assert!(app.session.config.instant_death);
        app.save_config();
        let saved = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.mode, Mode::Quote);
        assert!(saved.instant_death);
    }

    #[test]
    fn test_resize_rewraps_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app(plain(40), &dir);
        let wide = app.text.as_ref().unwrap().lines.len();
        app.on_resize(40, 30);
        assert_eq!(app.viewport.width, 38);
        let narrow = app.text.as_ref().unwrap().lines.len();
        assert!(narrow > wide);
    }
}
