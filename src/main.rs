mod app;
mod event;
mod ui;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use ptype::config::{Config, Mode};
use ptype::generator::dictionary::{self, parse_dictionary};
use ptype::generator::quotes::{self, parse_quotes};
use ptype::logging;
use ptype::session::Session;
use ptype::store::history_store::HistoryStore;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::history_view::{HistoryDetail, HistoryList};
use ui::components::stat_view::{StatView, stat_rows};
use ui::components::typing_area::TypingArea;
use ui::layout::{ScreenLayout, centered_rect, pack_hint_lines, window_rect};

#[derive(Parser)]
#[command(name = "ptype", version, about = "Terminal typing speed trainer")]
struct Cli {
    #[arg(short, long, value_enum, help = "Test mode")]
    mode: Option<Mode>,

    #[arg(short, long, help = "Number of words in a normal test")]
    words: Option<usize>,

    #[arg(short, long, help = "Timed test length in seconds, 0 for no limit")]
    timer: Option<u64>,

    #[arg(short, long, help = "End the test on the first wrong keystroke")]
    instant_death: bool,

    #[arg(short, long, value_name = "PATH", help = "Word list to draw from, - for stdin")]
    dictionary: Option<PathBuf>,

    #[arg(short, long, value_name = "PATH", help = "Quote file to draw from, - for stdin")]
    quotes: Option<PathBuf>,

    #[arg(short, long, value_name = "PATH", help = "Options file")]
    config: Option<PathBuf>,

    #[arg(short = '1', long, help = "Quit after one test and print its stats")]
    oneshot: bool,

    #[arg(long, help = "Disable colours")]
    no_color: bool,

    #[arg(long, help = "Do not write a log file")]
    no_log: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = if cli.no_log {
        None
    } else {
        match logging::init_tracing(&logging::default_log_dir()) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("ptype: logging disabled: {err:#}");
                None
            }
        }
    };

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(words) = cli.words {
        config.word_count = words;
    }
    if let Some(timer) = cli.timer {
        config.timer = timer;
    }
    if cli.instant_death {
        config.instant_death = true;
    }
    if cli.no_color {
        config.colors_enabled = false;
    }
    config.normalize();

    if is_stdin(cli.dictionary.as_deref()) && is_stdin(cli.quotes.as_deref()) {
        bail!("only one of --dictionary and --quotes can read stdin");
    }
    let words = match &cli.dictionary {
        Some(path) => parse_dictionary(&read_corpus(path)?),
        None => dictionary::builtin_words(),
    };
    let quotes = match &cli.quotes {
        Some(path) => parse_quotes(&read_corpus(path)?),
        None => quotes::builtin_quotes(),
    };
    info!(words = words.len(), quotes = quotes.len(), "loaded corpora");

    let session = Session::new(config, words, quotes)?;
    let history = match HistoryStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "history disabled");
            None
        }
    };

    let size = crossterm::terminal::size()?;
    let mut app = App::new(session, history, config_path, cli.oneshot, size)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_secs(1));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    if app.oneshot {
        if let Some(stat) = &app.last_stat {
            for (label, value) in stat_rows(stat) {
                println!("{label}: {value}");
            }
        }
    }

    Ok(())
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.is_some_and(|p| p == Path::new("-"))
}

fn read_corpus(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(cols, rows) => app.on_resize(cols, rows),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Main => handle_main_key(app, key, ctrl),
        AppScreen::Test => handle_test_key(app, key, ctrl),
        AppScreen::Stat => handle_stat_key(app, key, ctrl),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::HistoryDetail => handle_history_detail_key(app, key),
    }
}

fn handle_main_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('r') if ctrl => app.regenerate(),
        KeyCode::Char('d') if ctrl => app.toggle_instant_death(),
        KeyCode::Char('p') if ctrl => app.go_to_history(),
        KeyCode::Char('s') if ctrl => app.save_config(),
        KeyCode::Tab => app.cycle_mode(),
        KeyCode::Char(ch) if !ctrl => app.start_test(ch),
        _ => {}
    }
}

fn handle_test_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Esc => app.abort(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) if !ctrl => app.type_char(ch),
        _ => {}
    }
}

fn handle_stat_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Char('p') if ctrl => app.go_to_history(),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.go_to_main(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_main(),
        KeyCode::Down | KeyCode::Char('j') => app.history_next(),
        KeyCode::Up | KeyCode::Char('k') => app.history_prev(),
        KeyCode::Enter => app.open_history(),
        _ => {}
    }
}

fn handle_history_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_history_detail(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_history(true),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_history(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let bg = Block::default().style(Style::default().bg(app.theme.background()));
    frame.render_widget(bg, area);

    let layout = ScreenLayout::new(area);
    render_header(frame, app, &layout);

    match app.screen {
        AppScreen::Main | AppScreen::Test => render_text(frame, app, &layout),
        AppScreen::Stat => {
            if let Some(stat) = &app.last_stat {
                let rect = centered_rect(50, 80, layout.body);
                frame.render_widget(StatView::new(stat, app.aborted, &app.theme), rect);
            }
        }
        AppScreen::History => {
            let rect = centered_rect(50, 90, layout.body);
            let list = HistoryList::new(&app.history_names, app.history_selected, &app.theme);
            frame.render_widget(list, rect);
        }
        AppScreen::HistoryDetail => {
            if let Some((name, history)) = &app.history_detail {
                let rect = centered_rect(90, 100, layout.body);
                let detail = HistoryDetail::new(
                    name,
                    history,
                    app.viewport.width,
                    app.history_scroll,
                    &app.theme,
                );
                frame.render_widget(detail, rect);
            }
        }
    }

    render_footer(frame, app, &layout);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, layout: &ScreenLayout) {
    let config = &app.session.config;
    let detail = match config.mode {
        Mode::Normal => format!("{} words", config.word_count),
        Mode::Timed => match app.remaining_secs() {
            Some(left) => format!("{left}s"),
            None => "no limit".to_string(),
        },
        Mode::Quote => app
            .text
            .as_ref()
            .and_then(|tt| tt.author.clone())
            .unwrap_or_else(|| "quote".to_string()),
    };
    let death = if config.instant_death {
        " | instant death"
    } else {
        ""
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " ptype ",
            Style::default()
                .fg(app.theme.border())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} | {detail}{death}", config.mode),
            Style::default().fg(app.theme.text()),
        ),
    ]));
    frame.render_widget(header, layout.header);
}

fn render_text(frame: &mut ratatui::Frame, app: &App, layout: &ScreenLayout) {
    let Some(tt) = &app.text else {
        return;
    };
    let rect = window_rect(&app.viewport, app.session.config.border, layout.body);
    let mut typing = TypingArea::new(tt, app.viewport.height, &app.theme)
        .border(app.session.config.border);
    if let Some(source) = &tt.source {
        typing = typing.title(format!(" {source} "));
    }
    frame.render_widget(typing, rect);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, layout: &ScreenLayout) {
    let hints: &[&str] = match app.screen {
        AppScreen::Main => &[
            "[type] Start",
            "[Tab] Mode",
            "[^R] New text",
            "[^D] Instant death",
            "[^P] History",
            "[^S] Save options",
            "[Esc] Quit",
        ],
        AppScreen::Test => &["[Esc] End test", "[Backspace] Delete"],
        AppScreen::Stat => &["[Enter] Next test", "[^P] History", "[^C] Quit"],
        AppScreen::History => &["[j/k] Select", "[Enter] Open", "[Esc] Back"],
        AppScreen::HistoryDetail => &["[j/k] Scroll", "[Esc] Back"],
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(app.theme.error()),
        )));
    }
    let width = layout.footer.width as usize;
    for hint in pack_hint_lines(hints, width) {
        lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.text()))));
    }
    lines.truncate(layout.footer.height as usize);
    frame.render_widget(Paragraph::new(lines), layout.footer);
}
