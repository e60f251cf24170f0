use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use ptype::session::text::{CharState, TypeText};

use crate::ui::theme::Theme;

/// The visible slice of a test's text, coloured by what was typed so far.
pub struct TypingArea<'a> {
    text: &'a TypeText,
    height: usize,
    border: bool,
    title: Option<String>,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(text: &'a TypeText, height: usize, theme: &'a Theme) -> Self {
        Self {
            text,
            height,
            border: true,
            title: None,
            theme,
        }
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

fn char_style(state: CharState, current: bool, theme: &Theme) -> Style {
    let style = match state {
        CharState::Correct => Style::default().fg(theme.typed()),
        CharState::Incorrect => Style::default().fg(theme.error()),
        CharState::Overflow => Style::default()
            .fg(theme.error())
            .add_modifier(Modifier::UNDERLINED),
        CharState::Pending if current => Style::default().fg(theme.selected()),
        CharState::Pending => Style::default().fg(theme.text()),
    };
    if current {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Spans for one word. The cursor sits after the typed part of the current
/// word, on its next character or on the trailing separator.
fn word_spans(tt: &TypeText, word: usize, theme: &Theme) -> Vec<Span<'static>> {
    let current = word == tt.current_word;
    let cursor = current.then(|| tt.matches[word].len());

    let mut spans: Vec<Span> = tt
        .diff_word(word)
        .into_iter()
        .enumerate()
        .map(|(i, (ch, state))| {
            let mut style = char_style(state, current, theme);
            if cursor == Some(i) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(ch.to_string(), style)
        })
        .collect();

    let separator = if cursor == Some(tt.visual_len(word)) {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    spans.push(Span::styled(" ", separator));
    spans
}

fn visible_text(tt: &TypeText, height: usize, theme: &Theme) -> Vec<Line<'static>> {
    if tt.lines.is_empty() {
        return Vec::new();
    }
    tt.visible_lines(height)
        .map(|line| {
            let spans: Vec<Span> = tt
                .line_words(line)
                .flat_map(|word| word_spans(tt, word, theme))
                .collect();
            Line::from(spans)
        })
        .collect()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = visible_text(self.text, self.height, self.theme);

        let mut block = if self.border {
            Block::bordered().border_style(Style::default().fg(self.theme.border()))
        } else {
            Block::default()
        };
        block = block.style(Style::default().bg(self.theme.background()));
        if let Some(title) = self.title {
            block = block.title(title);
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
