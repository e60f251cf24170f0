use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use ptype::engine::layout::count_lines;
use ptype::session::text::{CharState, diff_word};
use ptype::store::history::History;

use crate::ui::theme::Theme;

/// Saved tests, newest first.
pub struct HistoryList<'a> {
    names: &'a [String],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> HistoryList<'a> {
    pub fn new(names: &'a [String], selected: usize, theme: &'a Theme) -> Self {
        Self {
            names,
            selected,
            theme,
        }
    }
}

/// First row to show so that `selected` stays inside a window of `rows`.
fn scroll_start(selected: usize, rows: usize, total: usize) -> usize {
    if rows == 0 || total <= rows {
        return 0;
    }
    selected
        .saturating_sub(rows / 2)
        .min(total - rows)
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let block = Block::bordered()
            .title(format!(" History ({}) ", self.names.len()))
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.background()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.names.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No saved tests",
                Style::default().fg(theme.text()),
            )))
            .render(inner, buf);
            return;
        }

        let rows = inner.height as usize;
        let start = scroll_start(self.selected, rows, self.names.len());
        let lines: Vec<Line> = self
            .names
            .iter()
            .enumerate()
            .skip(start)
            .take(rows)
            .map(|(i, name)| {
                if i == self.selected {
                    Line::from(Span::styled(
                        format!(" > {name}"),
                        Style::default()
                            .fg(theme.selected())
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("   {name}"),
                        Style::default().fg(theme.text()),
                    ))
                }
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

/// One saved test: its records, then the text coloured against what was
/// typed.
pub struct HistoryDetail<'a> {
    name: &'a str,
    history: &'a History,
    width: usize,
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> HistoryDetail<'a> {
    pub fn new(
        name: &'a str,
        history: &'a History,
        width: usize,
        scroll: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            name,
            history,
            width,
            scroll,
            theme,
        }
    }
}

/// Lines a saved text needs at `width`.
pub fn text_lines(history: &History, width: usize) -> usize {
    count_lines(&history.text, &history.matches, width)
}

/// Word ranges per line, breaking the same way `count_lines` counts.
fn wrap_words(text: &[String], matches: &[String], width: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut x = 0;
    for (i, word) in text.iter().enumerate() {
        let len = matches.get(i).map_or(word.len(), |m| word.len().max(m.len()));
        x += len + 1;
        if x > width && i > start {
            ranges.push(start..i);
            start = i;
            x = len + 1;
        }
    }
    if start < text.len() {
        ranges.push(start..text.len());
    }
    ranges
}

impl Widget for HistoryDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let block = Block::bordered()
            .title(format!(" {} ", self.name))
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.background()));
        let inner = block.inner(area);
        block.render(area, buf);

        let records = self.history.stats.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(records + 1), Constraint::Min(0)])
            .split(inner);

        let record_lines: Vec<Line> = self
            .history
            .stats
            .iter()
            .map(|nv| {
                Line::from(vec![
                    Span::styled(format!("  {:<16}", nv.name), Style::default().fg(theme.text())),
                    Span::styled(nv.value.clone(), Style::default().fg(theme.selected())),
                ])
            })
            .collect();
        Paragraph::new(record_lines).render(layout[0], buf);

        let text = &self.history.text;
        let matches = &self.history.matches;
        let lines: Vec<Line> = wrap_words(text, matches, self.width)
            .into_iter()
            .skip(self.scroll)
            .map(|range| {
                let spans: Vec<Span> = range
                    .flat_map(|i| {
                        let typed = matches.get(i).map_or("", String::as_str);
                        let mut spans: Vec<Span> = diff_word(&text[i], typed)
                            .into_iter()
                            .map(|(ch, state)| {
                                let style = match state {
                                    CharState::Correct => Style::default().fg(theme.typed()),
                                    CharState::Incorrect | CharState::Overflow => {
                                        Style::default().fg(theme.error())
                                    }
                                    CharState::Pending => Style::default().fg(theme.text()),
                                };
                                Span::styled(ch.to_string(), style)
                            })
                            .collect();
                        spans.push(Span::raw(" "));
                        spans
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_wrap_words_agrees_with_count_lines() {
        let text: Vec<String> = (0..60).map(|i| "w".repeat(i % 8 + 1)).collect();
        let matches: Vec<String> = text.iter().take(30).map(|w| format!("{w}xx")).collect();
        for width in [37, 40, 55, 80] {
            let ranges = wrap_words(&text, &matches, width);
            assert_eq!(ranges.len(), count_lines(&text, &matches, width));
            assert_eq!(ranges.first().map(|r| r.start), Some(0));
            assert_eq!(ranges.last().map(|r| r.end), Some(text.len()));
        }
    }

    #[test]
    fn test_wrap_words_uses_longer_match() {
        let text = words(&["aaaa", "bbbb"]);
        assert_eq!(wrap_words(&text, &[], 10), vec![0..2]);
        let matches = words(&["aaaazz"]);
        assert_eq!(wrap_words(&text, &matches, 10), vec![0..1, 1..2]);
    }

    #[test]
    fn test_scroll_start() {
        assert_eq!(scroll_start(0, 5, 3), 0);
        assert_eq!(scroll_start(1, 5, 20), 0);
        assert_eq!(scroll_start(10, 5, 20), 8);
        assert_eq!(scroll_start(19, 5, 20), 15);
    }
}
