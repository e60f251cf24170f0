use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use ptype::session::stat::Stat;

use crate::ui::theme::Theme;

/// Label and value rows shown for a finished test. Both character ratios are
/// listed: the final buffers and every keystroke including corrected ones.
pub fn stat_rows(stat: &Stat) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Mode", stat.mode.to_string()),
        (
            "Instant death",
            if stat.instant_death { "on" } else { "off" }.to_string(),
        ),
        ("WPM", format!("{:.2}", stat.wpm)),
        ("Accuracy", format!("{:.2}%", stat.accuracy)),
        ("Chars", format!("{}/{}", stat.ncorrect, stat.ntyped)),
        ("Keystrokes", format!("{}/{}", stat.raw_correct, stat.raw_typed)),
        ("Time", format!("{:.2}s", stat.elapsed_secs())),
        ("Words", stat.words_typed.to_string()),
        ("Avg word length", format!("{:.2}", stat.avg_word_len)),
    ];
    if let Some(author) = &stat.author {
        rows.push(("Author", author.clone()));
    }
    if let Some(source) = &stat.source {
        rows.push(("Source", source.clone()));
    }
    rows
}

pub struct StatView<'a> {
    stat: &'a Stat,
    aborted: bool,
    theme: &'a Theme,
}

impl<'a> StatView<'a> {
    pub fn new(stat: &'a Stat, aborted: bool, theme: &'a Theme) -> Self {
        Self {
            stat,
            aborted,
            theme,
        }
    }
}

impl Widget for StatView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let title = if self.aborted {
            " Test Aborted "
        } else {
            " Test Complete "
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.background()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label_style = Style::default().fg(theme.text());
        let value_style = Style::default()
            .fg(theme.selected())
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(
                "Results",
                Style::default()
                    .fg(theme.border())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::default(),
        ];
        for (label, value) in stat_rows(self.stat) {
            let value_style = match label {
                "Accuracy" if self.stat.accuracy < 100.0 => {
                    Style::default().fg(theme.error()).add_modifier(Modifier::BOLD)
                }
                _ => value_style,
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<16}"), label_style),
                Span::styled(value, value_style),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptype::config::Mode;

    fn stat() -> Stat {
        Stat {
            mode: Mode::Quote,
            instant_death: false,
            elapsed_ms: 12_340,
            ntyped: 40,
            ncorrect: 38,
            raw_typed: 45,
            raw_correct: 39,
            words_typed: 8,
            wpm: 36.97,
            accuracy: 86.666,
            avg_word_len: 4.0,
            author: Some("Ada Lovelace".to_string()),
            source: None,
        }
    }

    #[test]
    fn test_stat_rows() {
        let rows = stat_rows(&stat());
        assert_eq!(rows[0], ("Mode", "Quote".to_string()));
        assert_eq!(rows[3], ("Accuracy", "86.67%".to_string()));
        assert_eq!(rows[4], ("Chars", "38/40".to_string()));
        assert_eq!(rows[5], ("Keystrokes", "39/45".to_string()));
        assert_eq!(rows[6], ("Time", "12.34s".to_string()));
        assert_eq!(rows.last(), Some(&("Author", "Ada Lovelace".to_string())));
    }
}
