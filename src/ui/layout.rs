use ratatui::layout::{Constraint, Direction, Layout, Rect};

use ptype::engine::Viewport;

/// Header, body and footer rows of the screen.
pub struct ScreenLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            body: vertical[1],
            footer: vertical[2],
        }
    }
}

/// The typing window: the viewport plus its border, centred in `area`.
pub fn window_rect(viewport: &Viewport, border: bool, area: Rect) -> Rect {
    let frame = if border { 2 } else { 0 };
    let w = (viewport.width as u16).saturating_add(frame).min(area.width);
    let h = (viewport.height as u16).saturating_add(frame).min(area.height);
    centered(w, h, area)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);
    centered(target_w, target_h, area)
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let left = area
        .x
        .saturating_add((area.width.saturating_sub(width)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(height)) / 2);

    Rect::new(left, top, width, height)
}

/// Greedily pack key hints into as few lines as fit in `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_rect_centred_with_border() {
        let viewport = Viewport::new(40, 5).unwrap();
        let rect = window_rect(&viewport, true, Rect::new(0, 0, 100, 30));
        assert_eq!(rect, Rect::new(29, 11, 42, 7));
        let bare = window_rect(&viewport, false, Rect::new(0, 0, 100, 30));
        assert_eq!((bare.width, bare.height), (40, 5));
    }

    #[test]
    fn test_window_rect_clipped_to_area() {
        let viewport = Viewport::new(80, 21).unwrap();
        let rect = window_rect(&viewport, true, Rect::new(0, 0, 50, 10));
        assert_eq!(rect, Rect::new(0, 0, 50, 10));
    }

    #[test]
    fn test_pack_hint_lines() {
        let lines = pack_hint_lines(&["[Esc] Quit", "[Tab] Mode", "[^P] History"], 24);
        assert_eq!(lines, vec![" [Esc] Quit  [Tab] Mode", " [^P] History"]);
        assert!(pack_hint_lines(&[], 10).is_empty());
    }
}
