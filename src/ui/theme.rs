use ratatui::style::Color;

use ptype::config::ThemeColors;

/// Resolved colours for drawing. With colours disabled everything falls back
/// to the terminal's own.
#[derive(Clone, Debug)]
pub struct Theme {
    pub colors: ThemeColors,
    pub enabled: bool,
}

impl Theme {
    pub fn new(colors: ThemeColors, enabled: bool) -> Self {
        Self { colors, enabled }
    }

    /// ANSI colour names or `#rrggbb`. Anything unrecognised is the
    /// terminal default.
    pub fn parse_color(name: &str) -> Color {
        let name = name.trim();
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return Color::Rgb(r, g, b);
                }
            }
            return Color::Reset;
        }

        match name.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "darkgray" | "darkgrey" => Color::DarkGray,
            "lightred" => Color::LightRed,
            "lightgreen" => Color::LightGreen,
            "lightyellow" => Color::LightYellow,
            "lightblue" => Color::LightBlue,
            "lightmagenta" => Color::LightMagenta,
            "lightcyan" => Color::LightCyan,
            "white" => Color::White,
            _ => Color::Reset,
        }
    }

    fn pick(&self, name: &str) -> Color {
        if self.enabled {
            Self::parse_color(name)
        } else {
            Color::Reset
        }
    }

    pub fn border(&self) -> Color { self.pick(&self.colors.border) }
    pub fn text(&self) -> Color { self.pick(&self.colors.text) }
    pub fn typed(&self) -> Color { self.pick(&self.colors.typed) }
    pub fn error(&self) -> Color { self.pick(&self.colors.error) }
    pub fn selected(&self) -> Color { self.pick(&self.colors.selected) }
    pub fn background(&self) -> Color { self.pick(&self.colors.background) }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeColors::default(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_names_and_hex() {
        assert_eq!(Theme::parse_color("magenta"), Color::Magenta);
        assert_eq!(Theme::parse_color("Light-Blue"), Color::LightBlue);
        assert_eq!(Theme::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(Theme::parse_color("default"), Color::Reset);
        assert_eq!(Theme::parse_color("#zzzzzz"), Color::Reset);
        assert_eq!(Theme::parse_color("#é€x"), Color::Reset);
        assert_eq!(Theme::parse_color("chartreuse"), Color::Reset);
    }

    #[test]
    fn test_disabled_theme_uses_terminal_colors() {
        let theme = Theme::new(ThemeColors::default(), false);
        assert_eq!(theme.border(), Color::Reset);
        assert_eq!(Theme::default().border(), Color::Magenta);
        assert_eq!(Theme::default().error(), Color::Red);
    }
}
