//! Colors resolved from the theme configuration.

use crate::api::SignalKind;
use crate::config::ThemeConfig;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub buy: Color,
    pub sell: Color,
    pub neutral: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}

impl From<&ThemeConfig> for Theme {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            primary: parse(&config.primary, Color::Cyan),
            buy: parse(&config.buy, Color::Green),
            sell: parse(&config.sell, Color::Red),
            neutral: parse(&config.neutral, Color::Gray),
            border: parse(&config.border, Color::DarkGray),
        }
    }
}

fn parse(value: &str, fallback: Color) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        tracing::warn!(%value, "invalid theme color, using default");
        fallback
    })
}

impl Theme {
    pub fn signal(&self, kind: SignalKind) -> Style {
        let color = match kind {
            SignalKind::Buy => self.buy,
            SignalKind::Sell => self.sell,
            SignalKind::Neutral => self.neutral,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.primary } else { self.border })
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors_parse() {
        let theme = Theme::default();
        assert_eq!(theme.buy, Color::Rgb(0x66, 0xbb, 0x6a));
    }

    #[test]
    fn test_bad_color_falls_back() {
        let config = ThemeConfig {
            sell: "not-a-color".into(),
            ..Default::default()
        };
        assert_eq!(Theme::from(&config).sell, Color::Red);
    }
}
