//! Floating signal badge.
//!
//! Collapsed it shows direction and symbol. Expanded it adds price, source
//! and the message. Position and phase come from [`crate::overlay::Overlay`].

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::format_price;
use crate::overlay::{ActiveSignal, OverlayPhase, SignalSource};
use crate::ui::{Screen, Theme};

pub struct SignalBadge;

fn source_label(signal: &ActiveSignal) -> String {
    match &signal.source {
        SignalSource::Manual => "manual signal".to_string(),
        SignalSource::Monitor { name } => format!("monitor {name}"),
    }
}

fn expanded_lines(signal: &ActiveSignal, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                signal.kind.to_string(),
                theme.signal(signal.kind).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", signal.symbol)),
        ]),
        Line::from(format!("@ {}", format_price(signal.price))),
        Line::from(Span::styled(source_label(signal), theme.muted())),
    ];
    if let Some(message) = &signal.message {
        lines.push(Line::from(message.clone()));
    }
    lines
}

impl SignalBadge {
    pub fn render(frame: &mut Frame, screen: Screen<'_>) {
        let overlay = &screen.ui.overlay;
        let (Some(area), Some(signal)) = (overlay.area(), overlay.signal()) else {
            return;
        };
        let theme = screen.theme;
        let accent = theme.signal(signal.kind);

        let lines = match overlay.phase() {
            OverlayPhase::Hidden => return,
            OverlayPhase::Collapsed => vec![Line::from(vec![
                Span::styled(signal.kind.to_string(), accent.add_modifier(Modifier::BOLD)),
                Span::raw(format!(" {}", signal.symbol)),
            ])],
            OverlayPhase::Expanded => expanded_lines(signal, theme),
        };

        let border_type = if overlay.is_dragging() {
            BorderType::Double
        } else {
            BorderType::Rounded
        };

        frame.render_widget(Clear, area);
        let badge = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type)
                    .border_style(Style::default().fg(accent.fg.unwrap_or(theme.primary))),
            );
        frame.render_widget(badge, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SignalKind;
    use crate::config::ThemeConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn signal(source: SignalSource, message: Option<&str>) -> ActiveSignal {
        ActiveSignal {
            source,
            symbol: "XAUUSD".to_string(),
            kind: SignalKind::Sell,
            price: Some(dec!(2345.10)),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label(&signal(SignalSource::Manual, None)), "manual signal");
        let monitor = SignalSource::Monitor {
            name: "Gold H1".to_string(),
        };
        assert_eq!(source_label(&signal(monitor, None)), "monitor Gold H1");
    }

    #[test]
    fn test_expanded_lines_include_message_only_when_present() {
        let theme = Theme::from(&ThemeConfig::default());
        assert_eq!(expanded_lines(&signal(SignalSource::Manual, None), &theme).len(), 3);

        let lines = expanded_lines(&signal(SignalSource::Manual, Some("take profit 2330")), &theme);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].to_string(), "@ 2345.1");
    }
}
