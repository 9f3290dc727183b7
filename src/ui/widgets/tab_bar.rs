//! Tab bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::View;
use crate::ui::Screen;

/// Tab bar widget.
pub struct TabBar;

impl TabBar {
    /// Render the tab bar.
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let current = screen.ui.app.current_view;
        if current == View::Login {
            let title = Line::from(Span::styled(
                " Sign in to continue",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(Paragraph::new(title), area);
            return;
        }

        let keys = screen.keys;
        let tabs = [
            (&keys.dashboard, View::Dashboard),
            (&keys.monitors, View::Monitors),
            (&keys.brokers, View::Brokers),
            (&keys.news, View::News),
            (&keys.indicators, View::Indicators),
        ];

        let mut spans = vec![Span::raw(" ")];

        for (key, view) in tabs {
            let key_style = Style::default().fg(Color::DarkGray);
            let name_style = if current == view {
                Style::default()
                    .fg(screen.theme.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };

            spans.push(Span::styled(format!("[{key}] "), key_style));
            spans.push(Span::styled(view.title(), name_style));
            spans.push(Span::raw("  "));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
