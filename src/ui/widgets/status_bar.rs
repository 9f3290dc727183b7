//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::Screen;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let Screen { ui, data, theme, keys } = screen;

        let session = if ui.app.current_view.requires_session() {
            Span::styled("● Signed in", Style::default().fg(Color::Green))
        } else {
            Span::styled("○ Signed out", Style::default().fg(Color::Red))
        };

        let busy = if ui.app.is_busy() {
            Span::styled(
                " Working... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let error = match &data.error {
            Some(error) => Span::styled(
                format!(" ⚠ {} ", error.message),
                Style::default().fg(Color::Red),
            ),
            None => Span::raw(""),
        };

        let help_hint = Span::styled(
            format!(" Press {} for help ", keys.help),
            Style::default().fg(Color::DarkGray),
        );

        let left_content = vec![
            Span::styled(
                format!(" {} ", data.feeds.system_name()),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            session,
            busy,
            error,
        ];

        // Calculate padding for right-aligned help hint
        let left_len: usize = left_content.iter().map(|s| s.content.chars().count()).sum();
        let right_len = help_hint.content.chars().count();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        let mut full_line = left_content;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::Black));

        frame.render_widget(paragraph, area);
    }
}
